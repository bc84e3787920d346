/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
//! Keeps an engine scene in sync with the application `Snapshot`
use log::{debug, info, warn};
use na::Isometry3;
use nalgebra as na;
use std::collections::BTreeMap;

use crate::app::Snapshot;
use crate::arm::*;
use crate::engine::*;
use crate::errors::*;
use crate::link::*;
use crate::palette::Treatment;
use crate::scene::*;

/// What the viewport shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewport {
    Rendered(SurfaceHandle),
    /// The engine could not be used, show this text instead
    Placeholder(String),
}

/// Handles allocated while mounting, in allocation order
#[derive(Debug, Default)]
struct Resources {
    surface: Option<SurfaceHandle>,
    root: Option<NodeHandle>,
    frames: Vec<NodeHandle>,
    geometries: Vec<GeometryHandle>,
    materials: BTreeMap<MaterialRole, MaterialHandle>,
    meshes: Vec<NodeHandle>,
}

impl Resources {
    /// Give every handle back to the engine
    ///
    /// All releases are attempted even if one fails; the first error is returned.
    fn release<E: RenderEngine>(self, engine: &mut E) -> Result<()> {
        let mut results = Vec::new();
        // removing the root removes every frame and mesh under it
        if let Some(root) = self.root {
            results.push(engine.remove_node(root));
        }
        for (_, material) in self.materials {
            results.push(engine.release_material(material));
        }
        for geometry in self.geometries {
            results.push(engine.release_geometry(geometry));
        }
        if let Some(surface) = self.surface {
            results.push(engine.release_surface(surface));
        }
        results.into_iter().collect()
    }
}

#[derive(Debug)]
struct Mounted {
    surface: SurfaceHandle,
    camera: Camera,
    /// source of the joint frame transforms
    arm: ArmChain,
    frames: [NodeHandle; NUM_JOINTS],
    resources: Resources,
    current: Snapshot,
}

#[derive(Debug)]
enum State {
    Mounted(Mounted),
    Placeholder { message: String, current: Snapshot },
}

/// The single owner of everything it allocates in the engine
///
/// # Examples
///
/// ```
/// use pipette_arm::*;
///
/// let mut engine = HeadlessEngine::new();
/// let mut state = AppState::new();
/// let size = SurfaceSize { width: 800, height: 600 };
/// let mut presenter = Presenter::mount(&mut engine, size, &Environment::default(), &state.snapshot());
///
/// state.update(Message::JointChanged { joint: JointId::Elbow, degrees: 0 });
/// assert!(presenter.apply(&mut engine, &state.snapshot()).unwrap());
///
/// presenter.unmount(&mut engine).unwrap();
/// assert!(engine.live_resources().is_empty());
/// ```
#[derive(Debug)]
pub struct Presenter {
    state: State,
}

impl Presenter {
    /// Build the scene and render it once
    ///
    /// This never fails. Without a usable engine the presenter keeps a
    /// placeholder message and releases whatever was allocated.
    pub fn mount<E: RenderEngine>(
        engine: &mut E,
        size: SurfaceSize,
        environment: &Environment,
        snapshot: &Snapshot,
    ) -> Self {
        let mut resources = Resources::default();
        let arm = ArmChain::new(&ARM_GEOMETRY);
        arm.set_angles(&snapshot.angles);
        match Self::build(engine, size, environment, &arm, snapshot, &mut resources) {
            Ok((surface, frames)) => {
                let mounted = Mounted {
                    surface,
                    camera: environment.camera.clone(),
                    arm,
                    frames,
                    resources,
                    current: snapshot.clone(),
                };
                info!(
                    "mounted {} with {} meshes",
                    mounted.surface,
                    mounted.resources.meshes.len()
                );
                Self {
                    state: State::Mounted(mounted),
                }
            }
            Err(err) => {
                warn!("3D view unavailable: {}", err);
                if let Err(release_err) = resources.release(engine) {
                    warn!("failed to release a partial scene: {}", release_err);
                }
                Self {
                    state: State::Placeholder {
                        message: format!("3D view unavailable: {}", err),
                        current: snapshot.clone(),
                    },
                }
            }
        }
    }

    fn build<E: RenderEngine>(
        engine: &mut E,
        size: SurfaceSize,
        environment: &Environment,
        arm: &ArmChain,
        snapshot: &Snapshot,
        resources: &mut Resources,
    ) -> Result<(SurfaceHandle, [NodeHandle; NUM_JOINTS])> {
        let surface = engine.create_surface(size)?;
        resources.surface = Some(surface);
        engine.set_environment(environment);

        let root = engine.add_group(None, &Isometry3::identity())?;
        resources.root = Some(root);
        let mut parent = root;
        for (joint, local) in JointId::ALL.into_iter().zip(arm.local_transforms()) {
            debug!("frame {} under {}", joint, parent);
            parent = engine.add_group(Some(parent), &local)?;
            resources.frames.push(parent);
        }
        let mut frames = [root; NUM_JOINTS];
        frames.copy_from_slice(&resources.frames);

        let treatment = Treatment::for_selection(&snapshot.color);
        for role in MaterialRole::ALL {
            let material = engine.create_material(&treatment.material(role))?;
            resources.materials.insert(role, material);
        }

        for visual in describe_arm(&ARM_GEOMETRY) {
            let geometry = engine.create_geometry(&visual.geometry)?;
            resources.geometries.push(geometry);
            let parent = match visual.frame {
                Frame::Root => root,
                Frame::Joint(joint) => frames[joint.index()],
            };
            let material = match resources.materials.get(&visual.role) {
                Some(material) => *material,
                None => {
                    let material = engine.create_material(&treatment.material(visual.role))?;
                    resources.materials.insert(visual.role, material);
                    material
                }
            };
            let mesh = engine.add_mesh(parent, geometry, material, &visual)?;
            resources.meshes.push(mesh);
        }

        engine.render(surface, &environment.camera)?;
        Ok((surface, frames))
    }

    /// Bring the scene up to date with `snapshot`
    ///
    /// Only changed frames and the selection dependent materials are touched.
    /// Returns true if a frame was rendered.
    pub fn apply<E: RenderEngine>(&mut self, engine: &mut E, snapshot: &Snapshot) -> Result<bool> {
        let mounted = match &mut self.state {
            State::Mounted(mounted) => mounted,
            State::Placeholder { current, .. } => {
                *current = snapshot.clone();
                return Ok(false);
            }
        };
        let mut dirty = false;
        let changed = snapshot.angles.changed_joints(&mounted.current.angles);
        if !changed.is_empty() {
            mounted.arm.set_angles(&snapshot.angles);
            let locals = mounted.arm.local_transforms();
            for joint in changed {
                let frame = mounted.frames[joint.index()];
                engine.set_local_transform(frame, &locals[joint.index()])?;
            }
            dirty = true;
        }
        if snapshot.color != mounted.current.color {
            let treatment = Treatment::for_selection(&snapshot.color);
            for (role, material) in &mounted.resources.materials {
                if role.follows_selection() {
                    engine.update_material(*material, &treatment.material(*role))?;
                }
            }
            dirty = true;
        }
        mounted.current = snapshot.clone();
        if dirty {
            engine.render(mounted.surface, &mounted.camera)?;
        }
        Ok(dirty)
    }

    /// Release every resource of this presenter exactly once
    pub fn unmount<E: RenderEngine>(self, engine: &mut E) -> Result<()> {
        match self.state {
            State::Mounted(mounted) => {
                info!("unmounting {}", mounted.surface);
                mounted.resources.release(engine)
            }
            State::Placeholder { .. } => Ok(()),
        }
    }

    pub fn view(&self) -> Viewport {
        match &self.state {
            State::Mounted(mounted) => Viewport::Rendered(mounted.surface),
            State::Placeholder { message, .. } => Viewport::Placeholder(message.clone()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.state, State::Placeholder { .. })
    }

    /// The last applied snapshot
    pub fn snapshot(&self) -> &Snapshot {
        match &self.state {
            State::Mounted(mounted) => &mounted.current,
            State::Placeholder { current, .. } => current,
        }
    }

    /// Engine node of the joint frame, if mounted
    pub fn frame(&self, joint: JointId) -> Option<NodeHandle> {
        match &self.state {
            State::Mounted(mounted) => Some(mounted.frames[joint.index()]),
            State::Placeholder { .. } => None,
        }
    }

    /// The kinematic chain the joint frames follow, if mounted
    pub fn arm(&self) -> Option<&ArmChain> {
        match &self.state {
            State::Mounted(mounted) => Some(&mounted.arm),
            State::Placeholder { .. } => None,
        }
    }

    /// Engine material of the role, if mounted
    pub fn material(&self, role: MaterialRole) -> Option<MaterialHandle> {
        match &self.state {
            State::Mounted(mounted) => mounted.resources.materials.get(&role).copied(),
            State::Placeholder { .. } => None,
        }
    }
}
