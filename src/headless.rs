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
//! In-memory `RenderEngine` which keeps an exact account of its resources
//!
//! Rendering produces a `RenderedFrame` with the world pose, color and
//! projected position of every mesh instead of pixels.
use log::trace;
use na::{Isometry3, Point3};
use nalgebra as na;
use std::collections::BTreeMap;

use crate::engine::*;
use crate::errors::*;
use crate::link::*;
use crate::scene::*;

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Group,
    Mesh {
        name: String,
        geometry: GeometryHandle,
        material: MaterialHandle,
    },
}

#[derive(Debug, Clone)]
struct SceneNode {
    parent: Option<NodeHandle>,
    local: Isometry3<f32>,
    kind: NodeKind,
}

/// Number of engine calls by kind
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub surfaces_created: usize,
    pub surfaces_released: usize,
    pub geometries_created: usize,
    pub geometries_released: usize,
    pub materials_created: usize,
    pub materials_updated: usize,
    pub materials_released: usize,
    pub nodes_added: usize,
    pub nodes_removed: usize,
    pub transforms_set: usize,
    pub renders: usize,
}

/// Resources which are allocated and not yet released
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LiveResources {
    pub surfaces: usize,
    pub geometries: usize,
    pub materials: usize,
    pub nodes: usize,
}

impl LiveResources {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One mesh as it was drawn
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMesh {
    pub name: String,
    pub world: Isometry3<f32>,
    pub geometry: Geometry,
    pub material: Material,
    /// mesh origin in normalized device coordinates
    pub ndc: Point3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub surface: SurfaceHandle,
    pub background: Option<u32>,
    pub meshes: Vec<RenderedMesh>,
}

impl RenderedFrame {
    pub fn mesh(&self, name: &str) -> Option<&RenderedMesh> {
        self.meshes.iter().find(|mesh| mesh.name == name)
    }
}

/// Offscreen engine without a graphics context
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    unavailable: Option<String>,
    next_id: u64,
    surfaces: BTreeMap<SurfaceHandle, SurfaceSize>,
    geometries: BTreeMap<GeometryHandle, Geometry>,
    materials: BTreeMap<MaterialHandle, Material>,
    nodes: BTreeMap<NodeHandle, SceneNode>,
    environment: Option<Environment>,
    stats: EngineStats,
    last_frame: Option<RenderedFrame>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine which refuses to create any surface
    ///
    /// ```
    /// use pipette_arm::*;
    ///
    /// let mut engine = HeadlessEngine::unavailable("no GL context");
    /// let size = SurfaceSize { width: 640, height: 480 };
    /// assert!(engine.create_surface(size).is_err());
    /// ```
    pub fn unavailable(reason: &str) -> Self {
        Self {
            unavailable: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn live_resources(&self) -> LiveResources {
        LiveResources {
            surfaces: self.surfaces.len(),
            geometries: self.geometries.len(),
            materials: self.materials.len(),
            nodes: self.nodes.len(),
        }
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle)
    }

    pub fn local_transform(&self, node: NodeHandle) -> Option<Isometry3<f32>> {
        self.nodes.get(&node).map(|n| n.local)
    }

    /// Compose local transforms from the scene root down to `node`
    pub fn world_transform(&self, node: NodeHandle) -> Option<Isometry3<f32>> {
        let mut current = self.nodes.get(&node)?;
        let mut world = current.local;
        while let Some(parent) = current.parent {
            current = self.nodes.get(&parent)?;
            world = current.local * world;
        }
        Some(world)
    }

    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.last_frame.as_ref()
    }

    fn subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut found = vec![root];
        let mut i = 0;
        while i < found.len() {
            let parent = found[i];
            found.extend(
                self.nodes
                    .iter()
                    .filter(|(_, node)| node.parent == Some(parent))
                    .map(|(handle, _)| *handle),
            );
            i += 1;
        }
        found
    }
}

impl RenderEngine for HeadlessEngine {
    fn create_surface(&mut self, size: SurfaceSize) -> Result<SurfaceHandle> {
        if let Some(reason) = &self.unavailable {
            return Err(Error::RenderUnavailable {
                reason: reason.clone(),
            });
        }
        if size.is_empty() {
            return Err(Error::RenderUnavailable {
                reason: format!("empty surface {}x{}", size.width, size.height),
            });
        }
        let handle = SurfaceHandle(self.next_id());
        self.surfaces.insert(handle, size);
        self.stats.surfaces_created += 1;
        Ok(handle)
    }

    fn release_surface(&mut self, surface: SurfaceHandle) -> Result<()> {
        self.surfaces.remove(&surface).ok_or(surface.unknown())?;
        self.stats.surfaces_released += 1;
        Ok(())
    }

    fn set_environment(&mut self, environment: &Environment) {
        self.environment = Some(environment.clone());
    }

    fn create_geometry(&mut self, geometry: &Geometry) -> Result<GeometryHandle> {
        let handle = GeometryHandle(self.next_id());
        self.geometries.insert(handle, *geometry);
        self.stats.geometries_created += 1;
        Ok(handle)
    }

    fn release_geometry(&mut self, geometry: GeometryHandle) -> Result<()> {
        self.geometries.remove(&geometry).ok_or(geometry.unknown())?;
        self.stats.geometries_released += 1;
        Ok(())
    }

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle> {
        let handle = MaterialHandle(self.next_id());
        self.materials.insert(handle, *material);
        self.stats.materials_created += 1;
        Ok(handle)
    }

    fn update_material(&mut self, handle: MaterialHandle, material: &Material) -> Result<()> {
        let slot = self.materials.get_mut(&handle).ok_or(handle.unknown())?;
        *slot = *material;
        self.stats.materials_updated += 1;
        Ok(())
    }

    fn release_material(&mut self, material: MaterialHandle) -> Result<()> {
        self.materials.remove(&material).ok_or(material.unknown())?;
        self.stats.materials_released += 1;
        Ok(())
    }

    fn add_group(
        &mut self,
        parent: Option<NodeHandle>,
        local: &Isometry3<f32>,
    ) -> Result<NodeHandle> {
        if let Some(parent) = parent {
            if !self.nodes.contains_key(&parent) {
                return Err(parent.unknown());
            }
        }
        let handle = NodeHandle(self.next_id());
        self.nodes.insert(
            handle,
            SceneNode {
                parent,
                local: *local,
                kind: NodeKind::Group,
            },
        );
        self.stats.nodes_added += 1;
        Ok(handle)
    }

    fn add_mesh(
        &mut self,
        parent: NodeHandle,
        geometry: GeometryHandle,
        material: MaterialHandle,
        visual: &Visual,
    ) -> Result<NodeHandle> {
        if !self.nodes.contains_key(&parent) {
            return Err(parent.unknown());
        }
        if !self.geometries.contains_key(&geometry) {
            return Err(geometry.unknown());
        }
        if !self.materials.contains_key(&material) {
            return Err(material.unknown());
        }
        let handle = NodeHandle(self.next_id());
        self.nodes.insert(
            handle,
            SceneNode {
                parent: Some(parent),
                local: visual.origin,
                kind: NodeKind::Mesh {
                    name: visual.name.clone(),
                    geometry,
                    material,
                },
            },
        );
        self.stats.nodes_added += 1;
        Ok(handle)
    }

    fn set_local_transform(&mut self, node: NodeHandle, local: &Isometry3<f32>) -> Result<()> {
        let slot = self.nodes.get_mut(&node).ok_or(node.unknown())?;
        slot.local = *local;
        self.stats.transforms_set += 1;
        Ok(())
    }

    fn remove_node(&mut self, node: NodeHandle) -> Result<()> {
        if !self.nodes.contains_key(&node) {
            return Err(node.unknown());
        }
        for handle in self.subtree(node) {
            self.nodes.remove(&handle);
            self.stats.nodes_removed += 1;
        }
        Ok(())
    }

    fn render(&mut self, surface: SurfaceHandle, camera: &Camera) -> Result<()> {
        let size = *self.surfaces.get(&surface).ok_or(surface.unknown())?;
        let mut meshes = Vec::new();
        for (handle, node) in &self.nodes {
            if let NodeKind::Mesh {
                name,
                geometry,
                material,
            } = &node.kind
            {
                let (Some(geometry), Some(material), Some(world)) = (
                    self.geometries.get(geometry),
                    self.materials.get(material),
                    self.world_transform(*handle),
                ) else {
                    continue;
                };
                let origin = Point3::from(world.translation.vector);
                meshes.push(RenderedMesh {
                    name: name.clone(),
                    world,
                    geometry: *geometry,
                    material: *material,
                    ndc: camera.project(size.aspect(), &origin),
                });
            }
        }
        trace!("render {} with {} meshes", surface, meshes.len());
        self.last_frame = Some(RenderedFrame {
            surface,
            background: self.environment.as_ref().map(|env| env.background),
            meshes,
        });
        self.stats.renders += 1;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use na::{Translation3, UnitQuaternion};

    fn translation(x: f32, y: f32, z: f32) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity())
    }

    #[test]
    fn test_double_release_is_error() {
        let mut engine = HeadlessEngine::new();
        let geometry = engine
            .create_geometry(&Geometry::Sphere { radius: 1.0 })
            .unwrap();
        assert!(engine.release_geometry(geometry).is_ok());
        assert!(matches!(
            engine.release_geometry(geometry),
            Err(Error::UnknownHandle { kind: "geometry", .. })
        ));
        assert_eq!(engine.stats().geometries_released, 1);
    }

    #[test]
    fn test_remove_node_removes_subtree() {
        let mut engine = HeadlessEngine::new();
        let root = engine.add_group(None, &translation(0.0, 1.0, 0.0)).unwrap();
        let child = engine
            .add_group(Some(root), &translation(0.0, 0.0, 1.0))
            .unwrap();
        let other = engine.add_group(None, &Isometry3::identity()).unwrap();
        let world = engine.world_transform(child).unwrap();
        assert_eq!(world.translation.vector, na::Vector3::new(0.0, 1.0, 1.0));
        engine.remove_node(root).unwrap();
        assert!(engine.local_transform(child).is_none());
        assert!(engine.local_transform(other).is_some());
        assert_eq!(engine.live_resources().nodes, 1);
    }

    #[test]
    fn test_empty_surface_is_unavailable() {
        let mut engine = HeadlessEngine::new();
        for (width, height) in [(0, 600), (800, 0), (0, 0)] {
            assert!(matches!(
                engine.create_surface(SurfaceSize { width, height }),
                Err(Error::RenderUnavailable { .. })
            ));
        }
        assert_eq!(engine.stats().surfaces_created, 0);
    }
}
