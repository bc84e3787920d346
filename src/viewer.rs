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
//! `RenderEngine` backed by a [kiss3d](https://docs.rs/kiss3d) window
//!
//! kiss3d has no hemisphere light, PBR materials or shadow maps. The
//! directional light becomes an absolute point light, and only the material
//! color is used.
//!
//! kiss3d links its own nalgebra release, so every point and isometry handed
//! to the window is rebuilt from plain coordinates through `kiss3d::nalgebra`.
use kiss3d::camera::ArcBall;
use kiss3d::event::{Action, Key, WindowEvent};
use kiss3d::light::Light;
use kiss3d::nalgebra as kna;
use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use log::{debug, warn};
use na::{Isometry3, Point3};
use nalgebra as na;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::engine::*;
use crate::errors::*;
use crate::link::*;
use crate::scene::*;

fn rgb(color: &Color) -> kna::Point3<f32> {
    kna::Point3::new(color.r, color.g, color.b)
}

fn hex_rgb(hex: u32) -> kna::Point3<f32> {
    rgb(&Color::from_hex(hex))
}

fn point(p: &Point3<f32>) -> kna::Point3<f32> {
    kna::Point3::new(p.x, p.y, p.z)
}

fn isometry(iso: &Isometry3<f32>) -> kna::Isometry3<f32> {
    let t = &iso.translation.vector;
    let q = iso.rotation.quaternion();
    kna::Isometry3::from_parts(
        kna::Translation3::new(t.x, t.y, t.z),
        kna::UnitQuaternion::new_unchecked(kna::Quaternion::new(q.w, q.i, q.j, q.k)),
    )
}

/// from, to, color
type Line = (kna::Point3<f32>, kna::Point3<f32>, kna::Point3<f32>);

/// Grid and axes helper lines
fn helper_lines(environment: &Environment) -> Vec<Line> {
    let grid_color = hex_rgb(0x888888);
    let mut lines = environment
        .grid
        .lines()
        .iter()
        .map(|(a, b)| (point(a), point(b), grid_color))
        .collect::<Vec<_>>();
    let origin = kna::Point3::origin();
    let axes = environment.axes;
    lines.push((origin, kna::Point3::new(axes, 0.0, 0.0), hex_rgb(0xff0000)));
    lines.push((origin, kna::Point3::new(0.0, axes, 0.0), hex_rgb(0x00ff00)));
    lines.push((origin, kna::Point3::new(0.0, 0.0, axes), hex_rgb(0x0000ff)));
    lines
}

struct ViewerNode {
    scene: SceneNode,
    parent: Option<NodeHandle>,
    material: Option<MaterialHandle>,
}

/// One kiss3d window as the single surface
pub struct Kiss3dEngine {
    title: String,
    window: Option<Window>,
    surface: Option<SurfaceHandle>,
    camera: Option<ArcBall>,
    font: Rc<Font>,
    lines: Vec<Line>,
    next_id: u64,
    geometries: HashMap<GeometryHandle, Geometry>,
    materials: HashMap<MaterialHandle, Material>,
    nodes: HashMap<NodeHandle, ViewerNode>,
    hud: String,
    closed: bool,
}

impl Kiss3dEngine {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            window: None,
            surface: None,
            camera: None,
            font: Font::default(),
            lines: Vec::new(),
            next_id: 0,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            nodes: HashMap::new(),
            hud: String::new(),
            closed: false,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn window_mut(&mut self) -> Result<&mut Window> {
        self.window.as_mut().ok_or(Error::RenderUnavailable {
            reason: "no window".to_owned(),
        })
    }

    /// Text drawn at the top left corner of every frame
    pub fn set_hud(&mut self, text: String) {
        self.hud = text;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Keys pressed since the last call
    pub fn key_presses(&mut self) -> Vec<Key> {
        let Some(window) = self.window.as_mut() else {
            return Vec::new();
        };
        let mut keys = Vec::new();
        for mut event in window.events().iter() {
            if let WindowEvent::Key(key, Action::Press, _) = event.value {
                keys.push(key);
                // keep the default camera key bindings away
                event.inhibited = true;
            }
        }
        keys
    }

    /// Draw one frame and poll the window, returns false once it is closed
    pub fn run_frame(&mut self) -> bool {
        let (Some(window), Some(camera)) = (self.window.as_mut(), self.camera.as_mut()) else {
            return false;
        };
        for (a, b, color) in &self.lines {
            window.draw_line(a, b, color);
        }
        if !self.hud.is_empty() {
            window.draw_text(
                &self.hud,
                &kna::Point2::new(10.0, 10.0),
                36.0,
                &self.font,
                &hex_rgb(0x222222),
            );
        }
        if !window.render_with_camera(camera) {
            self.closed = true;
        }
        !self.closed
    }

    fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
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

impl RenderEngine for Kiss3dEngine {
    fn create_surface(&mut self, size: SurfaceSize) -> Result<SurfaceHandle> {
        if self.window.is_some() {
            return Err(Error::RenderUnavailable {
                reason: "the window is already in use".to_owned(),
            });
        }
        if size.is_empty() {
            return Err(Error::RenderUnavailable {
                reason: format!("empty surface {}x{}", size.width, size.height),
            });
        }
        let title = self.title.clone();
        // window creation panics when there is no display
        let window = panic::catch_unwind(AssertUnwindSafe(|| {
            Window::new_with_size(&title, size.width, size.height)
        }))
        .map_err(|_| Error::RenderUnavailable {
            reason: "failed to open a window".to_owned(),
        })?;
        self.window = Some(window);
        self.closed = false;
        let handle = SurfaceHandle(self.next_id());
        self.surface = Some(handle);
        debug!("created {} ({}x{})", handle, size.width, size.height);
        Ok(handle)
    }

    fn release_surface(&mut self, surface: SurfaceHandle) -> Result<()> {
        if self.surface != Some(surface) {
            return Err(surface.unknown());
        }
        if let Some(mut window) = self.window.take() {
            window.close();
        }
        self.surface = None;
        self.camera = None;
        Ok(())
    }

    fn set_environment(&mut self, environment: &Environment) {
        self.lines = helper_lines(environment);
        if let Some(window) = self.window.as_mut() {
            let background = Color::from_hex(environment.background);
            window.set_background_color(background.r, background.g, background.b);
            let [x, y, z] = environment.lighting.directional.position;
            window.set_light(Light::Absolute(kna::Point3::new(x, y, z)));
        }
    }

    fn create_geometry(&mut self, geometry: &Geometry) -> Result<GeometryHandle> {
        let handle = GeometryHandle(self.next_id());
        self.geometries.insert(handle, *geometry);
        Ok(handle)
    }

    fn release_geometry(&mut self, geometry: GeometryHandle) -> Result<()> {
        self.geometries
            .remove(&geometry)
            .map(|_| ())
            .ok_or(geometry.unknown())
    }

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle> {
        let handle = MaterialHandle(self.next_id());
        self.materials.insert(handle, *material);
        Ok(handle)
    }

    fn update_material(&mut self, handle: MaterialHandle, material: &Material) -> Result<()> {
        let slot = self.materials.get_mut(&handle).ok_or(handle.unknown())?;
        *slot = *material;
        let color = material.color;
        for node in self.nodes.values_mut() {
            if node.material == Some(handle) {
                node.scene.set_color(color.r, color.g, color.b);
            }
        }
        Ok(())
    }

    fn release_material(&mut self, material: MaterialHandle) -> Result<()> {
        self.materials
            .remove(&material)
            .map(|_| ())
            .ok_or(material.unknown())
    }

    fn add_group(
        &mut self,
        parent: Option<NodeHandle>,
        local: &Isometry3<f32>,
    ) -> Result<NodeHandle> {
        let mut scene = match parent {
            Some(parent) => self
                .nodes
                .get_mut(&parent)
                .ok_or(parent.unknown())?
                .scene
                .add_group(),
            None => self.window_mut()?.scene_mut().add_group(),
        };
        scene.set_local_transformation(isometry(local));
        let handle = NodeHandle(self.next_id());
        self.nodes.insert(
            handle,
            ViewerNode {
                scene,
                parent,
                material: None,
            },
        );
        Ok(handle)
    }

    fn add_mesh(
        &mut self,
        parent: NodeHandle,
        geometry: GeometryHandle,
        material: MaterialHandle,
        visual: &Visual,
    ) -> Result<NodeHandle> {
        let shape = *self.geometries.get(&geometry).ok_or(geometry.unknown())?;
        let color = self.materials.get(&material).ok_or(material.unknown())?.color;
        let parent_node = self.nodes.get_mut(&parent).ok_or(parent.unknown())?;
        let mut scene = match shape {
            Geometry::Box {
                width,
                height,
                depth,
            } => parent_node.scene.add_cube(width, height, depth),
            Geometry::Cylinder { radius, length } => {
                parent_node.scene.add_cylinder(radius, length)
            }
            Geometry::Sphere { radius } => parent_node.scene.add_sphere(radius),
        };
        scene.set_local_transformation(isometry(&visual.origin));
        scene.set_color(color.r, color.g, color.b);
        let handle = NodeHandle(self.next_id());
        self.nodes.insert(
            handle,
            ViewerNode {
                scene,
                parent: Some(parent),
                material: Some(material),
            },
        );
        Ok(handle)
    }

    fn set_local_transform(&mut self, node: NodeHandle, local: &Isometry3<f32>) -> Result<()> {
        self.nodes
            .get_mut(&node)
            .ok_or(node.unknown())?
            .scene
            .set_local_transformation(isometry(local));
        Ok(())
    }

    fn remove_node(&mut self, node: NodeHandle) -> Result<()> {
        if !self.nodes.contains_key(&node) {
            return Err(node.unknown());
        }
        for handle in self.descendants(node) {
            if let Some(mut removed) = self.nodes.remove(&handle) {
                if handle == node {
                    removed.scene.unlink();
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, surface: SurfaceHandle, camera: &Camera) -> Result<()> {
        if self.surface != Some(surface) {
            return Err(surface.unknown());
        }
        if self.camera.is_none() {
            self.camera = Some(ArcBall::new_with_frustrum(
                camera.fov.to_radians(),
                camera.near,
                camera.far,
                point(&camera.eye_point()),
                point(&camera.target_point()),
            ));
        }
        if !self.run_frame() {
            warn!("the window was closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use na::{Translation3, UnitQuaternion, Vector3};

    #[test]
    fn test_isometry_keeps_coordinates() {
        let iso = Isometry3::from_parts(
            Translation3::new(0.1, 0.2, 0.3),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -1.2),
        );
        let converted = isometry(&iso);
        assert_eq!(
            converted.translation.vector.as_slice(),
            iso.translation.vector.as_slice()
        );
        assert_eq!(
            converted.rotation.quaternion().coords.as_slice(),
            iso.rotation.quaternion().coords.as_slice()
        );
    }

    #[test]
    fn test_helper_lines() {
        let environment = Environment::default();
        let lines = helper_lines(&environment);
        // two lines per grid division boundary plus three axes
        assert_eq!(lines.len(), 2 * (environment.grid.divisions as usize + 1) + 3);
        let (_, x_axis, color) = lines[lines.len() - 3];
        assert_eq!(x_axis, kna::Point3::new(environment.axes, 0.0, 0.0));
        assert_eq!(color, kna::Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_surface_is_rejected_before_opening_a_window() {
        let mut engine = Kiss3dEngine::new("test");
        assert!(matches!(
            engine.create_surface(SurfaceSize { width: 0, height: 480 }),
            Err(Error::RenderUnavailable { .. })
        ));
        assert!(engine.window.is_none());
    }
}
