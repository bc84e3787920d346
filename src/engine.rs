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
//! The rendering capability used by `Presenter`
//!
//! The engine owns the real objects; callers only hold opaque handles and
//! must give every handle back through the matching `release_*` call.
use na::Isometry3;
use nalgebra as na;
use std::fmt;

use crate::errors::*;
use crate::link::*;
use crate::scene::*;

macro_rules! def_handle {
    ($name:ident, $kind:expr) => {
        /// Opaque engine handle
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            pub const KIND: &'static str = $kind;

            pub(crate) fn unknown(self) -> Error {
                Error::UnknownHandle {
                    kind: Self::KIND,
                    id: self.0,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}#{}", Self::KIND, self.0)
            }
        }
    };
}

def_handle!(SurfaceHandle, "surface");
def_handle!(GeometryHandle, "geometry");
def_handle!(MaterialHandle, "material");
def_handle!(NodeHandle, "node");

/// Size of the output surface [px]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// True if nothing can be drawn into a surface of this size
    ///
    /// ```
    /// use pipette_arm::SurfaceSize;
    ///
    /// assert!(SurfaceSize { width: 0, height: 600 }.is_empty());
    /// assert!(!SurfaceSize { width: 1, height: 1 }.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Scene graph and resource operations of a rendering engine
///
/// Scene nodes form a tree. Removing a node removes its whole subtree.
pub trait RenderEngine {
    /// Allocate the output surface. Fails when no graphics context exists
    /// or the size is empty.
    fn create_surface(&mut self, size: SurfaceSize) -> Result<SurfaceHandle>;
    fn release_surface(&mut self, surface: SurfaceHandle) -> Result<()>;

    /// Background, lights, grid and axes helper
    fn set_environment(&mut self, environment: &Environment);

    fn create_geometry(&mut self, geometry: &Geometry) -> Result<GeometryHandle>;
    fn release_geometry(&mut self, geometry: GeometryHandle) -> Result<()>;

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle>;
    /// Change the material in place, every mesh using it follows
    fn update_material(&mut self, handle: MaterialHandle, material: &Material) -> Result<()>;
    fn release_material(&mut self, material: MaterialHandle) -> Result<()>;

    /// Add an empty transform node under `parent` (or the scene root)
    fn add_group(
        &mut self,
        parent: Option<NodeHandle>,
        local: &Isometry3<f32>,
    ) -> Result<NodeHandle>;
    /// Add a mesh node under `parent`
    fn add_mesh(
        &mut self,
        parent: NodeHandle,
        geometry: GeometryHandle,
        material: MaterialHandle,
        visual: &Visual,
    ) -> Result<NodeHandle>;
    fn set_local_transform(&mut self, node: NodeHandle, local: &Isometry3<f32>) -> Result<()>;
    /// Detach the node and its descendants from the scene
    fn remove_node(&mut self, node: NodeHandle) -> Result<()>;

    /// Draw one frame into the surface
    fn render(&mut self, surface: SurfaceHandle, camera: &Camera) -> Result<()>;
}
