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
//! # 5-DOF pipette arm model and viewer using [nalgebra](http://nalgebra.org).
//!
//! `pipette-arm` has below functionalities
//!
//! 1. Forward kinematics of the arm (`ArmChain`, `world_transforms`)
//! 1. Scene description and material treatment per body color
//! 1. `Presenter`, which keeps a `RenderEngine` scene in sync with `AppState`
//! 1. A kiss3d viewer (`viewer` feature)
//!
//! ```
//! use pipette_arm::*;
//!
//! let mut state = AppState::new();
//! let mut engine = HeadlessEngine::new();
//! let size = SurfaceSize { width: 800, height: 600 };
//! let mut presenter = Presenter::mount(&mut engine, size, &Environment::default(), &state.snapshot());
//!
//! state.update(Message::ColorChanged("red".into()));
//! presenter.apply(&mut engine, &state.snapshot()).unwrap();
//! presenter.unmount(&mut engine).unwrap();
//! ```
mod app;
mod arm;
mod chain;
mod controls;
mod engine;
mod errors;
mod headless;
mod presenter;
use nalgebra as na;
pub mod config;
pub mod iterator;
pub mod joint;
pub mod link;
pub mod math;
pub mod node;
pub mod palette;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use self::app::*;
pub use self::arm::*;
pub use self::chain::*;
pub use self::controls::*;
pub use self::engine::*;
pub use self::errors::*;
pub use self::headless::*;
pub use self::joint::{Joint, JointType};
pub use self::node::{JointBuilder, Node};
pub use self::palette::{ColorSelection, PaletteColor};
pub use self::presenter::*;
pub use self::scene::{describe_arm, Camera, Environment};

// re-export from nalgebra
pub use na::{Isometry3, RealField, Translation3, UnitQuaternion, Vector3};
