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
//! Viewer settings loaded from TOML
//!
//! Every key is optional, missing keys take the default scene values.
//!
//! ```toml
//! color = "blue"
//!
//! [window]
//! width = 1280
//!
//! [scene.camera]
//! eye = [2.0, 1.5, 2.0]
//! ```
use serde::Deserialize;
use std::path::Path;

use crate::engine::SurfaceSize;
use crate::errors::*;
use crate::palette::*;
use crate::scene::Environment;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pipette Arm".to_owned(),
            width: 800,
            height: 600,
        }
    }
}

impl WindowConfig {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub scene: Environment,
    /// Initial body color. Names outside of the palette are kept.
    pub color: Option<String>,
}

impl ViewerConfig {
    /// Parse the TOML text
    ///
    /// # Examples
    ///
    /// ```
    /// use pipette_arm::config::ViewerConfig;
    ///
    /// let config = ViewerConfig::from_toml_str("[window]\nwidth = 1024").unwrap();
    /// assert_eq!(config.window.width, 1024);
    /// assert_eq!(config.window.height, 600);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The initial color selection, black if none is given
    pub fn color_selection(&self) -> ColorSelection {
        self.color
            .as_deref()
            .map(ColorSelection::from)
            .unwrap_or_default()
    }
}
