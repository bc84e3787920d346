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
//! Visual parts of the arm: shapes, colors and materials
use na::Isometry3;
use nalgebra as na;
use std::fmt;

use crate::arm::JointId;

/// Shape of a renderable primitive [m]
///
/// `Box` extends `depth` along +Z, `Cylinder` extends `length` along +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Cylinder { radius: f32, length: f32 },
    Sphere { radius: f32 },
}

/// Linear RGB color, each channel in [0, 1]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Per channel step between two neighbouring shades (0x11 of 0xff)
pub const SHADE_STEP: f32 = 17.0 / 255.0;

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create from `0xRRGGBB`
    ///
    /// ```
    /// let c = pipette_arm::link::Color::from_hex(0xff0000);
    /// assert_eq!(c.r, 1.0);
    /// assert_eq!(c.g, 0.0);
    /// ```
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Nearest `0xRRGGBB` value
    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Relative luminance (Rec. 709 weights)
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Offset all channels by `steps` shade steps, clamped to [0, 1]
    ///
    /// ```
    /// use pipette_arm::link::Color;
    /// assert_eq!(Color::from_hex(0x666666).shade(1).to_hex(), 0x777777);
    /// assert_eq!(Color::from_hex(0xffffff).shade(-2).to_hex(), 0xdddddd);
    /// ```
    pub fn shade(&self, steps: i32) -> Self {
        let offset = steps as f32 * SHADE_STEP;
        let apply = |v: f32| (v + offset).clamp(0.0, 1.0);
        Self::new(apply(self.r), apply(self.g), apply(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Surface finish of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    pub const fn new(color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness,
            roughness,
        }
    }
}

/// Which material a primitive is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialRole {
    /// Follows the selected color; base and links use shades 0..=3
    Body { shade: u8 },
    /// Fixed neutral finish of the pipette tip
    Pipette,
    /// Fixed dark finish of the joint spheres
    Joint,
}

impl MaterialRole {
    pub const ALL: [MaterialRole; 6] = [
        MaterialRole::Body { shade: 0 },
        MaterialRole::Body { shade: 1 },
        MaterialRole::Body { shade: 2 },
        MaterialRole::Body { shade: 3 },
        MaterialRole::Pipette,
        MaterialRole::Joint,
    ];

    /// True if the material changes with the color selection
    pub fn follows_selection(&self) -> bool {
        matches!(self, MaterialRole::Body { .. })
    }
}

/// Frame a primitive is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// The arm root, which does not move
    Root,
    Joint(JointId),
}

/// A renderable primitive bound to a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub name: String,
    pub frame: Frame,
    /// offset from the frame
    pub origin: Isometry3<f32>,
    pub geometry: Geometry,
    pub role: MaterialRole,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        for hex in [0x000000, 0x444444, 0xcc3333, 0xf0f0f0, 0xffffff] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn test_shade_saturates() {
        assert_eq!(Color::from_hex(0xf5f5f5).shade(3).to_hex(), 0xffffff);
        assert_eq!(Color::from_hex(0x101010).shade(-1).to_hex(), 0x000000);
    }

    #[test]
    fn test_luminance_order() {
        assert!(Color::from_hex(0xffffff).luminance() > Color::from_hex(0x222222).luminance());
        assert!(Color::from_hex(0x00ff00).luminance() > Color::from_hex(0xff0000).luminance());
    }
}
