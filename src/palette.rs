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
//! Body color palette and the material treatment derived from it
use log::debug;
use std::fmt::{self, Display};

use crate::link::*;

/// Number of body shades (base and the three links)
pub const NUM_SHADES: u8 = 4;

/// The fixed body color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteColor {
    Red,
    Blue,
    Green,
    #[default]
    Black,
    White,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 5] = [
        PaletteColor::Red,
        PaletteColor::Blue,
        PaletteColor::Green,
        PaletteColor::Black,
        PaletteColor::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Red => "red",
            PaletteColor::Blue => "blue",
            PaletteColor::Green => "green",
            PaletteColor::Black => "black",
            PaletteColor::White => "white",
        }
    }

    /// Find the palette entry by name, ignoring case
    ///
    /// ```
    /// use pipette_arm::PaletteColor;
    /// assert_eq!(PaletteColor::from_name(" White"), Some(PaletteColor::White));
    /// assert_eq!(PaletteColor::from_name("magenta"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<PaletteColor> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }

    /// Base (first) shade of the body
    pub fn base_color(self) -> Color {
        Color::from_hex(match self {
            PaletteColor::Red => 0xb03030,
            PaletteColor::Blue => 0x3050b0,
            PaletteColor::Green => 0x308040,
            PaletteColor::Black => 0x222222,
            PaletteColor::White => 0xf5f5f5,
        })
    }
}

impl Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value emitted by the color selector
///
/// Values outside of the palette are kept as they are and drawn with the
/// default treatment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorSelection {
    Palette(PaletteColor),
    Unrecognized(String),
}

impl ColorSelection {
    pub fn palette(&self) -> Option<PaletteColor> {
        match self {
            ColorSelection::Palette(color) => Some(*color),
            ColorSelection::Unrecognized(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ColorSelection::Palette(color) => color.name(),
            ColorSelection::Unrecognized(name) => name,
        }
    }
}

impl Default for ColorSelection {
    fn default() -> Self {
        ColorSelection::Palette(PaletteColor::default())
    }
}

impl From<PaletteColor> for ColorSelection {
    fn from(color: PaletteColor) -> Self {
        ColorSelection::Palette(color)
    }
}

impl From<&str> for ColorSelection {
    fn from(name: &str) -> Self {
        match PaletteColor::from_name(name) {
            Some(color) => ColorSelection::Palette(color),
            None => ColorSelection::Unrecognized(name.to_owned()),
        }
    }
}

impl Display for ColorSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base color of the treatment used for values outside of the palette
pub const DEFAULT_BODY_COLOR: u32 = 0x666666;

const BODY_METALNESS: f32 = 0.3;
const BODY_ROUGHNESS: f32 = 0.7;

/// Fixed finish of the pipette tip
pub fn pipette_material() -> Material {
    Material::new(Color::from_hex(0xffffff), 0.1, 0.3)
}

/// Fixed finish of the joint spheres
pub fn joint_material() -> Material {
    Material::new(Color::from_hex(0x444444), 0.5, 0.5)
}

/// Material colors derived from one color selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Treatment {
    shades: [Color; NUM_SHADES as usize],
}

impl Treatment {
    /// Shades are stepped lighter from dark colors and darker from light ones
    ///
    /// ```
    /// use pipette_arm::palette::Treatment;
    /// use pipette_arm::link::Color;
    ///
    /// let grey = Treatment::from_base(Color::from_hex(0x666666));
    /// assert_eq!(grey.shade(3).to_hex(), 0x999999);
    /// let white = Treatment::from_base(Color::from_hex(0xffffff));
    /// assert_eq!(white.shade(1).to_hex(), 0xeeeeee);
    /// ```
    pub fn from_base(base: Color) -> Self {
        let direction = if base.luminance() < 0.5 { 1 } else { -1 };
        let mut shades = [base; NUM_SHADES as usize];
        for (i, shade) in shades.iter_mut().enumerate() {
            *shade = base.shade(direction * i as i32);
        }
        Self { shades }
    }

    pub fn for_selection(selection: &ColorSelection) -> Self {
        match selection {
            ColorSelection::Palette(color) => Self::from_base(color.base_color()),
            ColorSelection::Unrecognized(name) => {
                debug!("unknown color {:?}, using the default treatment", name);
                Self::default()
            }
        }
    }

    /// Color of the body shade, indices past the last shade use the last one
    pub fn shade(&self, index: u8) -> Color {
        self.shades[usize::from(index.min(NUM_SHADES - 1))]
    }

    pub fn material(&self, role: MaterialRole) -> Material {
        match role {
            MaterialRole::Body { shade } => {
                Material::new(self.shade(shade), BODY_METALNESS, BODY_ROUGHNESS)
            }
            MaterialRole::Pipette => pipette_material(),
            MaterialRole::Joint => joint_material(),
        }
    }
}

impl Default for Treatment {
    fn default() -> Self {
        Self::from_base(Color::from_hex(DEFAULT_BODY_COLOR))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_selection_from_name() {
        assert_eq!(
            ColorSelection::from("red"),
            ColorSelection::Palette(PaletteColor::Red)
        );
        assert_eq!(
            ColorSelection::from("chartreuse"),
            ColorSelection::Unrecognized("chartreuse".to_owned())
        );
        assert_eq!(ColorSelection::default().name(), "black");
    }

    #[test]
    fn test_default_treatment_is_grey_ramp() {
        let t = Treatment::for_selection(&ColorSelection::from("no-such-color"));
        let hex = (0..NUM_SHADES).map(|i| t.shade(i).to_hex()).collect::<Vec<_>>();
        assert_eq!(hex, vec![0x666666, 0x777777, 0x888888, 0x999999]);
    }

    #[test]
    fn test_shades_are_distinct_for_every_color() {
        for color in PaletteColor::ALL {
            let t = Treatment::for_selection(&color.into());
            for i in 1..NUM_SHADES {
                assert_ne!(t.shade(i - 1), t.shade(i), "{}", color);
            }
        }
    }

    #[test]
    fn test_fixed_materials_ignore_selection() {
        let red = Treatment::for_selection(&PaletteColor::Red.into());
        let white = Treatment::for_selection(&PaletteColor::White.into());
        assert_eq!(red.material(MaterialRole::Pipette), white.material(MaterialRole::Pipette));
        assert_eq!(red.material(MaterialRole::Joint), white.material(MaterialRole::Joint));
        assert_ne!(
            red.material(MaterialRole::Body { shade: 0 }),
            white.material(MaterialRole::Body { shade: 0 })
        );
    }
}
