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
//! View models of the input widgets, derived from `AppState`
use std::fmt::{self, Display};

use crate::app::*;
use crate::arm::*;
use crate::palette::*;

pub const RESET_LABEL: &str = "Reset to Home";
pub const COLOR_LABEL: &str = "Body Color";

fn degree_label(degrees: i32) -> String {
    format!("{}°", degrees)
}

/// One joint slider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderView {
    pub joint: JointId,
    pub id: String,
    pub label: &'static str,
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub value: i32,
}

impl SliderView {
    pub fn new(joint: JointId, angles: &JointAngles) -> Self {
        Self {
            joint,
            id: format!("slider-{}", joint.key()),
            label: joint.label(),
            min: SLIDER_RANGE.min,
            max: SLIDER_RANGE.max,
            step: 1,
            value: angles.degrees(joint),
        }
    }

    /// Current value with the degree suffix
    ///
    /// ```
    /// use pipette_arm::*;
    ///
    /// let slider = SliderView::new(JointId::Shoulder, &JointAngles::home());
    /// assert_eq!(slider.value_label(), "-75°");
    /// ```
    pub fn value_label(&self) -> String {
        degree_label(self.value)
    }

    /// Min, mid and max tick labels
    pub fn ticks(&self) -> [String; 3] {
        [
            degree_label(self.min),
            degree_label((self.min + self.max) / 2),
            degree_label(self.max),
        ]
    }

    /// Message for moving the slider by `delta` steps
    pub fn nudge(&self, delta: i32) -> Message {
        Message::JointChanged {
            joint: self.joint,
            degrees: self.value.saturating_add(delta.saturating_mul(self.step)),
        }
    }
}

impl Display for SliderView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value_label())
    }
}

/// The body color dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSelectorView {
    pub label: &'static str,
    pub options: [PaletteColor; 5],
    pub selected: ColorSelection,
}

impl ColorSelectorView {
    pub fn new(selected: &ColorSelection) -> Self {
        Self {
            label: COLOR_LABEL,
            options: PaletteColor::ALL,
            selected: selected.clone(),
        }
    }

    /// Message selecting the option after the current one
    ///
    /// An unrecognized selection continues from the first option.
    pub fn next(&self) -> Message {
        let next = match self.selected.palette() {
            Some(color) => {
                let index = self.options.iter().position(|c| *c == color).unwrap_or(0);
                self.options[(index + 1) % self.options.len()]
            }
            None => self.options[0],
        };
        Message::ColorChanged(next.into())
    }
}

impl Display for ColorSelectorView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.selected)
    }
}

/// Every control of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub color: ColorSelectorView,
    pub sliders: [SliderView; NUM_JOINTS],
    pub reset_label: &'static str,
}

impl ControlsView {
    pub fn new(state: &AppState) -> Self {
        Self {
            color: ColorSelectorView::new(state.color()),
            sliders: JointId::ALL.map(|joint| SliderView::new(joint, state.angles())),
            reset_label: RESET_LABEL,
        }
    }

    pub fn slider(&self, joint: JointId) -> &SliderView {
        &self.sliders[joint.index()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slider_view() {
        let state = AppState::new();
        let view = ControlsView::new(&state);
        let slider = view.slider(JointId::Pipette);
        assert_eq!(slider.id, "slider-j4");
        assert_eq!(slider.label, "Pipette Tilt (J4)");
        assert_eq!((slider.min, slider.max, slider.step), (-90, 90, 1));
        assert_eq!(slider.value_label(), "90°");
        assert_eq!(slider.ticks(), ["-90°", "0°", "90°"].map(String::from));
        assert_eq!(slider.to_string(), "Pipette Tilt (J4): 90°");
    }

    #[test]
    fn test_nudge_is_clamped_by_state() {
        let mut state = AppState::new();
        let message = ControlsView::new(&state).slider(JointId::Pipette).nudge(10);
        assert_eq!(
            message,
            Message::JointChanged {
                joint: JointId::Pipette,
                degrees: 100
            }
        );
        assert!(!state.update(message));
        assert_eq!(ControlsView::new(&state).slider(JointId::Pipette).value, 90);
    }

    #[test]
    fn test_color_cycle() {
        let mut state = AppState::new();
        let mut seen = Vec::new();
        for _ in 0..PaletteColor::ALL.len() {
            state.update(ColorSelectorView::new(state.color()).next());
            seen.push(state.color().palette().unwrap());
        }
        assert_eq!(seen[0], PaletteColor::White);
        assert_eq!(seen[4], PaletteColor::Black);

        let unknown = ColorSelectorView::new(&ColorSelection::from("teal"));
        assert_eq!(unknown.next(), Message::ColorChanged(PaletteColor::Red.into()));
        assert_eq!(unknown.to_string(), "Body Color: teal");
    }

    #[test]
    fn test_reset_label() {
        assert_eq!(ControlsView::new(&AppState::new()).reset_label, "Reset to Home");
    }
}
