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
//! Application state and the messages which change it
//!
//! State flows one way: `Message` → `AppState::update` → `Snapshot` →
//! `Presenter::apply`.
use log::debug;

use crate::arm::*;
use crate::joint::Range;
use crate::math::*;
use crate::palette::*;

/// Domain of the joint sliders [deg]
pub const SLIDER_RANGE: Range<i32> = Range { min: -90, max: 90 };

/// Everything the user can do
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A slider emitted a new integer degree for one joint
    JointChanged { joint: JointId, degrees: i32 },
    ColorChanged(ColorSelection),
    /// Restore the home pose in one step
    ResetRequested,
}

/// Immutable copy of the state handed to the presenter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub color: ColorSelection,
    pub angles: JointAngles,
}

/// The state owned by the top level container
///
/// # Examples
///
/// ```
/// use pipette_arm::*;
///
/// let mut state = AppState::new();
/// assert!(state.update(Message::JointChanged { joint: JointId::Shoulder, degrees: -120 }));
/// assert_eq!(state.angles().degrees(JointId::Shoulder), -90);
/// assert!(state.update(Message::ResetRequested));
/// assert_eq!(state.angles().to_degrees(), HOME_POSE_DEGREES);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    color: ColorSelection,
    angles: JointAngles,
}

impl AppState {
    /// Black body in the home pose
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(color: ColorSelection) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn color(&self) -> &ColorSelection {
        &self.color
    }

    pub fn angles(&self) -> &JointAngles {
        &self.angles
    }

    /// Apply one message, returns true if the state changed
    pub fn update(&mut self, message: Message) -> bool {
        debug!("update: {:?}", message);
        match message {
            Message::JointChanged { joint, degrees } => {
                let angle = deg_to_rad(SLIDER_RANGE.clamp(degrees));
                let changed = self.angles[joint] != angle;
                self.angles[joint] = angle;
                changed
            }
            Message::ColorChanged(color) => {
                let changed = self.color != color;
                self.color = color;
                changed
            }
            Message::ResetRequested => {
                let home = JointAngles::home();
                let changed = self.angles != home;
                self.angles = home;
                changed
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            color: self.color.clone(),
            angles: self.angles,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = AppState::new();
        assert_eq!(state.color().palette(), Some(PaletteColor::Black));
        assert_eq!(state.angles().to_degrees(), [0, -75, 45, 15, 90]);
    }

    #[test]
    fn test_clamp_happens_here() {
        let mut state = AppState::new();
        state.update(Message::JointChanged {
            joint: JointId::Pipette,
            degrees: 135,
        });
        assert_eq!(state.angles().degrees(JointId::Pipette), 90);
        // already at the limit
        assert!(!state.update(Message::JointChanged {
            joint: JointId::Pipette,
            degrees: 91,
        }));
    }

    #[test]
    fn test_reset_is_atomic() {
        let mut state = AppState::new();
        for (joint, degrees) in JointId::ALL.into_iter().zip([10, 20, 30, 40, 50]) {
            state.update(Message::JointChanged { joint, degrees });
        }
        let before = state.snapshot();
        assert!(state.update(Message::ResetRequested));
        let after = state.snapshot();
        assert_eq!(after.angles.changed_joints(&before.angles).len(), NUM_JOINTS);
        assert_eq!(after.angles, JointAngles::home());
        assert!(!state.update(Message::ResetRequested));
    }

    #[test]
    fn test_color_change_keeps_angles() {
        let mut state = AppState::new();
        let angles = *state.angles();
        assert!(state.update(Message::ColorChanged("red".into())));
        assert_eq!(*state.angles(), angles);
        assert!(!state.update(Message::ColorChanged(PaletteColor::Red.into())));
    }
}
