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
//! Angle unit conversion between the UI (whole degrees) and the model (radians)
use std::f32::consts::PI;

/// Convert whole degrees into radians
///
/// # Examples
///
/// ```
/// let rad = pipette_arm::math::deg_to_rad(-90);
/// assert!((rad + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// ```
#[inline]
pub fn deg_to_rad(degrees: i32) -> f32 {
    degrees as f32 * PI / 180.0
}

/// Convert radians into degrees rounded to the nearest whole degree
///
/// # Examples
///
/// ```
/// assert_eq!(pipette_arm::math::rad_to_deg(0.5), 29);
/// assert_eq!(pipette_arm::math::rad_to_deg(-0.5), -29);
/// ```
#[inline]
pub fn rad_to_deg(radians: f32) -> i32 {
    (radians * 180.0 / PI).round() as i32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip_is_stable() {
        for d in -360..=360 {
            assert_eq!(rad_to_deg(deg_to_rad(d)), d);
            // a second trip does not drift either
            assert_eq!(rad_to_deg(deg_to_rad(rad_to_deg(deg_to_rad(d)))), d);
        }
    }

    #[test]
    fn test_fraction_rounds_to_nearest() {
        assert_eq!(rad_to_deg(deg_to_rad(45) + 0.004), 45);
        assert_eq!(rad_to_deg(deg_to_rad(45) + 0.01), 46);
    }
}
