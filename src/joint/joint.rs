/*
  Copyright 2020 Takashi Ogura

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
use super::joint_type::*;
use na::{Isometry3, RealField, Translation3, UnitQuaternion};
use nalgebra as na;
use std::cell::RefCell;
use std::fmt::{self, Display};

/// Joint with type
#[derive(Debug, Clone)]
pub struct Joint<T: RealField> {
    /// Name of this joint
    pub name: String,
    /// Type of this joint
    pub joint_type: JointType<T>,
    /// position (angle) of this joint
    position: T,
    /// local origin transform of joint
    origin: Isometry3<T>,
    /// cache of world transform
    world_transform_cache: RefCell<Option<Isometry3<T>>>,
}

impl<T> Joint<T>
where
    T: RealField + Copy,
{
    /// Create new Joint with name and type
    ///
    /// # Examples
    ///
    /// ```
    /// use pipette_arm::{Joint, JointType};
    ///
    /// // create fixed joint
    /// let fixed = Joint::<f32>::new("f0", JointType::Fixed);
    /// assert!(fixed.joint_position().is_none());
    ///
    /// // create rotational joint with Y-axis
    /// let rot = Joint::<f64>::new("r0", JointType::yaw());
    /// assert_eq!(rot.joint_position().unwrap(), 0.0);
    /// ```
    ///
    pub fn new(name: &str, joint_type: JointType<T>) -> Joint<T> {
        Joint {
            name: name.to_string(),
            joint_type,
            position: T::zero(),
            origin: Isometry3::identity(),
            world_transform_cache: RefCell::new(None),
        }
    }
    /// Set the position of the joint
    ///
    /// Any real value is accepted. Setting the position of a fixed joint does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipette_arm::{Joint, JointType};
    ///
    /// let mut rot = Joint::<f64>::new("r0", JointType::pitch());
    /// assert_eq!(rot.joint_position().unwrap(), 0.0);
    /// rot.set_joint_position(12.0);
    /// assert_eq!(rot.joint_position().unwrap(), 12.0);
    /// ```
    ///
    pub fn set_joint_position(&mut self, position: T) {
        if !self.is_movable() {
            return;
        }
        self.position = position;
        self.world_transform_cache.replace(None);
    }
    /// Returns the position (angle)
    #[inline]
    pub fn joint_position(&self) -> Option<T> {
        match self.joint_type {
            JointType::Fixed => None,
            _ => Some(self.position),
        }
    }

    #[inline]
    pub fn origin(&self) -> &Isometry3<T> {
        &self.origin
    }

    #[inline]
    pub fn set_origin(&mut self, origin: Isometry3<T>) {
        self.origin = origin;
        self.world_transform_cache.replace(None);
    }

    /// Rotation generated by the joint position alone
    pub fn joint_rotation(&self) -> UnitQuaternion<T> {
        match self.joint_type {
            JointType::Fixed => UnitQuaternion::identity(),
            JointType::Rotational { axis } => UnitQuaternion::from_axis_angle(&axis, self.position),
        }
    }

    /// Calculate and returns the transform of the end of this joint
    ///
    /// # Examples
    ///
    /// ```
    /// use pipette_arm::{Joint, JointType};
    /// use nalgebra::{Isometry3, Translation3, UnitQuaternion};
    ///
    /// let mut rot = Joint::<f64>::new("r0", JointType::yaw());
    /// rot.set_origin(Isometry3::from_parts(
    ///     Translation3::new(0.0, 0.2, 0.0),
    ///     UnitQuaternion::identity(),
    /// ));
    /// rot.set_joint_position(1.0);
    /// let trans = rot.local_transform();
    /// assert_eq!(trans.translation.vector.y, 0.2);
    /// assert!((trans.rotation.angle() - 1.0).abs() < 1e-9);
    /// ```
    ///
    pub fn local_transform(&self) -> Isometry3<T> {
        let joint_transform = Isometry3::from_parts(
            Translation3::new(T::zero(), T::zero(), T::zero()),
            self.joint_rotation(),
        );
        self.origin * joint_transform
    }

    #[inline]
    pub(crate) fn set_world_transform(&self, world_transform: Isometry3<T>) {
        self.world_transform_cache.replace(Some(world_transform));
    }
    /// Get the result of forward kinematics
    ///
    /// The value is updated by `Chain::update_transforms`
    #[inline]
    pub fn world_transform(&self) -> Option<Isometry3<T>> {
        *self.world_transform_cache.borrow()
    }

    #[inline]
    pub fn is_movable(&self) -> bool {
        !matches!(self.joint_type, JointType::Fixed)
    }
}

impl<T: RealField> Display for Joint<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.name, self.joint_type)
    }
}

#[test]
fn test_fixed_joint_ignores_position() {
    let mut fixed = Joint::<f32>::new("base", JointType::Fixed);
    fixed.set_joint_position(1.0);
    assert!(fixed.joint_position().is_none());
    assert_eq!(fixed.joint_rotation(), UnitQuaternion::identity());
}

#[test]
fn test_set_position_resets_world_cache() {
    let mut rot = Joint::<f32>::new("j1", JointType::pitch());
    rot.set_world_transform(Isometry3::identity());
    assert!(rot.world_transform().is_some());
    rot.set_joint_position(0.3);
    assert!(rot.world_transform().is_none());
}
