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
//! Forward kinematics of the 5-DOF pipette arm
//!
//! The frame convention is Y-up with the arm reaching along +Z of its parent
//! frame. J0 yaws about +Y, J1..J4 pitch about +X.
//!
//! ```text
//! World
//! └─ base (fixed)
//!    └─ J0 base yaw        (up by base height)
//!       └─ J1 shoulder pitch
//!          └─ J2 elbow pitch    (segment 1 length along +Z)
//!             └─ J3 wrist pitch (segment 2 length along +Z)
//!                └─ J4 pipette tilt (segment 3 length along +Z)
//! ```
use na::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use nalgebra as na;
use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use crate::chain::*;
use crate::joint::*;
use crate::math::*;
use crate::node::*;

/// Number of movable joints of the arm
pub const NUM_JOINTS: usize = 5;

/// Identifies one joint (and the frame attached to it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JointId {
    /// J0, base yaw
    Base,
    /// J1, shoulder pitch
    Shoulder,
    /// J2, elbow pitch
    Elbow,
    /// J3, wrist pitch
    Wrist,
    /// J4, pipette tilt
    Pipette,
}

impl JointId {
    /// All joints in parent to child order
    pub const ALL: [JointId; NUM_JOINTS] = [
        JointId::Base,
        JointId::Shoulder,
        JointId::Elbow,
        JointId::Wrist,
        JointId::Pipette,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<JointId> {
        Self::ALL.get(index).copied()
    }

    /// Short key, `j0` to `j4`
    pub fn key(self) -> &'static str {
        match self {
            JointId::Base => "j0",
            JointId::Shoulder => "j1",
            JointId::Elbow => "j2",
            JointId::Wrist => "j3",
            JointId::Pipette => "j4",
        }
    }

    /// Human readable label used by the controls
    pub fn label(self) -> &'static str {
        match self {
            JointId::Base => "Base Yaw (J0)",
            JointId::Shoulder => "Shoulder Pitch (J1)",
            JointId::Elbow => "Elbow Pitch (J2)",
            JointId::Wrist => "Wrist Pitch (J3)",
            JointId::Pipette => "Pipette Tilt (J4)",
        }
    }

    /// Name of the joint node in `ArmChain`
    pub fn joint_name(self) -> &'static str {
        match self {
            JointId::Base => "base_yaw",
            JointId::Shoulder => "shoulder_pitch",
            JointId::Elbow => "elbow_pitch",
            JointId::Wrist => "wrist_pitch",
            JointId::Pipette => "pipette_tilt",
        }
    }

    /// Rotation axis in the parent frame
    pub fn axis(self) -> Unit<Vector3<f32>> {
        match self {
            JointId::Base => Vector3::y_axis(),
            _ => Vector3::x_axis(),
        }
    }

    pub fn joint_type(self) -> JointType<f32> {
        JointType::Rotational { axis: self.axis() }
    }
}

impl Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Five joint angles [rad]
///
/// Any real value is accepted. Range clamping is the job of the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointAngles {
    pub j0: f32,
    pub j1: f32,
    pub j2: f32,
    pub j3: f32,
    pub j4: f32,
}

impl JointAngles {
    pub const fn new(j0: f32, j1: f32, j2: f32, j3: f32, j4: f32) -> Self {
        Self { j0, j1, j2, j3, j4 }
    }

    /// The home pose, see [`HOME_POSE_DEGREES`]
    ///
    /// ```
    /// use pipette_arm::{JointAngles, JointId};
    ///
    /// let home = JointAngles::home();
    /// assert_eq!(home.degrees(JointId::Shoulder), -75);
    /// assert_eq!(home.to_degrees(), [0, -75, 45, 15, 90]);
    /// ```
    pub fn home() -> Self {
        Self::from_degrees(HOME_POSE_DEGREES)
    }

    pub fn from_degrees(degrees: [i32; NUM_JOINTS]) -> Self {
        Self::from_array(degrees.map(deg_to_rad))
    }

    pub fn from_array(radians: [f32; NUM_JOINTS]) -> Self {
        let [j0, j1, j2, j3, j4] = radians;
        Self { j0, j1, j2, j3, j4 }
    }

    pub fn to_array(&self) -> [f32; NUM_JOINTS] {
        [self.j0, self.j1, self.j2, self.j3, self.j4]
    }

    /// Displayed (rounded) values in degrees
    pub fn to_degrees(&self) -> [i32; NUM_JOINTS] {
        self.to_array().map(rad_to_deg)
    }

    pub fn degrees(&self, joint: JointId) -> i32 {
        rad_to_deg(self[joint])
    }

    /// Joints whose value differs from `other`
    pub fn changed_joints(&self, other: &JointAngles) -> Vec<JointId> {
        JointId::ALL
            .into_iter()
            .filter(|&joint| self[joint] != other[joint])
            .collect()
    }
}

impl Default for JointAngles {
    fn default() -> Self {
        Self::home()
    }
}

impl Index<JointId> for JointAngles {
    type Output = f32;
    fn index(&self, joint: JointId) -> &f32 {
        match joint {
            JointId::Base => &self.j0,
            JointId::Shoulder => &self.j1,
            JointId::Elbow => &self.j2,
            JointId::Wrist => &self.j3,
            JointId::Pipette => &self.j4,
        }
    }
}

impl IndexMut<JointId> for JointAngles {
    fn index_mut(&mut self, joint: JointId) -> &mut f32 {
        match joint {
            JointId::Base => &mut self.j0,
            JointId::Shoulder => &mut self.j1,
            JointId::Elbow => &mut self.j2,
            JointId::Wrist => &mut self.j3,
            JointId::Pipette => &mut self.j4,
        }
    }
}

/// Home pose (j0..j4) in degrees
pub const HOME_POSE_DEGREES: [i32; NUM_JOINTS] = [0, -75, 45, 15, 90];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderDimensions {
    pub diameter: f32,
    pub length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDimensions {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointRadii {
    pub shoulder: f32,
    pub elbow: f32,
    pub wrist: f32,
    pub pipette: f32,
}

/// Static dimensions of the arm [m]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmGeometry {
    pub base: CylinderDimensions,
    pub segment1: BoxDimensions,
    pub segment2: BoxDimensions,
    pub segment3: BoxDimensions,
    pub pipette: CylinderDimensions,
    pub joints: JointRadii,
}

/// The one arm geometry shared by every arm instance
pub const ARM_GEOMETRY: ArmGeometry = ArmGeometry {
    base: CylinderDimensions {
        diameter: 0.50,
        length: 0.20,
    },
    segment1: BoxDimensions {
        width: 0.10,
        height: 0.10,
        length: 0.60,
    },
    segment2: BoxDimensions {
        width: 0.08,
        height: 0.08,
        length: 0.45,
    },
    segment3: BoxDimensions {
        width: 0.06,
        height: 0.06,
        length: 0.25,
    },
    pipette: CylinderDimensions {
        diameter: 0.02,
        length: 0.10,
    },
    joints: JointRadii {
        shoulder: 0.06,
        elbow: 0.05,
        wrist: 0.04,
        pipette: 0.015,
    },
};

impl ArmGeometry {
    /// Static offset of the joint frame from its parent frame
    pub fn joint_origin(&self, joint: JointId) -> Translation3<f32> {
        match joint {
            JointId::Base => Translation3::new(0.0, self.base.length, 0.0),
            JointId::Shoulder => Translation3::identity(),
            JointId::Elbow => Translation3::new(0.0, 0.0, self.segment1.length),
            JointId::Wrist => Translation3::new(0.0, 0.0, self.segment2.length),
            JointId::Pipette => Translation3::new(0.0, 0.0, self.segment3.length),
        }
    }

    /// The arm link which starts at the joint frame (J1..J3), if any
    pub fn segment(&self, joint: JointId) -> Option<&BoxDimensions> {
        match joint {
            JointId::Shoulder => Some(&self.segment1),
            JointId::Elbow => Some(&self.segment2),
            JointId::Wrist => Some(&self.segment3),
            _ => None,
        }
    }
}

impl Default for ArmGeometry {
    fn default() -> Self {
        ARM_GEOMETRY
    }
}

/// Local transform of one joint frame
///
/// It depends only on `angle` and the static offset of the joint.
///
/// # Examples
///
/// ```
/// use pipette_arm::*;
///
/// let trans = local_transform(JointId::Elbow, 0.0, &ARM_GEOMETRY);
/// assert_eq!(trans.translation.vector.z, ARM_GEOMETRY.segment1.length);
/// ```
pub fn local_transform(joint: JointId, angle: f32, geometry: &ArmGeometry) -> Isometry3<f32> {
    Isometry3::from_parts(
        geometry.joint_origin(joint),
        UnitQuaternion::from_axis_angle(&joint.axis(), angle),
    )
}

/// Local transforms of the five joint frames, parent to child
pub fn local_transforms(
    angles: &JointAngles,
    geometry: &ArmGeometry,
) -> [Isometry3<f32>; NUM_JOINTS] {
    JointId::ALL.map(|joint| local_transform(joint, angles[joint], geometry))
}

/// World transforms of the five joint frames, parent to child
///
/// # Examples
///
/// ```
/// use pipette_arm::*;
///
/// let zero = JointAngles::from_degrees([0; 5]);
/// let poses = world_transforms(&zero, &ARM_GEOMETRY);
/// // straight arm along +Z on top of the base
/// let wrist = poses[3].translation.vector;
/// assert!((wrist.y - 0.20).abs() < 1e-6);
/// assert!((wrist.z - 1.05).abs() < 1e-6);
/// ```
pub fn world_transforms(
    angles: &JointAngles,
    geometry: &ArmGeometry,
) -> [Isometry3<f32>; NUM_JOINTS] {
    let mut parent = Isometry3::identity();
    local_transforms(angles, geometry).map(|local| {
        parent *= local;
        parent
    })
}

/// The arm as a kinematic `Chain` of `Node`s
///
/// The root is a fixed `base` node; J0..J4 hang below it in order.
///
/// # Examples
///
/// ```
/// use pipette_arm::*;
///
/// let arm = ArmChain::new(&ARM_GEOMETRY);
/// arm.set_angles(&JointAngles::home());
/// let poses = arm.update_transforms();
/// let expected = world_transforms(&JointAngles::home(), &ARM_GEOMETRY);
/// for (pose, expected) in poses.iter().zip(expected.iter()) {
///     assert!((pose.translation.vector - expected.translation.vector).norm() < 1e-6);
/// }
/// ```
#[derive(Debug)]
pub struct ArmChain {
    chain: Chain<f32>,
    frames: [Node<f32>; NUM_JOINTS],
    pipette_length: f32,
}

impl ArmChain {
    pub fn new(geometry: &ArmGeometry) -> Self {
        let root = JointBuilder::new().name("base").into_node();
        let frames = JointId::ALL.map(|joint| {
            JointBuilder::new()
                .name(joint.joint_name())
                .joint_type(joint.joint_type())
                .translation(geometry.joint_origin(joint))
                .into_node()
        });
        let mut parent = &root;
        for frame in &frames {
            frame.set_parent(parent);
            parent = frame;
        }
        Self {
            chain: Chain::from_root(root),
            frames,
            pipette_length: geometry.pipette.length,
        }
    }

    pub fn chain(&self) -> &Chain<f32> {
        &self.chain
    }

    pub fn frame(&self, joint: JointId) -> &Node<f32> {
        &self.frames[joint.index()]
    }

    /// Find a node (including the fixed `base`) by joint name
    pub fn find(&self, joint_name: &str) -> Option<&Node<f32>> {
        self.chain.find(joint_name)
    }

    pub fn set_angles(&self, angles: &JointAngles) {
        for joint in JointId::ALL {
            self.frame(joint).set_joint_position(angles[joint]);
        }
    }

    pub fn angles(&self) -> JointAngles {
        JointAngles::from_array(
            JointId::ALL.map(|joint| self.frame(joint).joint_position().unwrap_or(0.0)),
        )
    }

    /// Local transforms of J0..J4
    pub fn local_transforms(&self) -> [Isometry3<f32>; NUM_JOINTS] {
        self.frames.each_ref().map(|frame| frame.local_transform())
    }

    /// World transforms of J0..J4
    pub fn update_transforms(&self) -> [Isometry3<f32>; NUM_JOINTS] {
        let poses = self.chain.update_transforms();
        // index 0 is the fixed base node
        let mut frames = [Isometry3::identity(); NUM_JOINTS];
        frames.copy_from_slice(&poses[1..]);
        frames
    }

    /// World pose of the pipette tip
    pub fn pipette_tip(&self) -> Isometry3<f32> {
        let poses = self.update_transforms();
        poses[NUM_JOINTS - 1] * Translation3::new(0.0, 0.0, self.pipette_length)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_local_transform_depends_on_own_angle() {
        let home = JointAngles::home();
        let mut moved = home;
        moved.j2 = deg_to_rad(-30);
        let a = local_transforms(&home, &ARM_GEOMETRY);
        let b = local_transforms(&moved, &ARM_GEOMETRY);
        for joint in JointId::ALL {
            if joint == JointId::Elbow {
                assert_ne!(a[joint.index()], b[joint.index()]);
            } else {
                assert_eq!(a[joint.index()], b[joint.index()]);
            }
        }
    }

    #[test]
    fn test_base_yaw_rotates_about_vertical() {
        let angles = JointAngles::from_degrees([90, 0, 0, 0, 0]);
        let poses = world_transforms(&angles, &ARM_GEOMETRY);
        // +Z rotated by +90 deg about +Y points to +X
        let elbow = poses[JointId::Elbow.index()].translation.vector;
        assert!((elbow.x - ARM_GEOMETRY.segment1.length).abs() < 1e-5);
        assert!(elbow.z.abs() < 1e-5);
    }

    #[test]
    fn test_shoulder_pitch_lifts_arm() {
        let angles = JointAngles::from_array([0.0, -FRAC_PI_2, 0.0, 0.0, 0.0]);
        let poses = world_transforms(&angles, &ARM_GEOMETRY);
        // -90 deg about +X turns +Z into +Y
        let elbow = poses[JointId::Elbow.index()].translation.vector;
        assert!((elbow.y - (ARM_GEOMETRY.base.length + ARM_GEOMETRY.segment1.length)).abs() < 1e-5);
        assert!(elbow.z.abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_angles_are_accepted() {
        let angles = JointAngles::from_degrees([270, -400, 180, 0, 720]);
        let chain = ArmChain::new(&ARM_GEOMETRY);
        chain.set_angles(&angles);
        assert_eq!(chain.angles(), angles);
        assert_eq!(chain.local_transforms(), local_transforms(&angles, &ARM_GEOMETRY));
    }

    #[test]
    fn test_arm_chain_structure() {
        let arm = ArmChain::new(&ARM_GEOMETRY);
        assert_eq!(arm.chain().dof(), NUM_JOINTS);
        assert_eq!(
            arm.chain().names(),
            JointId::ALL.map(|j| j.joint_name().to_string()).to_vec()
        );
        assert!(arm.chain().iter().next().unwrap().is_root());
        assert!(arm.frame(JointId::Pipette).is_end());
        assert_eq!(
            arm.frame(JointId::Wrist).parent().unwrap(),
            *arm.frame(JointId::Elbow)
        );
    }

    #[test]
    fn test_pipette_tip_with_straight_arm() {
        let arm = ArmChain::new(&ARM_GEOMETRY);
        arm.set_angles(&JointAngles::from_degrees([0; NUM_JOINTS]));
        let tip = arm.pipette_tip().translation.vector;
        let reach = ARM_GEOMETRY.segment1.length
            + ARM_GEOMETRY.segment2.length
            + ARM_GEOMETRY.segment3.length
            + ARM_GEOMETRY.pipette.length;
        assert!((tip.z - reach).abs() < 1e-5);
        assert!((tip.y - ARM_GEOMETRY.base.length).abs() < 1e-5);
    }

    #[test]
    fn test_changed_joints() {
        let home = JointAngles::home();
        let mut moved = home;
        moved[JointId::Wrist] = 0.0;
        assert_eq!(moved.changed_joints(&home), vec![JointId::Wrist]);
        assert!(home.changed_joints(&home).is_empty());
    }
}
