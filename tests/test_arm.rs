use nalgebra::{UnitQuaternion, Vector3};
use pipette_arm::math::{deg_to_rad, rad_to_deg};
use pipette_arm::*;
use std::f32::consts::FRAC_PI_2;

#[test]
fn test_degree_round_trip_in_slider_range() {
    for d in -90..=90 {
        assert_eq!(rad_to_deg(deg_to_rad(d)), d);
    }
}

#[test]
fn test_shoulder_to_minus_90() {
    let mut state = AppState::new();
    let home = local_transforms(state.angles(), &ARM_GEOMETRY);
    state.update(Message::JointChanged {
        joint: JointId::Shoulder,
        degrees: -90,
    });
    let moved = local_transforms(state.angles(), &ARM_GEOMETRY);

    let expected = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
    let shoulder = moved[JointId::Shoulder.index()].rotation;
    assert!(shoulder.angle_to(&expected) < 1e-6);
    assert!((state.angles().j1 + FRAC_PI_2).abs() < 1e-6);
    for joint in JointId::ALL {
        if joint != JointId::Shoulder {
            assert_eq!(moved[joint.index()], home[joint.index()], "{}", joint);
        }
    }
}

#[test]
fn test_one_joint_changes_one_local_rotation() {
    for changed in JointId::ALL {
        let home = JointAngles::home();
        let mut moved = home;
        moved[changed] = deg_to_rad(-33);
        let a = local_transforms(&home, &ARM_GEOMETRY);
        let b = local_transforms(&moved, &ARM_GEOMETRY);
        for joint in JointId::ALL {
            let same = a[joint.index()].rotation == b[joint.index()].rotation;
            assert_eq!(same, joint != changed, "{} changed {}", joint, changed);
            // offsets never move
            assert_eq!(
                a[joint.index()].translation,
                b[joint.index()].translation
            );
        }
    }
}

#[test]
fn test_arm_chain_matches_closed_form() {
    let arm = ArmChain::new(&ARM_GEOMETRY);
    for degrees in [[0, 0, 0, 0, 0], [45, -30, 60, -90, 10], [-90, 90, -90, 90, -90]] {
        let angles = JointAngles::from_degrees(degrees);
        arm.set_angles(&angles);
        let poses = arm.update_transforms();
        let expected = world_transforms(&angles, &ARM_GEOMETRY);
        for (pose, expected) in poses.iter().zip(expected.iter()) {
            assert!((pose.translation.vector - expected.translation.vector).norm() < 1e-5);
            assert!(pose.rotation.angle_to(&expected.rotation) < 1e-5);
        }
    }
}

#[test]
fn test_find_joint_by_name() {
    let arm = ArmChain::new(&ARM_GEOMETRY);
    let elbow = arm.find("elbow_pitch").unwrap();
    assert!(arm.find("base").unwrap().is_root());
    assert_eq!(elbow, arm.frame(JointId::Elbow));
    assert_eq!(
        elbow.joint().origin().translation.vector.z,
        ARM_GEOMETRY.segment1.length
    );
}

#[test]
fn test_home_pipette_is_above_ground() {
    let arm = ArmChain::new(&ARM_GEOMETRY);
    arm.set_angles(&JointAngles::home());
    let tip = arm.pipette_tip();
    assert!(tip.translation.vector.y > 0.0);
}
