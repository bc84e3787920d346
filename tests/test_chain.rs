use nalgebra::{Translation3, Vector3};
use pipette_arm::*;

fn sample_chain() -> (Chain<f64>, Vec<Node<f64>>) {
    let root = JointBuilder::new().name("root").into_node();
    let yaw = JointBuilder::new()
        .name("yaw")
        .translation(Translation3::new(0.0, 0.2, 0.0))
        .joint_type(JointType::yaw())
        .into_node();
    let pitch = JointBuilder::new()
        .name("pitch")
        .joint_type(JointType::pitch())
        .into_node();
    let tip = JointBuilder::new()
        .name("tip")
        .translation(Translation3::new(0.0, 0.0, 1.0))
        .into_node();
    connect![root => yaw => pitch => tip];
    let nodes = vec![root.clone(), yaw, pitch, tip];
    (Chain::from_root(root), nodes)
}

#[test]
fn test_tree() {
    let (chain, _) = sample_chain();
    assert_eq!(chain.dof(), 2);
    let all_names = chain
        .iter()
        .map(|node| node.joint().name.clone())
        .collect::<Vec<_>>();
    assert_eq!(all_names, ["root", "yaw", "pitch", "tip"]);
    assert_eq!(chain.names(), ["yaw", "pitch"]);
    assert!(chain.find("pitch").is_some());
    assert!(chain.find("roll").is_none());
}

#[test]
fn test_size_mismatch() {
    let (chain, _) = sample_chain();
    match chain.set_joint_positions(&[0.1, 0.2, 0.3]) {
        Err(Error::SizeMismatch { input, required }) => {
            assert_eq!(input, 3);
            assert_eq!(required, 2);
        }
        other => panic!("unexpected {:?}", other),
    }
    // nothing was applied
    assert_eq!(chain.joint_positions(), vec![0.0, 0.0]);
}

#[test]
fn test_world_transforms() {
    let (chain, nodes) = sample_chain();
    chain
        .set_joint_positions(&[std::f64::consts::FRAC_PI_2, -std::f64::consts::FRAC_PI_2])
        .unwrap();
    let poses = chain.update_transforms();
    // pitch -90 deg lifts the tip up, yaw does not move a vertical link
    let tip = poses[3].translation.vector;
    assert!((tip - Vector3::new(0.0, 1.2, 0.0)).norm() < 1e-9);
    assert_eq!(nodes[3].world_transform().unwrap(), poses[3]);
}

#[test]
fn test_descendants_visit_parents_first() {
    let (_, nodes) = sample_chain();
    let below = nodes[1]
        .iter_descendants()
        .map(|node| node.joint().name.clone())
        .collect::<Vec<_>>();
    assert_eq!(below, ["yaw", "pitch", "tip"]);
    assert!(nodes[3].iter_descendants().nth(1).is_none());
}

#[test]
fn test_display_is_indented() {
    let (chain, _) = sample_chain();
    let text = format!("{}", chain);
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 4);
    assert!(lines[3].starts_with("            "));
}
