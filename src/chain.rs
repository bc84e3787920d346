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
use log::trace;
use na::{Isometry3, RealField};
use nalgebra as na;
use std::fmt::{self, Display};

use crate::errors::*;
use crate::node::*;

/// Kinematic Chain using `Node`
///
/// # Examples
///
/// ```
/// use pipette_arm::*;
/// use nalgebra::Translation3;
///
/// let l0 = JointBuilder::new()
///     .name("joint_pitch0")
///     .translation(Translation3::new(0.0, 0.0, 0.1))
///     .joint_type(JointType::pitch())
///     .into_node();
/// let l1 = JointBuilder::new()
///     .name("joint_pitch1")
///     .translation(Translation3::new(0.0, 0.0, 0.5))
///     .joint_type(JointType::pitch())
///     .into_node();
/// let l2 = JointBuilder::new()
///     .name("hand")
///     .translation(Translation3::new(0.0, 0.0, 0.5))
///     .joint_type(JointType::Fixed)
///     .into_node();
///
/// // Sequencial joints structure
/// connect![l0 => l1 => l2];
///
/// let tree = Chain::from_root(l0);
/// assert_eq!(tree.dof(), 2);
///
/// // Get joint positions
/// let positions = tree.joint_positions();
/// assert_eq!(positions, vec![0.0, 0.0]);
///
/// // Get the initial joint transforms
/// let transforms = tree.update_transforms();
/// assert_eq!(transforms.len(), 3);
/// assert_eq!(transforms[0].translation.vector.z, 0.1);
/// assert_eq!(transforms[1].translation.vector.z, 0.6);
/// assert_eq!(transforms[2].translation.vector.z, 1.1);
///
/// // Set joint positions
/// tree.set_joint_positions(&[1.0, 2.0]).unwrap();
/// assert_eq!(tree.joint_positions(), vec![1.0, 2.0]);
/// ```
#[derive(Debug)]
pub struct Chain<T: RealField> {
    nodes: Vec<Node<T>>,
    movable_nodes: Vec<Node<T>>,
}

impl<T: RealField + Copy> Chain<T> {
    fn fmt_with_indent_level(
        &self,
        node: &Node<T>,
        level: usize,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        if self.nodes.contains(node) {
            writeln!(f, "{}{}", "    ".repeat(level), node)?;
        }
        for c in node.children().iter() {
            self.fmt_with_indent_level(c, level + 1, f)?
        }
        Ok(())
    }
}

impl<T: RealField + Copy> Display for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.nodes.first() {
            Some(root) => self.fmt_with_indent_level(root, 0, f),
            None => Ok(()),
        }
    }
}

impl<T: RealField + Copy> Chain<T> {
    fn from_nodes(nodes: Vec<Node<T>>) -> Self {
        let movable_nodes = nodes
            .iter()
            .filter(|node| node.joint().is_movable())
            .cloned()
            .collect();
        Chain {
            nodes,
            movable_nodes,
        }
    }
    /// Create Chain from root joint
    ///
    /// # Examples
    ///
    /// ```
    /// use pipette_arm::*;
    ///
    /// let l0 = JointBuilder::<f32>::new().into_node();
    /// let l1 = JointBuilder::new().into_node();
    /// l1.set_parent(&l0);
    /// let tree = Chain::from_root(l0);
    /// assert_eq!(tree.iter().count(), 2);
    /// ```
    pub fn from_root(root_joint: Node<T>) -> Self {
        Self::from_nodes(root_joint.iter_descendants().collect())
    }
    /// Iterate for all joint nodes
    ///
    /// The order is from parent to children. You can assume that parent is already iterated.
    pub fn iter(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }
    /// Iterate for movable joints
    pub fn iter_movable(&self) -> impl Iterator<Item = &Node<T>> {
        self.movable_nodes.iter()
    }
    /// Calculate the degree of freedom
    pub fn dof(&self) -> usize {
        self.movable_nodes.len()
    }
    /// Find the joint by name
    pub fn find(&self, joint_name: &str) -> Option<&Node<T>> {
        self.iter().find(|node| node.joint().name == joint_name)
    }
    /// Get the positions of the joints
    ///
    /// `Fixed` joints are ignored. the length is the same with `dof()`
    pub fn joint_positions(&self) -> Vec<T> {
        self.iter_movable()
            .filter_map(|node| node.joint_position())
            .collect()
    }
    /// Set the positions of the joints
    ///
    /// `Fixed` joints are ignored. the input number must be equal with `dof()`
    pub fn set_joint_positions(&self, positions_vec: &[T]) -> Result<()> {
        if positions_vec.len() != self.dof() {
            return Err(Error::SizeMismatch {
                input: positions_vec.len(),
                required: self.dof(),
            });
        }
        for (node, position) in self.iter_movable().zip(positions_vec.iter()) {
            node.set_joint_position(*position);
        }
        Ok(())
    }
    /// Names of the movable joints
    pub fn names(&self) -> Vec<String> {
        self.iter_movable()
            .map(|node| node.joint().name.clone())
            .collect()
    }
    /// Local (parent relative) transforms of all joints, parent to child
    pub fn local_transforms(&self) -> Vec<Isometry3<T>> {
        self.iter().map(|node| node.local_transform()).collect()
    }
    /// Calculate the world transforms and cache them in each joint
    pub fn update_transforms(&self) -> Vec<Isometry3<T>> {
        self.iter()
            .map(|node| {
                // parents are visited first, so a missing cache means a node
                // outside of this chain; treat it as the world origin
                let parent_transform = node
                    .parent_world_transform()
                    .unwrap_or_else(Isometry3::identity);
                let trans = parent_transform * node.local_transform();
                node.joint().set_world_transform(trans);
                trace!("{} => {}", node, trans.translation.vector);
                trans
            })
            .collect()
    }
}

#[test]
fn it_works() {
    use crate::joint::*;
    use na::Translation3;

    let joint0 = JointBuilder::new()
        .name("j0")
        .translation(Translation3::new(0.0, 0.1, 0.0))
        .joint_type(JointType::yaw())
        .into_node();
    let joint1 = JointBuilder::new()
        .name("j1")
        .translation(Translation3::new(0.0, 0.0, 0.1))
        .joint_type(JointType::pitch())
        .into_node();
    let joint2 = JointBuilder::new()
        .name("fixed")
        .translation(Translation3::new(0.0, 0.0, 0.2))
        .into_node();
    let joint3 = JointBuilder::new()
        .name("j3")
        .translation(Translation3::new(0.0, 0.0, 0.1))
        .joint_type(JointType::pitch())
        .into_node();
    joint1.set_parent(&joint0);
    joint2.set_parent(&joint1);
    joint3.set_parent(&joint2);

    let tree = Chain::<f32>::from_root(joint0.clone());
    assert_eq!(tree.dof(), 3);
    assert_eq!(tree.names(), vec!["j0", "j1", "j3"]);
    assert!(tree.set_joint_positions(&[0.1, 0.2]).is_err());
    tree.set_joint_positions(&[0.1, 0.2, 0.3]).unwrap();
    assert_eq!(tree.joint_positions(), vec![0.1, 0.2, 0.3]);

    let poses = tree.update_transforms();
    assert_eq!(poses.len(), 4);
    assert_eq!(joint3.world_transform().unwrap(), poses[3]);
    println!("{}", tree);
}
