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
//! graph structure for kinematic chain
use na::{Isometry3, RealField, Translation3};
use nalgebra as na;
use std::cell::{Ref, RefCell};
use std::fmt::{self, Display};
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::iterator::*;
use crate::joint::*;

type WeakNode<T> = Weak<RefCell<NodeImpl<T>>>;

/// Node for joint tree struct
///
/// Children are owned, the parent is a non-owning back reference.
#[derive(Debug)]
pub struct NodeImpl<T>
where
    T: RealField,
{
    pub parent: Option<WeakNode<T>>,
    pub children: Vec<Node<T>>,
    pub joint: Joint<T>,
}

/// Parts of `Chain`
///
/// It contains joint, joint (transform), and parent/children.
#[derive(Debug)]
pub struct Node<T: RealField>(pub(crate) Rc<RefCell<NodeImpl<T>>>);

impl<T> Node<T>
where
    T: RealField + Copy,
{
    pub(crate) fn from_rc(rc: Rc<RefCell<NodeImpl<T>>>) -> Self {
        Node(rc)
    }

    pub fn new(joint: Joint<T>) -> Self {
        Node::<T>(Rc::new(RefCell::new(NodeImpl {
            parent: None,
            children: Vec::new(),
            joint,
        })))
    }

    pub fn joint(&self) -> JointRefGuard<'_, T> {
        JointRefGuard {
            guard: self.0.borrow(),
        }
    }

    pub fn joint_position(&self) -> Option<T> {
        self.0.borrow().joint.joint_position()
    }

    pub fn parent(&self) -> Option<Node<T>> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .map(Node::from_rc)
    }

    pub fn children(&self) -> ChildrenRefGuard<'_, T> {
        ChildrenRefGuard {
            guard: self.0.borrow(),
        }
    }

    /// iter to the end, it contains nodes[id] itself
    #[inline]
    pub fn iter_descendants(&self) -> Descendants<T> {
        Descendants::new(vec![self.clone()])
    }

    /// Set parent and child relations at same time
    pub fn set_parent(&self, parent: &Node<T>) {
        self.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
        parent.0.borrow_mut().children.push(self.clone());
    }

    /// # Examples
    ///
    /// ```
    /// let l0 = pipette_arm::JointBuilder::<f32>::new().into_node();
    /// let l1 = pipette_arm::JointBuilder::new().into_node();
    /// l1.set_parent(&l0);
    /// assert!(l0.is_root());
    /// assert!(!l1.is_root());
    /// ```
    pub fn is_root(&self) -> bool {
        self.0.borrow().parent.is_none()
    }

    /// # Examples
    ///
    /// ```
    /// let l0 = pipette_arm::JointBuilder::<f64>::new().into_node();
    /// let l1 = pipette_arm::JointBuilder::new().into_node();
    /// l1.set_parent(&l0);
    /// assert!(!l0.is_end());
    /// assert!(l1.is_end());
    /// ```
    pub fn is_end(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    /// Set the position (angle) of the joint
    ///
    /// No limit is checked here; clamping belongs to the input layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipette_arm::*;
    /// let l0 = JointBuilder::new()
    ///     .joint_type(JointType::pitch())
    ///     .into_node();
    /// l0.set_joint_position(4.0);
    /// assert_eq!(l0.joint_position().unwrap(), 4.0);
    /// ```
    #[inline]
    pub fn set_joint_position(&self, position: T) {
        self.0.borrow_mut().joint.set_joint_position(position);
    }

    #[inline]
    pub fn local_transform(&self) -> Isometry3<T> {
        self.0.borrow().joint.local_transform()
    }

    pub(crate) fn parent_world_transform(&self) -> Option<Isometry3<T>> {
        match self.parent() {
            Some(ref parent) => parent.world_transform(),
            None => Some(Isometry3::identity()),
        }
    }

    /// Get the calculated world transform.
    /// Call `Chain::update_transforms()` before using this method.
    ///
    ///  # Examples
    ///
    /// ```
    /// use pipette_arm::*;
    /// use nalgebra::Translation3;
    ///
    /// let l0 = JointBuilder::new()
    ///     .translation(Translation3::new(0.0, 0.2, 0.0))
    ///     .joint_type(JointType::yaw())
    ///     .into_node();
    /// let l1 = JointBuilder::new()
    ///     .translation(Translation3::new(0.0, 0.0, 1.0))
    ///     .joint_type(JointType::pitch())
    ///     .into_node();
    /// l1.set_parent(&l0);
    /// let tree = Chain::<f64>::from_root(l0);
    /// tree.set_joint_positions(&[std::f64::consts::FRAC_PI_2, 0.0]).unwrap();
    /// assert!(l1.world_transform().is_none());
    /// let _poses = tree.update_transforms();
    /// assert!((l1.world_transform().unwrap().translation.vector.x - 1.0).abs() < 0.0001);
    /// assert!((l1.world_transform().unwrap().translation.vector.y - 0.2).abs() < 0.0001);
    /// ```
    #[inline]
    pub fn world_transform(&self) -> Option<Isometry3<T>> {
        self.0.borrow().joint.world_transform()
    }
}

impl<T> Clone for Node<T>
where
    T: RealField,
{
    fn clone(&self) -> Self {
        Node::<T>(self.0.clone())
    }
}

impl<T> PartialEq for Node<T>
where
    T: RealField,
{
    fn eq(&self, other: &Node<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: RealField> Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.borrow().joint.fmt(f)
    }
}

impl<T> From<Joint<T>> for Node<T>
where
    T: RealField + Copy,
{
    fn from(joint: Joint<T>) -> Self {
        Self::new(joint)
    }
}

macro_rules! def_ref_guard {
    ($guard_struct:ident, $target:ty, $member:ident) => {
        pub struct $guard_struct<'a, T>
        where
            T: RealField,
        {
            guard: Ref<'a, NodeImpl<T>>,
        }

        impl<'a, T> Deref for $guard_struct<'a, T>
        where
            T: RealField,
        {
            type Target = $target;
            fn deref(&self) -> &Self::Target {
                &self.guard.$member
            }
        }
    };
}

def_ref_guard!(JointRefGuard, Joint<T>, joint);
def_ref_guard!(ChildrenRefGuard, Vec<Node<T>>, children);

/// Build a `Joint<T>`
///
/// # Examples
///
/// ```
/// use pipette_arm::*;
/// use nalgebra::Translation3;
///
/// let l0 = JointBuilder::new()
///     .name("shoulder_pitch")
///     .translation(Translation3::new(0.0, 0.1, 0.0))
///     .joint_type(JointType::<f32>::pitch())
///     .finalize();
/// println!("{:?}", l0);
/// ```
#[derive(Debug, Clone)]
pub struct JointBuilder<T: RealField> {
    name: String,
    joint_type: JointType<T>,
    origin: Isometry3<T>,
}

impl<T> Default for JointBuilder<T>
where
    T: RealField + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JointBuilder<T>
where
    T: RealField + Copy,
{
    pub fn new() -> JointBuilder<T> {
        JointBuilder {
            name: "".to_string(),
            joint_type: JointType::Fixed,
            origin: Isometry3::identity(),
        }
    }
    /// Set the name of the `Joint`
    pub fn name(mut self, name: &str) -> JointBuilder<T> {
        self.name = name.to_string();
        self
    }
    /// Set the joint type
    pub fn joint_type(mut self, joint_type: JointType<T>) -> JointBuilder<T> {
        self.joint_type = joint_type;
        self
    }
    /// Set the translation of the origin transform of this joint
    pub fn translation(mut self, translation: Translation3<T>) -> JointBuilder<T> {
        self.origin.translation = translation;
        self
    }
    /// Create `Joint` instance
    pub fn finalize(self) -> Joint<T> {
        let mut joint = Joint::new(&self.name, self.joint_type);
        joint.set_origin(self.origin);
        joint
    }
    /// Create `Node` instead of `Joint` as output
    pub fn into_node(self) -> Node<T> {
        self.finalize().into()
    }
}

/// set parents easily
///
/// ```
/// #[macro_use] extern crate pipette_arm;
/// # fn main() {
/// let l0 = pipette_arm::JointBuilder::<f64>::new().into_node();
/// let l1 = pipette_arm::JointBuilder::new().into_node();
/// let l2 = pipette_arm::JointBuilder::new().into_node();
///
/// // This is the same as below
/// // l1.set_parent(&l0);
/// // l2.set_parent(&l1);
/// connect![l0 => l1 => l2];
///
/// assert!(l0.is_root());
/// assert!(!l1.is_root());
/// assert!(!l1.is_end());
/// assert!(l2.is_end());
/// # }
/// ```
#[macro_export]
macro_rules! connect {
    ($x:expr => $y:expr) => {
        $y.set_parent(&$x);
    };
    ($x:expr => $y:expr => $($rest:tt)+) => {
        $y.set_parent(&$x);
        $crate::connect!($y => $($rest)*);
    };
}

#[test]
fn test_parent_is_weak() {
    let root = JointBuilder::<f32>::new().name("root").into_node();
    let child = JointBuilder::<f32>::new().name("child").into_node();
    child.set_parent(&root);
    assert_eq!(child.parent().unwrap(), root);
    drop(root);
    // the child does not keep its parent alive
    assert!(child.parent().is_none());
}
