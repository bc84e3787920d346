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
//! Static description of the scene: camera, lights, helpers and arm visuals
use na::{Isometry3, Perspective3, Point3, Translation3, UnitQuaternion, Vector3};
use nalgebra as na;
use serde::Deserialize;
use std::f32::consts::FRAC_PI_2;

use crate::arm::*;
use crate::link::*;

/// Fixed perspective camera looking at `target`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// vertical field of view [deg]
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            eye: [1.6, 1.1, 1.8],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl Camera {
    pub fn eye_point(&self) -> Point3<f32> {
        Point3::from(self.eye)
    }

    pub fn target_point(&self) -> Point3<f32> {
        Point3::from(self.target)
    }

    /// World to camera transform (Y-up, right handed)
    pub fn view(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye_point(), &self.target_point(), &Vector3::y())
    }

    pub fn projection(&self, aspect: f32) -> Perspective3<f32> {
        Perspective3::new(aspect, self.fov.to_radians(), self.near, self.far)
    }

    /// Project a world point into normalized device coordinates
    ///
    /// ```
    /// use pipette_arm::scene::Camera;
    ///
    /// let camera = Camera::default();
    /// let center = camera.project(1.0, &camera.target_point());
    /// assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5);
    /// ```
    pub fn project(&self, aspect: f32, point: &Point3<f32>) -> Point3<f32> {
        self.projection(aspect)
            .project_point(&self.view().transform_point(point))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HemisphereLight {
    pub sky: u32,
    pub ground: u32,
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky: 0xffffff,
            ground: 0x444444,
            intensity: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShadowParams {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    /// half width of the orthographic shadow camera
    pub extent: f32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            map_size: 2048,
            near: 0.5,
            far: 50.0,
            extent: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
    pub shadow: ShadowParams,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 0.8,
            position: [3.0, 4.0, 5.0],
            shadow: ShadowParams::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lighting {
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
}

/// Ground reference grid on the XZ plane
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Grid {
    pub size: f32,
    pub divisions: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            size: 4.0,
            divisions: 40,
        }
    }
}

impl Grid {
    /// End points of the grid lines
    pub fn lines(&self) -> Vec<(Point3<f32>, Point3<f32>)> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions.max(1) as f32;
        (0..=self.divisions)
            .flat_map(|i| {
                let offset = -half + step * i as f32;
                [
                    (Point3::new(-half, 0.0, offset), Point3::new(half, 0.0, offset)),
                    (Point3::new(offset, 0.0, -half), Point3::new(offset, 0.0, half)),
                ]
            })
            .collect()
    }
}

/// Everything in the scene which is not the arm
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub background: u32,
    pub camera: Camera,
    pub lighting: Lighting,
    pub grid: Grid,
    /// length of the axes helper at the origin
    pub axes: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background: 0xf0f0f0,
            camera: Camera::default(),
            lighting: Lighting::default(),
            grid: Grid::default(),
            axes: 0.2,
        }
    }
}

fn offset(x: f32, y: f32, z: f32) -> Isometry3<f32> {
    Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity())
}

fn segment_visual(name: &str, joint: JointId, dims: &BoxDimensions, shade: u8) -> Visual {
    Visual {
        name: name.to_owned(),
        frame: Frame::Joint(joint),
        // spans from this joint to the next one
        origin: offset(0.0, 0.0, dims.length / 2.0),
        geometry: Geometry::Box {
            width: dims.width,
            height: dims.height,
            depth: dims.length,
        },
        role: MaterialRole::Body { shade },
        cast_shadow: true,
        receive_shadow: true,
    }
}

fn joint_visual(name: &str, frame: Frame, origin: Isometry3<f32>, radius: f32) -> Visual {
    Visual {
        name: name.to_owned(),
        frame,
        origin,
        geometry: Geometry::Sphere { radius },
        role: MaterialRole::Joint,
        cast_shadow: true,
        receive_shadow: false,
    }
}

/// Visual primitives of the arm, each bound to the frame it moves with
///
/// ```
/// use pipette_arm::*;
///
/// let visuals = describe_arm(&ARM_GEOMETRY);
/// assert_eq!(visuals.len(), 9);
/// ```
pub fn describe_arm(geometry: &ArmGeometry) -> Vec<Visual> {
    let base = &geometry.base;
    let radii = &geometry.joints;
    vec![
        Visual {
            name: "base".to_owned(),
            frame: Frame::Root,
            origin: offset(0.0, base.length / 2.0, 0.0),
            geometry: Geometry::Cylinder {
                radius: base.diameter / 2.0,
                length: base.length,
            },
            role: MaterialRole::Body { shade: 0 },
            cast_shadow: true,
            receive_shadow: true,
        },
        joint_visual(
            "shoulder_joint",
            Frame::Root,
            offset(0.0, base.length, 0.0),
            radii.shoulder,
        ),
        segment_visual("segment1", JointId::Shoulder, &geometry.segment1, 1),
        joint_visual(
            "elbow_joint",
            Frame::Joint(JointId::Shoulder),
            offset(0.0, 0.0, geometry.segment1.length),
            radii.elbow,
        ),
        segment_visual("segment2", JointId::Elbow, &geometry.segment2, 2),
        joint_visual(
            "wrist_joint",
            Frame::Joint(JointId::Elbow),
            offset(0.0, 0.0, geometry.segment2.length),
            radii.wrist,
        ),
        segment_visual("segment3", JointId::Wrist, &geometry.segment3, 3),
        joint_visual(
            "pipette_joint",
            Frame::Joint(JointId::Wrist),
            offset(0.0, 0.0, geometry.segment3.length),
            radii.pipette,
        ),
        Visual {
            name: "pipette".to_owned(),
            frame: Frame::Joint(JointId::Pipette),
            // the cylinder axis (+Y) is turned onto +Z
            origin: Isometry3::from_parts(
                Translation3::new(0.0, 0.0, geometry.pipette.length / 2.0),
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2),
            ),
            geometry: Geometry::Cylinder {
                radius: geometry.pipette.diameter / 2.0,
                length: geometry.pipette.length,
            },
            role: MaterialRole::Pipette,
            cast_shadow: true,
            receive_shadow: true,
        },
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_segments_bind_to_their_joint() {
        let visuals = describe_arm(&ARM_GEOMETRY);
        let find = |name: &str| visuals.iter().find(|v| v.name == name).unwrap();
        assert_eq!(find("segment1").frame, Frame::Joint(JointId::Shoulder));
        assert_eq!(find("segment2").frame, Frame::Joint(JointId::Elbow));
        assert_eq!(find("segment3").frame, Frame::Joint(JointId::Wrist));
        assert_eq!(find("pipette").frame, Frame::Joint(JointId::Pipette));
        assert_eq!(find("base").frame, Frame::Root);
        assert_eq!(
            find("segment2").origin.translation.vector.z,
            ARM_GEOMETRY.segment2.length / 2.0
        );
    }

    #[test]
    fn test_pipette_points_along_z() {
        let visuals = describe_arm(&ARM_GEOMETRY);
        let pipette = visuals.iter().find(|v| v.name == "pipette").unwrap();
        let axis = pipette.origin.rotation * Vector3::y();
        assert!((axis - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_grid_lines() {
        let grid = Grid::default();
        let lines = grid.lines();
        assert_eq!(lines.len(), 2 * 41);
        assert_eq!(lines[0].0, Point3::new(-2.0, 0.0, -2.0));
    }

    #[test]
    fn test_every_role_is_used() {
        let visuals = describe_arm(&ARM_GEOMETRY);
        for role in MaterialRole::ALL {
            assert!(visuals.iter().any(|v| v.role == role), "{:?}", role);
        }
    }
}
