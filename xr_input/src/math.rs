/*!
Math aliases and the rigid pose type shared by every input submodule.

No algorithms live here beyond small pose helpers. Units are meters and
radians; the world is Y-up with -Z as "forward", matching the XR runtime.
*/

use nalgebra as na;

pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid pose (position + orientation).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    #[inline]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::identity(),
        }
    }

    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(na::Translation3::from(self.position), self.orientation)
    }

    #[inline]
    pub fn from_iso(iso: &Iso) -> Self {
        Self {
            position: iso.translation.vector,
            orientation: iso.rotation,
        }
    }

    /// Transform a point expressed in this pose's local frame into the parent frame.
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }
}

/// Rotation about +Y (yaw) by `angle` radians.
#[inline]
pub fn yaw_rotation(angle: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), angle)
}

/// Project `v` onto the horizontal (XZ) plane and normalize it.
///
/// Returns zero when the projection is degenerate (looking straight up/down).
#[inline]
pub fn planar_unit(v: Vec3) -> Vec3 {
    let flat = Vec3::new(v.x, 0.0, v.z);
    flat.try_normalize(1.0e-6).unwrap_or_else(Vec3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn planar_unit_drops_vertical_component() {
        let v = planar_unit(Vec3::new(3.0, 7.0, 4.0));
        assert!((v - Vec3::new(0.6, 0.0, 0.8)).norm() < 1.0e-6);
    }

    #[test]
    fn planar_unit_of_vertical_vector_is_zero() {
        assert_eq!(planar_unit(Vec3::new(0.0, -1.0, 0.0)), Vec3::zeros());
    }

    #[test]
    fn yaw_quarter_turn_maps_forward_to_left() {
        // +90 degrees about +Y turns -Z into -X.
        let forward = yaw_rotation(FRAC_PI_2) * Vec3::new(0.0, 0.0, -1.0);
        assert!((forward - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-6);
    }
}
