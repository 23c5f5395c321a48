//! Conversions between the input core's nalgebra types and Bevy's glam types.

use bevy::prelude::{Quat, Transform, Vec3};
use nalgebra as na;
use xr_input::Pose;

#[inline]
pub fn to_bevy_vec3(v: &xr_input::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn from_bevy_vec3(v: Vec3) -> xr_input::Vec3 {
    xr_input::Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_bevy_quat(q: &xr_input::Quat) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[inline]
pub fn from_bevy_quat(q: Quat) -> xr_input::Quat {
    xr_input::Quat::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn pose_to_transform(pose: &Pose) -> Transform {
    Transform::from_translation(to_bevy_vec3(&pose.position))
        .with_rotation(to_bevy_quat(&pose.orientation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xr_input::math::yaw_rotation;

    #[test]
    fn quaternions_keep_their_rotation() {
        let q = yaw_rotation(0.7);
        let back = from_bevy_quat(to_bevy_quat(&q));
        assert!((back.coords - q.coords).norm() < 1.0e-6);

        let forward = to_bevy_quat(&q) * Vec3::NEG_Z;
        let expected = q * xr_input::Vec3::new(0.0, 0.0, -1.0);
        assert!((forward - to_bevy_vec3(&expected)).length() < 1.0e-5);
    }
}
