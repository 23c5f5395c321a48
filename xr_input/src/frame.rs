/*!
Reference frame and frame clock.

The reference frame is the player's placement in the world: the pose of the
frame origin expressed in the runtime's native tracking space. It is a plain
value. Locomotion never edits it in place; every motion builds a new frame
with [`ReferenceFrame::offset`] and hands it back to the host.

Offset semantics follow XR "offset reference spaces": offsetting the frame by
a translation `t` moves the frame origin by `t`, which makes everything that
is tracked (head, hands) appear displaced by `-t` in world space.
*/

use std::time::Duration;

use nalgebra as na;

use crate::math::{Iso, Pose, Quat, Vec3, yaw_rotation};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceFrame {
    origin: Iso,
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl ReferenceFrame {
    #[inline]
    pub fn identity() -> Self {
        Self {
            origin: Iso::identity(),
        }
    }

    #[inline]
    pub fn from_origin(origin: Iso) -> Self {
        Self { origin }
    }

    /// Pose of the frame origin in native tracking space.
    #[inline]
    pub fn origin(&self) -> Iso {
        self.origin
    }

    /// Compose a rigid offset onto this frame.
    ///
    /// Pure and associative: `f.offset(a).offset(b)` equals `f` offset by the
    /// composition `a * b`, so offsets issued in sequence apply in issue order.
    #[inline]
    pub fn offset(&self, translation: Vec3, rotation: Quat) -> Self {
        let offset = Iso::from_parts(na::Translation3::from(translation), rotation);
        Self {
            origin: self.origin * offset,
        }
    }

    #[inline]
    pub fn translated(&self, translation: Vec3) -> Self {
        self.offset(translation, Quat::identity())
    }

    /// Yaw the frame about a vertical axis through `pivot` (world space).
    ///
    /// Built as translate -> rotate -> translate back, so the player turns in
    /// place around their own position rather than around the tracking origin.
    /// Only the horizontal components of `pivot` are used. Tracked content
    /// turns by `-angle` around the pivot.
    pub fn rotated_about(&self, pivot: Vec3, angle: f32) -> Self {
        let pivot = Vec3::new(pivot.x, 0.0, pivot.z);
        self.translated(pivot)
            .offset(Vec3::zeros(), yaw_rotation(angle))
            .translated(-pivot)
    }

    /// Map a pose from native tracking space into world space.
    #[inline]
    pub fn to_world(&self, native: &Pose) -> Pose {
        Pose::from_iso(&(self.origin.inverse() * native.iso()))
    }

    /// World position of a viewer reported at `viewer` in native space.
    #[inline]
    pub fn viewer_world_position(&self, viewer: &Pose) -> Vec3 {
        self.to_world(viewer).position
    }

    /// Shift the frame so the viewer stands above the world origin. Height is untouched.
    pub fn recentered(&self, viewer: &Pose) -> Self {
        let position = self.viewer_world_position(viewer);
        self.translated(Vec3::new(position.x, 0.0, position.z))
    }
}

/// Timing of the current tick, supplied by the host once per rendered frame.
///
/// `frame` is monotonic and keys every per-frame cache. `now` is the time since
/// the session started; cooldowns and the jump timer read it instead of a wall
/// clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    pub frame: u64,
    pub now: Duration,
    pub delta: Duration,
}

impl FrameClock {
    pub fn new(frame: u64, now: Duration, delta: Duration) -> Self {
        Self { frame, now, delta }
    }

    /// The clock of the next frame, `delta` later.
    pub fn advanced(&self, delta: Duration) -> Self {
        Self {
            frame: self.frame + 1,
            now: self.now + delta,
            delta,
        }
    }

    #[inline]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
