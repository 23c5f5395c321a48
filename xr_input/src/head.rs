//! Viewer (head) tracking.

use crate::{
    frame::ReferenceFrame,
    math::{Pose, Quat, Vec3},
};

/// World pose of the player's head and its basis vectors, refreshed once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadTracker {
    pub position: Vec3,
    pub orientation: Quat,
    /// Local -Z in world space.
    pub forward: Vec3,
    /// Local +X in world space.
    pub right: Vec3,
    /// Local +Y in world space.
    pub up: Vec3,
    tracked: bool,
}

impl Default for HeadTracker {
    fn default() -> Self {
        Self::from_world_pose(&Pose::identity(), false)
    }
}

impl HeadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_world_pose(pose: &Pose, tracked: bool) -> Self {
        let orientation = pose.orientation;
        Self {
            position: pose.position,
            orientation,
            forward: orientation * -Vec3::z(),
            right: orientation * Vec3::x(),
            up: orientation * Vec3::y(),
            tracked,
        }
    }

    /// Whether a viewer pose was available on the latest update.
    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    /// Recompute from the native viewer pose. Without a pose the last values are kept.
    pub fn update(&mut self, viewer: Option<Pose>, frame: &ReferenceFrame) {
        match viewer {
            Some(native) => *self = Self::from_world_pose(&frame.to_world(&native), true),
            None => self.tracked = false,
        }
    }
}
