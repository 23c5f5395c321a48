/*!
Per-hand tracked pose and input state.

The grip pose reported by the runtime sits inside the controller handle. For
a hand-agnostic reference point it is projected onto the wrist: a per-hand
offset in grip space, then a re-orientation so that the fingers point forward
with the thumb up. The palm is a second per-hand offset from the wrist.

Everything derived from the grip is computed once per frame, keyed by the
frame id passed to [`PoseSource::refresh`]; later reads in the same frame see
the same snapshot.
*/

use crate::{
    constants::{
        LEFT_PALM_OFFSET, LEFT_WRIST_OFFSET, POINTER_LOCAL_DIRECTION, RIGHT_PALM_OFFSET,
        RIGHT_WRIST_OFFSET, WRIST_ROLL, WRIST_YAW,
    },
    frame::ReferenceFrame,
    gamepad::{ControllerState, Handedness},
    host::{DeviceKind, XrHost},
    math::{Pose, Quat, Vec3},
};

/// Grip-to-wrist and wrist-to-palm geometry of one device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandGeometry {
    pub wrist_offset: Vec3,
    pub wrist_rotation: Quat,
    pub palm_offset: Vec3,
}

impl HandGeometry {
    pub fn for_device(hand: Handedness, kind: DeviceKind) -> Self {
        match (kind, hand) {
            // The runtime already reports the wrist for optically tracked hands.
            (DeviceKind::TrackedHand, _) => Self {
                wrist_offset: Vec3::zeros(),
                wrist_rotation: Quat::identity(),
                palm_offset: Vec3::zeros(),
            },
            (DeviceKind::Controller, Handedness::Left) => Self {
                wrist_offset: Vec3::from(LEFT_WRIST_OFFSET),
                wrist_rotation: Quat::from_euler_angles(0.0, WRIST_YAW, WRIST_ROLL),
                palm_offset: Vec3::from(LEFT_PALM_OFFSET),
            },
            (DeviceKind::Controller, Handedness::Right) => Self {
                wrist_offset: Vec3::from(RIGHT_WRIST_OFFSET),
                wrist_rotation: Quat::from_euler_angles(0.0, -WRIST_YAW, -WRIST_ROLL),
                palm_offset: Vec3::from(RIGHT_PALM_OFFSET),
            },
        }
    }

    /// Project a grip pose onto the wrist, in whatever space the grip is given.
    pub fn wrist(&self, grip: &Pose) -> Pose {
        Pose::new(
            grip.transform_point(self.wrist_offset),
            grip.orientation * self.wrist_rotation,
        )
    }
}

pub struct PoseSource {
    hand: Handedness,
    kind: DeviceKind,
    geometry: HandGeometry,
    last_refreshed: Option<u64>,
    tracked: bool,
    grip_world: Pose,
    wrist_world: Pose,
    /// Wrist relative to the player's rig (native tracking space).
    wrist_local: Pose,
    palm_world: Vec3,
    pointer_origin: Vec3,
    pointer_direction: Vec3,
    state: ControllerState,
    last_sample: Option<Vec3>,
}

impl PoseSource {
    pub fn new(hand: Handedness, kind: DeviceKind) -> Self {
        Self {
            hand,
            kind,
            geometry: HandGeometry::for_device(hand, kind),
            last_refreshed: None,
            tracked: false,
            grip_world: Pose::identity(),
            wrist_world: Pose::identity(),
            wrist_local: Pose::identity(),
            palm_world: Vec3::zeros(),
            pointer_origin: Vec3::zeros(),
            pointer_direction: Vec3::from(POINTER_LOCAL_DIRECTION).normalize(),
            state: ControllerState::default(),
            last_sample: None,
        }
    }

    pub fn hand(&self) -> Handedness {
        self.hand
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Recompute the cached poses and input state for `frame_id`.
    ///
    /// Returns `false` when the snapshot for this frame already exists. When
    /// the runtime has no grip pose the previous pose is kept.
    pub fn refresh(&mut self, frame_id: u64, host: &dyn XrHost, reference: &ReferenceFrame) -> bool {
        if self.last_refreshed == Some(frame_id) {
            return false;
        }
        self.last_refreshed = Some(frame_id);

        match host.grip_pose(self.hand) {
            Some(native_grip) => {
                self.tracked = true;
                self.grip_world = reference.to_world(&native_grip);
                self.wrist_local = self.geometry.wrist(&native_grip);
                self.wrist_world = self.geometry.wrist(&self.grip_world);
                self.palm_world = self.wrist_world.transform_point(self.geometry.palm_offset);
                self.pointer_origin = self.grip_world.position;
                self.pointer_direction =
                    self.grip_world.orientation * Vec3::from(POINTER_LOCAL_DIRECTION).normalize();
            }
            None => self.tracked = false,
        }

        if let Some(snapshot) = host.gamepad(self.hand) {
            self.state.apply(&snapshot);
        }
        true
    }

    pub fn last_refreshed(&self) -> Option<u64> {
        self.last_refreshed
    }

    /// Whether the runtime reported a grip pose on the latest refresh.
    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub fn grip_world(&self) -> &Pose {
        &self.grip_world
    }

    pub fn wrist_world(&self) -> &Pose {
        &self.wrist_world
    }

    pub fn wrist_local(&self) -> &Pose {
        &self.wrist_local
    }

    pub fn palm_world(&self) -> Vec3 {
        self.palm_world
    }

    pub fn pointer_origin(&self) -> Vec3 {
        self.pointer_origin
    }

    pub fn pointer_direction(&self) -> Vec3 {
        self.pointer_direction
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ControllerState {
        &mut self.state
    }

    /// Wrist speed in m/s since the previous call.
    ///
    /// Advances the stored sample, so call it at most once per frame per
    /// hand. The first call only seeds the sample and returns `0.0`.
    pub fn speed(&mut self, delta_secs: f32) -> f32 {
        let now = self.wrist_world.position;
        let previous = self.last_sample.replace(now);
        match previous {
            Some(last) if delta_secs > 0.0 => (now - last).norm() / delta_secs,
            _ => 0.0,
        }
    }
}
