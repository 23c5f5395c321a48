/*!
Contract between the input core and the XR runtime hosting it.

The host owns the session: native tracking poses, gamepads, and the live
reference frame. The core only reads poses and gamepads, and only writes the
reference frame, once per locomotion step, through
[`XrHost::set_reference_frame`].
*/

use std::time::Duration;

use thiserror::Error;

use crate::{
    frame::ReferenceFrame,
    gamepad::{GamepadSnapshot, Handedness},
    math::Pose,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// No session or no viewer pose yet; the caller skips this tick.
    #[error("reference frame is not available yet")]
    Unavailable,
    /// The runtime refused the new frame.
    #[error("reference frame update rejected: {0}")]
    Rejected(String),
}

/// The physical device behind a hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceKind {
    /// A mechanical motion controller; its grip pose needs the wrist projection.
    #[default]
    Controller,
    /// An optically tracked hand; the runtime already reports the wrist pose.
    TrackedHand,
}

/// Device connect notification, as raised by the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceConnected {
    pub handedness: Handedness,
    pub kind: DeviceKind,
}

pub trait XrHost {
    /// Viewer (head) pose in native tracking space.
    fn viewer_pose(&self) -> Option<Pose>;

    /// Grip pose of the device held in `hand`, in native tracking space.
    fn grip_pose(&self, hand: Handedness) -> Option<Pose>;

    /// Gamepad state of the device held in `hand` for the current tick.
    fn gamepad(&self, hand: Handedness) -> Option<GamepadSnapshot>;

    fn reference_frame(&self) -> Result<ReferenceFrame, FrameError>;

    fn set_reference_frame(&mut self, frame: ReferenceFrame) -> Result<(), FrameError>;

    /// Fire a haptic pulse. Hosts without actuators ignore it.
    fn pulse_haptics(&mut self, _hand: Handedness, _intensity: f32, _duration: Duration) {}
}
