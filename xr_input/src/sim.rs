//! In-memory [`XrHost`] for desktop sessions and tests.
//!
//! Poses and gamepads are whatever was last written; the reference frame is
//! stored as a plain value once the session has started.

use std::time::Duration;

use crate::{
    frame::ReferenceFrame,
    gamepad::{GamepadSnapshot, Handedness},
    host::{FrameError, XrHost},
    math::Pose,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HapticPulse {
    pub hand: Handedness,
    pub intensity: f32,
    pub duration: Duration,
}

#[derive(Clone, Debug)]
pub struct SimulatedHost {
    viewer: Option<Pose>,
    grips: [Option<Pose>; 2],
    gamepads: [Option<GamepadSnapshot>; 2],
    frame: Option<ReferenceFrame>,
    rejection: Option<String>,
    pulses: Vec<HapticPulse>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// A started session: identity reference frame, nothing tracked yet.
    pub fn new() -> Self {
        Self {
            viewer: None,
            grips: [None, None],
            gamepads: [None, None],
            frame: Some(ReferenceFrame::identity()),
            rejection: None,
            pulses: Vec::new(),
        }
    }

    /// A session whose reference frame is not available yet.
    pub fn not_started() -> Self {
        Self {
            frame: None,
            ..Self::new()
        }
    }

    pub fn start(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(ReferenceFrame::identity());
        }
    }

    pub fn set_viewer_pose(&mut self, pose: Option<Pose>) {
        self.viewer = pose;
    }

    pub fn set_grip_pose(&mut self, hand: Handedness, pose: Option<Pose>) {
        self.grips[hand.index()] = pose;
    }

    pub fn set_gamepad(&mut self, hand: Handedness, gamepad: Option<GamepadSnapshot>) {
        self.gamepads[hand.index()] = gamepad;
    }

    pub fn gamepad_mut(&mut self, hand: Handedness) -> Option<&mut GamepadSnapshot> {
        self.gamepads[hand.index()].as_mut()
    }

    /// Make every following frame update fail with `reason`, or succeed again with `None`.
    pub fn reject_frame_updates(&mut self, reason: Option<String>) {
        self.rejection = reason;
    }

    /// The stored frame, if the session has started.
    pub fn frame(&self) -> Option<ReferenceFrame> {
        self.frame
    }

    pub fn haptic_pulses(&self) -> &[HapticPulse] {
        &self.pulses
    }

    pub fn take_haptic_pulses(&mut self) -> Vec<HapticPulse> {
        std::mem::take(&mut self.pulses)
    }
}

impl XrHost for SimulatedHost {
    fn viewer_pose(&self) -> Option<Pose> {
        self.viewer
    }

    fn grip_pose(&self, hand: Handedness) -> Option<Pose> {
        self.grips[hand.index()]
    }

    fn gamepad(&self, hand: Handedness) -> Option<GamepadSnapshot> {
        self.gamepads[hand.index()].clone()
    }

    fn reference_frame(&self) -> Result<ReferenceFrame, FrameError> {
        self.frame.ok_or(FrameError::Unavailable)
    }

    fn set_reference_frame(&mut self, frame: ReferenceFrame) -> Result<(), FrameError> {
        if self.frame.is_none() {
            return Err(FrameError::Unavailable);
        }
        if let Some(reason) = &self.rejection {
            return Err(FrameError::Rejected(reason.clone()));
        }
        self.frame = Some(frame);
        Ok(())
    }

    fn pulse_haptics(&mut self, hand: Handedness, intensity: f32, duration: Duration) {
        self.pulses.push(HapticPulse {
            hand,
            intensity,
            duration,
        });
    }
}
