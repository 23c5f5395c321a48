/*!
Player locomotion driven by the controllers.

Every motion is a rigid offset composed onto the host's reference frame:
read the current frame, build the offset frame, hand it back. Motions issued
in the same tick therefore stack in issue order.

Per tick, in order:
1. Planar translation from the left thumbstick, along the head's horizontal basis.
2. Jump start (or flight toggle) on a button-A press of the right controller.
3. Jump update: the delta of a parabolic height profile.
4. Yaw, snap or smooth, about the player's live position.
5. Vertical flight from the right thumbstick or buttons A/B.

A failed frame update is logged and skipped for that tick. Timers and speeds
are kept, so the next tick resumes where this one left off.
*/

use std::time::Duration;

use crate::{
    constants::{
        DOUBLE_PRESS_MAX, DOUBLE_PRESS_MIN, FLY_JOYSTICK_DEADZONE, FLY_SPEED_PER_FRAME,
        JUMP_DURATION, JUMP_HEIGHT, MOVE_SPEED_PER_FRAME, SMOOTH_TURN_ACCELERATION,
        SMOOTH_TURN_DEADZONE, SMOOTH_TURN_DECELERATION, SMOOTH_TURN_MAX_SPEED, SNAP_TURN_ANGLE,
        SNAP_TURN_COOLDOWN, SNAP_TURN_THRESHOLD,
    },
    frame::{FrameClock, ReferenceFrame},
    gamepad::ControllerState,
    head::HeadTracker,
    host::{FrameError, XrHost},
    math::{Vec3, planar_unit},
    settings::LocomotionSettings,
};

/// Height offset of the reference frame at jump progress `t` (clamped to `[0, 1]`).
///
/// Zero at both ends, `-height` at `t = 0.5`. Negative because lowering the
/// frame origin raises the player.
#[inline]
pub fn jump_profile(t: f32, height: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    -(height * 4.0 * t * (1.0 - t))
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct JumpState {
    started_at: Duration,
    /// Profile value already applied to the frame.
    current_height: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct RotationState {
    current_speed: f32,
    target_speed: f32,
    direction: f32,
    last_snap_at: Option<Duration>,
}

/// What one [`LocomotionController::step`] applied to the reference frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionStep {
    /// Planar frame offset.
    pub translation: Option<Vec3>,
    pub jump_started: bool,
    pub flying_toggled: bool,
    /// Vertical frame offset from the jump profile.
    pub jump_offset: Option<f32>,
    /// Yaw applied about the player (radians).
    pub rotation: Option<f32>,
    /// Vertical frame offset from flight.
    pub vertical: Option<f32>,
}

/// Controller state the locomotion step reads, one entry per connected hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct HandsInput<'a> {
    pub left: Option<&'a ControllerState>,
    pub right: Option<&'a ControllerState>,
}

#[derive(Clone, Debug, Default)]
pub struct LocomotionController {
    settings: LocomotionSettings,
    is_flying: bool,
    jump: Option<JumpState>,
    rotation: RotationState,
    button_a_was_down: bool,
    last_button_a_press: Option<Duration>,
}

impl LocomotionController {
    pub fn new(settings: LocomotionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut LocomotionSettings {
        &mut self.settings
    }

    pub fn is_flying(&self) -> bool {
        self.is_flying
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation.current_speed
    }

    /// Zero every transient: jump, flight toggle, turn speed, button history.
    pub fn reset(&mut self) {
        *self = Self::new(self.settings);
    }

    /// Run one locomotion tick. `head` must already be refreshed for this tick.
    pub fn step(
        &mut self,
        clock: &FrameClock,
        head: &HeadTracker,
        hands: HandsInput<'_>,
        host: &mut dyn XrHost,
    ) -> LocomotionStep {
        let mut step = LocomotionStep::default();

        if let Some(left) = hands.left {
            step.translation = self.move_player(head, left, host);
        }
        if let Some(right) = hands.right {
            self.jump_player(clock, right, &mut step);
        } else {
            self.button_a_was_down = false;
        }
        step.jump_offset = self.update_jump(clock, host);
        if let Some(right) = hands.right {
            step.rotation = self.rotate_player(clock, right, host);
            step.vertical = self.move_player_y(right, host);
        }
        step
    }

    fn move_player(
        &mut self,
        head: &HeadTracker,
        left: &ControllerState,
        host: &mut dyn XrHost,
    ) -> Option<Vec3> {
        if !left.has_thumbstick {
            return None;
        }
        let stick = left.thumbstick;
        let direction = planar_unit(head.forward) * -stick.y + planar_unit(head.right) * stick.x;
        if direction == Vec3::zeros() {
            return None;
        }

        let offset = Vec3::new(-direction.x, 0.0, -direction.z) * MOVE_SPEED_PER_FRAME;
        apply_offset(host, "move", |frame| frame.translated(offset)).then_some(offset)
    }

    fn jump_player(&mut self, clock: &FrameClock, right: &ControllerState, step: &mut LocomotionStep) {
        let pressed = right.button_count > 4 && right.buttons.button_a;
        let rising_edge = pressed && !self.button_a_was_down;
        self.button_a_was_down = pressed;
        if !rising_edge {
            return;
        }

        if self.settings.jump_enabled && self.jump.is_none() && !self.is_flying {
            self.jump = Some(JumpState {
                started_at: clock.now,
                current_height: 0.0,
            });
            step.jump_started = true;
        } else if !self.settings.always_flying {
            let is_double_press = self.last_button_a_press.is_some_and(|last| {
                let gap = clock.now.saturating_sub(last);
                DOUBLE_PRESS_MIN < gap && gap < DOUBLE_PRESS_MAX
            });
            if is_double_press {
                self.is_flying = !self.is_flying;
                self.jump = None;
                step.flying_toggled = true;
                log::debug!("flying {}", if self.is_flying { "on" } else { "off" });
            }
        }
        self.last_button_a_press = Some(clock.now);
    }

    fn update_jump(&mut self, clock: &FrameClock, host: &mut dyn XrHost) -> Option<f32> {
        let jump = self.jump?;
        if !self.settings.jump_enabled {
            // Disabled mid-air: land at once so the height is not left behind.
            let delta = -jump.current_height;
            if !apply_offset(host, "jump", |frame| frame.translated(Vec3::new(0.0, delta, 0.0))) {
                return None;
            }
            self.jump = None;
            return Some(delta);
        }

        let elapsed = clock.now.saturating_sub(jump.started_at);
        let progress = (elapsed.as_secs_f32() / JUMP_DURATION.as_secs_f32()).min(1.0);
        let height = jump_profile(progress, JUMP_HEIGHT);
        let delta = height - jump.current_height;

        if !apply_offset(host, "jump", |frame| frame.translated(Vec3::new(0.0, delta, 0.0))) {
            return None;
        }
        self.jump = (progress < 1.0).then_some(JumpState {
            current_height: height,
            ..jump
        });
        Some(delta)
    }

    fn rotate_player(
        &mut self,
        clock: &FrameClock,
        right: &ControllerState,
        host: &mut dyn XrHost,
    ) -> Option<f32> {
        if !right.has_thumbstick {
            return None;
        }
        let x = right.thumbstick.x;

        let angle = if self.settings.discrete_rotation {
            let cooling_down = self
                .rotation
                .last_snap_at
                .is_some_and(|last| clock.now.saturating_sub(last) < SNAP_TURN_COOLDOWN);
            if cooling_down || x.abs() < SNAP_TURN_THRESHOLD {
                return None;
            }
            x.signum() * SNAP_TURN_ANGLE
        } else {
            let state = &mut self.rotation;
            if x.abs() > SMOOTH_TURN_DEADZONE {
                state.direction = x.signum();
                state.target_speed = x * x * SMOOTH_TURN_MAX_SPEED;
            } else {
                state.target_speed = 0.0;
            }

            if state.current_speed < state.target_speed {
                state.current_speed += (state.target_speed - state.current_speed) * SMOOTH_TURN_ACCELERATION;
            } else if state.current_speed > state.target_speed {
                state.current_speed -= (state.current_speed - state.target_speed) * SMOOTH_TURN_DECELERATION;
            }
            state.current_speed * state.direction
        };

        if angle == 0.0 {
            return None;
        }

        let Some(viewer) = host.viewer_pose() else {
            log::debug!("rotate: no viewer pose yet");
            return None;
        };
        let rotated = apply_offset(host, "rotate", |frame| {
            frame.rotated_about(frame.viewer_world_position(&viewer), angle)
        });
        if !rotated {
            return None;
        }
        if self.settings.discrete_rotation {
            self.rotation.last_snap_at = Some(clock.now);
        }
        Some(angle)
    }

    fn move_player_y(&mut self, right: &ControllerState, host: &mut dyn XrHost) -> Option<f32> {
        let settings = &self.settings;
        let flight_active = settings.flying_mode_enabled && (settings.always_flying || self.is_flying);
        let buttons = right.buttons;
        let has_input = buttons.button_a || buttons.button_b || right.thumbstick.y != 0.0;
        if !flight_active || right.button_count <= 5 || !has_input {
            return None;
        }

        let dy = if settings.flying_uses_joystick() {
            let y = right.thumbstick.y;
            if y.abs() <= FLY_JOYSTICK_DEADZONE {
                return None;
            }
            FLY_SPEED_PER_FRAME * y
        } else if buttons.button_a {
            FLY_SPEED_PER_FRAME
        } else if buttons.button_b {
            -FLY_SPEED_PER_FRAME
        } else {
            return None;
        };

        apply_offset(host, "fly", |frame| frame.translated(Vec3::new(0.0, dy, 0.0))).then_some(dy)
    }
}

/// Read the host frame, offset it, write it back. Returns whether the new frame took.
fn apply_offset(
    host: &mut dyn XrHost,
    motion: &str,
    offset: impl FnOnce(&ReferenceFrame) -> ReferenceFrame,
) -> bool {
    let result = match host.reference_frame() {
        Ok(frame) => host.set_reference_frame(offset(&frame)),
        Err(err) => Err(err),
    };
    match result {
        Ok(()) => true,
        Err(FrameError::Unavailable) => {
            log::debug!("{motion}: skipped, {}", FrameError::Unavailable);
            false
        }
        Err(err) => {
            log::error!("{motion}: {err}");
            false
        }
    }
}
