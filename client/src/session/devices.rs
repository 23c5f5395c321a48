//! Simulated head and controllers driven by the desktop bindings.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use xr_input::{
    DeviceConnected, DeviceKind, GamepadButton, GamepadSnapshot, Handedness, Pose,
};

use super::{XrInput, XrSession, XrSet};
use crate::{
    convert::{from_bevy_quat, from_bevy_vec3},
    input::InputAction,
};

const LOOK_SENSITIVITY: f32 = 0.003;
const REACH_SPEED: f32 = 0.6;
const MAX_REACH: f32 = 0.8;
const EYE_HEIGHT: f32 = 1.6;

/// Device plug events, raised by the simulated runtime.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceMessage {
    Connected(DeviceConnected),
    Disconnected(Handedness),
}

/// State of the simulated headset and controllers, in native tracking space.
#[derive(Resource, Debug, Clone)]
pub struct SimulatedRig {
    pub head_yaw: f32,
    pub head_pitch: f32,
    pub eye_height: f32,
    /// Hand positions relative to the head, in the head's yaw frame.
    pub reach: [Vec3; 2],
    pub connected: [bool; 2],
    pub kinds: [DeviceKind; 2],
}

impl Default for SimulatedRig {
    fn default() -> Self {
        Self {
            head_yaw: 0.0,
            head_pitch: 0.0,
            eye_height: EYE_HEIGHT,
            reach: [Vec3::new(-0.2, -0.4, -0.35), Vec3::new(0.2, -0.4, -0.35)],
            connected: [false; 2],
            kinds: [DeviceKind::Controller; 2],
        }
    }
}

impl SimulatedRig {
    fn head_position(&self) -> Vec3 {
        Vec3::new(0.0, self.eye_height, 0.0)
    }

    fn head_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.head_yaw) * Quat::from_rotation_x(self.head_pitch)
    }

    pub fn viewer_pose(&self) -> Pose {
        Pose::new(
            from_bevy_vec3(self.head_position()),
            from_bevy_quat(self.head_rotation()),
        )
    }

    /// Grip pose of `hand`. Controllers are held level and follow the head yaw.
    pub fn grip_pose(&self, hand: Handedness) -> Pose {
        let yaw = Quat::from_rotation_y(self.head_yaw);
        let position = self.head_position() + yaw * self.reach[hand.index()];
        Pose::new(from_bevy_vec3(position), from_bevy_quat(yaw))
    }

    fn toggle(&mut self, hand: Handedness) -> DeviceMessage {
        let connected = &mut self.connected[hand.index()];
        *connected = !*connected;
        if *connected {
            DeviceMessage::Connected(DeviceConnected {
                handedness: hand,
                kind: self.kinds[hand.index()],
            })
        } else {
            DeviceMessage::Disconnected(hand)
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<SimulatedRig>();
    app.add_message::<DeviceMessage>();

    app.add_systems(Startup, connect_both_hands);
    app.add_systems(
        Update,
        (
            toggle_devices,
            apply_device_messages,
            (steer_head, reach_right_hand, publish_poses).chain(),
            forward_select_squeeze,
        )
            .chain()
            .in_set(XrSet::Devices),
    );
}

fn connect_both_hands(mut rig: ResMut<SimulatedRig>, mut messages: MessageWriter<DeviceMessage>) {
    for hand in Handedness::ALL {
        if !rig.connected[hand.index()] {
            messages.write(rig.toggle(hand));
        }
    }
}

fn toggle_devices(
    actions: Res<ActionState<InputAction>>,
    mut rig: ResMut<SimulatedRig>,
    mut messages: MessageWriter<DeviceMessage>,
) {
    if actions.just_pressed(&InputAction::ToggleLeftHand) {
        messages.write(rig.toggle(Handedness::Left));
    }
    if actions.just_pressed(&InputAction::ToggleRightHand) {
        messages.write(rig.toggle(Handedness::Right));
    }
    if actions.just_pressed(&InputAction::SwapRightDevice) {
        let index = Handedness::Right.index();
        rig.kinds[index] = match rig.kinds[index] {
            DeviceKind::Controller => DeviceKind::TrackedHand,
            DeviceKind::TrackedHand => DeviceKind::Controller,
        };
        // Re-plug so the new device replaces the old one.
        if rig.connected[index] {
            messages.write(DeviceMessage::Connected(DeviceConnected {
                handedness: Handedness::Right,
                kind: rig.kinds[index],
            }));
        }
    }
}

fn apply_device_messages(mut messages: MessageReader<DeviceMessage>, mut input: ResMut<XrInput>) {
    for message in messages.read() {
        match *message {
            DeviceMessage::Connected(event) => {
                info!("{:?} {:?} connected", event.handedness, event.kind);
                input.0.on_connect(event);
            }
            DeviceMessage::Disconnected(hand) => {
                info!("{hand:?} disconnected");
                input.0.on_disconnect(hand);
            }
        }
    }
}

fn steer_head(actions: Res<ActionState<InputAction>>, mut rig: ResMut<SimulatedRig>) {
    if !actions.pressed(&InputAction::LookEnabled) {
        return;
    }
    let look = actions.axis_pair(&InputAction::Look);
    rig.head_yaw -= look.x * LOOK_SENSITIVITY;
    rig.head_pitch = (rig.head_pitch - look.y * LOOK_SENSITIVITY).clamp(-FRAC_PI_2, FRAC_PI_2);
}

fn reach_right_hand(
    actions: Res<ActionState<InputAction>>,
    time: Res<Time>,
    mut rig: ResMut<SimulatedRig>,
) {
    let plane = actions.axis_pair(&InputAction::RightReach);
    let mut depth = 0.0;
    if actions.pressed(&InputAction::ReachForward) {
        depth -= 1.0;
    }
    if actions.pressed(&InputAction::ReachBack) {
        depth += 1.0;
    }

    let step = Vec3::new(plane.x, plane.y, depth) * REACH_SPEED * time.delta_secs();
    let reach = &mut rig.reach[Handedness::Right.index()];
    *reach = (*reach + step).clamp_length_max(MAX_REACH);
}

/// Write this frame's viewer, grip and gamepad state into the host.
fn publish_poses(
    actions: Res<ActionState<InputAction>>,
    rig: Res<SimulatedRig>,
    mut session: ResMut<XrSession>,
) {
    session.0.set_viewer_pose(Some(rig.viewer_pose()));
    for hand in Handedness::ALL {
        if rig.connected[hand.index()] {
            session.0.set_grip_pose(hand, Some(rig.grip_pose(hand)));
            session.0.set_gamepad(hand, Some(gamepad_snapshot(&actions, hand)));
        } else {
            session.0.set_grip_pose(hand, None);
            session.0.set_gamepad(hand, None);
        }
    }
}

fn gamepad_snapshot(actions: &ActionState<InputAction>, hand: Handedness) -> GamepadSnapshot {
    let (stick, trigger, squeeze) = match hand {
        Handedness::Left => (
            InputAction::LeftStick,
            InputAction::LeftTrigger,
            InputAction::LeftSqueeze,
        ),
        Handedness::Right => (
            InputAction::RightStick,
            InputAction::RightTrigger,
            InputAction::RightSqueeze,
        ),
    };
    let axes = actions.axis_pair(&stick);
    // Pushing the stick forward reads as negative y on XR gamepads.
    let snapshot = GamepadSnapshot::standard()
        .with_thumbstick(axes.x, -axes.y)
        .with_pressed(GamepadButton::Trigger, actions.pressed(&trigger))
        .with_pressed(GamepadButton::Squeeze, actions.pressed(&squeeze));

    match hand {
        Handedness::Left => snapshot,
        Handedness::Right => snapshot
            .with_pressed(GamepadButton::A, actions.pressed(&InputAction::ButtonA))
            .with_pressed(GamepadButton::B, actions.pressed(&InputAction::ButtonB)),
    }
}

fn forward_select_squeeze(actions: Res<ActionState<InputAction>>, mut input: ResMut<XrInput>) {
    for hand in Handedness::ALL {
        let (trigger, squeeze) = match hand {
            Handedness::Left => (InputAction::LeftTrigger, InputAction::LeftSqueeze),
            Handedness::Right => (InputAction::RightTrigger, InputAction::RightSqueeze),
        };
        if actions.just_pressed(&trigger) {
            input.0.select_start(hand);
        }
        if actions.just_released(&trigger) {
            input.0.select_end(hand);
        }
        if actions.just_pressed(&squeeze) {
            input.0.squeeze_start(hand);
        }
        if actions.just_released(&squeeze) {
            input.0.squeeze_end(hand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_alternates_connect_and_disconnect() {
        let mut rig = SimulatedRig::default();
        assert!(matches!(
            rig.toggle(Handedness::Left),
            DeviceMessage::Connected(DeviceConnected {
                handedness: Handedness::Left,
                kind: DeviceKind::Controller,
            })
        ));
        assert_eq!(
            rig.toggle(Handedness::Left),
            DeviceMessage::Disconnected(Handedness::Left)
        );
    }

    #[test]
    fn grips_follow_head_yaw() {
        let rig = SimulatedRig {
            head_yaw: FRAC_PI_2,
            ..default()
        };
        let grip = rig.grip_pose(Handedness::Right);
        // Right hand ahead of the head; a quarter turn left puts +X reach at -Z.
        assert!((grip.position.z - -0.2).abs() < 1.0e-5);
        assert!((grip.position.y - (EYE_HEIGHT - 0.4)).abs() < 1.0e-5);
    }
}
