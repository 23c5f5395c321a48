//! Desktop bindings for the simulated XR devices.
//!
//! Keyboard, mouse and a gamepad stand in for the two motion controllers:
//! - left thumbstick: WASD or the left gamepad stick
//! - right thumbstick: IJKL or the right gamepad stick
//! - head look: mouse motion while the right mouse button is held
//! - right hand reach: arrow keys (plane) and PageUp/PageDown (depth)

use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    #[actionlike(DualAxis)]
    LeftStick,
    #[actionlike(DualAxis)]
    RightStick,
    #[actionlike(DualAxis)]
    Look,
    LookEnabled,
    #[actionlike(DualAxis)]
    RightReach,
    ReachForward,
    ReachBack,
    LeftTrigger,
    RightTrigger,
    LeftSqueeze,
    RightSqueeze,
    ButtonA,
    ButtonB,
    ToggleLeftHand,
    ToggleRightHand,
    SwapRightDevice,
    NextScene,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default()
        .with_dual_axis(InputAction::LeftStick, VirtualDPad::wasd())
        .with_dual_axis(InputAction::LeftStick, GamepadStick::LEFT)
        .with_dual_axis(
            InputAction::RightStick,
            VirtualDPad::new(KeyCode::KeyI, KeyCode::KeyK, KeyCode::KeyJ, KeyCode::KeyL),
        )
        .with_dual_axis(InputAction::RightStick, GamepadStick::RIGHT)
        .with_dual_axis(InputAction::Look, MouseMove::default())
        .with_dual_axis(InputAction::RightReach, VirtualDPad::arrow_keys());

    input_map.insert(InputAction::LookEnabled, MouseButton::Right);
    input_map.insert(InputAction::ReachForward, KeyCode::PageUp);
    input_map.insert(InputAction::ReachBack, KeyCode::PageDown);
    input_map.insert(InputAction::LeftTrigger, KeyCode::KeyQ);
    input_map.insert(InputAction::LeftTrigger, GamepadButton::LeftTrigger2);
    input_map.insert(InputAction::RightTrigger, MouseButton::Left);
    input_map.insert(InputAction::RightTrigger, GamepadButton::RightTrigger2);
    input_map.insert(InputAction::LeftSqueeze, KeyCode::KeyE);
    input_map.insert(InputAction::LeftSqueeze, GamepadButton::LeftTrigger);
    input_map.insert(InputAction::RightSqueeze, KeyCode::KeyU);
    input_map.insert(InputAction::RightSqueeze, GamepadButton::RightTrigger);
    input_map.insert(InputAction::ButtonA, KeyCode::Space);
    input_map.insert(InputAction::ButtonA, GamepadButton::South);
    input_map.insert(InputAction::ButtonB, KeyCode::KeyC);
    input_map.insert(InputAction::ButtonB, GamepadButton::East);
    input_map.insert(InputAction::ToggleLeftHand, KeyCode::F1);
    input_map.insert(InputAction::ToggleRightHand, KeyCode::F2);
    input_map.insert(InputAction::SwapRightDevice, KeyCode::F3);
    input_map.insert(InputAction::NextScene, KeyCode::Tab);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
}
