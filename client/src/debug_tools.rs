//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (recommended: `#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin,
    SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use xr_input::Handedness;

use crate::{
    convert::{to_bevy_quat, to_bevy_vec3},
    session::{XrInput, XrSet},
};

const AXIS_LENGTH: f32 = 0.08;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        LogDiagnosticsPlugin::default(),
    ));

    app.add_systems(Startup, enable_input_debug);
    app.add_systems(Update, draw_hand_helpers.after(XrSet::Tick));
}

fn enable_input_debug(mut input: ResMut<XrInput>) {
    input.0.set_debug(true);
}

/// Wrist axes and palm point of every connected hand, plus the head basis.
fn draw_hand_helpers(input: Res<XrInput>, mut gizmos: Gizmos) {
    for hand in Handedness::ALL {
        let Some(controller) = input.0.controller(hand) else {
            continue;
        };
        if !controller.helpers_visible() || !controller.pose().is_tracked() {
            continue;
        }
        let wrist = controller.pose().wrist_world();
        gizmos.axes(
            Transform::from_translation(to_bevy_vec3(&wrist.position))
                .with_rotation(to_bevy_quat(&wrist.orientation)),
            AXIS_LENGTH,
        );
        gizmos.sphere(
            to_bevy_vec3(&controller.pose().palm_world()),
            0.01,
            Color::srgb(0.9, 0.9, 0.3),
        );
    }

    let head = input.0.head();
    if head.is_tracked() {
        let ahead = to_bevy_vec3(&(head.position + head.forward));
        gizmos.arrow(ahead, ahead + to_bevy_vec3(&head.right) * 0.2, Color::srgb(1.0, 0.2, 0.2));
        gizmos.arrow(ahead, ahead + to_bevy_vec3(&head.up) * 0.2, Color::srgb(0.2, 1.0, 0.2));
    }
}
