//! Movement demo: paired buttons that pick each locomotion setting.
//!
//! Every setting has two buttons stacked on the wall in front of the player.
//! The one matching the live setting shows `On`, its partner `Off`.

use bevy::prelude::*;
use xr_input::{
    FlyingMethod, HandSide, InputCoordinator, LocomotionSettings, Pose, TargetId, TargetQuery,
    UiState, math::yaw_rotation,
};

use super::{ButtonClicked, GalleryScene, SceneLogic, spawn_button, to_xr};
use crate::session::{SceneEvents, SceneTargets, XrInput};

const WALL_Z: f32 = -1.0;
const LOWER_Y: f32 = 0.75;
const UPPER_Y: f32 = 1.0;

/// One value of one locomotion setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Choice {
    FlyingMode(bool),
    Jump(bool),
    FlyingMethod(FlyingMethod),
    AlwaysFlying(bool),
    DiscreteRotation(bool),
}

impl Choice {
    /// `(x, lower, upper)` for each button pair.
    const PAIRS: [(f32, Choice, Choice); 5] = [
        (0.0, Choice::FlyingMode(true), Choice::FlyingMode(false)),
        (-1.0, Choice::Jump(true), Choice::Jump(false)),
        (
            1.0,
            Choice::FlyingMethod(FlyingMethod::Joystick),
            Choice::FlyingMethod(FlyingMethod::Buttons),
        ),
        (-2.0, Choice::AlwaysFlying(true), Choice::AlwaysFlying(false)),
        (2.0, Choice::DiscreteRotation(true), Choice::DiscreteRotation(false)),
    ];

    /// Applied on entering the scene.
    const INITIAL: [Choice; 5] = [
        Choice::FlyingMode(true),
        Choice::Jump(false),
        Choice::FlyingMethod(FlyingMethod::Joystick),
        Choice::AlwaysFlying(false),
        Choice::DiscreteRotation(false),
    ];

    fn apply(self, input: &mut InputCoordinator) {
        match self {
            Choice::FlyingMode(on) => input.set_flying_mode(on),
            Choice::Jump(on) => input.set_jump_enabled(on),
            Choice::FlyingMethod(method) => input.set_flying_method(method),
            Choice::AlwaysFlying(on) => input.set_always_flying(on),
            Choice::DiscreteRotation(on) => input.set_discrete_rotation(on),
        }
    }

    fn is_selected(self, settings: &LocomotionSettings) -> bool {
        match self {
            Choice::FlyingMode(on) => settings.flying_mode_enabled == on,
            Choice::Jump(on) => settings.jump_enabled == on,
            Choice::FlyingMethod(method) => settings.flying_method == method,
            Choice::AlwaysFlying(on) => settings.always_flying == on,
            Choice::DiscreteRotation(on) => settings.discrete_rotation == on,
        }
    }

    fn ui_state(self, settings: &LocomotionSettings) -> UiState {
        if self.is_selected(settings) {
            UiState::On
        } else {
            UiState::Off
        }
    }
}

#[derive(Resource, Debug)]
struct MovementDemo {
    next_scene_button: TargetId,
    choices: Vec<(TargetId, Choice)>,
}

impl MovementDemo {
    fn choice(&self, target: TargetId) -> Option<Choice> {
        self.choices
            .iter()
            .find(|(id, _)| *id == target)
            .map(|(_, choice)| *choice)
    }

    /// Repaint every pair from the live settings.
    fn refresh(&self, settings: &LocomotionSettings, targets: &mut SceneTargets) {
        for &(id, choice) in &self.choices {
            targets.0.set_ui_state(id, choice.ui_state(settings));
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GalleryScene::Movement), setup);
    app.add_systems(
        Update,
        on_button_clicked
            .in_set(SceneLogic)
            .run_if(in_state(GalleryScene::Movement).and(resource_exists::<MovementDemo>)),
    );
    app.add_systems(OnExit(GalleryScene::Movement), |mut commands: Commands| {
        commands.remove_resource::<MovementDemo>();
    });
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut targets: ResMut<SceneTargets>,
    mut input: ResMut<XrInput>,
    events: Res<SceneEvents>,
) {
    info!("Movement demo setup");

    for choice in Choice::INITIAL {
        choice.apply(&mut input.0);
    }
    let settings = *input.0.settings();

    let mut choices = Vec::with_capacity(Choice::PAIRS.len() * 2);
    for (x, lower, upper) in Choice::PAIRS {
        for (y, choice) in [(LOWER_Y, lower), (UPPER_Y, upper)] {
            let id = spawn_button(
                &mut commands,
                &mut targets,
                &mut meshes,
                &mut materials,
                Pose::from_position(to_xr(Vec3::new(x, y, WALL_Z))),
                choice.ui_state(&settings),
                Color::WHITE,
            );
            choices.push((id, choice));
        }
    }

    let next_scene_button = spawn_button(
        &mut commands,
        &mut targets,
        &mut meshes,
        &mut materials,
        Pose::new(to_xr(Vec3::new(0.0, 1.0, 2.0)), yaw_rotation(std::f32::consts::PI)),
        UiState::Idle,
        Color::srgb(0.612, 0.776, 0.608),
    );

    let mut registered: Vec<TargetId> = choices.iter().map(|(id, _)| *id).collect();
    registered.push(next_scene_button);
    input.0.add_collider_targets(registered, HandSide::Both);
    input.0.set_callbacks(events.callbacks());

    commands.insert_resource(MovementDemo {
        next_scene_button,
        choices,
    });
}

fn on_button_clicked(
    mut clicks: MessageReader<ButtonClicked>,
    demo: Res<MovementDemo>,
    mut input: ResMut<XrInput>,
    mut targets: ResMut<SceneTargets>,
    mut next: ResMut<NextState<GalleryScene>>,
) {
    for click in clicks.read() {
        if click.target == demo.next_scene_button {
            next.set(GalleryScene::Movement.next());
            continue;
        }
        let Some(choice) = demo.choice(click.target) else {
            continue;
        };
        choice.apply(&mut input.0);
        demo.refresh(input.0.settings(), &mut targets);
        info!("{choice:?} ({:?} hand)", click.hand);
    }
}
