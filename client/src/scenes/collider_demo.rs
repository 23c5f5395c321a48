//! Collider demo: per-hand enter/stay/exit feedback, catch-the-ball, and
//! toggle buttons bound to the locomotion settings.

use bevy::prelude::*;
use xr_input::{
    CollisionPhase, FlyingMethod, Geometry, HandSide, Handedness, Pose, TargetDesc, TargetId,
    TargetQuery, UiState, math::yaw_rotation,
};

use super::{
    ButtonClicked, GalleryScene, SceneEntity, SceneLogic, TargetVisual, spawn_button,
    spawn_solid, to_xr,
};
use crate::session::{HandCollision, SceneEvents, SceneTargets, XrInput, XrSession};

const BLOCK_COLOR: Color = Color::srgb(0.545, 0.471, 0.427);
const RIGHT_ENTER_COLOR: Color = Color::srgb(0.463, 0.745, 0.816);
const RIGHT_STAY_COLOR: Color = Color::srgb(0.969, 0.796, 0.082);
const RIGHT_EXIT_COLOR: Color = Color::srgb(0.961, 0.365, 0.243);
const LEFT_ENTER_COLOR: Color = Color::srgb(0.922, 0.294, 0.596);
const LEFT_STAY_COLOR: Color = Color::srgb(0.949, 0.427, 0.976);
const LEFT_EXIT_COLOR: Color = Color::srgb(0.318, 0.345, 0.733);
/// Shown while a hand rests in a block without pulling the trigger.
const TRIGGER_HINT_COLOR: Color = Color::srgb(0.529, 0.557, 0.533);
const BALL_IDLE_COLOR: Color = Color::srgb(0.204, 0.596, 0.859);
const BALL_IN_GAME_COLOR: Color = Color::srgb(0.725, 0.945, 0.549);

const CATCH_BALL_HOME: Vec3 = Vec3::new(0.0, 1.0, -2.0);
/// Where the ball jumps to after each catch, visited in order.
const CATCH_SPOTS: [Vec3; 6] = [
    Vec3::new(1.2, 1.3, -1.6),
    Vec3::new(-1.0, 0.8, -2.4),
    Vec3::new(0.4, 1.6, -1.2),
    Vec3::new(-1.6, 1.1, -0.8),
    Vec3::new(1.8, 0.7, -2.2),
    Vec3::new(-0.3, 1.4, -2.8),
];
/// Catches in one round. The round ends on the next touch.
const ROUND_LENGTH: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Toggle {
    SnapTurn,
    Jump,
    AlwaysFlying,
}

impl Toggle {
    const ALL: [Toggle; 3] = [Toggle::SnapTurn, Toggle::Jump, Toggle::AlwaysFlying];

    fn is_on(self, input: &XrInput) -> bool {
        let settings = input.0.settings();
        match self {
            Toggle::SnapTurn => settings.discrete_rotation,
            Toggle::Jump => settings.jump_enabled,
            Toggle::AlwaysFlying => settings.always_flying,
        }
    }

    fn set(self, input: &mut XrInput, on: bool) {
        match self {
            Toggle::SnapTurn => input.0.set_discrete_rotation(on),
            Toggle::Jump => input.0.set_jump_enabled(on),
            Toggle::AlwaysFlying => input.0.set_always_flying(on),
        }
    }
}

#[derive(Resource, Debug)]
struct ColliderDemo {
    catch_ball: TargetId,
    catches: u32,
    in_game: bool,
    left_block: TargetId,
    right_block: TargetId,
    shared_sphere: TargetId,
    next_scene_button: TargetId,
    toggles: Vec<(TargetId, Toggle)>,
}

impl ColliderDemo {
    /// Hands that recolor `target`, if any.
    fn feedback_side(&self, target: TargetId) -> Option<HandSide> {
        if target == self.left_block {
            Some(HandSide::Left)
        } else if target == self.right_block {
            Some(HandSide::Right)
        } else if target == self.shared_sphere {
            Some(HandSide::Both)
        } else {
            None
        }
    }

    /// Advance the catch game and return where the ball goes next.
    fn on_catch(&mut self) -> Vec3 {
        if !self.in_game {
            self.in_game = true;
            self.catches = 1;
        } else if self.catches >= ROUND_LENGTH {
            info!("round over: {} catches", self.catches);
            self.in_game = false;
            return CATCH_BALL_HOME;
        } else {
            self.catches += 1;
        }
        catch_spot(self.catches)
    }
}

fn catch_spot(catches: u32) -> Vec3 {
    CATCH_SPOTS[catches as usize % CATCH_SPOTS.len()]
}

fn collision_color(hand: Handedness, phase: CollisionPhase, trigger: bool) -> Color {
    match (hand, phase) {
        (Handedness::Right, CollisionPhase::Enter) => RIGHT_ENTER_COLOR,
        (Handedness::Right, CollisionPhase::Stay) if trigger => RIGHT_STAY_COLOR,
        (Handedness::Right, CollisionPhase::Exit) => RIGHT_EXIT_COLOR,
        (Handedness::Left, CollisionPhase::Enter) => LEFT_ENTER_COLOR,
        (Handedness::Left, CollisionPhase::Stay) if trigger => LEFT_STAY_COLOR,
        (Handedness::Left, CollisionPhase::Exit) => LEFT_EXIT_COLOR,
        (_, CollisionPhase::Stay) => TRIGGER_HINT_COLOR,
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GalleryScene::Collider), setup);
    app.add_systems(
        Update,
        (on_hand_collision, on_button_clicked)
            .in_set(SceneLogic)
            .run_if(in_state(GalleryScene::Collider).and(resource_exists::<ColliderDemo>)),
    );
    app.add_systems(OnExit(GalleryScene::Collider), |mut commands: Commands| {
        commands.remove_resource::<ColliderDemo>();
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
    info!("Collider demo setup");

    input.0.set_flying_method(FlyingMethod::Joystick);
    input.0.set_flying_mode(true);
    input.0.set_always_flying(true);
    input.0.set_jump_enabled(false);

    let ball_mesh = meshes.add(Sphere::new(0.1));
    let block_mesh = meshes.add(Cuboid::from_length(0.4));

    let catch_ball = spawn_solid(
        &mut commands,
        &mut targets,
        ball_mesh.clone(),
        materials.add(BALL_IDLE_COLOR),
        TargetDesc::new(to_xr(CATCH_BALL_HOME), Geometry::Ball { radius: 0.1 }),
    );
    input.0.add_collider_target(catch_ball, HandSide::Right);

    let left_block = spawn_solid(
        &mut commands,
        &mut targets,
        block_mesh.clone(),
        materials.add(BLOCK_COLOR),
        TargetDesc::new(
            to_xr(Vec3::new(4.0, 0.7, -0.4)),
            Geometry::Cuboid {
                half_extents: to_xr(Vec3::splat(0.2)),
            },
        ),
    );
    let right_block = spawn_solid(
        &mut commands,
        &mut targets,
        block_mesh,
        materials.add(BLOCK_COLOR),
        TargetDesc::new(
            to_xr(Vec3::new(4.0, 0.7, 0.4)),
            Geometry::Cuboid {
                half_extents: to_xr(Vec3::splat(0.2)),
            },
        ),
    );
    let shared_sphere = spawn_solid(
        &mut commands,
        &mut targets,
        ball_mesh,
        materials.add(BLOCK_COLOR),
        TargetDesc::new(to_xr(Vec3::new(4.0, 0.7, 1.0)), Geometry::Ball { radius: 0.1 }),
    );

    let next_scene_button = spawn_button(
        &mut commands,
        &mut targets,
        &mut meshes,
        &mut materials,
        Pose::new(to_xr(Vec3::new(0.0, 1.0, 2.0)), yaw_rotation(std::f32::consts::PI)),
        UiState::Idle,
        Color::srgb(0.612, 0.776, 0.608),
    );

    let mut toggles = Vec::new();
    for (i, toggle) in Toggle::ALL.into_iter().enumerate() {
        let state = if toggle.is_on(&input) {
            UiState::On
        } else {
            UiState::Off
        };
        let id = spawn_button(
            &mut commands,
            &mut targets,
            &mut meshes,
            &mut materials,
            Pose::from_position(to_xr(Vec3::new(-1.5, 1.5 - 0.25 * i as f32, -1.5))),
            state,
            Color::WHITE,
        );
        toggles.push((id, toggle));
    }

    let mut shared = vec![left_block, right_block, shared_sphere, next_scene_button];
    shared.extend(toggles.iter().map(|(id, _)| *id));
    input.0.add_collider_targets(shared, HandSide::Both);
    input.0.set_callbacks(events.callbacks());

    commands.insert_resource(ColliderDemo {
        catch_ball,
        catches: 0,
        in_game: false,
        left_block,
        right_block,
        shared_sphere,
        next_scene_button,
        toggles,
    });
}

fn on_hand_collision(
    mut collisions: MessageReader<HandCollision>,
    mut demo: ResMut<ColliderDemo>,
    mut targets: ResMut<SceneTargets>,
    mut session: ResMut<XrSession>,
    input: Res<XrInput>,
    visuals: Query<(&TargetVisual, &MeshMaterial3d<StandardMaterial>), With<SceneEntity>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for collision in collisions.read() {
        let mut recolor = |target: TargetId, color: Color| {
            for (visual, material) in &visuals {
                if visual.0 != target {
                    continue;
                }
                if let Some(material) = materials.get_mut(&material.0) {
                    material.base_color = color;
                }
            }
        };

        if collision.target == demo.catch_ball
            && collision.hand == Handedness::Right
            && collision.phase == CollisionPhase::Enter
        {
            let next = demo.on_catch();
            targets.0.set_translation(demo.catch_ball, to_xr(next));
            let color = if demo.in_game {
                BALL_IN_GAME_COLOR
            } else {
                BALL_IDLE_COLOR
            };
            recolor(demo.catch_ball, color);
            input
                .0
                .vibrate(Handedness::Right, &mut session.0, Some(0.6), None);
            continue;
        }

        let Some(side) = demo.feedback_side(collision.target) else {
            continue;
        };
        if side.includes(collision.hand) {
            let trigger = input.0.trigger(collision.hand);
            recolor(
                collision.target,
                collision_color(collision.hand, collision.phase, trigger),
            );
        }
    }
}

fn on_button_clicked(
    mut clicks: MessageReader<ButtonClicked>,
    demo: Res<ColliderDemo>,
    mut input: ResMut<XrInput>,
    mut targets: ResMut<SceneTargets>,
    mut next: ResMut<NextState<GalleryScene>>,
) {
    for click in clicks.read() {
        if click.target == demo.next_scene_button {
            next.set(GalleryScene::Collider.next());
            continue;
        }
        let Some(&(id, toggle)) = demo.toggles.iter().find(|(id, _)| *id == click.target) else {
            continue;
        };
        let on = !toggle.is_on(&input);
        toggle.set(&mut input, on);
        let state = if on { UiState::On } else { UiState::Off };
        targets.0.set_ui_state(id, state);
        info!("{toggle:?} -> {on} ({:?} hand)", click.hand);
    }
}
