//! Demo scenes and the plumbing they share.
//!
//! A scene spawns its targets into [`SceneTargets`], registers them with the
//! coordinator and installs the [`SceneEvents`] callbacks. Leaving a scene
//! despawns its entities and resets the coordinator.

mod collider_demo;
mod movement_demo;
mod speed_demo;

use bevy::{color::Luminance, prelude::*};
use leafwing_input_manager::prelude::ActionState;
use xr_input::{
    Geometry, Handedness, Pose, TargetDesc, TargetId, TargetQuery, UiState, Vec3 as XrVec3,
};

use crate::{
    convert::{from_bevy_vec3, pose_to_transform},
    input::InputAction,
    session::{LastFrameReport, PointedAt, SceneTargets, XrInput, XrSession, XrSet},
};

#[derive(States, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GalleryScene {
    #[default]
    Collider,
    Speed,
    Movement,
}

impl GalleryScene {
    fn next(self) -> Self {
        match self {
            GalleryScene::Collider => GalleryScene::Speed,
            GalleryScene::Speed => GalleryScene::Movement,
            GalleryScene::Movement => GalleryScene::Collider,
        }
    }
}

/// Despawned when the scene is left.
#[derive(Component, Debug)]
pub struct SceneEntity;

/// Mirrors the world pose of a target onto the entity's transform.
#[derive(Component, Debug)]
pub struct TargetVisual(pub TargetId);

/// A pointer-driven button. `root` carries the UI state; the entity shows it.
#[derive(Component, Debug)]
pub struct UiButton {
    pub root: TargetId,
    pub idle: Color,
}

/// A trigger press while pointing at a UI button.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonClicked {
    pub target: TargetId,
    pub hand: Handedness,
}

/// Systems that react to the tick. Target poses are mirrored after them.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneLogic;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<GalleryScene>();
    app.add_message::<ButtonClicked>();

    app.configure_sets(Update, SceneLogic.after(XrSet::Dispatch));
    app.add_systems(
        Update,
        (
            (hover_ui_targets, click_buttons).in_set(SceneLogic),
            cycle_scene,
            (sync_target_visuals, paint_ui_buttons).after(SceneLogic),
        ),
    );
    app.add_systems(OnExit(GalleryScene::Collider), teardown);
    app.add_systems(OnExit(GalleryScene::Speed), teardown);
    app.add_systems(OnExit(GalleryScene::Movement), teardown);

    app.add_plugins((collider_demo::plugin, movement_demo::plugin, speed_demo::plugin));
}

fn cycle_scene(
    actions: Res<ActionState<InputAction>>,
    scene: Res<State<GalleryScene>>,
    mut next: ResMut<NextState<GalleryScene>>,
) {
    if actions.just_pressed(&InputAction::NextScene) {
        let target = scene.get().next();
        info!("switching to {target:?}");
        next.set(target);
    }
}

fn teardown(
    mut commands: Commands,
    entities: Query<Entity, With<SceneEntity>>,
    mut targets: ResMut<SceneTargets>,
    mut session: ResMut<XrSession>,
    mut input: ResMut<XrInput>,
) {
    for entity in &entities {
        commands.entity(entity).despawn();
    }
    targets.0.clear();
    input.0.reset_for_scene(&mut session.0);
}

/// Hover or select UI targets under a pointer. Pinned toggle states stay.
fn hover_ui_targets(
    mut pointed: MessageReader<PointedAt>,
    input: Res<XrInput>,
    mut targets: ResMut<SceneTargets>,
) {
    for PointedAt { target } in pointed.read().copied() {
        let Some(state) = targets.0.ui_state(target) else {
            continue;
        };
        if state.is_pinned() {
            continue;
        }
        let selecting = Handedness::ALL.into_iter().any(|hand| {
            input.0.trigger(hand)
                && input
                    .0
                    .pointer_hit(hand)
                    .is_some_and(|hit| hit.root == target)
        });
        let state = if selecting {
            UiState::Selected
        } else {
            UiState::Hovered
        };
        targets.0.set_ui_state(target, state);
    }
}

fn click_buttons(
    actions: Res<ActionState<InputAction>>,
    report: Res<LastFrameReport>,
    targets: Res<SceneTargets>,
    mut clicks: MessageWriter<ButtonClicked>,
) {
    for (hand, trigger) in [
        (Handedness::Left, InputAction::LeftTrigger),
        (Handedness::Right, InputAction::RightTrigger),
    ] {
        if !actions.just_pressed(&trigger) {
            continue;
        }
        let Some(hit) = report.0.pointer_hits[hand.index()] else {
            continue;
        };
        if targets.0.ui_state(hit.root).is_some() {
            clicks.write(ButtonClicked {
                target: hit.root,
                hand,
            });
        }
    }
}

fn sync_target_visuals(
    targets: Res<SceneTargets>,
    mut visuals: Query<(&TargetVisual, &mut Transform)>,
) {
    for (visual, mut transform) in &mut visuals {
        if let Some(pose) = targets.0.world_pose(visual.0) {
            let scale = transform.scale;
            *transform = pose_to_transform(&pose).with_scale(scale);
        }
    }
}

fn paint_ui_buttons(
    targets: Res<SceneTargets>,
    buttons: Query<(&UiButton, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (button, material) in &buttons {
        let Some(state) = targets.0.ui_state(button.root) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = ui_color(state, button.idle);
        }
    }
}

fn ui_color(state: UiState, idle: Color) -> Color {
    match state {
        UiState::Idle => idle,
        UiState::Hovered => idle.lighter(0.2),
        UiState::Selected => Color::srgb(0.95, 0.8, 0.2),
        UiState::On => Color::srgb(0.35, 0.8, 0.4),
        UiState::Off => Color::srgb(0.8, 0.3, 0.3),
    }
}

// ---------------------------------------------------------------------
// Spawn helpers shared by the scenes
// ---------------------------------------------------------------------

fn to_xr(v: Vec3) -> XrVec3 {
    from_bevy_vec3(v)
}

/// Spawn a solid target and its visual.
fn spawn_solid(
    commands: &mut Commands,
    targets: &mut SceneTargets,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    desc: TargetDesc,
) -> TargetId {
    let transform = pose_to_transform(&desc.local);
    let id = targets.0.spawn(desc);
    commands.spawn((
        SceneEntity,
        TargetVisual(id),
        Mesh3d(mesh),
        MeshMaterial3d(material),
        transform,
    ));
    id
}

/// Spawn a button: an interactive group with one flat plate as its only part.
fn spawn_button(
    commands: &mut Commands,
    targets: &mut SceneTargets,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    pose: Pose,
    state: UiState,
    idle: Color,
) -> TargetId {
    const PLATE_HALF_EXTENTS: Vec3 = Vec3::new(0.2, 0.08, 0.02);

    let root = targets.0.spawn(
        TargetDesc::new(pose.position, Geometry::Empty)
            .with_local_pose(pose)
            .with_ui(state),
    );
    let plate = targets.0.spawn(
        TargetDesc::new(
            XrVec3::zeros(),
            Geometry::Cuboid {
                half_extents: to_xr(PLATE_HALF_EXTENTS),
            },
        )
        .part_of(root),
    );
    commands.spawn((
        SceneEntity,
        TargetVisual(plate),
        UiButton { root, idle },
        Mesh3d(meshes.add(Cuboid::from_size(PLATE_HALF_EXTENTS * 2.0))),
        MeshMaterial3d(materials.add(ui_color(state, idle))),
        pose_to_transform(&pose),
    ));
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenes_cycle() {
        assert_eq!(GalleryScene::Collider.next(), GalleryScene::Speed);
        assert_eq!(GalleryScene::Speed.next(), GalleryScene::Movement);
        assert_eq!(GalleryScene::Movement.next(), GalleryScene::Collider);
    }

    #[test]
    fn pinned_states_have_their_own_colors() {
        let idle = Color::srgb(0.1, 0.2, 0.3);
        assert_eq!(ui_color(UiState::Idle, idle), idle);
        assert_ne!(ui_color(UiState::On, idle), ui_color(UiState::Off, idle));
    }
}
