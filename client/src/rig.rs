//! Player rig: the camera rides the tracked head, hand spheres ride the wrists,
//! and pointer rays are drawn as gizmos.

use bevy::{core_pipeline::tonemapping::Tonemapping, prelude::*};
use xr_input::{Handedness, constants::HAND_COLLIDER_RADIUS};

use crate::{
    convert::{pose_to_transform, to_bevy_quat, to_bevy_vec3},
    session::{XrInput, XrSet},
};

/// Ray length when nothing is under the pointer.
const IDLE_RAY_LENGTH: f32 = 1.0;

#[derive(Component, Debug)]
pub struct HandVisual(pub Handedness);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, (spawn_camera, spawn_hands));
    app.add_systems(
        Update,
        (follow_head, follow_hands, draw_pointer_rays).after(XrSet::Tick),
    );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Tonemapping::AcesFitted,
        Transform::from_xyz(0.0, 1.6, 0.0),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            falloff: FogFalloff::Linear {
                start: 20.0,
                end: 80.0,
            },
            ..default()
        },
    ));
}

fn spawn_hands(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(HAND_COLLIDER_RADIUS));
    for (hand, color) in [
        (Handedness::Left, Color::srgb(0.3, 0.6, 1.0)),
        (Handedness::Right, Color::srgb(1.0, 0.5, 0.3)),
    ] {
        commands.spawn((
            HandVisual(hand),
            Mesh3d(mesh.clone()),
            MeshMaterial3d(materials.add(color)),
            Transform::default(),
            Visibility::Hidden,
        ));
    }
}

fn follow_head(input: Res<XrInput>, mut camera: Single<&mut Transform, With<Camera3d>>) {
    let head = input.0.head();
    if !head.is_tracked() {
        return;
    }
    camera.translation = to_bevy_vec3(&head.position);
    camera.rotation = to_bevy_quat(&head.orientation);
}

fn follow_hands(
    input: Res<XrInput>,
    mut hands: Query<(&HandVisual, &mut Transform, &mut Visibility)>,
) {
    for (visual, mut transform, mut visibility) in &mut hands {
        let Some(controller) = input.0.controller(visual.0) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        if !controller.helpers_visible() || !controller.pose().is_tracked() {
            *visibility = Visibility::Hidden;
            continue;
        }
        *transform = pose_to_transform(controller.pose().wrist_world());
        *visibility = Visibility::Visible;
    }
}

fn draw_pointer_rays(input: Res<XrInput>, mut gizmos: Gizmos) {
    for hand in Handedness::ALL {
        let Some(controller) = input.0.controller(hand) else {
            continue;
        };
        if !controller.pointer_active() || !controller.pose().is_tracked() {
            continue;
        }
        let origin = to_bevy_vec3(&controller.pose().pointer_origin());
        let direction = to_bevy_vec3(&controller.pose().pointer_direction());
        let length = controller
            .pointer()
            .last_hit()
            .map_or(IDLE_RAY_LENGTH, |hit| hit.distance);
        let color = if controller.trigger() {
            Color::srgb(1.0, 0.9, 0.2)
        } else {
            Color::srgb(0.7, 0.7, 0.7)
        };
        gizmos.line(origin, origin + direction * length, color);
    }
}
