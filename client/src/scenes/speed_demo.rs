//! Speed demo: a speedometer driven by the right wrist speed, and balls that
//! can be grabbed with the trigger and thrown.

use bevy::prelude::*;
use xr_input::{
    CollisionPhase, Geometry, HandSide, Handedness, Pose, TargetDesc, TargetId, UiState,
    math::yaw_rotation,
};

use super::{ButtonClicked, GalleryScene, SceneEntity, SceneLogic, spawn_button, spawn_solid, to_xr};
use crate::{
    convert::to_bevy_vec3,
    session::{HandCollision, SceneEvents, SceneTargets, SessionClock, XrInput},
};

const SPEEDOMETER_SEGMENTS: usize = 10;
/// Meters per second covered by one lit segment.
const SEGMENT_SPEED: f32 = 0.5;
/// Below this the speedometer stays dark.
const SPEEDOMETER_MIN_SPEED: f32 = 1.0;
const SPEEDOMETER_LIT_COLOR: Color = Color::srgb(1.0, 0.6, 0.0);

const BALL_RADIUS: f32 = 0.1;
const GRAVITY: f32 = 9.8;
/// Resting height of a ball center on the floor.
const FLOOR_HEIGHT: f32 = BALL_RADIUS;
const BOUNCE_DAMPING: f32 = 0.5;
const BOUNCE_FRICTION: f32 = 0.8;
/// Every velocity component below this after a bounce puts the ball to rest.
const REST_SPEED: f32 = 0.1;

const THROW_BALL_HOME: Vec3 = Vec3::new(2.0, 0.8, 0.0);

/// Number of lit speedometer segments for a wrist speed in m/s.
fn lit_segments(speed: f32) -> usize {
    if speed <= SPEEDOMETER_MIN_SPEED {
        return 0;
    }
    ((speed / SEGMENT_SPEED).floor() as usize).min(SPEEDOMETER_SEGMENTS - 1)
}

fn segment_color(index: usize) -> Color {
    let ratio = index as f32 / (SPEEDOMETER_SEGMENTS - 1) as f32;
    Color::srgb(ratio, 1.0 - ratio, 0.0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct FlightStep {
    /// Horizontal distance from the launch point, reported on first touchdown.
    landed: Option<f32>,
    rested: bool,
}

/// Scripted ballistic flight with floor bounces.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Flight {
    velocity: Vec3,
    launched_from: Vec3,
    tracking: bool,
}

impl Flight {
    fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            velocity,
            launched_from: position,
            tracking: true,
        }
    }

    fn step(&mut self, position: &mut Vec3, dt: f32) -> FlightStep {
        let mut step = FlightStep::default();
        self.velocity.y -= GRAVITY * dt;
        *position += self.velocity * dt;

        if position.y <= FLOOR_HEIGHT && self.tracking {
            self.tracking = false;
            let travelled = (*position - self.launched_from).with_y(0.0);
            step.landed = Some(travelled.length());
        }

        if position.y < FLOOR_HEIGHT {
            position.y = FLOOR_HEIGHT;
            if self.velocity.y < 0.0 {
                self.velocity.y *= -BOUNCE_DAMPING;
                self.velocity.x *= BOUNCE_FRICTION;
                self.velocity.z *= BOUNCE_FRICTION;
            }
            if self.velocity.abs().max_element() < REST_SPEED {
                self.velocity = Vec3::ZERO;
                step.rested = true;
            }
        }
        step
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BallState {
    Resting,
    Held {
        hand: Handedness,
        last: Vec3,
        velocity: Vec3,
    },
    Flying(Flight),
}

#[derive(Debug)]
struct Ball {
    target: TargetId,
    position: Vec3,
    home: Vec3,
    /// Spare balls go back to their stand once they come to rest.
    returns_home: bool,
    state: BallState,
}

#[derive(Resource, Debug)]
struct SpeedDemo {
    segments: Vec<Handle<StandardMaterial>>,
    balls: Vec<Ball>,
    reset_button: TargetId,
    next_scene_button: TargetId,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GalleryScene::Speed), setup);
    app.add_systems(
        Update,
        (update_speedometer, grab_balls, move_balls, on_button_clicked)
            .chain()
            .in_set(SceneLogic)
            .run_if(in_state(GalleryScene::Speed).and(resource_exists::<SpeedDemo>)),
    );
    app.add_systems(OnExit(GalleryScene::Speed), |mut commands: Commands| {
        commands.remove_resource::<SpeedDemo>();
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
    info!("Speed demo setup");

    let segment_mesh = meshes.add(Cuboid::from_length(0.2));
    let mut segments = Vec::with_capacity(SPEEDOMETER_SEGMENTS);
    for i in 0..SPEEDOMETER_SEGMENTS {
        let material = materials.add(segment_color(i));
        commands.spawn((
            SceneEntity,
            Mesh3d(segment_mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(0.0, 0.2 * i as f32, -2.0),
        ));
        segments.push(material);
    }

    commands.spawn((
        SceneEntity,
        Mesh3d(meshes.add(Cuboid::from_length(1.0))),
        MeshMaterial3d(materials.add(Color::srgb_u8(2, 2, 2))),
        Transform::from_xyz(2.0, 0.0, 0.0),
    ));
    commands.spawn((
        SceneEntity,
        Mesh3d(meshes.add(Cuboid::new(0.5, 1.0, 2.0))),
        MeshMaterial3d(materials.add(Color::srgb_u8(2, 2, 2))),
        Transform::from_xyz(-3.0, 0.0, 0.0),
    ));

    let ball_mesh = meshes.add(Sphere::new(BALL_RADIUS));
    let spares = [
        Color::srgb(0.85, 0.25, 0.35),
        Color::srgb(0.3, 0.75, 0.45),
        Color::srgb(0.45, 0.35, 0.9),
    ];
    let mut balls = Vec::new();
    let homes = std::iter::once((THROW_BALL_HOME, Color::srgb_u8(245, 184, 46), false)).chain(
        spares
            .into_iter()
            .enumerate()
            .map(|(i, color)| (Vec3::new(-3.0, 0.6, -1.0 + i as f32), color, true)),
    );
    for (home, color, returns_home) in homes {
        let target = spawn_solid(
            &mut commands,
            &mut targets,
            ball_mesh.clone(),
            materials.add(color),
            TargetDesc::new(to_xr(home), Geometry::Ball { radius: BALL_RADIUS }),
        );
        balls.push(Ball {
            target,
            position: home,
            home,
            returns_home,
            state: BallState::Resting,
        });
    }

    let facing_player = yaw_rotation(-std::f32::consts::FRAC_PI_2);
    let reset_button = spawn_button(
        &mut commands,
        &mut targets,
        &mut meshes,
        &mut materials,
        Pose::new(to_xr(Vec3::new(2.0, 0.6, 1.2)), facing_player),
        UiState::Idle,
        Color::srgb_u8(230, 126, 34),
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

    let mut registered: Vec<TargetId> = balls.iter().map(|ball| ball.target).collect();
    registered.extend([reset_button, next_scene_button]);
    input.0.add_collider_targets(registered, HandSide::Both);
    input.0.set_callbacks(events.callbacks());

    commands.insert_resource(SpeedDemo {
        segments,
        balls,
        reset_button,
        next_scene_button,
    });
}

/// Reads the right wrist speed once per tick.
fn update_speedometer(
    clock: Res<SessionClock>,
    mut input: ResMut<XrInput>,
    demo: Res<SpeedDemo>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(speed) = input.0.speed(Handedness::Right, clock.0.delta_secs()) else {
        return;
    };
    let lit = lit_segments(speed);
    for (i, handle) in demo.segments.iter().enumerate() {
        let Some(material) = materials.get_mut(handle) else {
            continue;
        };
        if i < lit {
            let ratio = i as f32 / (SPEEDOMETER_SEGMENTS - 1) as f32;
            material.base_color = SPEEDOMETER_LIT_COLOR;
            material.emissive = LinearRgba::rgb(ratio * 0.8, (1.0 - ratio) * 0.8, 0.0);
        } else {
            material.base_color = segment_color(i);
            material.emissive = LinearRgba::BLACK;
        }
    }
}

/// A hand touching a resting ball with the trigger held picks it up.
fn grab_balls(
    mut collisions: MessageReader<HandCollision>,
    input: Res<XrInput>,
    mut demo: ResMut<SpeedDemo>,
) {
    for collision in collisions.read() {
        if collision.phase == CollisionPhase::Exit || !input.0.trigger(collision.hand) {
            continue;
        }
        let Some(palm) = input
            .0
            .controller(collision.hand)
            .map(|c| to_bevy_vec3(&c.pose().palm_world()))
        else {
            continue;
        };
        let hand_busy = demo
            .balls
            .iter()
            .any(|b| matches!(b.state, BallState::Held { hand, .. } if hand == collision.hand));
        if hand_busy {
            continue;
        }
        if let Some(ball) = demo
            .balls
            .iter_mut()
            .find(|b| b.target == collision.target && !matches!(b.state, BallState::Held { .. }))
        {
            ball.state = BallState::Held {
                hand: collision.hand,
                last: palm,
                velocity: Vec3::ZERO,
            };
        }
    }
}

fn move_balls(
    clock: Res<SessionClock>,
    input: Res<XrInput>,
    mut demo: ResMut<SpeedDemo>,
    mut targets: ResMut<SceneTargets>,
) {
    let dt = clock.0.delta_secs();
    for ball in &mut demo.balls {
        match ball.state {
            BallState::Resting => {}
            BallState::Held {
                hand,
                last,
                velocity,
            } => {
                let Some(controller) = input.0.controller(hand) else {
                    ball.state = BallState::Flying(Flight::new(ball.position, velocity));
                    continue;
                };
                let palm = to_bevy_vec3(&controller.pose().palm_world());
                let velocity = if dt > 0.0 { (palm - last) / dt } else { velocity };
                ball.position = palm;
                ball.state = if controller.trigger() {
                    BallState::Held {
                        hand,
                        last: palm,
                        velocity,
                    }
                } else {
                    BallState::Flying(Flight::new(palm, velocity))
                };
            }
            BallState::Flying(mut flight) => {
                let step = flight.step(&mut ball.position, dt);
                if let Some(distance) = step.landed {
                    info!("ball landed {distance:.2} m from the throw");
                }
                ball.state = if step.rested {
                    if ball.returns_home {
                        ball.position = ball.home;
                    }
                    BallState::Resting
                } else {
                    BallState::Flying(flight)
                };
            }
        }
        targets.0.set_translation(ball.target, to_xr(ball.position));
    }
}

fn on_button_clicked(
    mut clicks: MessageReader<ButtonClicked>,
    mut demo: ResMut<SpeedDemo>,
    mut targets: ResMut<SceneTargets>,
    mut next: ResMut<NextState<GalleryScene>>,
) {
    for click in clicks.read() {
        if click.target == demo.next_scene_button {
            next.set(GalleryScene::Speed.next());
        } else if click.target == demo.reset_button {
            for ball in demo.balls.iter_mut() {
                ball.position = ball.home;
                ball.state = BallState::Resting;
                targets.0.set_translation(ball.target, to_xr(ball.home));
            }
        }
    }
}
