mod common;

use common::{TICK, clocks, connect, session};
use xr_input::{
    FrameClock, GamepadButton, GamepadSnapshot, Handedness, InputCoordinator, TargetWorld, Vec3,
    XrHost,
    constants::{JUMP_HEIGHT, SNAP_TURN_ANGLE},
    jump_profile,
};

fn viewer_world(host: &impl XrHost) -> Vec3 {
    let viewer = host.viewer_pose().unwrap_or_default();
    host.reference_frame()
        .map(|frame| frame.viewer_world_position(&viewer))
        .unwrap_or_default()
}

#[test]
fn jump_profile_endpoints_and_apex() {
    assert_eq!(jump_profile(0.0, JUMP_HEIGHT), 0.0);
    assert_eq!(jump_profile(1.0, JUMP_HEIGHT), 0.0);
    let apex = (0..=100)
        .map(|i| i as f32 / 100.0)
        .max_by(|a, b| {
            jump_profile(*a, JUMP_HEIGHT)
                .abs()
                .total_cmp(&jump_profile(*b, JUMP_HEIGHT).abs())
        })
        .unwrap_or_default();
    assert!((apex - 0.5).abs() < 1.0e-6);
    assert!((jump_profile(apex, JUMP_HEIGHT).abs() - JUMP_HEIGHT).abs() < 1.0e-6);
}

#[test]
fn one_second_of_full_deflection_snaps_four_times() {
    let mut coordinator = InputCoordinator::new();
    coordinator.set_discrete_rotation(true);
    connect(&mut coordinator, Handedness::Right);
    let mut host = session();
    host.set_gamepad(
        Handedness::Right,
        Some(GamepadSnapshot::standard().with_thumbstick(-1.0, 0.0)),
    );
    let mut world = TargetWorld::new();

    let turns: Vec<f32> = clocks(60)
        .filter_map(|clock| {
            coordinator
                .on_animate(&clock, &mut host, &mut world)
                .locomotion
                .rotation
        })
        .collect();
    assert_eq!(turns.len(), 4);
    assert!(turns.iter().all(|a| (a + SNAP_TURN_ANGLE).abs() < 1.0e-6));
}

#[test]
fn walking_follows_the_turned_head() {
    let mut coordinator = InputCoordinator::new();
    coordinator.set_discrete_rotation(true);
    connect(&mut coordinator, Handedness::Left);
    connect(&mut coordinator, Handedness::Right);
    let mut host = session();
    let mut world = TargetWorld::new();

    // Snap three times to the right: a quarter turn.
    host.set_gamepad(
        Handedness::Right,
        Some(GamepadSnapshot::standard().with_thumbstick(1.0, 0.0)),
    );
    let mut clock = FrameClock::default();
    let mut snaps = 0;
    while snaps < 3 {
        let report = coordinator.on_animate(&clock, &mut host, &mut world);
        snaps += usize::from(report.locomotion.rotation.is_some());
        clock = clock.advanced(TICK);
    }
    host.set_gamepad(Handedness::Right, Some(GamepadSnapshot::standard()));

    let start = viewer_world(&host);
    host.set_gamepad(
        Handedness::Left,
        Some(GamepadSnapshot::standard().with_thumbstick(0.0, -1.0)),
    );
    for _ in 0..10 {
        clock = clock.advanced(TICK);
        coordinator.on_animate(&clock, &mut host, &mut world);
    }
    let walked = viewer_world(&host) - start;

    // Facing +X after turning right from -Z.
    assert!((walked - Vec3::new(0.3, 0.0, 0.0)).norm() < 1.0e-4, "{walked:?}");
}

#[test]
fn jump_through_the_coordinator_lands_where_it_started() {
    let mut coordinator = InputCoordinator::new();
    connect(&mut coordinator, Handedness::Right);
    let mut host = session();
    let mut world = TargetWorld::new();
    let start = viewer_world(&host);

    host.set_gamepad(
        Handedness::Right,
        Some(GamepadSnapshot::standard().with_pressed(GamepadButton::A, true)),
    );
    let mut highest = start.y;
    for clock in clocks(60) {
        coordinator.on_animate(&clock, &mut host, &mut world);
        highest = highest.max(viewer_world(&host).y);
        host.set_gamepad(Handedness::Right, Some(GamepadSnapshot::standard()));
    }

    assert!(!coordinator.locomotion().is_jumping());
    assert!((highest - start.y - JUMP_HEIGHT).abs() < 0.01);
    assert!((viewer_world(&host) - start).norm() < 1.0e-4);
}

#[test]
fn scene_reset_stops_a_jump_mid_air() {
    let mut coordinator = InputCoordinator::new();
    connect(&mut coordinator, Handedness::Right);
    let mut host = session();
    let mut world = TargetWorld::new();
    host.set_gamepad(
        Handedness::Right,
        Some(GamepadSnapshot::standard().with_pressed(GamepadButton::A, true)),
    );
    for clock in clocks(10) {
        coordinator.on_animate(&clock, &mut host, &mut world);
    }
    assert!(coordinator.locomotion().is_jumping());

    coordinator.reset_for_scene(&mut host);
    assert!(!coordinator.locomotion().is_jumping());
    assert!(!coordinator.locomotion().is_flying());
    assert_eq!(coordinator.locomotion().rotation_speed(), 0.0);
}
