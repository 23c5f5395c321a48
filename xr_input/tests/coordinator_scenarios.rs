mod common;

use common::{Event, Recorder, clocks, connect, session};
use xr_input::{
    CollisionPhase, FrameClock, Geometry, HandSide, Handedness, InputCoordinator, Pose,
    TargetDesc, TargetId, TargetQuery, TargetWorld, UiState, Vec3,
};

#[test]
fn pre_connect_registrations_flush_in_order() {
    let mut coordinator = InputCoordinator::new();
    let targets = [TargetId(10), TargetId(11), TargetId(12)];
    for target in targets {
        coordinator.add_collider_target(target, HandSide::Left);
    }
    connect(&mut coordinator, Handedness::Left);

    let left = coordinator.controller(Handedness::Left).map(|c| {
        (c.collider().targets().to_vec(), c.pointer().targets().to_vec())
    });
    assert_eq!(left, Some((targets.to_vec(), targets.to_vec())));
}

#[test]
fn backlog_is_registered_before_a_new_target() {
    let mut coordinator = InputCoordinator::new();
    connect(&mut coordinator, Handedness::Right);
    coordinator.add_collider_target(TargetId(1), HandSide::Left);
    coordinator.add_collider_target(TargetId(2), HandSide::Left);
    connect(&mut coordinator, Handedness::Left);
    coordinator.add_collider_target(TargetId(3), HandSide::Both);

    assert_eq!(
        coordinator.targets(Handedness::Left),
        &[TargetId(1), TargetId(2), TargetId(3)]
    );
    assert_eq!(coordinator.targets(Handedness::Right), &[TargetId(3)]);
}

#[test]
fn left_registration_never_leaks_to_the_right_hand() {
    let mut world = TargetWorld::new();
    let t = world.spawn(TargetDesc::new(Vec3::new(-0.3, 1.0, -0.3), Geometry::Ball { radius: 0.1 }));
    let u = world.spawn(TargetDesc::new(Vec3::new(0.3, 1.0, -0.3), Geometry::Ball { radius: 0.1 }));

    let recorder = Recorder::default();
    let mut coordinator = InputCoordinator::new();
    coordinator.set_callbacks(recorder.callbacks());

    coordinator.add_collider_target(t, HandSide::Left);
    connect(&mut coordinator, Handedness::Left);
    connect(&mut coordinator, Handedness::Right);
    coordinator.add_collider_target(u, HandSide::Right);

    assert_eq!(coordinator.targets(Handedness::Left), &[t]);
    assert_eq!(coordinator.targets(Handedness::Right), &[u]);
    let right_pointer = coordinator
        .controller(Handedness::Right)
        .map(|c| c.pointer().targets().to_vec());
    assert_eq!(right_pointer, Some(vec![u]));

    // Both hands overlap both targets; only the registered pairs may fire.
    let mut host = session();
    for hand in Handedness::ALL {
        host.set_grip_pose(hand, Some(Pose::from_position(Vec3::new(0.0, 1.0, -0.3))));
    }
    world.set_translation(t, Vec3::new(-0.05, 1.0, -0.3));
    world.set_translation(u, Vec3::new(0.05, 1.0, -0.3));
    coordinator.on_animate(&FrameClock::default(), &mut host, &mut world);

    assert_eq!(
        recorder.collisions(Handedness::Left),
        vec![(CollisionPhase::Enter, t)]
    );
    assert_eq!(
        recorder.collisions(Handedness::Right),
        vec![(CollisionPhase::Enter, u)]
    );
}

#[test]
fn hand_sweeping_through_a_target_pairs_enter_and_exit() {
    let mut world = TargetWorld::new();
    let ball = world.spawn(TargetDesc::new(Vec3::new(0.0, 1.0, -0.5), Geometry::Ball { radius: 0.1 }));
    let recorder = Recorder::default();
    let mut coordinator = InputCoordinator::new();
    coordinator.set_callbacks(recorder.callbacks());
    connect(&mut coordinator, Handedness::Right);
    coordinator.add_collider_target(ball, HandSide::Right);

    let mut host = session();
    for (i, clock) in clocks(41).enumerate() {
        let x = -1.0 + 0.05 * i as f32;
        host.set_grip_pose(Handedness::Right, Some(Pose::from_position(Vec3::new(x, 1.0, -0.5))));
        coordinator.on_animate(&clock, &mut host, &mut world);
    }

    let phases: Vec<CollisionPhase> = recorder
        .collisions(Handedness::Right)
        .into_iter()
        .map(|(phase, _)| phase)
        .collect();
    let enters = phases.iter().filter(|p| **p == CollisionPhase::Enter).count();
    let exits = phases.iter().filter(|p| **p == CollisionPhase::Exit).count();
    assert_eq!((enters, exits), (1, 1));
    assert_eq!(phases.first(), Some(&CollisionPhase::Enter));
    assert_eq!(phases.last(), Some(&CollisionPhase::Exit));
    assert!(phases[1..phases.len() - 1].iter().all(|p| *p == CollisionPhase::Stay));
}

#[test]
fn pointing_reports_the_nearest_button_and_hover_resets() {
    let mut world = TargetWorld::new();
    let panel = world.spawn(TargetDesc::new(Vec3::new(0.0, 1.0, -1.0), Geometry::Empty));
    let near = world.spawn(
        TargetDesc::new(
            Vec3::new(0.0, -0.5, 0.0),
            Geometry::Cuboid { half_extents: Vec3::new(0.3, 0.3, 0.02) },
        )
        .child_of(panel)
        .with_ui(UiState::Idle),
    );
    let far = world.spawn(
        TargetDesc::new(
            Vec3::new(0.0, -1.0, -0.5),
            Geometry::Cuboid { half_extents: Vec3::new(0.3, 0.3, 0.02) },
        )
        .child_of(panel)
        .with_ui(UiState::Idle),
    );

    let recorder = Recorder::default();
    let mut coordinator = InputCoordinator::new();
    coordinator.set_callbacks(recorder.callbacks());
    connect(&mut coordinator, Handedness::Right);
    coordinator.add_collider_targets([far, near], HandSide::Right);

    // The default pointer goes down-forward at 45 degrees from the grip.
    let mut host = session();
    host.set_grip_pose(Handedness::Right, Some(Pose::from_position(Vec3::new(0.0, 1.5, 0.0))));
    let report = coordinator.on_animate(&FrameClock::default(), &mut host, &mut world);

    let pointed: Vec<Event> = recorder
        .take()
        .into_iter()
        .filter(|e| matches!(e, Event::Pointing(_)))
        .collect();
    assert_eq!(pointed, vec![Event::Pointing(near)]);
    assert_eq!(report.pointer_hits[Handedness::Right.index()].map(|h| h.root), Some(near));

    world.set_ui_state(near, UiState::Hovered);
    host.set_grip_pose(Handedness::Right, Some(Pose::from_position(Vec3::new(5.0, 1.5, 0.0))));
    coordinator.on_animate(&FrameClock::default().advanced(common::TICK), &mut host, &mut world);
    assert_eq!(world.ui_state(near), Some(UiState::Idle));
    assert!(recorder.take().is_empty());
}

#[test]
fn speed_of_a_swung_hand() {
    let mut coordinator = InputCoordinator::new();
    connect(&mut coordinator, Handedness::Left);
    let mut host = session();
    let mut world = TargetWorld::new();
    let mut clocks = clocks(3);

    host.set_grip_pose(Handedness::Left, Some(Pose::from_position(Vec3::new(0.0, 1.0, 0.0))));
    let clock = clocks.next().unwrap();
    coordinator.on_animate(&clock, &mut host, &mut world);
    assert_eq!(coordinator.speed(Handedness::Left, clock.delta_secs()), Some(0.0));

    host.set_grip_pose(Handedness::Left, Some(Pose::from_position(Vec3::new(0.0, 1.0, -0.05))));
    let clock = clocks.next().unwrap();
    coordinator.on_animate(&clock, &mut host, &mut world);
    let speed = coordinator.speed(Handedness::Left, clock.delta_secs()).unwrap();
    assert!((speed - 0.05 / clock.delta_secs()).abs() < 1.0e-3);
    assert_eq!(coordinator.speed(Handedness::Left, clock.delta_secs()), Some(0.0));
    assert_eq!(coordinator.speed(Handedness::Right, clock.delta_secs()), None);
}

#[test]
fn stale_callbacks_are_gone_after_scene_reset() {
    let mut world = TargetWorld::new();
    let ball = world.spawn(TargetDesc::new(Vec3::new(0.0, 1.0, 0.0), Geometry::Ball { radius: 0.1 }));
    let recorder = Recorder::default();
    let mut coordinator = InputCoordinator::new();
    coordinator.set_callbacks(recorder.callbacks());
    connect(&mut coordinator, Handedness::Left);

    let mut host = session();
    coordinator.reset_for_scene(&mut host);
    coordinator.add_collider_target(ball, HandSide::Left);
    host.set_grip_pose(Handedness::Left, Some(Pose::from_position(Vec3::new(0.0, 1.0, 0.0))));
    coordinator.on_animate(&FrameClock::default(), &mut host, &mut world);

    assert!(recorder.take().is_empty());
    assert!(coordinator.controller(Handedness::Left).is_some_and(|c| c.collider().is_colliding(ball)));
}
