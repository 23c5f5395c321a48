//! Per-hand proximity collider.
//!
//! Each tick the hand position is tested against every registered target and
//! the result is compared with the state remembered from the previous tick:
//! - false -> true: enter
//! - true -> true:  stay
//! - true -> false: exit
//! - false -> false: nothing
//!
//! Box targets use a per-axis test on world positions; every other target is
//! a sphere whose radius is supplied or derived once from its bounds.

use std::collections::HashMap;

use crate::{
    callbacks::{CollisionCallback, CollisionCallbacks, CollisionPhase},
    constants::DEFAULT_TARGET_RADIUS,
    gamepad::Handedness,
    math::Vec3,
    target::{TargetId, TargetQuery, TargetShape},
};

pub struct Collider {
    owner: Handedness,
    radius: f32,
    targets: Vec<TargetId>,
    /// Overlap state per target. Absent means "not colliding".
    states: HashMap<TargetId, bool>,
    /// Radii derived from target bounds, computed on first use.
    radius_cache: HashMap<TargetId, f32>,
    callbacks: CollisionCallbacks,
    debug: bool,
}

impl Collider {
    pub fn new(owner: Handedness, radius: f32) -> Self {
        Self {
            owner,
            radius,
            targets: Vec::new(),
            states: HashMap::new(),
            radius_cache: HashMap::new(),
            callbacks: CollisionCallbacks::default(),
            debug: false,
        }
    }

    pub fn owner(&self) -> Handedness {
        self.owner
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Log a debug line whenever an event fires with no callback set.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    pub fn is_colliding(&self, target: TargetId) -> bool {
        self.states.get(&target).copied().unwrap_or(false)
    }

    /// Append targets in order, skipping ones already registered.
    pub fn add_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        for target in targets {
            if !self.targets.contains(&target) {
                self.targets.push(target);
            }
        }
    }

    pub fn add_target(&mut self, target: TargetId) {
        self.add_targets([target]);
    }

    /// Remove targets and forget their collision state. Unknown targets are ignored.
    pub fn remove_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        for target in targets {
            self.targets.retain(|&t| t != target);
            self.states.remove(&target);
            self.radius_cache.remove(&target);
        }
    }

    pub fn remove_target(&mut self, target: TargetId) {
        self.remove_targets([target]);
    }

    /// Hand every registered target back, in order, and reset all state.
    pub fn take_targets(&mut self) -> Vec<TargetId> {
        self.states.clear();
        self.radius_cache.clear();
        std::mem::take(&mut self.targets)
    }

    pub fn set_callback(&mut self, phase: CollisionPhase, callback: Option<CollisionCallback>) {
        self.callbacks.set(phase, callback);
    }

    pub fn set_on_enter(&mut self, callback: Option<CollisionCallback>) {
        self.callbacks.on_enter = callback;
    }

    pub fn set_on_stay(&mut self, callback: Option<CollisionCallback>) {
        self.callbacks.on_stay = callback;
    }

    pub fn set_on_exit(&mut self, callback: Option<CollisionCallback>) {
        self.callbacks.on_exit = callback;
    }

    /// Test every target against a hand at `position` (world space) and fire events.
    pub fn update(&mut self, position: Vec3, world: &dyn TargetQuery) {
        for i in 0..self.targets.len() {
            let target = self.targets[i];
            let colliding = self.overlaps(position, target, world);
            let was_colliding = self.is_colliding(target);

            if colliding != was_colliding {
                self.states.insert(target, colliding);
                let phase = if colliding {
                    CollisionPhase::Enter
                } else {
                    CollisionPhase::Exit
                };
                self.fire(phase, target);
            } else if colliding {
                self.fire(CollisionPhase::Stay, target);
            }
        }
    }

    fn overlaps(&mut self, position: Vec3, target: TargetId, world: &dyn TargetQuery) -> bool {
        let (Some(target_position), Some(shape)) = (world.world_position(target), world.shape(target))
        else {
            return false;
        };

        match shape {
            TargetShape::Box { half_extents } => {
                let d = (target_position - position).abs();
                d.x <= half_extents.x && d.y <= half_extents.y && d.z <= half_extents.z
            }
            TargetShape::Sphere { radius } => {
                let target_radius = match radius {
                    Some(r) => r,
                    None => self.cached_radius(target, world),
                };
                (target_position - position).norm() < self.radius + target_radius
            }
        }
    }

    fn cached_radius(&mut self, target: TargetId, world: &dyn TargetQuery) -> f32 {
        *self.radius_cache.entry(target).or_insert_with(|| {
            world
                .bounding_radius(target)
                .filter(|r| *r > 0.0)
                .unwrap_or(DEFAULT_TARGET_RADIUS)
        })
    }

    fn fire(&self, phase: CollisionPhase, target: TargetId) {
        match self.callbacks.slot(phase) {
            Some(callback) => callback(target, self.owner),
            None if self.debug => {
                log::debug!("{:?} hand: no {:?} callback for {:?}", self.owner, phase, target);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target_world::{Geometry, TargetDesc, TargetWorld};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(CollisionPhase, TargetId, Handedness)>>>;

    fn recording_collider(hand: Handedness) -> (Collider, Log) {
        let log: Log = Arc::default();
        let mut collider = Collider::new(hand, 0.05);
        for phase in [CollisionPhase::Enter, CollisionPhase::Stay, CollisionPhase::Exit] {
            let log = log.clone();
            collider.set_callback(
                phase,
                Some(Arc::new(move |t, h| log.lock().unwrap().push((phase, t, h)))),
            );
        }
        (collider, log)
    }

    fn phases(log: &Log) -> Vec<CollisionPhase> {
        log.lock().unwrap().iter().map(|e| e.0).collect()
    }

    #[test]
    fn unchanged_positions_only_produce_stay() {
        let mut world = TargetWorld::new();
        let ball = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let (mut collider, log) = recording_collider(Handedness::Right);
        collider.add_target(ball);

        collider.update(Vec3::new(0.1, 0.0, 0.0), &world);
        collider.update(Vec3::new(0.1, 0.0, 0.0), &world);
        assert_eq!(phases(&log), vec![CollisionPhase::Enter, CollisionPhase::Stay]);
        assert_eq!(log.lock().unwrap()[0].2, Handedness::Right);
    }

    #[test]
    fn no_event_while_apart() {
        let mut world = TargetWorld::new();
        let ball = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let (mut collider, log) = recording_collider(Handedness::Left);
        collider.add_target(ball);

        collider.update(Vec3::new(1.0, 0.0, 0.0), &world);
        collider.update(Vec3::new(1.0, 0.0, 0.0), &world);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn one_overlap_interval_pairs_enter_and_exit() {
        let mut world = TargetWorld::new();
        let ball = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let (mut collider, log) = recording_collider(Handedness::Left);
        collider.add_target(ball);

        for x in [1.0, 0.5, 0.12, 0.05, 0.0, 0.05, 0.12, 0.5, 1.0] {
            collider.update(Vec3::new(x, 0.0, 0.0), &world);
        }
        use CollisionPhase::*;
        assert_eq!(phases(&log), vec![Enter, Stay, Stay, Stay, Stay, Exit]);
    }

    #[test]
    fn box_test_uses_world_positions_per_axis() {
        let mut world = TargetWorld::new();
        let parent = world.spawn(TargetDesc::new(Vec3::new(4.0, 0.0, 0.0), Geometry::Empty));
        let block = world.spawn(
            TargetDesc::new(
                Vec3::new(0.0, 0.7, 0.4),
                Geometry::Cuboid {
                    half_extents: Vec3::repeat(0.2),
                },
            )
            .child_of(parent),
        );
        let (mut collider, log) = recording_collider(Handedness::Right);
        collider.add_target(block);

        // Inside in world space (local position alone would say "far away").
        collider.update(Vec3::new(4.15, 0.7, 0.4), &world);
        assert!(collider.is_colliding(block));
        // Outside along a single axis.
        collider.update(Vec3::new(4.0, 0.95, 0.4), &world);
        assert!(!collider.is_colliding(block));
        assert_eq!(phases(&log), vec![CollisionPhase::Enter, CollisionPhase::Exit]);
    }

    #[test]
    fn missing_callbacks_are_silent() {
        let mut world = TargetWorld::new();
        let ball = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let mut collider = Collider::new(Handedness::Left, 0.05);
        collider.set_debug(true);
        collider.add_target(ball);
        collider.update(Vec3::zeros(), &world);
        assert!(collider.is_colliding(ball));
    }

    #[test]
    fn removal_purges_state_and_ignores_unknown_targets() {
        let mut world = TargetWorld::new();
        let a = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let b = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let (mut collider, log) = recording_collider(Handedness::Left);
        collider.add_targets([a, b, a]);
        assert_eq!(collider.targets(), &[a, b]);

        collider.update(Vec3::zeros(), &world);
        collider.remove_targets([a, TargetId(999)]);
        assert!(!collider.is_colliding(a));
        assert_eq!(collider.targets(), &[b]);

        // Re-adding starts from a clean state: a fresh enter, not a stay.
        collider.add_target(a);
        collider.update(Vec3::zeros(), &world);
        let events = log.lock().unwrap().clone();
        assert_eq!(events.last().map(|e| (e.0, e.1)), Some((CollisionPhase::Enter, a)));
    }

    #[test]
    fn target_that_disappears_from_the_world_exits() {
        let mut world = TargetWorld::new();
        let ball = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let (mut collider, log) = recording_collider(Handedness::Left);
        collider.add_target(ball);
        collider.update(Vec3::zeros(), &world);
        world.remove(ball);
        collider.update(Vec3::zeros(), &world);
        assert_eq!(phases(&log), vec![CollisionPhase::Enter, CollisionPhase::Exit]);
    }
}
