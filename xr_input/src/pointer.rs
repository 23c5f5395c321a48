//! Ray pointer attached to a hand.

use crate::{
    callbacks::PointingCallback,
    math::Vec3,
    target::{TargetId, TargetQuery, UiState},
};

/// Nearest hit of the latest cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerHit {
    /// The logical interactive object reported to `on_pointing`.
    pub root: TargetId,
    /// The primitive the ray actually hit.
    pub target: TargetId,
    pub distance: f32,
}

#[derive(Default)]
pub struct PointerCaster {
    targets: Vec<TargetId>,
    on_pointing: Option<PointingCallback>,
    last_hit: Option<PointerHit>,
}

impl PointerCaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    pub fn last_hit(&self) -> Option<PointerHit> {
        self.last_hit
    }

    pub fn add_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        for target in targets {
            if !self.targets.contains(&target) {
                self.targets.push(target);
            }
        }
    }

    pub fn remove_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        for target in targets {
            self.targets.retain(|&t| t != target);
            if self.last_hit.is_some_and(|hit| hit.root == target) {
                self.last_hit = None;
            }
        }
    }

    pub fn take_targets(&mut self) -> Vec<TargetId> {
        self.last_hit = None;
        std::mem::take(&mut self.targets)
    }

    pub fn set_on_pointing(&mut self, callback: Option<PointingCallback>) {
        self.on_pointing = callback;
    }

    /// Reset transient UI states, then report the nearest target along the ray.
    ///
    /// At most one `on_pointing` call per cast; none when nothing is hit.
    pub fn cast(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        world: &mut dyn TargetQuery,
    ) -> Option<PointerHit> {
        for &target in &self.targets {
            if let Some(state) = world.ui_state(target) {
                if !state.is_pinned() && state != UiState::Idle {
                    world.set_ui_state(target, UiState::Idle);
                }
            }
        }

        self.last_hit = world
            .cast_ray(origin, direction, &self.targets)
            .first()
            .map(|hit| PointerHit {
                root: world.logical_root(hit.target),
                target: hit.target,
                distance: hit.distance,
            });

        if let (Some(hit), Some(callback)) = (self.last_hit, &self.on_pointing) {
            callback(hit.root);
        }
        self.last_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target_world::{Geometry, TargetDesc, TargetWorld};
    use std::sync::{Arc, Mutex};

    fn ball(world: &mut TargetWorld, z: f32) -> TargetId {
        world.spawn(TargetDesc::new(
            Vec3::new(0.0, 0.0, z),
            Geometry::Ball { radius: 0.25 },
        ))
    }

    fn recording(pointer: &mut PointerCaster) -> Arc<Mutex<Vec<TargetId>>> {
        let seen: Arc<Mutex<Vec<TargetId>>> = Arc::default();
        let sink = seen.clone();
        pointer.set_on_pointing(Some(Arc::new(move |t| sink.lock().unwrap().push(t))));
        seen
    }

    #[test]
    fn nearest_target_wins() {
        let mut world = TargetWorld::new();
        let far = ball(&mut world, -5.0);
        let near = ball(&mut world, -2.0);
        let mut pointer = PointerCaster::new();
        pointer.add_targets([far, near]);
        let seen = recording(&mut pointer);

        let hit = pointer.cast(Vec3::zeros(), -Vec3::z(), &mut world);
        assert_eq!(hit.map(|h| h.root), Some(near));
        assert_eq!(*seen.lock().unwrap(), vec![near]);
        assert!((pointer.last_hit().unwrap().distance - 1.75).abs() < 1.0e-4);
    }

    #[test]
    fn miss_fires_nothing() {
        let mut world = TargetWorld::new();
        let target = ball(&mut world, -2.0);
        let mut pointer = PointerCaster::new();
        pointer.add_targets([target]);
        let seen = recording(&mut pointer);

        assert!(pointer.cast(Vec3::zeros(), Vec3::z(), &mut world).is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn hit_on_a_part_reports_the_compound_root() {
        let mut world = TargetWorld::new();
        let button = world.spawn(
            TargetDesc::new(Vec3::new(0.0, 0.0, -2.0), Geometry::Empty).with_ui(UiState::Idle),
        );
        let label = world.spawn(
            TargetDesc::new(
                Vec3::zeros(),
                Geometry::Cuboid {
                    half_extents: Vec3::new(0.2, 0.1, 0.01),
                },
            )
            .part_of(button),
        );
        let mut pointer = PointerCaster::new();
        pointer.add_targets([button]);
        let seen = recording(&mut pointer);

        let hit = pointer.cast(Vec3::zeros(), -Vec3::z(), &mut world);
        assert_eq!(hit.map(|h| (h.root, h.target)), Some((button, label)));
        assert_eq!(*seen.lock().unwrap(), vec![button]);
    }

    #[test]
    fn transient_ui_states_reset_but_toggles_stay() {
        let mut world = TargetWorld::new();
        let hovered = world.spawn(
            TargetDesc::new(Vec3::new(3.0, 0.0, 0.0), Geometry::Ball { radius: 0.1 })
                .with_ui(UiState::Hovered),
        );
        let toggle = world.spawn(
            TargetDesc::new(Vec3::new(-3.0, 0.0, 0.0), Geometry::Ball { radius: 0.1 })
                .with_ui(UiState::On),
        );
        let mut pointer = PointerCaster::new();
        pointer.add_targets([hovered, toggle]);

        pointer.cast(Vec3::zeros(), -Vec3::z(), &mut world);
        assert_eq!(world.ui_state(hovered), Some(UiState::Idle));
        assert_eq!(world.ui_state(toggle), Some(UiState::On));
    }
}
