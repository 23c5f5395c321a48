//! In-memory scene of interactive targets.
//!
//! Implements the [`TargetQuery`] primitives for hosts that do not have a scene
//! graph of their own, and for tests. Geometry queries go through Rapier's
//! `parry` shapes:
//! - ray casts use `RayCast::cast_ray` on `Ball` / `Cuboid`
//! - bounding radii come from the world-space AABBs of a target and its descendants
//!
//! World transforms are composed through the parent chain, so every position
//! handed to the colliders is in world space.

use std::collections::{BTreeMap, HashSet};

use nalgebra as na;
use rapier3d::parry::{
    bounding_volume::{Aabb, BoundingVolume},
    query::{Ray, RayCast},
    shape::{Ball, Cuboid},
};

use crate::{
    constants::POINTER_MAX_DISTANCE,
    math::{Pose, Vec3},
    target::{RayHit, TargetId, TargetQuery, TargetShape, UiState},
};

/// Parent chains deeper than this are treated as broken (cycle guard).
const MAX_HIERARCHY_DEPTH: usize = 64;

/// Renderable geometry of a target, in its local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Grouping node (panel, compound button) with no geometry of its own.
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TargetDesc {
    /// Pose relative to the parent (or the world when there is no parent).
    pub local: Pose,
    pub geometry: Geometry,
    pub parent: Option<TargetId>,
    /// Pointer hits on descendants resolve to the nearest interactive ancestor.
    pub interactive: bool,
    pub ui_state: Option<UiState>,
    /// Overrides the computed bounding radius for sphere collisions.
    pub collider_radius: Option<f32>,
}

impl TargetDesc {
    pub fn new(position: Vec3, geometry: Geometry) -> Self {
        Self {
            local: Pose::from_position(position),
            geometry,
            parent: None,
            interactive: true,
            ui_state: None,
            collider_radius: None,
        }
    }

    /// Attach as a non-interactive part of `parent`.
    pub fn part_of(mut self, parent: TargetId) -> Self {
        self.parent = Some(parent);
        self.interactive = false;
        self
    }

    /// Attach as an interactive child of `parent` (e.g. a button on a panel).
    pub fn child_of(mut self, parent: TargetId) -> Self {
        self.parent = Some(parent);
        self.interactive = true;
        self
    }

    pub fn with_ui(mut self, state: UiState) -> Self {
        self.ui_state = Some(state);
        self
    }

    pub fn with_collider_radius(mut self, radius: f32) -> Self {
        self.collider_radius = Some(radius);
        self
    }

    pub fn with_local_pose(mut self, local: Pose) -> Self {
        self.local = local;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct TargetWorld {
    targets: BTreeMap<TargetId, TargetDesc>,
    next_id: u64,
}

impl TargetWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with a fresh id.
    pub fn spawn(&mut self, desc: TargetDesc) -> TargetId {
        while self.targets.contains_key(&TargetId(self.next_id)) {
            self.next_id += 1;
        }
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, desc);
        id
    }

    /// Insert or replace under a caller-chosen id.
    pub fn insert(&mut self, id: TargetId, desc: TargetDesc) {
        self.targets.insert(id, desc);
    }

    /// Remove a target and all of its descendants.
    pub fn remove(&mut self, id: TargetId) {
        for child in self.children(id) {
            self.remove(child);
        }
        self.targets.remove(&id);
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&TargetDesc> {
        self.targets.get(&id)
    }

    pub fn set_local_pose(&mut self, id: TargetId, local: Pose) {
        if let Some(desc) = self.targets.get_mut(&id) {
            desc.local = local;
        }
    }

    pub fn set_translation(&mut self, id: TargetId, position: Vec3) {
        if let Some(desc) = self.targets.get_mut(&id) {
            desc.local.position = position;
        }
    }

    /// World pose composed through all ancestors.
    pub fn world_pose(&self, id: TargetId) -> Option<Pose> {
        let mut desc = self.targets.get(&id)?;
        let mut iso = desc.local.iso();
        let mut depth = 0;
        while let Some(parent) = desc.parent {
            depth += 1;
            if depth > MAX_HIERARCHY_DEPTH {
                log::warn!("target {id:?} has a cyclic or too deep parent chain");
                return None;
            }
            // A dangling parent leaves the target rooted where it is.
            let Some(parent_desc) = self.targets.get(&parent) else {
                break;
            };
            iso = parent_desc.local.iso() * iso;
            desc = parent_desc;
        }
        Some(Pose::from_iso(&iso))
    }

    fn children(&self, id: TargetId) -> Vec<TargetId> {
        self.targets
            .iter()
            .filter(|(_, d)| d.parent == Some(id))
            .map(|(&child, _)| child)
            .collect()
    }

    /// `id` followed by all of its descendants, depth first.
    fn subtree(&self, id: TargetId, out: &mut Vec<TargetId>, seen: &mut HashSet<TargetId>) {
        if !self.targets.contains_key(&id) || !seen.insert(id) {
            return;
        }
        out.push(id);
        for child in self.children(id) {
            self.subtree(child, out, seen);
        }
    }

    fn world_aabb(&self, id: TargetId) -> Option<Aabb> {
        let desc = self.targets.get(&id)?;
        let iso = self.world_pose(id)?.iso();
        match desc.geometry {
            Geometry::Ball { radius } => Some(Ball::new(radius).aabb(&iso)),
            Geometry::Cuboid { half_extents } => Some(Cuboid::new(half_extents).aabb(&iso)),
            Geometry::Empty => None,
        }
    }

    fn ray_distance(&self, id: TargetId, ray: &Ray) -> Option<f32> {
        let desc = self.targets.get(&id)?;
        let iso = self.world_pose(id)?.iso();
        match desc.geometry {
            Geometry::Ball { radius } => {
                Ball::new(radius).cast_ray(&iso, ray, POINTER_MAX_DISTANCE, true)
            }
            Geometry::Cuboid { half_extents } => {
                Cuboid::new(half_extents).cast_ray(&iso, ray, POINTER_MAX_DISTANCE, true)
            }
            Geometry::Empty => None,
        }
    }
}

impl TargetQuery for TargetWorld {
    fn world_position(&self, target: TargetId) -> Option<Vec3> {
        self.world_pose(target).map(|p| p.position)
    }

    fn shape(&self, target: TargetId) -> Option<TargetShape> {
        let desc = self.targets.get(&target)?;
        Some(match (desc.geometry, desc.collider_radius) {
            (_, Some(radius)) => TargetShape::Sphere {
                radius: Some(radius),
            },
            (Geometry::Cuboid { half_extents }, None) => TargetShape::Box { half_extents },
            (_, None) => TargetShape::Sphere { radius: None },
        })
    }

    fn bounding_radius(&self, target: TargetId) -> Option<f32> {
        let mut ids = Vec::new();
        self.subtree(target, &mut ids, &mut HashSet::new());

        let bounds = ids
            .into_iter()
            .filter_map(|id| self.world_aabb(id))
            .reduce(|a, b| a.merged(&b))?;

        let size = bounds.maxs - bounds.mins;
        Some(size.x.max(size.y).max(size.z) * 0.5)
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, targets: &[TargetId]) -> Vec<RayHit> {
        let Some(direction) = direction.try_normalize(1.0e-6) else {
            return Vec::new();
        };
        let ray = Ray::new(na::Point3::from(origin), direction);

        let mut candidates = Vec::new();
        let mut seen = HashSet::new();
        for &target in targets {
            self.subtree(target, &mut candidates, &mut seen);
        }

        let mut hits: Vec<RayHit> = candidates
            .into_iter()
            .filter_map(|id| {
                self.ray_distance(id, &ray)
                    .map(|distance| RayHit { target: id, distance })
            })
            .collect();
        // Stable sort: ties keep registration order.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn logical_root(&self, target: TargetId) -> TargetId {
        let mut current = target;
        for _ in 0..MAX_HIERARCHY_DEPTH {
            let Some(desc) = self.targets.get(&current) else {
                return target;
            };
            if desc.interactive {
                return current;
            }
            match desc.parent {
                Some(parent) => current = parent,
                None => return target,
            }
        }
        target
    }

    fn ui_state(&self, target: TargetId) -> Option<UiState> {
        self.targets.get(&target).and_then(|d| d.ui_state)
    }

    fn set_ui_state(&mut self, target: TargetId, state: UiState) {
        if let Some(desc) = self.targets.get_mut(&target) {
            if desc.ui_state.is_some() {
                desc.ui_state = Some(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::yaw_rotation;

    #[test]
    fn world_pose_composes_parent_chain() {
        let mut world = TargetWorld::new();
        let panel = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Empty).with_local_pose(
            Pose::new(Vec3::new(4.0, 1.5, 0.0), yaw_rotation(std::f32::consts::FRAC_PI_2)),
        ));
        let button = world.spawn(
            TargetDesc::new(Vec3::new(0.0, 0.0, -1.0), Geometry::Ball { radius: 0.1 }).child_of(panel),
        );

        // -Z rotated by +90 degrees about Y is -X.
        let p = world.world_position(button).expect("button exists");
        assert!((p - Vec3::new(3.0, 1.5, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn bounding_radius_is_half_the_largest_extent() {
        let mut world = TargetWorld::new();
        let block = world.spawn(TargetDesc::new(
            Vec3::new(1.0, 0.0, 0.0),
            Geometry::Cuboid {
                half_extents: Vec3::new(0.2, 0.5, 0.1),
            },
        ));
        let r = world.bounding_radius(block).expect("has geometry");
        assert!((r - 0.5).abs() < 1.0e-5);
    }

    #[test]
    fn rotated_cuboid_is_cast_against_in_its_world_orientation() {
        let mut world = TargetWorld::new();
        // A thin slab along X, turned a quarter about Y so it lies along Z.
        let slab = world.spawn(
            TargetDesc::new(
                Vec3::zeros(),
                Geometry::Cuboid {
                    half_extents: Vec3::new(1.0, 0.1, 0.1),
                },
            )
            .with_local_pose(Pose::new(
                Vec3::new(0.0, 0.0, -3.0),
                yaw_rotation(std::f32::consts::FRAC_PI_2),
            )),
        );

        let hits = world.cast_ray(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), &[slab]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 2.0).abs() < 1.0e-4);
        assert!(world.cast_ray(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), &[slab]).is_empty());
    }

    #[test]
    fn group_bounds_merge_every_part() {
        let mut world = TargetWorld::new();
        let panel = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Empty));
        world.spawn(TargetDesc::new(Vec3::new(-0.9, 0.0, 0.0), Geometry::Ball { radius: 0.1 }).part_of(panel));
        world.spawn(TargetDesc::new(Vec3::new(0.9, 0.0, 0.0), Geometry::Ball { radius: 0.1 }).part_of(panel));

        let r = world.bounding_radius(panel).expect("parts have geometry");
        assert!((r - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn empty_group_without_parts_has_no_bounds() {
        let mut world = TargetWorld::new();
        let group = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Empty));
        assert_eq!(world.bounding_radius(group), None);
    }

    #[test]
    fn ray_hits_are_sorted_nearest_first_and_include_descendants() {
        let mut world = TargetWorld::new();
        let far = world.spawn(TargetDesc::new(Vec3::new(0.0, 0.0, -5.0), Geometry::Ball { radius: 0.5 }));
        let panel = world.spawn(TargetDesc::new(Vec3::new(0.0, 0.0, -2.0), Geometry::Empty));
        let part = world.spawn(
            TargetDesc::new(Vec3::zeros(), Geometry::Cuboid { half_extents: Vec3::new(0.5, 0.5, 0.05) })
                .part_of(panel),
        );

        let hits = world.cast_ray(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), &[far, panel]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].target, part);
        assert!((hits[0].distance - 1.95).abs() < 1.0e-4);
        assert_eq!(hits[1].target, far);
        assert_eq!(world.logical_root(part), panel);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let mut world = TargetWorld::new();
        let ball = world.spawn(TargetDesc::new(Vec3::new(0.0, 0.0, -2.0), Geometry::Ball { radius: 0.5 }));
        assert!(world.cast_ray(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), &[ball]).is_empty());
    }

    #[test]
    fn removing_a_group_removes_its_parts() {
        let mut world = TargetWorld::new();
        let panel = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Empty));
        let part = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }).part_of(panel));
        world.remove(panel);
        assert!(!world.contains(part));
        assert!(world.is_empty());
    }

    #[test]
    fn ui_state_is_only_stored_for_ui_targets() {
        let mut world = TargetWorld::new();
        let ball = world.spawn(TargetDesc::new(Vec3::zeros(), Geometry::Ball { radius: 0.1 }));
        let button = world.spawn(
            TargetDesc::new(Vec3::zeros(), Geometry::Cuboid { half_extents: Vec3::repeat(0.1) })
                .with_ui(UiState::Idle),
        );
        world.set_ui_state(ball, UiState::Hovered);
        world.set_ui_state(button, UiState::Hovered);
        assert_eq!(world.ui_state(ball), None);
        assert_eq!(world.ui_state(button), Some(UiState::Hovered));
    }
}
