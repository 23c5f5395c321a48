/*!
Interactive targets as seen by the input core.

A target is an opaque, identity-comparable handle. Its transform, geometry
and any scene-specific tags belong to the scene layer; the core reaches them
only through [`TargetQuery`].
*/

use crate::math::Vec3;

/// Identity of an interactive object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Collision geometry used by the hand colliders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetShape {
    /// Axis-aligned box, tested per axis against the hand position.
    Box { half_extents: Vec3 },
    /// Sphere. Without an explicit radius the bounding radius is used.
    Sphere { radius: Option<f32> },
}

/// Visual state of a UI target.
///
/// `Idle`, `Hovered` and `Selected` are transient and reset every frame by
/// the pointer. `On` and `Off` are pinned toggle states and are left alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Idle,
    Hovered,
    Selected,
    On,
    Off,
}

impl UiState {
    #[inline]
    pub fn is_pinned(self) -> bool {
        matches!(self, UiState::On | UiState::Off)
    }
}

/// One ray intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The primitive that was hit (may be a child of a registered target).
    pub target: TargetId,
    /// Distance from the ray origin (meters).
    pub distance: f32,
}

/// Queries the core issues against the scene's targets.
pub trait TargetQuery {
    fn world_position(&self, target: TargetId) -> Option<Vec3>;

    fn shape(&self, target: TargetId) -> Option<TargetShape>;

    /// Half of the largest extent of the target's world bounding box.
    ///
    /// Potentially expensive; callers cache the result.
    fn bounding_radius(&self, target: TargetId) -> Option<f32>;

    /// Intersect a ray with `targets` and their descendants.
    ///
    /// Hits are sorted nearest first; equal distances keep a stable order.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, targets: &[TargetId]) -> Vec<RayHit>;

    /// The logical interactive object that owns `target` (itself if it is a root).
    fn logical_root(&self, target: TargetId) -> TargetId;

    /// `None` for targets that are not UI elements.
    fn ui_state(&self, target: TargetId) -> Option<UiState>;

    fn set_ui_state(&mut self, target: TargetId, state: UiState);
}
