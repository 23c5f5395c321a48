//! Callback slots shared by colliders, pointers and the coordinator.
//!
//! Each slot is independently optional. Assigning replaces the previous value;
//! callbacks are never chained. `Arc` lets the coordinator hand the same
//! callback to both hands.

use std::sync::Arc;

use crate::{gamepad::Handedness, target::TargetId};

/// Called with the target and the hand that touched it.
pub type CollisionCallback = Arc<dyn Fn(TargetId, Handedness) + Send + Sync>;

/// Called with the logical (root) target under the pointer.
pub type PointingCallback = Arc<dyn Fn(TargetId) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionPhase {
    Enter,
    Stay,
    Exit,
}

#[derive(Clone, Default)]
pub struct CollisionCallbacks {
    pub on_enter: Option<CollisionCallback>,
    pub on_stay: Option<CollisionCallback>,
    pub on_exit: Option<CollisionCallback>,
}

impl CollisionCallbacks {
    pub fn slot(&self, phase: CollisionPhase) -> Option<&CollisionCallback> {
        match phase {
            CollisionPhase::Enter => self.on_enter.as_ref(),
            CollisionPhase::Stay => self.on_stay.as_ref(),
            CollisionPhase::Exit => self.on_exit.as_ref(),
        }
    }

    pub fn set(&mut self, phase: CollisionPhase, callback: Option<CollisionCallback>) {
        match phase {
            CollisionPhase::Enter => self.on_enter = callback,
            CollisionPhase::Stay => self.on_stay = callback,
            CollisionPhase::Exit => self.on_exit = callback,
        }
    }
}

/// The four slots a scene fills for a hand, or for both hands at once.
#[derive(Clone, Default)]
pub struct HandCallbacks {
    pub collision: CollisionCallbacks,
    pub on_pointing: Option<PointingCallback>,
}

impl std::fmt::Debug for HandCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandCallbacks")
            .field("on_enter", &self.collision.on_enter.is_some())
            .field("on_stay", &self.collision.on_stay.is_some())
            .field("on_exit", &self.collision.on_exit.is_some())
            .field("on_pointing", &self.on_pointing.is_some())
            .finish()
    }
}
