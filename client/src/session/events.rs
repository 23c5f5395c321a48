//! Bridge from the core's callbacks to Bevy messages.
//!
//! Callbacks run inside [`InputCoordinator::on_animate`](xr_input::InputCoordinator::on_animate),
//! where no world access is possible, so they only push into a shared queue.

use std::sync::{Arc, Mutex, PoisonError};

use bevy::prelude::*;
use xr_input::{CollisionPhase, HandCallbacks, Handedness, TargetId};

use super::XrSet;

/// A hand collider changed state against `target`.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandCollision {
    pub phase: CollisionPhase,
    pub target: TargetId,
    pub hand: Handedness,
}

/// A pointer rests on `target` (logical root) this frame.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointedAt {
    pub target: TargetId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Queued {
    Collision(HandCollision),
    Pointing(PointedAt),
}

#[derive(Resource, Clone, Default)]
pub struct SceneEvents(Arc<Mutex<Vec<Queued>>>);

impl SceneEvents {
    /// Callbacks that record into this queue. Scenes install them on enter.
    pub fn callbacks(&self) -> HandCallbacks {
        let mut callbacks = HandCallbacks::default();
        for phase in [CollisionPhase::Enter, CollisionPhase::Stay, CollisionPhase::Exit] {
            let queue = self.0.clone();
            callbacks.collision.set(
                phase,
                Some(Arc::new(move |target, hand| {
                    push(&queue, Queued::Collision(HandCollision { phase, target, hand }));
                })),
            );
        }
        let queue = self.0.clone();
        callbacks.on_pointing = Some(Arc::new(move |target| {
            push(&queue, Queued::Pointing(PointedAt { target }));
        }));
        callbacks
    }

    fn drain(&self) -> Vec<Queued> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

fn push(queue: &Mutex<Vec<Queued>>, event: Queued) {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(event);
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<SceneEvents>();
    app.add_message::<HandCollision>();
    app.add_message::<PointedAt>();
    app.add_systems(Update, dispatch.in_set(XrSet::Dispatch));
}

fn dispatch(
    events: Res<SceneEvents>,
    mut collisions: MessageWriter<HandCollision>,
    mut pointing: MessageWriter<PointedAt>,
) {
    for event in events.drain() {
        match event {
            Queued::Collision(collision) => {
                collisions.write(collision);
            }
            Queued::Pointing(pointed) => {
                pointing.write(pointed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_queue_in_call_order() {
        let events = SceneEvents::default();
        let callbacks = events.callbacks();

        let enter = callbacks.collision.slot(CollisionPhase::Enter).cloned();
        let exit = callbacks.collision.slot(CollisionPhase::Exit).cloned();
        (enter.unwrap())(TargetId(3), Handedness::Left);
        (callbacks.on_pointing.clone().unwrap())(TargetId(9));
        (exit.unwrap())(TargetId(3), Handedness::Left);

        let drained = events.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(
            drained[0],
            Queued::Collision(HandCollision {
                phase: CollisionPhase::Enter,
                target: TargetId(3),
                hand: Handedness::Left,
            })
        );
        assert_eq!(drained[1], Queued::Pointing(PointedAt { target: TargetId(9) }));
        assert!(events.drain().is_empty());
    }
}
