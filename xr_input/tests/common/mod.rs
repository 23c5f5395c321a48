#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use xr_input::{
    CollisionPhase, DeviceConnected, DeviceKind, FrameClock, HandCallbacks, Handedness,
    InputCoordinator, Pose, SimulatedHost, TargetId, Vec3,
};

/// 60 Hz.
pub const TICK: Duration = Duration::from_micros(16_667);

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Collision(CollisionPhase, TargetId, Handedness),
    Pointing(TargetId),
}

/// Shared sink for every callback slot.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn callbacks(&self) -> HandCallbacks {
        let mut callbacks = HandCallbacks::default();
        for phase in [CollisionPhase::Enter, CollisionPhase::Stay, CollisionPhase::Exit] {
            let events = self.events.clone();
            callbacks.collision.set(
                phase,
                Some(Arc::new(move |target, hand| {
                    events.lock().unwrap().push(Event::Collision(phase, target, hand));
                })),
            );
        }
        let events = self.events.clone();
        callbacks.on_pointing = Some(Arc::new(move |target| {
            events.lock().unwrap().push(Event::Pointing(target));
        }));
        callbacks
    }

    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn collisions(&self, hand: Handedness) -> Vec<(CollisionPhase, TargetId)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Collision(phase, target, h) if *h == hand => Some((*phase, *target)),
                _ => None,
            })
            .collect()
    }
}

pub fn session() -> SimulatedHost {
    let mut host = SimulatedHost::new();
    host.set_viewer_pose(Some(Pose::from_position(Vec3::new(0.0, 1.6, 0.0))));
    host
}

pub fn connect(coordinator: &mut InputCoordinator, hand: Handedness) {
    coordinator.on_connect(DeviceConnected {
        handedness: hand,
        kind: DeviceKind::Controller,
    });
}

pub fn clocks(count: usize) -> impl Iterator<Item = FrameClock> {
    std::iter::successors(Some(FrameClock::default()), |c| Some(c.advanced(TICK))).take(count)
}
