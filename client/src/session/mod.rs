//! The simulated XR session.
//!
//! The client plays the XR runtime for the input core: it owns the
//! [`SimulatedHost`] (native poses, gamepads, reference frame), feeds it from
//! the desktop bindings, and runs [`InputCoordinator::on_animate`] once per
//! rendered frame. Collision and pointing callbacks land in a shared queue and
//! are re-emitted as Bevy messages after the tick.

mod devices;
mod events;

use std::time::Duration;

use bevy::prelude::*;
use xr_input::{FrameClock, FrameReport, InputCoordinator, SimulatedHost, TargetWorld};

pub use events::{HandCollision, PointedAt, SceneEvents};

/// The runtime side of the session.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct XrSession(pub SimulatedHost);

#[derive(Resource, Default, Deref, DerefMut)]
pub struct XrInput(pub InputCoordinator);

/// Interactive targets of the active scene.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct SceneTargets(pub TargetWorld);

/// Result of the latest tick.
#[derive(Resource, Default, Deref)]
pub struct LastFrameReport(pub FrameReport);

/// Clock of the latest tick.
#[derive(Resource, Default, Deref)]
pub struct SessionClock(pub FrameClock);

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrSet {
    /// Connect/disconnect, device poses and button edges.
    Devices,
    /// The input core tick.
    Tick,
    /// Queued callbacks become messages.
    Dispatch,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<XrSession>();
    app.init_resource::<XrInput>();
    app.init_resource::<SceneTargets>();
    app.init_resource::<LastFrameReport>();
    app.init_resource::<SessionClock>();

    app.configure_sets(
        Update,
        (XrSet::Devices, XrSet::Tick, XrSet::Dispatch).chain(),
    );
    app.add_systems(Update, tick.in_set(XrSet::Tick));

    app.add_plugins((devices::plugin, events::plugin));
}

fn tick(
    time: Res<Time>,
    mut clock: ResMut<SessionClock>,
    mut session: ResMut<XrSession>,
    mut input: ResMut<XrInput>,
    mut targets: ResMut<SceneTargets>,
    mut report: ResMut<LastFrameReport>,
) {
    clock.0 = next_clock(&clock.0, time.elapsed(), time.delta());
    report.0 = input.0.on_animate(&clock.0, &mut session.0, &mut targets.0);

    let step = &report.0.locomotion;
    if step.jump_started {
        debug!("jump started at frame {}", clock.0.frame);
    }
    if step.flying_toggled {
        info!("flying: {}", input.0.locomotion().is_flying());
    }
}

/// Frame ids start at 1 so the first tick never matches a fresh cache.
fn next_clock(previous: &FrameClock, now: Duration, delta: Duration) -> FrameClock {
    FrameClock::new(previous.frame + 1, now, delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_frames_are_monotonic() {
        let first = next_clock(&FrameClock::default(), Duration::ZERO, Duration::ZERO);
        let second = next_clock(&first, Duration::from_millis(16), Duration::from_millis(16));
        assert_eq!(first.frame, 1);
        assert_eq!(second.frame, 2);
        assert_eq!(second.delta, Duration::from_millis(16));
    }
}
