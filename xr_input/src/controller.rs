//! One hand: tracked pose, proximity collider and ray pointer.

use std::time::Duration;

use crate::{
    callbacks::{CollisionCallback, HandCallbacks, PointingCallback},
    collider::Collider,
    constants::HAND_COLLIDER_RADIUS,
    frame::{FrameClock, ReferenceFrame},
    gamepad::{ControllerState, Handedness},
    host::{DeviceKind, XrHost},
    pointer::{PointerCaster, PointerHit},
    pose_source::PoseSource,
    target::{TargetId, TargetQuery},
};

/// Intensity of a haptic pulse when the caller does not pick one.
pub const DEFAULT_PULSE_INTENSITY: f32 = 1.0;
pub const DEFAULT_PULSE_DURATION: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Unconnected,
    Connected,
}

pub struct ControllerInput {
    pose: PoseSource,
    collider: Collider,
    pointer: PointerCaster,
    connection: ConnectionState,
    select: bool,
    squeeze: bool,
    pointer_active: bool,
}

impl ControllerInput {
    pub fn new(hand: Handedness, kind: DeviceKind) -> Self {
        Self {
            pose: PoseSource::new(hand, kind),
            collider: Collider::new(hand, HAND_COLLIDER_RADIUS),
            pointer: PointerCaster::new(),
            connection: ConnectionState::Unconnected,
            select: false,
            squeeze: false,
            pointer_active: true,
        }
    }

    pub fn hand(&self) -> Handedness {
        self.pose.hand()
    }

    pub fn kind(&self) -> DeviceKind {
        self.pose.kind()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Debug helpers (wrist/palm axes) are shown while connected.
    pub fn helpers_visible(&self) -> bool {
        self.is_connected()
    }

    /// Returns `false` if the hand was already connected.
    pub fn on_connect(&mut self) -> bool {
        if self.is_connected() {
            return false;
        }
        self.connection = ConnectionState::Connected;
        log::info!("{:?} {:?} connected", self.hand(), self.kind());
        true
    }

    /// Hide the helpers. Registered targets stay; the coordinator migrates them.
    pub fn on_disconnect(&mut self) {
        if self.is_connected() {
            log::info!("{:?} {:?} disconnected", self.hand(), self.kind());
        }
        self.connection = ConnectionState::Unconnected;
        self.select = false;
        self.squeeze = false;
    }

    /// Refresh the pose, then run collision and pointing for this frame.
    pub fn on_animate(
        &mut self,
        clock: &FrameClock,
        host: &dyn XrHost,
        frame: &ReferenceFrame,
        world: &mut dyn TargetQuery,
    ) -> Option<PointerHit> {
        self.pose.refresh(clock.frame, host, frame);
        self.collider.update(self.pose.pointer_origin(), &*world);
        self.pointer
            .cast(self.pose.pointer_origin(), self.pose.pointer_direction(), world)
    }

    pub fn pose(&self) -> &PoseSource {
        &self.pose
    }

    pub fn state(&self) -> &ControllerState {
        self.pose.state()
    }

    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    pub fn pointer(&self) -> &PointerCaster {
        &self.pointer
    }

    /// See [`PoseSource::speed`]: one call per frame.
    pub fn speed(&mut self, delta_secs: f32) -> f32 {
        self.pose.speed(delta_secs)
    }

    pub fn select_start(&mut self) {
        self.select = true;
    }

    pub fn select_end(&mut self) {
        self.select = false;
    }

    pub fn squeeze_start(&mut self) {
        self.squeeze = true;
    }

    pub fn squeeze_end(&mut self) {
        self.squeeze = false;
    }

    pub fn is_selecting(&self) -> bool {
        self.select
    }

    pub fn is_squeezing(&self) -> bool {
        self.squeeze
    }

    /// Trigger held, from either the select event or the polled button.
    pub fn trigger(&self) -> bool {
        self.select || self.pose.state().buttons.trigger
    }

    pub fn pointer_active(&self) -> bool {
        self.pointer_active
    }

    pub fn set_pointer_active(&mut self, active: bool) {
        self.pointer_active = active;
    }

    pub fn vibrate(&self, host: &mut dyn XrHost, intensity: Option<f32>, duration: Option<Duration>) {
        host.pulse_haptics(
            self.hand(),
            intensity.unwrap_or(DEFAULT_PULSE_INTENSITY),
            duration.unwrap_or(DEFAULT_PULSE_DURATION),
        );
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.collider.set_debug(debug);
    }

    pub fn targets(&self) -> &[TargetId] {
        self.collider.targets()
    }

    /// Register with both the collider and the pointer, keeping order and skipping duplicates.
    pub fn add_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        let targets: Vec<TargetId> = targets.into_iter().collect();
        self.collider.add_targets(targets.iter().copied());
        self.pointer.add_targets(targets);
    }

    pub fn remove_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        let targets: Vec<TargetId> = targets.into_iter().collect();
        self.collider.remove_targets(targets.iter().copied());
        self.pointer.remove_targets(targets);
    }

    /// Remove every target from both lists and return them in registration order.
    pub fn take_targets(&mut self) -> Vec<TargetId> {
        let mut targets = self.collider.take_targets();
        for target in self.pointer.take_targets() {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }

    pub fn set_on_collider_enter(&mut self, callback: Option<CollisionCallback>) {
        self.collider.set_on_enter(callback);
    }

    pub fn set_on_collider_stay(&mut self, callback: Option<CollisionCallback>) {
        self.collider.set_on_stay(callback);
    }

    pub fn set_on_collider_exit(&mut self, callback: Option<CollisionCallback>) {
        self.collider.set_on_exit(callback);
    }

    pub fn set_on_pointing(&mut self, callback: Option<PointingCallback>) {
        self.pointer.set_on_pointing(callback);
    }

    /// Replace all four callback slots.
    pub fn apply_callbacks(&mut self, callbacks: &HandCallbacks) {
        self.set_on_collider_enter(callbacks.collision.on_enter.clone());
        self.set_on_collider_stay(callbacks.collision.on_stay.clone());
        self.set_on_collider_exit(callbacks.collision.on_exit.clone());
        self.set_on_pointing(callbacks.on_pointing.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::{Pose, Vec3},
        sim::SimulatedHost,
        target_world::{Geometry, TargetDesc, TargetWorld},
    };
    use std::sync::{Arc, Mutex};

    #[test]
    fn connect_is_idempotent_and_disconnect_keeps_targets() {
        let mut controller = ControllerInput::new(Handedness::Left, DeviceKind::Controller);
        assert!(!controller.helpers_visible());
        assert!(controller.on_connect());
        assert!(!controller.on_connect());
        assert!(controller.helpers_visible());

        controller.add_targets([TargetId(1), TargetId(2)]);
        controller.on_disconnect();
        assert!(!controller.helpers_visible());
        assert_eq!(controller.targets(), &[TargetId(1), TargetId(2)]);
        assert_eq!(controller.pointer().targets(), &[TargetId(1), TargetId(2)]);
    }

    #[test]
    fn animate_runs_collision_then_pointing_from_the_grip() {
        let mut host = SimulatedHost::new();
        host.set_grip_pose(Handedness::Right, Some(Pose::from_position(Vec3::new(0.0, 1.0, 0.0))));
        let mut world = TargetWorld::new();
        let touched = world.spawn(TargetDesc::new(
            Vec3::new(0.06, 1.0, 0.0),
            Geometry::Ball { radius: 0.05 },
        ));
        let aimed = world.spawn(TargetDesc::new(
            Vec3::new(0.0, 0.0, -1.0),
            Geometry::Ball { radius: 0.2 },
        ));

        let entered: Arc<Mutex<Vec<TargetId>>> = Arc::default();
        let pointed: Arc<Mutex<Vec<TargetId>>> = Arc::default();
        let mut controller = ControllerInput::new(Handedness::Right, DeviceKind::Controller);
        let sink = entered.clone();
        controller.set_on_collider_enter(Some(Arc::new(move |t, _| sink.lock().unwrap().push(t))));
        let sink = pointed.clone();
        controller.set_on_pointing(Some(Arc::new(move |t| sink.lock().unwrap().push(t))));
        controller.on_connect();
        controller.add_targets([touched, aimed]);

        let clock = FrameClock::default();
        let hit = controller.on_animate(&clock, &host, &ReferenceFrame::identity(), &mut world);

        assert_eq!(*entered.lock().unwrap(), vec![touched]);
        assert_eq!(hit.map(|h| h.root), Some(aimed));
        assert_eq!(*pointed.lock().unwrap(), vec![aimed]);
    }

    #[test]
    fn vibrate_uses_defaults() {
        let mut host = SimulatedHost::new();
        let controller = ControllerInput::new(Handedness::Left, DeviceKind::Controller);
        controller.vibrate(&mut host, None, None);
        controller.vibrate(&mut host, Some(0.3), Some(Duration::from_millis(40)));
        let pulses = host.haptic_pulses();
        assert_eq!(pulses[0].intensity, DEFAULT_PULSE_INTENSITY);
        assert_eq!(pulses[0].duration, DEFAULT_PULSE_DURATION);
        assert_eq!(pulses[1].hand, Handedness::Left);
        assert_eq!(pulses[1].duration, Duration::from_millis(40));
    }

    #[test]
    fn select_and_trigger_state() {
        let mut controller = ControllerInput::new(Handedness::Left, DeviceKind::Controller);
        controller.on_connect();
        controller.select_start();
        assert!(controller.trigger());
        controller.on_disconnect();
        assert!(!controller.is_selecting());
        assert!(!controller.trigger());
    }
}
