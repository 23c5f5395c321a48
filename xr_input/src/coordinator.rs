/*!
Root of the input subsystem.

Owns up to one [`ControllerInput`] per hand, the head tracker and the
locomotion state machine, and drives them from one tick per rendered frame.

Target registrations that arrive before a hand connects are buffered per
hand and flushed, in order, into the hand's collider and pointer once it
connects. Disconnecting moves the live targets back into the buffer, so a
reconnect (or a switch between hand tracking and a controller) keeps them.
*/

use std::time::Duration;

use crate::{
    callbacks::{CollisionCallback, CollisionPhase, HandCallbacks, PointingCallback},
    controller::ControllerInput,
    frame::FrameClock,
    gamepad::{HandSide, Handedness},
    head::HeadTracker,
    host::{DeviceConnected, XrHost},
    locomotion::{HandsInput, LocomotionController, LocomotionStep},
    pointer::PointerHit,
    settings::{FlyingMethod, LocomotionSettings},
    target::{TargetId, TargetQuery},
};

/// Outcome of one [`InputCoordinator::on_animate`] tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Nearest pointer hit per hand, indexed by [`Handedness::index`].
    pub pointer_hits: [Option<PointerHit>; 2],
    pub locomotion: LocomotionStep,
    /// `false` when the reference frame was unavailable and the tick was skipped.
    pub tracked: bool,
}

#[derive(Default)]
pub struct InputCoordinator {
    hands: [Option<ControllerInput>; 2],
    buffers: [Vec<TargetId>; 2],
    callbacks: HandCallbacks,
    head: HeadTracker,
    locomotion: LocomotionController,
    debug: bool,
}

impl InputCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable missing-callback logging on every collider, present and future.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
        for controller in self.hands.iter_mut().flatten() {
            controller.set_debug(debug);
        }
    }

    // ---------------------------------------------------------------------
    // Device lifecycle
    // ---------------------------------------------------------------------

    /// A device connected in `event.handedness`.
    ///
    /// An existing controller for that hand is replaced; its targets carry over.
    pub fn on_connect(&mut self, event: DeviceConnected) {
        let hand = event.handedness;
        if let Some(mut previous) = self.hands[hand.index()].take() {
            let mut carried = previous.take_targets();
            previous.on_disconnect();
            carried.append(&mut self.buffers[hand.index()]);
            self.buffers[hand.index()] = carried;
        }

        let mut controller = ControllerInput::new(hand, event.kind);
        controller.on_connect();
        controller.set_debug(self.debug);
        controller.apply_callbacks(&self.callbacks);
        controller.add_targets(self.buffers[hand.index()].drain(..));
        self.hands[hand.index()] = Some(controller);
    }

    /// The device in `hand` went away. Its targets go back to the buffer.
    pub fn on_disconnect(&mut self, hand: Handedness) {
        let Some(mut controller) = self.hands[hand.index()].take() else {
            log::warn!("disconnect for {hand:?} hand with no controller");
            return;
        };
        let targets = controller.take_targets();
        controller.on_disconnect();
        push_unique(&mut self.buffers[hand.index()], targets);
    }

    pub fn is_connected(&self, hand: Handedness) -> bool {
        self.hands[hand.index()].is_some()
    }

    pub fn controller(&self, hand: Handedness) -> Option<&ControllerInput> {
        self.hands[hand.index()].as_ref()
    }

    pub fn controller_mut(&mut self, hand: Handedness) -> Option<&mut ControllerInput> {
        self.hands[hand.index()].as_mut()
    }

    pub fn select_start(&mut self, hand: Handedness) {
        if let Some(controller) = self.controller_mut(hand) {
            controller.select_start();
        }
    }

    pub fn select_end(&mut self, hand: Handedness) {
        if let Some(controller) = self.controller_mut(hand) {
            controller.select_end();
        }
    }

    pub fn squeeze_start(&mut self, hand: Handedness) {
        if let Some(controller) = self.controller_mut(hand) {
            controller.squeeze_start();
        }
    }

    pub fn squeeze_end(&mut self, hand: Handedness) {
        if let Some(controller) = self.controller_mut(hand) {
            controller.squeeze_end();
        }
    }

    // ---------------------------------------------------------------------
    // Tick
    // ---------------------------------------------------------------------

    /// Run one frame: head, both hands, buffer flush, then locomotion.
    pub fn on_animate(
        &mut self,
        clock: &FrameClock,
        host: &mut dyn XrHost,
        world: &mut dyn TargetQuery,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        let frame = match host.reference_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("frame {}: {err}", clock.frame);
                self.flush_buffers();
                return report;
            }
        };
        report.tracked = true;

        self.head.update(host.viewer_pose(), &frame);
        for hand in Handedness::ALL {
            if let Some(controller) = self.hands[hand.index()].as_mut() {
                report.pointer_hits[hand.index()] = controller.on_animate(clock, &*host, &frame, world);
            }
        }
        self.flush_buffers();

        let hands = HandsInput {
            left: self.hands[Handedness::Left.index()].as_ref().map(ControllerInput::state),
            right: self.hands[Handedness::Right.index()].as_ref().map(ControllerInput::state),
        };
        report.locomotion = self.locomotion.step(clock, &self.head, hands, host);
        report
    }

    // ---------------------------------------------------------------------
    // Targets
    // ---------------------------------------------------------------------

    /// Register `target` with the collider and pointer of the hand(s) in `side`.
    ///
    /// Hands that are not connected buffer it. Connected hands take their
    /// backlog first, then the new target.
    pub fn add_collider_target(&mut self, target: TargetId, side: HandSide) {
        self.add_collider_targets([target], side);
    }

    pub fn add_collider_targets(&mut self, targets: impl IntoIterator<Item = TargetId>, side: HandSide) {
        let targets: Vec<TargetId> = targets.into_iter().collect();
        for hand in Handedness::ALL.into_iter().filter(|&h| side.includes(h)) {
            let buffer = &mut self.buffers[hand.index()];
            match self.hands[hand.index()].as_mut() {
                Some(controller) => {
                    controller.add_targets(buffer.drain(..));
                    controller.add_targets(targets.iter().copied());
                }
                None => push_unique(buffer, targets.iter().copied()),
            }
        }
    }

    /// Move buffered targets into connected hands. No-op when nothing is pending.
    pub fn flush_buffers(&mut self) {
        for hand in Handedness::ALL {
            let buffer = &mut self.buffers[hand.index()];
            if buffer.is_empty() {
                continue;
            }
            if let Some(controller) = self.hands[hand.index()].as_mut() {
                controller.add_targets(buffer.drain(..));
            }
        }
    }

    /// Remove `target` from live lists and pending buffers. Unknown targets are ignored.
    pub fn remove_collider_target(&mut self, target: TargetId, side: HandSide) {
        for hand in Handedness::ALL.into_iter().filter(|&h| side.includes(h)) {
            self.buffers[hand.index()].retain(|&t| t != target);
            if let Some(controller) = self.hands[hand.index()].as_mut() {
                controller.remove_targets([target]);
            }
        }
    }

    pub fn clear_targets(&mut self) {
        for hand in Handedness::ALL {
            self.buffers[hand.index()].clear();
            if let Some(controller) = self.hands[hand.index()].as_mut() {
                controller.take_targets();
            }
        }
    }

    /// Live targets of a connected hand, or the pending ones otherwise.
    pub fn targets(&self, hand: Handedness) -> &[TargetId] {
        match self.controller(hand) {
            Some(controller) => controller.targets(),
            None => &self.buffers[hand.index()],
        }
    }

    pub fn buffered(&self, hand: Handedness) -> &[TargetId] {
        &self.buffers[hand.index()]
    }

    // ---------------------------------------------------------------------
    // Callbacks
    // ---------------------------------------------------------------------

    /// Replace all shared callbacks at once and push them to connected hands.
    pub fn set_callbacks(&mut self, callbacks: HandCallbacks) {
        self.callbacks = callbacks;
        self.apply_callbacks();
    }

    pub fn set_on_collider_enter(&mut self, callback: Option<CollisionCallback>) {
        self.set_collision_callback(CollisionPhase::Enter, callback);
    }

    pub fn set_on_collider_stay(&mut self, callback: Option<CollisionCallback>) {
        self.set_collision_callback(CollisionPhase::Stay, callback);
    }

    pub fn set_on_collider_exit(&mut self, callback: Option<CollisionCallback>) {
        self.set_collision_callback(CollisionPhase::Exit, callback);
    }

    pub fn set_on_pointing(&mut self, callback: Option<PointingCallback>) {
        self.callbacks.on_pointing = callback;
        self.apply_callbacks();
    }

    fn set_collision_callback(&mut self, phase: CollisionPhase, callback: Option<CollisionCallback>) {
        self.callbacks.collision.set(phase, callback);
        self.apply_callbacks();
    }

    fn apply_callbacks(&mut self) {
        for controller in self.hands.iter_mut().flatten() {
            controller.apply_callbacks(&self.callbacks);
        }
    }

    // ---------------------------------------------------------------------
    // Locomotion settings
    // ---------------------------------------------------------------------

    pub fn settings(&self) -> &LocomotionSettings {
        self.locomotion.settings()
    }

    pub fn set_flying_mode(&mut self, enabled: bool) {
        self.locomotion.settings_mut().flying_mode_enabled = enabled;
    }

    pub fn set_always_flying(&mut self, always: bool) {
        self.locomotion.settings_mut().always_flying = always;
    }

    pub fn set_flying_method(&mut self, method: FlyingMethod) {
        self.locomotion.settings_mut().flying_method = method;
    }

    pub fn set_jump_enabled(&mut self, enabled: bool) {
        self.locomotion.settings_mut().jump_enabled = enabled;
    }

    pub fn set_discrete_rotation(&mut self, discrete: bool) {
        self.locomotion.settings_mut().discrete_rotation = discrete;
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn head(&self) -> &HeadTracker {
        &self.head
    }

    pub fn trigger(&self, hand: Handedness) -> bool {
        self.controller(hand).is_some_and(ControllerInput::trigger)
    }

    pub fn pointer_hit(&self, hand: Handedness) -> Option<PointerHit> {
        self.controller(hand).and_then(|c| c.pointer().last_hit())
    }

    /// Wrist speed of `hand` in m/s. One call per hand per frame.
    pub fn speed(&mut self, hand: Handedness, delta_secs: f32) -> Option<f32> {
        self.controller_mut(hand).map(|c| c.speed(delta_secs))
    }

    pub fn vibrate(
        &self,
        hand: Handedness,
        host: &mut dyn XrHost,
        intensity: Option<f32>,
        duration: Option<Duration>,
    ) {
        if let Some(controller) = self.controller(hand) {
            controller.vibrate(host, intensity, duration);
        }
    }

    // ---------------------------------------------------------------------
    // Scene change
    // ---------------------------------------------------------------------

    /// Tear down scene-owned state and put the player back above the origin.
    ///
    /// Clears targets and shared callbacks, zeroes locomotion transients and
    /// restores default settings. Connected controllers are kept.
    pub fn reset_for_scene(&mut self, host: &mut dyn XrHost) {
        self.clear_targets();
        self.set_callbacks(HandCallbacks::default());
        self.locomotion = LocomotionController::new(LocomotionSettings::default());

        let Some(viewer) = host.viewer_pose() else {
            return;
        };
        let result = host
            .reference_frame()
            .and_then(|frame| host.set_reference_frame(frame.recentered(&viewer)));
        if let Err(err) = result {
            log::error!("recentering on scene change: {err}");
        }
    }
}

fn push_unique(buffer: &mut Vec<TargetId>, targets: impl IntoIterator<Item = TargetId>) {
    for target in targets {
        if !buffer.contains(&target) {
            buffer.push(target);
        }
    }
}
