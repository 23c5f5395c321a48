pub mod callbacks;
pub mod collider;
pub mod constants;
pub mod controller;
pub mod coordinator;
pub mod frame;
pub mod gamepad;
pub mod head;
pub mod host;
pub mod locomotion;
pub mod math;
pub mod pointer;
pub mod pose_source;
pub mod settings;
pub mod sim;
pub mod target;
pub mod target_world;

pub use callbacks::{CollisionCallback, CollisionPhase, HandCallbacks, PointingCallback};
pub use collider::Collider;
pub use controller::{ConnectionState, ControllerInput};
pub use coordinator::{FrameReport, InputCoordinator};
pub use frame::{FrameClock, ReferenceFrame};
pub use gamepad::{
    ButtonSnapshot, ControllerState, GamepadButton, GamepadSnapshot, HandSide, Handedness,
};
pub use head::HeadTracker;
pub use host::{DeviceConnected, DeviceKind, FrameError, XrHost};
pub use locomotion::{HandsInput, LocomotionController, LocomotionStep, jump_profile};
pub use math::{Iso, Pose, Quat, Vec2, Vec3};
pub use pointer::{PointerCaster, PointerHit};
pub use pose_source::{HandGeometry, PoseSource};
pub use settings::{FlyingMethod, LocomotionSettings};
pub use sim::{HapticPulse, SimulatedHost};
pub use target::{RayHit, TargetId, TargetQuery, TargetShape, UiState};
pub use target_world::{Geometry, TargetDesc, TargetWorld};
