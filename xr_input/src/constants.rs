use std::f32::consts::PI;
use std::time::Duration;

/// Planar locomotion step in meters per frame at full thumbstick deflection.
/// Per frame, not per second.
pub const MOVE_SPEED_PER_FRAME: f32 = 0.03;

/// Vertical flight step in meters per frame.
pub const FLY_SPEED_PER_FRAME: f32 = 0.03;

/// Minimum |thumbstick.y| before joystick flight kicks in.
pub const FLY_JOYSTICK_DEADZONE: f32 = 0.95;

/// Apex of a jump (meters).
pub const JUMP_HEIGHT: f32 = 0.5;

/// Total airtime of a jump.
pub const JUMP_DURATION: Duration = Duration::from_millis(800);

/// Two button-A presses closer than this are a bounce, not a double press.
pub const DOUBLE_PRESS_MIN: Duration = Duration::from_millis(50);

/// Two button-A presses closer than this toggle flight.
pub const DOUBLE_PRESS_MAX: Duration = Duration::from_millis(400);

/// |thumbstick.x| needed to trigger a discrete (snap) turn.
pub const SNAP_TURN_THRESHOLD: f32 = 0.7;

/// Yaw of one snap turn (30 degrees).
pub const SNAP_TURN_ANGLE: f32 = PI / 6.0;

/// Minimum delay between two snap turns.
pub const SNAP_TURN_COOLDOWN: Duration = Duration::from_millis(250);

/// |thumbstick.x| below this is treated as centered for smooth turning.
pub const SMOOTH_TURN_DEADZONE: f32 = 0.05;

/// Maximum smooth-turn speed in radians per frame.
pub const SMOOTH_TURN_MAX_SPEED: f32 = PI / 160.0;

/// Blend factor applied per frame while the turn speed ramps up.
pub const SMOOTH_TURN_ACCELERATION: f32 = 0.05;

/// Blend factor applied per frame while the turn speed ramps down.
/// Must stay larger than [`SMOOTH_TURN_ACCELERATION`].
pub const SMOOTH_TURN_DECELERATION: f32 = 0.1;

/// Radius of the sphere carried by each hand for proximity tests (meters).
pub const HAND_COLLIDER_RADIUS: f32 = 0.05;

/// Radius used for a target whose bounds cannot be computed (meters).
pub const DEFAULT_TARGET_RADIUS: f32 = 0.1;

/// Grip-to-wrist offset in the controller's local frame, left hand (meters).
pub const LEFT_WRIST_OFFSET: [f32; 3] = [-0.02, 0.0, 0.09];

/// Grip-to-wrist offset in the controller's local frame, right hand (meters).
pub const RIGHT_WRIST_OFFSET: [f32; 3] = [0.02, 0.0, 0.09];

/// Wrist-to-palm offset in the re-oriented wrist frame, left hand (meters).
pub const LEFT_PALM_OFFSET: [f32; 3] = [0.03, -0.02, -0.05];

/// Wrist-to-palm offset in the re-oriented wrist frame, right hand (meters).
pub const RIGHT_PALM_OFFSET: [f32; 3] = [-0.03, -0.02, -0.05];

/// Wrist yaw applied so the fingers point forward with the thumb up (radians).
/// Mirrored (negated) for the right hand.
pub const WRIST_YAW: f32 = PI / 8.0 * 1.5;

/// Wrist roll applied so the fingers point forward with the thumb up (radians).
/// Mirrored (negated) for the right hand.
pub const WRIST_ROLL: f32 = PI / 2.0;

/// Pointer ray direction in the controller's local frame (normalized at use).
pub const POINTER_LOCAL_DIRECTION: [f32; 3] = [0.0, -1.0, -1.0];

/// Maximum pointer ray length (meters).
pub const POINTER_MAX_DISTANCE: f32 = 100.0;
