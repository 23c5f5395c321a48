/*!
Gamepad polling surface and the per-hand digital/analog state derived from it.

The layout follows the WebXR "xr-standard" gamepad mapping:
- axes:    [touchpad.x, touchpad.y, thumbstick.x, thumbstick.y]
- buttons: [trigger, squeeze, touchpad, thumbstick, A/X, B/Y]

Runtimes expose fewer entries on simpler controllers. Missing indices read as
`0.0` / released instead of failing.
*/

use crate::math::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }

    #[inline]
    pub fn is_left(self) -> bool {
        self == Handedness::Left
    }
}

/// Which hand(s) a target registration applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandSide {
    Left,
    Right,
    #[default]
    Both,
}

impl HandSide {
    #[inline]
    pub fn includes(self, hand: Handedness) -> bool {
        match self {
            HandSide::Both => true,
            HandSide::Left => hand == Handedness::Left,
            HandSide::Right => hand == Handedness::Right,
        }
    }
}

impl From<Handedness> for HandSide {
    fn from(hand: Handedness) -> Self {
        match hand {
            Handedness::Left => HandSide::Left,
            Handedness::Right => HandSide::Right,
        }
    }
}

/// Button slots of the standard mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamepadButton {
    Trigger,
    Squeeze,
    Touchpad,
    Thumbstick,
    A,
    B,
}

impl GamepadButton {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            GamepadButton::Trigger => 0,
            GamepadButton::Squeeze => 1,
            GamepadButton::Touchpad => 2,
            GamepadButton::Thumbstick => 3,
            GamepadButton::A => 4,
            GamepadButton::B => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ButtonSnapshot {
    pub pressed: bool,
    pub touched: bool,
    pub value: f32,
}

impl ButtonSnapshot {
    pub fn pressed() -> Self {
        Self {
            pressed: true,
            touched: true,
            value: 1.0,
        }
    }
}

/// Raw gamepad state as polled from the runtime for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GamepadSnapshot {
    pub axes: Vec<f32>,
    pub buttons: Vec<ButtonSnapshot>,
}

impl GamepadSnapshot {
    /// A full standard-mapping snapshot with everything centered and released.
    pub fn standard() -> Self {
        Self {
            axes: vec![0.0; 4],
            buttons: vec![ButtonSnapshot::default(); 6],
        }
    }

    #[inline]
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn has_button(&self, button: GamepadButton) -> bool {
        button.index() < self.buttons.len()
    }

    #[inline]
    pub fn is_pressed(&self, button: GamepadButton) -> bool {
        self.buttons
            .get(button.index())
            .is_some_and(|b| b.pressed)
    }

    pub fn with_thumbstick(mut self, x: f32, y: f32) -> Self {
        if self.axes.len() < 4 {
            self.axes.resize(4, 0.0);
        }
        self.axes[2] = x;
        self.axes[3] = y;
        self
    }

    pub fn with_pressed(mut self, button: GamepadButton, pressed: bool) -> Self {
        let index = button.index();
        if self.buttons.len() <= index {
            self.buttons.resize(index + 1, ButtonSnapshot::default());
        }
        self.buttons[index] = if pressed {
            ButtonSnapshot::pressed()
        } else {
            ButtonSnapshot::default()
        };
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DigitalButtons {
    pub trigger: bool,
    pub squeeze: bool,
    pub touchpad: bool,
    pub thumbstick: bool,
    pub button_a: bool,
    pub button_b: bool,
}

/// Per-hand input state derived from the latest snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerState {
    pub buttons: DigitalButtons,
    pub touchpad: Vec2,
    pub thumbstick: Vec2,
    /// The runtime reported both stick axes this tick.
    pub has_thumbstick: bool,
    /// Number of button slots the runtime exposes for this controller.
    pub button_count: usize,
}

impl ControllerState {
    /// Fold a new snapshot into the state.
    ///
    /// Axes are only replaced when the snapshot carries the full stick layout,
    /// so a short axes array keeps the last known values.
    pub fn apply(&mut self, snapshot: &GamepadSnapshot) {
        if snapshot.axes.len() > 3 {
            self.touchpad = Vec2::new(snapshot.axis(0), snapshot.axis(1));
            self.thumbstick = Vec2::new(snapshot.axis(2), snapshot.axis(3));
            self.has_thumbstick = true;
        }

        self.button_count = snapshot.buttons.len();
        self.buttons = DigitalButtons {
            trigger: snapshot.is_pressed(GamepadButton::Trigger),
            squeeze: snapshot.is_pressed(GamepadButton::Squeeze),
            touchpad: snapshot.is_pressed(GamepadButton::Touchpad),
            thumbstick: snapshot.is_pressed(GamepadButton::Thumbstick),
            button_a: snapshot.is_pressed(GamepadButton::A),
            button_b: snapshot.is_pressed(GamepadButton::B),
        };
    }

    #[inline]
    pub fn has_button(&self, button: GamepadButton) -> bool {
        button.index() < self.button_count
    }
}
