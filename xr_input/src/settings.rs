//! Runtime locomotion options, set by scenes.

/// How vertical flight is driven on the right controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlyingMethod {
    /// Thumbstick Y beyond the flight deadzone.
    #[default]
    Joystick,
    /// Button A descends, button B climbs.
    Buttons,
}

/// Every scene starts from [`LocomotionSettings::default`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocomotionSettings {
    pub flying_mode_enabled: bool,
    /// Flight is always available instead of toggled by a double press on A.
    pub always_flying: bool,
    pub flying_method: FlyingMethod,
    pub jump_enabled: bool,
    /// Snap turns instead of smooth turning.
    pub discrete_rotation: bool,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            flying_mode_enabled: true,
            always_flying: true,
            flying_method: FlyingMethod::Joystick,
            jump_enabled: true,
            discrete_rotation: false,
        }
    }
}

impl LocomotionSettings {
    #[inline]
    pub fn flying_uses_joystick(&self) -> bool {
        self.flying_method == FlyingMethod::Joystick
    }
}
