/// Rising-edge detector for a held button.
///
/// Fires once when the input goes from released to pressed, not once per
/// tick while it stays down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetTrigger {
    pub was_pressed: bool,
}

impl ResetTrigger {
    /// Feed the current input level and report whether it just went down
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }
}
