//! Per-tick player input
//!
//! Input arrives already mapped from whatever device produced it: two axes
//! and three buttons, each as a float where zero means released.

/// One tick's worth of input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    /// Horizontal axis, right is positive
    pub x_axis: f32,
    /// Vertical axis, up is positive
    pub y_axis: f32,
    /// Jump button
    pub jump: f32,
    /// Dash button
    pub dash: f32,
    /// Climb button
    pub climb: f32,
}

impl InputFrame {
    /// Nothing held
    pub fn idle() -> Self {
        Self::default()
    }

    /// Set both axes, clamped to [-1, 1]
    pub fn with_axes(mut self, x_axis: f32, y_axis: f32) -> Self {
        self.x_axis = x_axis.clamp(-1.0, 1.0);
        self.y_axis = y_axis.clamp(-1.0, 1.0);
        self
    }

    /// Hold jump
    pub fn with_jump(mut self) -> Self {
        self.jump = 1.0;
        self
    }

    /// Hold dash
    pub fn with_dash(mut self) -> Self {
        self.dash = 1.0;
        self
    }

    /// Hold climb
    pub fn with_climb(mut self) -> Self {
        self.climb = 1.0;
        self
    }

    /// Is jump held?
    pub fn jump_held(&self) -> bool {
        self.jump != 0.0
    }

    /// Is dash held?
    pub fn dash_held(&self) -> bool {
        self.dash != 0.0
    }

    /// Is climb held?
    pub fn climb_held(&self) -> bool {
        self.climb != 0.0
    }
}

/// Remembers last tick's buttons so presses can be told apart from holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonLatch {
    jump_was_held: bool,
    dash_was_held: bool,
}

impl ButtonLatch {
    /// Jump went from released to held this tick
    pub fn jump_pressed(&self, frame: &InputFrame) -> bool {
        frame.jump_held() && !self.jump_was_held
    }

    /// Dash went from released to held this tick
    pub fn dash_pressed(&self, frame: &InputFrame) -> bool {
        frame.dash_held() && !self.dash_was_held
    }

    /// Store this tick's buttons for the next one
    pub fn remember(&mut self, frame: &InputFrame) {
        self.jump_was_held = frame.jump_held();
        self.dash_was_held = frame.dash_held();
    }

    /// Forget held buttons
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_fires_once_while_held() {
        let mut latch = ButtonLatch::default();
        let held = InputFrame::idle().with_jump();

        assert!(latch.jump_pressed(&held));
        latch.remember(&held);
        assert!(!latch.jump_pressed(&held));

        latch.remember(&InputFrame::idle());
        assert!(latch.jump_pressed(&held));
    }

    #[test]
    fn test_buttons_are_latched_separately() {
        let mut latch = ButtonLatch::default();
        latch.remember(&InputFrame::idle().with_dash());
        let both = InputFrame::idle().with_dash().with_jump();
        assert!(latch.jump_pressed(&both));
        assert!(!latch.dash_pressed(&both));
    }

    #[test]
    fn test_axes_are_clamped() {
        let frame = InputFrame::idle().with_axes(3.0, -2.0);
        assert_eq!(frame.x_axis, 1.0);
        assert_eq!(frame.y_axis, -1.0);
    }
}
