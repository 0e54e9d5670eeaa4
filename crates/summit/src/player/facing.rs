//! Turning the player around
//!
//! The player rotates half a turn about the vertical axis whenever the run
//! direction changes. Progress is kept in degrees, 0 when facing right and
//! 180 when facing left, for the renderer to apply.

/// Which way a turn in progress is rotating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flip {
    /// Not turning
    #[default]
    None,
    /// Rotating toward facing right (degrees decreasing)
    TowardRight,
    /// Rotating toward facing left (degrees increasing)
    TowardLeft,
}

/// Facing direction and turn progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facing {
    facing_right: bool,
    flip: Flip,
    degrees_flipped: f32,
}

impl Default for Facing {
    fn default() -> Self {
        Self::new()
    }
}

impl Facing {
    /// Facing right, not turning
    pub fn new() -> Self {
        Self {
            facing_right: true,
            flip: Flip::None,
            degrees_flipped: 0.0,
        }
    }

    /// Face `direction` (sign only) and advance the turn by `delta_time`
    ///
    /// A full half turn takes `flip_time_ms` milliseconds. Reversing mid-turn
    /// finishes the current turn first and then comes back.
    pub fn update(&mut self, direction: f32, flip_time_ms: u32, delta_time: f32) {
        if (self.facing_right && direction < 0.0) || (!self.facing_right && direction > 0.0) {
            self.facing_right = direction > 0.0;
            if self.flip == Flip::None {
                self.flip = if direction > 0.0 { Flip::TowardRight } else { Flip::TowardLeft };
            }
        }

        let step = 180.0 * (1000.0 / flip_time_ms.max(1) as f32) * delta_time;
        match self.flip {
            Flip::None => {}
            Flip::TowardRight => {
                self.degrees_flipped -= step;
                if self.degrees_flipped <= 0.0 {
                    self.degrees_flipped = 0.0;
                    self.flip = if self.facing_right { Flip::None } else { Flip::TowardLeft };
                }
            }
            Flip::TowardLeft => {
                self.degrees_flipped += step;
                if self.degrees_flipped >= 180.0 {
                    self.degrees_flipped = 180.0;
                    self.flip = if self.facing_right { Flip::TowardRight } else { Flip::None };
                }
            }
        }
    }

    /// Facing right?
    pub fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    /// Turn in progress
    pub fn flip(&self) -> Flip {
        self.flip
    }

    /// Rotation away from facing right, in degrees
    pub fn degrees_flipped(&self) -> f32 {
        self.degrees_flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FLIP_MS: u32 = 100;

    #[test]
    fn test_turning_left_takes_flip_time() {
        let mut facing = Facing::new();
        facing.update(-1.0, FLIP_MS, 0.05);
        assert!(!facing.is_facing_right());
        assert_eq!(facing.flip(), Flip::TowardLeft);
        assert_relative_eq!(facing.degrees_flipped(), 90.0);

        facing.update(-1.0, FLIP_MS, 0.05);
        assert_relative_eq!(facing.degrees_flipped(), 180.0);
        assert_eq!(facing.flip(), Flip::None);
    }

    #[test]
    fn test_no_input_keeps_facing() {
        let mut facing = Facing::new();
        facing.update(0.0, FLIP_MS, 1.0);
        assert!(facing.is_facing_right());
        assert_eq!(facing.degrees_flipped(), 0.0);
    }

    #[test]
    fn test_reversing_mid_turn_comes_back() {
        let mut facing = Facing::new();
        facing.update(-1.0, FLIP_MS, 0.05);
        facing.update(1.0, FLIP_MS, 0.025);
        // Still finishing the left turn
        assert!(facing.is_facing_right());
        assert_relative_eq!(facing.degrees_flipped(), 135.0);

        facing.update(1.0, FLIP_MS, 0.05);
        assert_eq!(facing.flip(), Flip::TowardRight);
        facing.update(1.0, FLIP_MS, 0.2);
        assert_eq!(facing.degrees_flipped(), 0.0);
        assert_eq!(facing.flip(), Flip::None);
    }
}
