//! Math utilities and types
//!
//! Provides the 2D vector types used by collision and movement code.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Math utility functions
pub mod utils {
    use super::Vec2;

    /// Sign of `value` as -1, 0 or 1.
    ///
    /// Unlike `f32::signum`, zero (of either sign) maps to 0 so decisions made on
    /// a velocity that is exactly at rest do not flicker.
    pub fn sign(value: f32) -> f32 {
        if value > 0.0 {
            1.0
        } else if value < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    /// Normalize `v`, or return `fallback` when it has no length
    pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
        v.try_normalize(f32::EPSILON).unwrap_or(fallback)
    }

    /// Distance between two points
    pub fn distance(a: Vec2, b: Vec2) -> f32 {
        (a - b).norm()
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}
