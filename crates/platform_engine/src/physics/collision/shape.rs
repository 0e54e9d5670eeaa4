//! Collider shape variants
//!
//! Shapes keep their size fixed and their world-space bounds cached. The
//! bounds are re-derived whenever the owning body moves, so every test reads
//! world-space data directly.

use super::primitives::{Aabb, Ray, RaycastHit};
use crate::foundation::math::Vec2;

/// Result of a static overlap test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCheck {
    /// The shapes are apart
    NoCollision,
    /// The shapes overlap or touch
    Collision,
}

impl CollisionCheck {
    /// Did the test report an overlap?
    pub fn is_collision(self) -> bool {
        self == Self::Collision
    }
}

impl From<bool> for CollisionCheck {
    fn from(overlapping: bool) -> Self {
        if overlapping {
            Self::Collision
        } else {
            Self::NoCollision
        }
    }
}

/// Box shape data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    /// Full size of the box
    pub size: Vec2,
    /// Current world-space bounds
    pub bounds: Aabb,
}

impl BoxShape {
    /// Create a box of `size` centered on `center`
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            size,
            bounds: Aabb::from_center_size(center, size),
        }
    }
}

/// Collision shape types
///
/// Only boxes exist today. New shapes are new variants, and every `match`
/// below must handle them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box
    Box(BoxShape),
}

impl ColliderShape {
    /// Creates a box shape
    pub fn new_box(center: Vec2, size: Vec2) -> Self {
        Self::Box(BoxShape::new(center, size))
    }

    /// World-space bounds
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Box(shape) => shape.bounds,
        }
    }

    /// Full size of the shape
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Box(shape) => shape.size,
        }
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Half size of the shape
    pub fn extent(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Re-center the shape in world space
    pub fn set_center(&mut self, center: Vec2) {
        match self {
            Self::Box(shape) => shape.bounds = Aabb::from_center_size(center, shape.size),
        }
    }

    /// Point on or inside this shape closest to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        match self {
            Self::Box(shape) => shape.bounds.clamp_point(point),
        }
    }

    /// Static overlap test
    pub fn collision_check(&self, other: &ColliderShape) -> CollisionCheck {
        match (self, other) {
            (Self::Box(a), Self::Box(b)) => a.bounds.overlaps(&b.bounds).into(),
        }
    }

    /// Cast this shape along `move_delta` against `other`
    ///
    /// Returns the earliest hit of the swept shape regardless of whether it lies
    /// within this frame's travel.
    pub fn sweep(&self, other: &ColliderShape, move_delta: Vec2) -> Option<RaycastHit> {
        match (self, other) {
            (Self::Box(mover), Self::Box(target)) => {
                let expanded = target.bounds.expanded(mover.size * 0.5);
                Ray::new(mover.bounds.center(), move_delta).cast_against_box(&expanded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_set_center_keeps_size() {
        let mut shape = ColliderShape::new_box(Vec2::zeros(), Vec2::new(2.0, 1.0));
        shape.set_center(Vec2::new(10.0, 5.0));
        assert_eq!(shape.bounds().min, Vec2::new(9.0, 4.5));
        assert_eq!(shape.bounds().max, Vec2::new(11.0, 5.5));
        assert_eq!(shape.size(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_collision_check_is_symmetric() {
        let origin = ColliderShape::new_box(Vec2::zeros(), Vec2::new(1.0, 1.0));
        for step in 0..12 {
            let offset = step as f32 * 0.25;
            let other = ColliderShape::new_box(Vec2::new(offset, offset * 0.5), Vec2::new(1.0, 2.0));
            assert_eq!(origin.collision_check(&other), other.collision_check(&origin));
        }
    }

    #[test]
    fn test_sweep_uses_minkowski_expansion() {
        let mover = ColliderShape::new_box(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0));
        let target = ColliderShape::new_box(Vec2::new(2.0, 0.5), Vec2::new(1.0, 1.0));
        let hit = mover.sweep(&target, Vec2::new(2.0, 0.0)).unwrap();
        assert_relative_eq!(hit.contact_time, 0.25);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_closest_point_clamps_into_box() {
        let shape = ColliderShape::new_box(Vec2::zeros(), Vec2::new(2.0, 2.0));
        assert_eq!(shape.closest_point(Vec2::new(3.0, 0.5)), Vec2::new(1.0, 0.5));
    }
}
