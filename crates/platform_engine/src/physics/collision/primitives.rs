//! Primitive collision shapes and intersection algorithms
//!
//! Provides axis-aligned boxes and rays, with the slab test used for swept
//! box collision.

use crate::foundation::math::Vec2;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a box centered on `center` with the full `size`
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center of the box
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Half size of the box
    pub fn extent(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Overlap test on both axes. Touching edges count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Point inside this box closest to `point`
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Grow the box by `amount` on every side (Minkowski sum with a box of
    /// half size `amount`)
    pub fn expanded(&self, amount: Vec2) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }
}

/// A ray for swept tests
///
/// The direction is NOT normalized: hit times are fractions of `direction`, so
/// a ray built from a frame's movement reports impacts within that frame as
/// times in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec2,
    /// The travel of the ray for t = 1
    pub direction: Vec2,
}

/// Result of a ray versus box test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Where the ray first touches the box
    pub contact_point: Vec2,
    /// Axis-aligned surface normal, pointing against the travel direction
    pub normal: Vec2,
    /// Fraction of the ray direction travelled before contact
    pub contact_time: f32,
}

impl Ray {
    /// Creates a new ray
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at time t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// Slab test against an axis-aligned box
    ///
    /// Returns the entry hit even when it lies past `t = 1` or before `t = 0`;
    /// callers decide which window counts. A ray that only touches the box
    /// while travelling away from it (far time behind the origin) misses.
    pub fn cast_against_box(&self, target: &Aabb) -> Option<RaycastHit> {
        let mut near = (target.min - self.origin).component_div(&self.direction);
        let mut far = (target.max - self.origin).component_div(&self.direction);

        // 0/0 on an axis: the ray runs exactly along a slab boundary
        if near.x.is_nan() || near.y.is_nan() || far.x.is_nan() || far.y.is_nan() {
            return None;
        }

        if near.x > far.x {
            std::mem::swap(&mut near.x, &mut far.x);
        }
        if near.y > far.y {
            std::mem::swap(&mut near.y, &mut far.y);
        }

        if near.x > far.y || near.y > far.x {
            return None;
        }

        let contact_time = near.x.max(near.y);
        let far_time = far.x.min(far.y);
        if far_time < 0.0 {
            return None;
        }

        let normal = if near.x > near.y {
            Vec2::new(if self.direction.x < 0.0 { 1.0 } else { -1.0 }, 0.0)
        } else {
            Vec2::new(0.0, if self.direction.y < 0.0 { 1.0 } else { -1.0 })
        };

        Some(RaycastHit {
            contact_point: self.point_at(contact_time),
            normal,
            contact_time,
        })
    }
}
