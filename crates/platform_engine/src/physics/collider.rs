//! Box colliders and their contact lists
//!
//! Based on Game Engine Architecture 3rd Edition:
//! - Section 13.3.4: Collidable entities
//! - Section 13.3.8: Collision filtering (trigger and one-way flags)
//!
//! A collider is one box owned by a [`Body`](super::Body). Its contacts are
//! handles to other colliders, never references, so a destroyed body can only
//! leave behind handles that resolve to `None`.

use super::collision::{ColliderShape, CollisionCheck, RaycastHit};
use super::world::BodyHandle;
use crate::foundation::math::Vec2;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Behavior flags of a collider
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColliderFlags: u8 {
        /// Detects overlap only, never blocks movement
        const TRIGGER = 1 << 0;
        /// Blocks only downward approach from above
        const ONE_WAY = 1 << 1;
    }
}

/// Stable reference to one collider of one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle {
    /// Owning body
    pub body: BodyHandle,
    /// Index of the collider within the body
    pub index: usize,
}

impl ColliderHandle {
    /// Creates a handle
    pub fn new(body: BodyHandle, index: usize) -> Self {
        Self { body, index }
    }
}

/// Serializable description of a box collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderTemplate {
    /// Detects overlap only
    pub trigger: bool,
    /// Passable from below
    pub one_way: bool,
    /// Offset of the box center from the body origin
    pub offset: (f32, f32),
    /// Full size of the box
    pub size: (f32, f32),
}

impl Default for ColliderTemplate {
    fn default() -> Self {
        Self {
            trigger: false,
            one_way: false,
            offset: (0.0, 0.0),
            size: (1.0, 1.0),
        }
    }
}

impl ColliderTemplate {
    /// A solid box
    pub fn solid(offset: Vec2, size: Vec2) -> Self {
        Self {
            offset: (offset.x, offset.y),
            size: (size.x, size.y),
            ..Self::default()
        }
    }

    /// Mark this as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.trigger = true;
        self
    }

    /// Mark this as a one-way platform
    pub fn as_one_way(mut self) -> Self {
        self.one_way = true;
        self
    }

    /// Offset as a vector
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset.0, self.offset.1)
    }

    /// Size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1)
    }
}

/// A single box collider
#[derive(Debug, Clone)]
pub struct Collider {
    id: usize,
    flags: ColliderFlags,
    local_position: Vec2,
    shape: ColliderShape,
    contacts: Vec<ColliderHandle>,
}

impl Collider {
    /// Create a box collider. Its world bounds are centered on `local_position`
    /// until the first [`Collider::update_world_position`].
    pub fn new_box(id: usize, flags: ColliderFlags, local_position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            flags,
            local_position,
            shape: ColliderShape::new_box(local_position, size),
            contacts: Vec::new(),
        }
    }

    /// Id of the collider within its body
    pub fn id(&self) -> usize {
        self.id
    }

    /// Behavior flags
    pub fn flags(&self) -> ColliderFlags {
        self.flags
    }

    /// Is this a trigger volume?
    pub fn is_trigger(&self) -> bool {
        self.flags.contains(ColliderFlags::TRIGGER)
    }

    /// Is this a one-way platform?
    pub fn is_one_way(&self) -> bool {
        self.flags.contains(ColliderFlags::ONE_WAY)
    }

    /// Offset from the body origin
    pub fn local_position(&self) -> Vec2 {
        self.local_position
    }

    /// The collider's shape in world space
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.shape.center()
    }

    /// Half size
    pub fn extent(&self) -> Vec2 {
        self.shape.extent()
    }

    /// Follow the body to `body_position`
    pub fn update_world_position(&mut self, body_position: Vec2) {
        self.shape.set_center(body_position + self.local_position);
    }

    /// Point of this collider closest to the other collider's center
    pub fn closest_point(&self, other: &Collider) -> Vec2 {
        self.shape.closest_point(other.center())
    }

    /// Static overlap test
    pub fn collision_check(&self, other: &Collider) -> CollisionCheck {
        self.shape.collision_check(&other.shape)
    }

    /// Swept test of this collider moving by `move_delta` against `other`
    ///
    /// One-way colliders are ignored when moving up or sideways, or when
    /// already overlapping them. A hit is only reported inside this frame's
    /// travel (contact time at most 1).
    pub fn dynamic_collision_check_2d(&self, other: &Collider, move_delta: Vec2) -> Option<RaycastHit> {
        if move_delta.x == 0.0 && move_delta.y == 0.0 {
            return None;
        }

        if other.is_one_way()
            && (move_delta.y >= 0.0 || self.collision_check(other).is_collision())
        {
            return None;
        }

        self.shape
            .sweep(&other.shape, move_delta)
            .filter(|hit| hit.contact_time <= 1.0)
    }

    /// Colliders currently overlapping this one
    pub fn contacts(&self) -> &[ColliderHandle] {
        &self.contacts
    }

    /// Is `other` in the contact list?
    pub fn is_contacting(&self, other: ColliderHandle) -> bool {
        self.contacts.contains(&other)
    }

    /// Record a contact. Returns false if it was already recorded.
    pub(crate) fn enter_contact(&mut self, other: ColliderHandle) -> bool {
        if self.is_contacting(other) {
            return false;
        }
        self.contacts.push(other);
        true
    }

    /// Forget a contact. Returns false if it was not recorded.
    pub(crate) fn exit_contact(&mut self, other: ColliderHandle) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|&c| c != other);
        self.contacts.len() != before
    }

    /// Forget every contact with colliders of `body`, returning what was removed
    pub(crate) fn drop_contacts_of_body(&mut self, body: BodyHandle) -> Vec<ColliderHandle> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.contacts)
            .into_iter()
            .partition(|c| c.body == body);
        self.contacts = kept;
        removed
    }

    /// Forget every contact, returning what was removed
    pub(crate) fn take_contacts(&mut self) -> Vec<ColliderHandle> {
        std::mem::take(&mut self.contacts)
    }
}
