//! Bodies: an entity's group of colliders plus its motion state
//!
//! Based on Game Engine Architecture 3rd Edition:
//! - Section 13.3.4: Collidable entities with multiple shapes
//! - Section 13.3.2: Bounding volumes for broad-phase rejection
//!
//! Colliders are split into trigger and solid partitions by index. The
//! broad-phase radius is kept current every time a collider is added.

use super::collider::{Collider, ColliderFlags, ColliderTemplate};
use super::world::BodyHandle;
use crate::ecs::Entity;
use crate::foundation::math::{utils, Vec2};
use serde::{Deserialize, Serialize};

/// Linear motion of a body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    /// Linear velocity in units per second
    pub velocity: Vec2,
    /// Linear acceleration in units per second squared
    pub acceleration: Vec2,
}

impl Motion {
    /// Create a motion at rest
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply acceleration to velocity
    pub fn integrate(&mut self, delta_time: f32) {
        self.velocity += self.acceleration * delta_time;
    }

    /// Is the body moving at all?
    pub fn is_moving(&self) -> bool {
        self.velocity.x != 0.0 || self.velocity.y != 0.0
    }

    /// Zero velocity and acceleration
    pub fn stop(&mut self) {
        self.velocity = Vec2::zeros();
        self.acceleration = Vec2::zeros();
    }
}

/// Serializable description of a body, used to stamp out tiles and players
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTemplate {
    /// Whether the resolver moves this body
    pub moveable: bool,
    /// Colliders in order; their index becomes their id
    pub colliders: Vec<ColliderTemplate>,
}

impl BodyTemplate {
    /// Template of a static body with the given colliders
    pub fn fixed(colliders: Vec<ColliderTemplate>) -> Self {
        Self {
            moveable: false,
            colliders,
        }
    }
}

/// An entity's colliders, world position and motion
#[derive(Debug, Clone)]
pub struct Body {
    owner: Entity,
    is_moveable: bool,
    is_collidable: bool,
    world_position: Vec2,
    /// Velocity and acceleration integrated by the resolver
    pub motion: Motion,
    max_collision_distance: f32,
    colliders: Vec<Collider>,
    trigger_colliders: Vec<usize>,
    solid_colliders: Vec<usize>,
    contacts: Vec<BodyHandle>,
}

impl Body {
    /// Create an empty, static, collidable body
    pub fn new(owner: Entity, world_position: Vec2) -> Self {
        Self {
            owner,
            is_moveable: false,
            is_collidable: true,
            world_position,
            motion: Motion::new(),
            max_collision_distance: 0.0,
            colliders: Vec::new(),
            trigger_colliders: Vec::new(),
            solid_colliders: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Stamp out a body from a template for `owner` at `world_position`
    pub fn from_template(template: &BodyTemplate, owner: Entity, world_position: Vec2) -> Self {
        let mut body = Self::new(owner, world_position);
        body.is_moveable = template.moveable;
        for collider in &template.colliders {
            body.add_box_collider(collider.trigger, collider.one_way, collider.offset(), collider.size());
        }
        body
    }

    /// Let the resolver move this body
    pub fn moveable(mut self) -> Self {
        self.is_moveable = true;
        self
    }

    /// Add a box collider centered at `local_position` with full size `scale`
    ///
    /// Returns the new collider's id.
    pub fn add_box_collider(&mut self, is_trigger: bool, is_one_way: bool, local_position: Vec2, scale: Vec2) -> usize {
        let id = self.colliders.len();
        let mut flags = ColliderFlags::empty();
        flags.set(ColliderFlags::TRIGGER, is_trigger);
        flags.set(ColliderFlags::ONE_WAY, is_one_way);

        let mut collider = Collider::new_box(id, flags, local_position, scale);
        collider.update_world_position(self.world_position);
        self.colliders.push(collider);

        if is_trigger {
            self.trigger_colliders.push(id);
        } else {
            self.solid_colliders.push(id);
        }

        self.update_max_collision_distance();
        id
    }

    fn update_max_collision_distance(&mut self) {
        self.max_collision_distance = self
            .colliders
            .iter()
            .map(|c| (c.local_position().abs() + c.extent()).norm())
            .fold(0.0, f32::max);
    }

    /// Owning entity
    pub fn owner(&self) -> Entity {
        self.owner
    }

    /// Does the resolver move this body?
    pub fn is_moveable(&self) -> bool {
        self.is_moveable
    }

    /// Allow or forbid movement
    pub fn set_moveable(&mut self, moveable: bool) {
        self.is_moveable = moveable;
    }

    /// Does this body take part in resolution and contact tracking?
    pub fn is_collidable(&self) -> bool {
        self.is_collidable
    }

    pub(crate) fn set_collidable_flag(&mut self, collidable: bool) {
        self.is_collidable = collidable;
    }

    /// World position of the body origin
    pub fn position(&self) -> Vec2 {
        self.world_position
    }

    /// Teleport the body, carrying its colliders along
    pub fn set_position(&mut self, position: Vec2) {
        self.world_position = position;
        self.update_world_position();
    }

    /// Move the body by `delta`, carrying its colliders along
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.world_position + delta);
    }

    /// Resync every collider to the body position
    pub fn update_world_position(&mut self) {
        let position = self.world_position;
        for collider in &mut self.colliders {
            collider.update_world_position(position);
        }
    }

    /// Broad-phase radius around the body origin
    pub fn max_collision_distance(&self) -> f32 {
        self.max_collision_distance
    }

    /// Broad-phase test: are the bodies close enough for their colliders to touch?
    pub fn in_collision_range(&self, other: &Body) -> bool {
        utils::distance(self.world_position, other.world_position)
            < self.max_collision_distance + other.max_collision_distance
    }

    /// All colliders in id order
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Collider by id
    pub fn collider(&self, index: usize) -> Option<&Collider> {
        self.colliders.get(index)
    }

    pub(crate) fn collider_mut(&mut self, index: usize) -> Option<&mut Collider> {
        self.colliders.get_mut(index)
    }

    pub(crate) fn colliders_mut(&mut self) -> impl Iterator<Item = &mut Collider> {
        self.colliders.iter_mut()
    }

    /// Ids of trigger colliders
    pub fn trigger_indices(&self) -> &[usize] {
        &self.trigger_colliders
    }

    /// Ids of solid colliders
    pub fn solid_indices(&self) -> &[usize] {
        &self.solid_colliders
    }

    /// Trigger collider by its position in the trigger partition
    pub fn trigger_collider(&self, nth: usize) -> Option<&Collider> {
        self.trigger_colliders.get(nth).and_then(|&i| self.colliders.get(i))
    }

    /// Does the body have any trigger colliders?
    pub fn has_triggers(&self) -> bool {
        !self.trigger_colliders.is_empty()
    }

    /// Does the body have any solid colliders?
    pub fn has_solids(&self) -> bool {
        !self.solid_colliders.is_empty()
    }

    /// Bodies this body is in broad-phase contact with
    pub fn contacts(&self) -> &[BodyHandle] {
        &self.contacts
    }

    /// Is `other` a body-level contact?
    pub fn is_contacting(&self, other: BodyHandle) -> bool {
        self.contacts.contains(&other)
    }

    pub(crate) fn enter_contact(&mut self, other: BodyHandle) -> bool {
        if self.is_contacting(other) {
            return false;
        }
        self.contacts.push(other);
        true
    }

    pub(crate) fn exit_contact(&mut self, other: BodyHandle) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|&b| b != other);
        self.contacts.len() != before
    }

    pub(crate) fn take_contacts(&mut self) -> Vec<BodyHandle> {
        std::mem::take(&mut self.contacts)
    }
}
