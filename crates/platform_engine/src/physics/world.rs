//! Physics world: the single owner of every body
//!
//! Bodies live in a generational arena. Handles to destroyed bodies resolve
//! to `None`, and destruction scrubs every contact list that referenced the
//! body before the slot is freed, so no stale handle survives a removal.
//!
//! All contact links go through this type so both sides of a pair are
//! updated together and a matching [`ContactEvent`] is queued.

use super::body::Body;
use super::collider::{Collider, ColliderHandle};
use super::contacts::{ContactEvent, ContactPair};
use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generational handle to a body in a [`PhysicsWorld`]
    pub struct BodyHandle;
}

/// Arena of bodies plus the queue of contact events
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    bodies: SlotMap<BodyHandle, Body>,
    events: Vec<ContactEvent>,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a body and return its handle
    pub fn spawn_body(&mut self, mut body: Body) -> BodyHandle {
        body.update_world_position();
        let owner = body.owner();
        let handle = self.bodies.insert(body);
        log::trace!("Spawned body {:?} for {}", handle, owner);
        handle
    }

    /// Remove a body, scrubbing every contact that references it first
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Option<Body> {
        if !self.bodies.contains_key(handle) {
            log::warn!("Tried to destroy missing body {:?}", handle);
            return None;
        }
        self.drop_all_contacts(handle);
        self.bodies.remove(handle)
    }

    /// Remove every body owned by `owner`. Returns how many were removed.
    pub fn destroy_bodies_of(&mut self, owner: Entity) -> usize {
        let handles: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.owner() == owner)
            .map(|(handle, _)| handle)
            .collect();
        for &handle in &handles {
            self.destroy_body(handle);
        }
        handles.len()
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Look up a body for mutation
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Look up a collider
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.bodies.get(handle.body)?.collider(handle.index)
    }

    /// Owning entity of a collider
    pub fn owner_of(&self, handle: ColliderHandle) -> Option<Entity> {
        self.bodies.get(handle.body).map(Body::owner)
    }

    /// Is the handle still live?
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Are there no bodies at all?
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Snapshot of every live handle, in arena order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.bodies.keys().collect()
    }

    /// Iterate over live bodies
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    /// Teleport a body
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_position(position);
        }
    }

    /// Allow or forbid the resolver to move a body
    pub fn set_moveable(&mut self, handle: BodyHandle, moveable: bool) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_moveable(moveable);
        }
    }

    /// Turn collision on or off. Turning it off drops every contact.
    pub fn set_collidable(&mut self, handle: BodyHandle, collidable: bool) {
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };
        body.set_collidable_flag(collidable);
        if !collidable {
            self.drop_all_contacts(handle);
        }
    }

    /// Record a body-level contact on both sides
    pub(crate) fn link_bodies(&mut self, a: BodyHandle, b: BodyHandle) {
        if let Some(body) = self.bodies.get_mut(a) {
            body.enter_contact(b);
        }
        if let Some(body) = self.bodies.get_mut(b) {
            body.enter_contact(a);
        }
    }

    /// Record a collider contact on both sides and queue an enter event
    pub(crate) fn link_colliders(&mut self, a: ColliderHandle, b: ColliderHandle) {
        let entered_a = self.with_collider(a, |c| c.enter_contact(b)).unwrap_or(false);
        let entered_b = self.with_collider(b, |c| c.enter_contact(a)).unwrap_or(false);
        if entered_a || entered_b {
            if let Some(pair) = self.contact_pair(a, b) {
                self.events.push(ContactEvent::Entered(pair));
            }
        }
    }

    /// Remove a collider contact from both sides and queue an exit event
    pub(crate) fn unlink_colliders(&mut self, a: ColliderHandle, b: ColliderHandle) {
        let exited_a = self.with_collider(a, |c| c.exit_contact(b)).unwrap_or(false);
        let exited_b = self.with_collider(b, |c| c.exit_contact(a)).unwrap_or(false);
        if exited_a || exited_b {
            if let Some(pair) = self.contact_pair(a, b) {
                self.events.push(ContactEvent::Exited(pair));
            }
        }
    }

    /// Remove the body-level contact between `a` and `b` and every collider
    /// contact running between them, on both sides
    pub fn exit_contacts(&mut self, a: BodyHandle, b: BodyHandle) {
        if let Some(body) = self.bodies.get_mut(a) {
            body.exit_contact(b);
        }
        if let Some(body) = self.bodies.get_mut(b) {
            body.exit_contact(a);
        }

        let mut pairs = Vec::new();
        for (from, to) in [(a, b), (b, a)] {
            if let Some(body) = self.bodies.get_mut(from) {
                for collider in body.colliders_mut() {
                    let own = ColliderHandle::new(from, collider.id());
                    for peer in collider.drop_contacts_of_body(to) {
                        pairs.push((own, peer));
                    }
                }
            }
        }
        self.finish_unlinks(pairs);
    }

    /// Remove every contact of a body, on its side and on every peer's side
    pub fn drop_all_contacts(&mut self, handle: BodyHandle) {
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };
        let body_peers = body.take_contacts();

        let mut pairs = Vec::new();
        for collider in body.colliders_mut() {
            let own = ColliderHandle::new(handle, collider.id());
            for peer in collider.take_contacts() {
                pairs.push((own, peer));
            }
        }

        for peer in body_peers {
            if let Some(other) = self.bodies.get_mut(peer) {
                other.exit_contact(handle);
            }
        }
        self.finish_unlinks(pairs);
    }

    /// Clear the peer side of already-removed collider contacts and queue the
    /// exit events, deduplicating pairs seen from both ends
    fn finish_unlinks(&mut self, pairs: Vec<(ColliderHandle, ColliderHandle)>) {
        let mut reported: Vec<(ColliderHandle, ColliderHandle)> = Vec::new();
        for (own, peer) in pairs {
            self.with_collider(peer, |c| c.exit_contact(own));
            if reported.contains(&(peer, own)) {
                continue;
            }
            reported.push((own, peer));
            if let Some(pair) = self.contact_pair(own, peer) {
                self.events.push(ContactEvent::Exited(pair));
            }
        }
    }

    fn with_collider<R>(&mut self, handle: ColliderHandle, f: impl FnOnce(&mut Collider) -> R) -> Option<R> {
        self.bodies
            .get_mut(handle.body)
            .and_then(|body| body.collider_mut(handle.index))
            .map(f)
    }

    /// Build an event record, ordering the pair trigger-first
    fn contact_pair(&self, a: ColliderHandle, b: ColliderHandle) -> Option<ContactPair> {
        let a_owner = self.owner_of(a)?;
        let b_owner = self.owner_of(b)?;
        let a_is_trigger = self.collider(a).is_some_and(Collider::is_trigger);
        Some(if a_is_trigger {
            ContactPair::new(a, a_owner, b, b_owner)
        } else {
            ContactPair::new(b, b_owner, a, a_owner)
        })
    }

    /// Contact events queued since the last drain
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Take every queued contact event
    pub fn drain_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check that every collider contact is recorded on both sides and every
    /// handle resolves to a live collider
    pub fn contacts_are_consistent(&self) -> bool {
        self.bodies.iter().all(|(handle, body)| {
            let bodies_ok = body
                .contacts()
                .iter()
                .all(|&peer| self.body(peer).is_some_and(|other| other.is_contacting(handle)));
            let colliders_ok = body.colliders().iter().all(|collider| {
                let own = ColliderHandle::new(handle, collider.id());
                collider
                    .contacts()
                    .iter()
                    .all(|&peer| self.collider(peer).is_some_and(|other| other.is_contacting(own)))
            });
            bodies_ok && colliders_ok
        })
    }
}
