//! Swept collision resolution
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! For each moving body the resolver gathers solid bodies in broad-phase
//! range, sweeps every solid collider pair over the frame's travel, sorts the
//! impacts by time and then cancels the velocity component pushing into each
//! surface in turn. Only after that is the body translated.

use super::collider::ColliderHandle;
use super::world::{BodyHandle, PhysicsWorld};
use crate::foundation::math::Vec2;

/// Resolves velocities of moving bodies against solid colliders
#[derive(Debug, Default)]
pub struct CollisionResolver {
    candidates: Vec<BodyHandle>,
    hits: Vec<(f32, ColliderHandle)>,
}

impl CollisionResolver {
    /// Create a resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate acceleration, then resolve and translate every moving body
    pub fn step(&mut self, world: &mut PhysicsWorld, delta_time: f32) {
        Self::integrate_acceleration(world, delta_time);
        self.resolve_and_translate(world, delta_time);
    }

    /// `velocity += acceleration * dt` for every moveable body
    pub fn integrate_acceleration(world: &mut PhysicsWorld, delta_time: f32) {
        for handle in world.handles() {
            if let Some(body) = world.body_mut(handle) {
                if body.is_moveable() {
                    body.motion.integrate(delta_time);
                }
            }
        }
    }

    /// Move every moveable body by its velocity, stopping at solid surfaces
    ///
    /// Bodies are processed in arena order and each one is translated before
    /// the next is resolved.
    pub fn resolve_and_translate(&mut self, world: &mut PhysicsWorld, delta_time: f32) {
        for handle in world.handles() {
            let Some(body) = world.body(handle) else {
                continue;
            };
            if !body.is_moveable() || !body.motion.is_moving() {
                continue;
            }

            let velocity = if body.is_collidable() && body.has_solids() {
                self.resolve_velocity(world, handle, delta_time)
            } else {
                body.motion.velocity
            };

            if let Some(body) = world.body_mut(handle) {
                body.motion.velocity = velocity;
                body.translate(velocity * delta_time);
            }
        }
    }

    /// Velocity of `handle` after cancelling motion into every surface it
    /// would hit this frame
    pub fn resolve_velocity(&mut self, world: &PhysicsWorld, handle: BodyHandle, delta_time: f32) -> Vec2 {
        let Some(mover) = world.body(handle) else {
            return Vec2::zeros();
        };
        let mut velocity = mover.motion.velocity;
        let mut move_delta = velocity * delta_time;

        self.candidates.clear();
        self.candidates.extend(world.iter().filter_map(|(other_handle, other)| {
            let candidate = other_handle != handle
                && other.is_collidable()
                && other.has_solids()
                && other.owner() != mover.owner()
                && mover.in_collision_range(other);
            candidate.then_some(other_handle)
        }));

        self.hits.clear();
        for &own in mover.solid_indices() {
            let own_collider = &mover.colliders()[own];
            for &candidate in &self.candidates {
                let Some(other) = world.body(candidate) else {
                    continue;
                };
                for &index in other.solid_indices() {
                    if let Some(hit) = own_collider.dynamic_collision_check_2d(&other.colliders()[index], move_delta) {
                        self.hits.push((hit.contact_time, ColliderHandle::new(candidate, index)));
                    }
                }
            }
        }

        if self.hits.is_empty() {
            return velocity;
        }
        // Stable: equal times keep encounter order
        self.hits.sort_by(|a, b| a.0.total_cmp(&b.0));

        for &own in mover.solid_indices() {
            let own_collider = &mover.colliders()[own];
            for &(_, target) in &self.hits {
                let Some(other) = world.collider(target) else {
                    continue;
                };
                if let Some(hit) = own_collider.dynamic_collision_check_2d(other, move_delta) {
                    velocity += hit.normal.component_mul(&velocity.abs());
                    move_delta = velocity * delta_time;
                    log::trace!(
                        "Body {:?} hit {:?} at t={:.3}, velocity now ({:.3}, {:.3})",
                        handle,
                        target.body,
                        hit.contact_time,
                        velocity.x,
                        velocity.y
                    );
                }
            }
        }

        velocity
    }
}
