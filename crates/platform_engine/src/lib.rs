//! # Platform Engine
//!
//! The movement and collision core for 2D platformers.
//!
//! ## Features
//!
//! - **Box Colliders**: Axis-aligned boxes with trigger and one-way flags
//! - **Swept Resolution**: Earliest-time-of-impact resolution against static geometry
//! - **Contact Tracking**: Symmetric enter/exit contacts between triggers and solids
//! - **Generational Handles**: Destroyed bodies resolve to `None`, never to stale data
//! - **Scaled Clock**: Per-simulation time scale for slow-motion effects
//!
//! ## Quick Start
//!
//! ```rust
//! use platform_engine::prelude::*;
//!
//! let mut world = World::new();
//! let mut physics = PhysicsWorld::new();
//!
//! let ground = world.create_entity();
//! let mut body = Body::new(ground, Vec2::new(0.0, 0.0));
//! body.add_box_collider(false, false, Vec2::zeros(), Vec2::new(4.0, 1.0));
//! physics.spawn_body(body);
//!
//! let crate_entity = world.create_entity();
//! let mut falling = Body::new(crate_entity, Vec2::new(0.0, 3.0)).moveable();
//! falling.add_box_collider(false, false, Vec2::zeros(), Vec2::new(1.0, 1.0));
//! falling.motion.velocity = Vec2::new(0.0, -10.0);
//! let handle = physics.spawn_body(falling);
//!
//! let mut clock = SimulationClock::new();
//! let mut resolver = CollisionResolver::new();
//! let dt = clock.advance(1.0 / 60.0);
//! resolver.step(&mut physics, dt);
//! assert!(physics.body(handle).is_some());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{Entity, World},
        events::{EventHandler, EventQueue},
        foundation::{
            math::{utils::sign, Vec2},
            time::SimulationClock,
        },
        physics::{
            Aabb, Body, BodyHandle, BodyTemplate, CollisionCheck, CollisionResolver, Collider,
            ColliderFlags, ColliderHandle, ColliderTemplate, ContactEvent, ContactTracker,
            PhysicsWorld, RaycastHit,
        },
    };
}
