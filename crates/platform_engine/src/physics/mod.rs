//! Physics module for platformer collision detection and response
//!
//! Provides box colliders grouped into bodies, swept resolution of moving
//! bodies against solid geometry, and symmetric trigger contact tracking.
//!
//! A tick runs [`CollisionResolver::step`] and then
//! [`ContactTracker::update`]; contact changes are collected as
//! [`ContactEvent`]s on the [`PhysicsWorld`].

pub mod body;
pub mod collider;
pub mod collision;
pub mod contacts;
pub mod resolver;
pub mod world;

pub use body::{Body, BodyTemplate, Motion};
pub use collider::{Collider, ColliderFlags, ColliderHandle, ColliderTemplate};
pub use collision::{Aabb, BoxShape, ColliderShape, CollisionCheck, Ray, RaycastHit};
pub use contacts::{ContactEvent, ContactPair, ContactTracker};
pub use resolver::CollisionResolver;
pub use world::{BodyHandle, PhysicsWorld};
