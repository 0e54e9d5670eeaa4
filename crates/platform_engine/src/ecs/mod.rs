//! Entity bookkeeping
//!
//! Entities are plain identifiers. Collision state lives in the physics world
//! keyed by the owning entity; game state lives in the game crate.

pub mod entity;
pub mod world;

pub use entity::Entity;
pub use world::World;
