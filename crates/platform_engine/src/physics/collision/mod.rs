//! Narrow-phase collision geometry
//!
//! Provides the axis-aligned box primitives and the swept slab test that the
//! resolver and contact tracker are built on.
//!
//! # Architecture
//!
//! This module follows Game Engine Architecture 3rd Edition (GEA 13.3.5):
//! - **Shape Variants**: Every collider shape is a case of [`ColliderShape`]
//! - **Swept Tests**: Moving boxes are tested as rays against a Minkowski-expanded box
//! - **No Faults**: Degenerate input (zero movement, parallel rays) means "no collision"
//!
//! # Module Organization
//!
//! - [`primitives`] - Boxes, rays and the slab raycast
//! - [`shape`] - Collider shape variants and static overlap results

pub mod primitives;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Aabb, Ray, RaycastHit};
pub use shape::{BoxShape, ColliderShape, CollisionCheck};
