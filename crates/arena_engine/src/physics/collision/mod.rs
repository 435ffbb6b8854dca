//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Boxes, capsules and the separating-axis test
//! - [`shape`] - The shape sum type stored on colliders
//!
//! All shapes are stored in world space. Entities rebuild or re-center their
//! shapes every frame before registering them with the collision manager.

pub mod primitives;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Aabb, Capsule, Obb, SAT_AXIS_EPSILON};
pub use shape::ColliderShape;
