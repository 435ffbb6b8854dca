//! Physics module for collision detection and response
//!
//! - [`collision`] - shapes and the separating-axis test
//! - [`collider`] - colliders with stable serial ids
//! - [`collision_system`] - the per-frame pairwise collision manager
//! - [`contact_record`] - single-hit bookkeeping for attacks
//! - [`world_collision`] - swept resolution against static level boxes

pub mod collider;
pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod contact_record;
pub mod world_collision;

pub use collider::{Collider, ColliderKind};
pub use collision::{Aabb, Capsule, ColliderShape, Obb};
pub use collision_layers::CollisionLayers;
pub use collision_system::{ColliderHandle, CollisionManager, CollisionPair, Registered};
pub use contact_record::ContactRecord;
pub use world_collision::{
    solve_world_collision, WorldGeometry, WorldResolution, DEFAULT_WORLD_EPSILON,
};
