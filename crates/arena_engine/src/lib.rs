//! # Arena Engine
//!
//! Simulation core shared by the arena game: geometry, collision and
//! configuration. Rendering, audio and windowing live outside this crate; the
//! game pushes transforms to them through [`render::ModelSink`].
//!
//! ## Features
//!
//! - **Collision**: OBB/capsule shapes, separating-axis tests, a per-frame
//!   collision manager with frame-scoped handles
//! - **World resolution**: swept, axis-separated resolution against static boxes
//! - **Hit bookkeeping**: contact records for single-hit attacks
//! - **Configuration**: TOML/RON config files with validation
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_engine::prelude::*;
//!
//! let mut manager: CollisionManager<u32> = CollisionManager::new();
//! manager.reset();
//!
//! let a = Collider::new(ColliderKind::Player, ColliderShape::sphere(Vec3::zeros(), 1.0));
//! let b = Collider::new(ColliderKind::Enemy, ColliderShape::sphere(Vec3::new(1.5, 0.0, 0.0), 1.0));
//! manager.add_collider(0, &a);
//! manager.add_collider(1, &b);
//!
//! for pair in manager.check_all_collisions() {
//!     for (me, other) in pair.directed() {
//!         println!("{} touched {}", me.owner, other.owner);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        foundation::{
            math::{utils, Vec2, Vec3, Transform},
            time::{clamp_delta, Cooldown, IntervalTimer},
        },
        physics::{
            solve_world_collision, Aabb, Capsule, Collider, ColliderHandle, ColliderKind,
            ColliderShape, CollisionLayers, CollisionManager, CollisionPair, ContactRecord, Obb,
            WorldGeometry, WorldResolution, DEFAULT_WORLD_EPSILON,
        },
        render::ModelSink,
    };
}
