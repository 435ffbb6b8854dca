//! # Arena Siege
//!
//! Wave-based arena action game built on `arena_engine`. The player holds out
//! against waves of melee enemies and then a boss that mixes heavy swings with
//! burst fire.
//!
//! ## Structure
//!
//! - **Actors**: [`player`], [`enemy`] and [`boss`], each driven by a state
//!   machine that returns [`ai::AiCommand`] values for its owner to apply
//! - **Combat**: [`attack`] timelines, [`weapon`] bullets, [`combat`] damage
//!   and knockback
//! - **Flow**: [`wave`] spawning, [`item`] drops, the [`scene`] frame loop
//! - **Data**: [`config`] and [`level`], both loadable from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_siege::prelude::*;
//!
//! let mut scene = GameScene::new(GameConfig::default(), LevelGeometry::default()).unwrap();
//! let pilot = Autopilot::default();
//! for _ in 0..60 {
//!     let input = pilot.input_for(&scene);
//!     scene.update(1.0 / 60.0, &input);
//! }
//! assert_eq!(scene.frame(), 60);
//! ```

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss
)]

pub mod ai;
pub mod attack;
pub mod autopilot;
pub mod boss;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod item;
pub mod level;
pub mod player;
pub mod scene;
pub mod wave;
pub mod weapon;

/// Common imports for running a game
pub mod prelude {
    pub use crate::{
        autopilot::Autopilot,
        config::GameConfig,
        level::LevelGeometry,
        player::PlayerInput,
        scene::{GameScene, RunStatus, SceneSnapshot, SceneStats},
    };
    pub use arena_engine::config::Config;
}
