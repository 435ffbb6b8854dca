//! Scripted player input for headless runs
//!
//! Keeps the nearest threat at a preferred distance, strafing around it while
//! shooting, and walks to the closest item when hurt.

use arena_engine::foundation::math::{utils, Vec3};

use crate::combat::Attackable;
use crate::player::PlayerInput;
use crate::scene::GameScene;

/// Kiting controller
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Distance kept from the nearest threat
    pub preferred_distance: f32,
    /// Band around `preferred_distance` where the pilot only strafes
    pub tolerance: f32,
    /// Health fraction below which items take priority
    pub heal_below: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            preferred_distance: 8.0,
            tolerance: 1.5,
            heal_below: 0.5,
        }
    }
}

impl Autopilot {
    /// Input for the next frame of `scene`
    pub fn input_for(&self, scene: &GameScene) -> PlayerInput {
        let player = scene.player();
        let position = player.center_position();

        let threat = scene.nearest_threat().map(|threat| utils::flatten(threat - position));
        let aim_dir = threat.unwrap_or_else(Vec3::zeros);

        let hurt = player.health().fraction() < self.heal_below;
        let item = hurt
            .then(|| {
                scene
                    .items()
                    .map(|item| utils::flatten(item.position() - position))
                    .min_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))
            })
            .flatten();

        let move_dir = match (item, threat) {
            (Some(to_item), _) => to_item,
            (None, Some(to_threat)) => self.kite(to_threat),
            (None, None) => Vec3::zeros(),
        };
        let move_dir = move_dir.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);

        PlayerInput {
            move_dir,
            aim_dir,
            fire: threat.is_some(),
            jump: false,
        }
    }

    fn kite(&self, to_threat: Vec3) -> Vec3 {
        let distance = to_threat.norm();
        let Some(toward) = to_threat.try_normalize(f32::EPSILON) else {
            return Vec3::x();
        };
        // Perpendicular on the ground plane
        let strafe = Vec3::new(toward.z, 0.0, -toward.x);
        if distance < self.preferred_distance - self.tolerance {
            strafe * 0.5 - toward
        } else if distance > self.preferred_distance + self.tolerance {
            toward + strafe * 0.5
        } else {
            strafe
        }
    }
}
