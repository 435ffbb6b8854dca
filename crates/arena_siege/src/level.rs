//! Static level layout

use arena_engine::config::{Config, ConfigError};
use arena_engine::foundation::math::Vec3;
use arena_engine::physics::{Aabb, WorldGeometry};
use serde::{Deserialize, Serialize};

/// Static boxes plus the points entities appear at
///
/// Spawn points, the player start and the boss spawn are ground positions:
/// entities are placed so their box rests on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelGeometry {
    /// Static collision boxes (floor, walls, pillars)
    pub aabbs: Vec<Aabb>,
    /// Enemy spawn points
    pub spawn_points: Vec<Vec3>,
    /// Player start
    pub player_start: Vec3,
    /// Boss spawn
    pub boss_spawn: Vec3,
}

impl LevelGeometry {
    /// Square arena of `half_size` with a floor at y = 0, walls and four pillars
    pub fn arena(half_size: f32) -> Self {
        let wall_height = 6.0;
        let thickness = 1.0;
        let s = half_size;
        let pillar = |x: f32, z: f32| {
            Aabb::from_center_half_extents(Vec3::new(x, wall_height * 0.5, z), Vec3::new(1.0, wall_height * 0.5, 1.0))
        };

        let aabbs = vec![
            // floor
            Aabb::new(Vec3::new(-s, -1.0, -s), Vec3::new(s, 0.0, s)),
            // walls
            Aabb::new(Vec3::new(-s - thickness, 0.0, -s), Vec3::new(-s, wall_height, s)),
            Aabb::new(Vec3::new(s, 0.0, -s), Vec3::new(s + thickness, wall_height, s)),
            Aabb::new(Vec3::new(-s, 0.0, -s - thickness), Vec3::new(s, wall_height, -s)),
            Aabb::new(Vec3::new(-s, 0.0, s), Vec3::new(s, wall_height, s + thickness)),
            pillar(s * 0.4, s * 0.4),
            pillar(-s * 0.4, s * 0.4),
            pillar(s * 0.4, -s * 0.4),
            pillar(-s * 0.4, -s * 0.4),
        ];

        let edge = s * 0.8;
        let spawn_points = vec![
            Vec3::new(edge, 0.0, 0.0),
            Vec3::new(-edge, 0.0, 0.0),
            Vec3::new(0.0, 0.0, edge),
            Vec3::new(0.0, 0.0, -edge),
            Vec3::new(edge, 0.0, edge),
            Vec3::new(-edge, 0.0, -edge),
        ];

        Self {
            aabbs,
            spawn_points,
            player_start: Vec3::new(0.0, 0.0, -s * 0.2),
            boss_spawn: Vec3::new(0.0, 0.0, s * 0.5),
        }
    }

    /// Center for a box of `half_extents` resting on ground point `ground`
    pub fn standing_center(ground: Vec3, half_extents: Vec3, epsilon: f32) -> Vec3 {
        ground + Vec3::new(0.0, half_extents.y + epsilon, 0.0)
    }
}

impl Default for LevelGeometry {
    fn default() -> Self {
        Self::arena(24.0)
    }
}

impl WorldGeometry for LevelGeometry {
    fn world_aabbs(&self) -> &[Aabb] {
        &self.aabbs
    }
}

impl Config for LevelGeometry {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some((index, aabb)) = self.aabbs.iter().enumerate().find(|(_, aabb)| !aabb.is_valid()) {
            return Err(ConfigError::Invalid(format!(
                "level box {index} is inverted: {aabb:?}"
            )));
        }
        if self.spawn_points.is_empty() {
            return Err(ConfigError::Invalid("level has no enemy spawn points".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_engine::config::ConfigFormat;

    #[test]
    fn test_default_arena_is_valid() {
        let level = LevelGeometry::default();
        assert!(level.validate().is_ok());
        assert_eq!(level.world_aabbs().len(), 9);
    }

    #[test]
    fn test_spawn_points_clear_of_geometry() {
        let level = LevelGeometry::default();
        let half = Vec3::new(0.8, 2.0, 0.8);
        for point in level.spawn_points.iter().chain([&level.player_start, &level.boss_spawn]) {
            let center = LevelGeometry::standing_center(*point, half, 0.002);
            let body = Aabb::from_center_half_extents(center, half);
            assert!(level.aabbs.iter().all(|aabb| !body.overlaps(aabb)), "{point:?}");
        }
    }

    #[test]
    fn test_inverted_box_rejected() {
        let mut level = LevelGeometry::default();
        level.aabbs.push(Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0)));
        assert!(matches!(level.validate(), Err(ConfigError::Invalid(message)) if message.contains("box 9")));
    }

    #[test]
    fn test_ron_level_file() {
        let text = r"(
            aabbs: [(min: (-5.0, -1.0, -5.0), max: (5.0, 0.0, 5.0))],
            spawn_points: [(3.0, 0.0, 3.0)],
            player_start: (0.0, 0.0, 0.0),
            boss_spawn: (0.0, 0.0, 4.0),
        )";
        let level = LevelGeometry::from_str_with_format(text, ConfigFormat::Ron).unwrap();
        assert_eq!(level.aabbs.len(), 1);
        assert_eq!(level.spawn_points[0], Vec3::new(3.0, 0.0, 3.0));
    }

    #[test]
    fn test_empty_spawn_points_rejected() {
        let level = LevelGeometry { spawn_points: Vec::new(), ..LevelGeometry::default() };
        assert!(level.validate().is_err());
    }
}
