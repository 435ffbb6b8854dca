//! Swept, axis-separated resolution against static level geometry
//!
//! A proposed move is applied one axis at a time in the order X, Z, Y. After
//! each axis the entity box is tested against every static box; each overlap
//! yields a corrected coordinate on that axis. Among the corrections that leave
//! the box clear of every static box, the one closest to the uncorrected
//! coordinate wins; if none does, the deepest push against the motion is
//! taken. The winning correction is applied before the next axis is processed,
//! so horizontal sliding is settled before the vertical snap onto floors and
//! against ceilings.

use super::collision::Aabb;
use crate::foundation::math::Vec3;

/// Gap left between a resolved entity and the face it was pushed out of
pub const DEFAULT_WORLD_EPSILON: f32 = 0.002;

/// Axis processing order: X, Z, then Y
pub const AXIS_ORDER: [usize; 3] = [0, 2, 1];

/// Read-only source of static level boxes
pub trait WorldGeometry {
    /// Every static box in the level
    fn world_aabbs(&self) -> &[Aabb];
}

impl WorldGeometry for [Aabb] {
    fn world_aabbs(&self) -> &[Aabb] {
        self
    }
}

impl WorldGeometry for Vec<Aabb> {
    fn world_aabbs(&self) -> &[Aabb] {
        self
    }
}

/// Outcome of resolving one move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldResolution {
    /// Final, non-penetrating center
    pub position: Vec3,
    /// Pushed up onto the top of some geometry
    pub grounded: bool,
    /// Pushed down from the underside of some geometry
    pub hit_ceiling: bool,
    /// Which axes (x, y, z) received a correction
    pub blocked: [bool; 3],
}

impl WorldResolution {
    /// Whether any horizontal axis was corrected
    pub fn hit_wall(&self) -> bool {
        self.blocked[0] || self.blocked[2]
    }
}

/// Resolve a move from `old_center` to `new_center` for a box of `half_extents`
pub fn solve_world_collision(
    old_center: Vec3,
    new_center: Vec3,
    half_extents: Vec3,
    world: &(impl WorldGeometry + ?Sized),
    epsilon: f32,
) -> WorldResolution {
    let aabbs = world.world_aabbs();
    let mut position = old_center;
    let mut resolution = WorldResolution {
        position,
        grounded: false,
        hit_ceiling: false,
        blocked: [false; 3],
    };

    for axis in AXIS_ORDER {
        position[axis] = new_center[axis];

        if let Some(correction) =
            resolve_axis(axis, old_center[axis], position, half_extents, aabbs, epsilon)
        {
            position[axis] = correction.coordinate;
            resolution.blocked[axis] = true;
            if axis == 1 {
                if correction.pushed_positive {
                    resolution.grounded = true;
                } else {
                    resolution.hit_ceiling = true;
                }
            }
        }
    }

    resolution.position = position;
    resolution
}

#[derive(Debug, Clone, Copy)]
struct AxisCorrection {
    coordinate: f32,
    pushed_positive: bool,
}

fn resolve_axis(
    axis: usize,
    old_coordinate: f32,
    tentative: Vec3,
    half_extents: Vec3,
    aabbs: &[Aabb],
    epsilon: f32,
) -> Option<AxisCorrection> {
    let entity_box = Aabb::from_center_half_extents(tentative, half_extents);
    let half = half_extents[axis];
    let old_min = old_coordinate - half;
    let old_max = old_coordinate + half;
    let current = tentative[axis];

    let mut candidates: Vec<AxisCorrection> = Vec::new();
    for obstacle in aabbs.iter().filter(|obstacle| entity_box.overlaps(obstacle)) {
        let to_min_face = AxisCorrection {
            coordinate: obstacle.min[axis] - half - epsilon,
            pushed_positive: false,
        };
        let to_max_face = AxisCorrection {
            coordinate: obstacle.max[axis] + half + epsilon,
            pushed_positive: true,
        };

        if old_max <= obstacle.min[axis] {
            candidates.push(to_min_face);
        } else if old_min >= obstacle.max[axis] {
            candidates.push(to_max_face);
        } else {
            // Already straddling this box on this axis: either face is a way out
            candidates.push(to_min_face);
            candidates.push(to_max_face);
        }
    }
    candidates.retain(|candidate| candidate.coordinate.is_finite());

    let distance = |candidate: &&AxisCorrection| (candidate.coordinate - current).abs();
    let is_clear = |candidate: &&AxisCorrection| {
        let mut center = tentative;
        center[axis] = candidate.coordinate;
        let corrected = Aabb::from_center_half_extents(center, half_extents);
        !aabbs.iter().any(|obstacle| corrected.overlaps(obstacle))
    };

    let nearest_clear = candidates
        .iter()
        .filter(is_clear)
        .min_by(|a, b| distance(a).total_cmp(&distance(b)));

    // Boxed in on this axis: fall back to the deepest push against the motion
    let pushed_back_positive = current < old_coordinate;
    let deepest_back = || {
        candidates
            .iter()
            .filter(|candidate| candidate.pushed_positive == pushed_back_positive)
            .max_by(|a, b| distance(a).total_cmp(&distance(b)))
            .or_else(|| candidates.iter().min_by(|a, b| distance(a).total_cmp(&distance(b))))
    };

    nearest_clear.or_else(deepest_back).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn half() -> Vec3 {
        Vec3::new(0.8, 2.0, 0.8)
    }

    fn wall_at_x(min_x: f32, max_x: f32) -> Aabb {
        Aabb::new(
            Vec3::new(min_x, f32::NEG_INFINITY, f32::NEG_INFINITY),
            Vec3::new(max_x, f32::INFINITY, f32::INFINITY),
        )
    }

    fn floor() -> Aabb {
        Aabb::new(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0))
    }

    #[test]
    fn test_wall_push_back_scenario() {
        let world = vec![wall_at_x(1.0, 2.0)];
        let result = solve_world_collision(
            Vec3::zeros(),
            Vec3::new(0.5, 0.0, 0.0),
            half(),
            &world,
            DEFAULT_WORLD_EPSILON,
        );
        assert_relative_eq!(result.position.x, 0.198, epsilon = 1e-5);
        assert!(result.blocked[0]);
        assert!(!result.grounded);
    }

    #[test]
    fn test_sliding_along_wall_keeps_z_motion() {
        let world = vec![wall_at_x(1.0, 2.0)];
        let result = solve_world_collision(
            Vec3::zeros(),
            Vec3::new(0.5, 0.0, 0.75),
            half(),
            &world,
            DEFAULT_WORLD_EPSILON,
        );
        assert_relative_eq!(result.position.x, 0.198, epsilon = 1e-5);
        assert_relative_eq!(result.position.z, 0.75, epsilon = 1e-6);
        assert!(result.hit_wall());
    }

    #[test]
    fn test_landing_sets_grounded() {
        let world = vec![floor()];
        let old = Vec3::new(0.0, 2.1, 0.0);
        let result = solve_world_collision(old, Vec3::new(0.3, 1.5, 0.0), half(), &world, DEFAULT_WORLD_EPSILON);
        assert_relative_eq!(result.position.y, 2.0 + DEFAULT_WORLD_EPSILON, epsilon = 1e-5);
        assert_relative_eq!(result.position.x, 0.3, epsilon = 1e-6);
        assert!(result.grounded);
        assert!(!result.hit_ceiling);
    }

    #[test]
    fn test_ceiling_bump() {
        let ceiling = Aabb::new(Vec3::new(-5.0, 5.0, -5.0), Vec3::new(5.0, 6.0, 5.0));
        let result = solve_world_collision(
            Vec3::new(0.0, 2.5, 0.0),
            Vec3::new(0.0, 3.5, 0.0),
            half(),
            &vec![ceiling],
            DEFAULT_WORLD_EPSILON,
        );
        assert_relative_eq!(result.position.y, 3.0 - DEFAULT_WORLD_EPSILON, epsilon = 1e-5);
        assert!(result.hit_ceiling);
    }

    #[test]
    fn test_abutting_boxes_resolve_clear_of_both() {
        // One wall built from a thin facing slab and a thick body behind it
        let facing = wall_at_x(1.0, 1.1);
        let body = wall_at_x(1.1, 5.0);
        for world in [vec![body, facing], vec![facing, body]] {
            let result = solve_world_collision(
                Vec3::zeros(),
                Vec3::new(0.35, 0.0, 0.0),
                half(),
                &world,
                DEFAULT_WORLD_EPSILON,
            );
            // The body face (0.298) is nearer 0.35 but still inside the facing slab
            assert_relative_eq!(result.position.x, 0.198, epsilon = 1e-5);
            assert!(result.blocked[0]);
            let entity_box = Aabb::from_center_half_extents(result.position, half());
            assert!(world.iter().all(|obstacle| !entity_box.overlaps(obstacle)));
        }
    }

    #[test]
    fn test_wall_abutting_floor_keeps_entity_out_of_both() {
        let wall = Aabb::new(Vec3::new(1.0, 0.0, -50.0), Vec3::new(2.0, 4.0, 50.0));
        let world = vec![floor(), wall];
        let standing = 2.0 + DEFAULT_WORLD_EPSILON;
        let result = solve_world_collision(
            Vec3::new(0.0, standing, 0.0),
            Vec3::new(0.5, standing - 0.1, 0.0),
            half(),
            &world,
            DEFAULT_WORLD_EPSILON,
        );
        assert_relative_eq!(result.position.x, 0.198, epsilon = 1e-5);
        assert_relative_eq!(result.position.y, standing, epsilon = 1e-5);
        assert!(result.grounded);
        let entity_box = Aabb::from_center_half_extents(result.position, half());
        assert!(world.iter().all(|obstacle| !entity_box.overlaps(obstacle)));
    }

    #[test]
    fn test_nearest_candidate_blocked_by_neighbour_is_skipped() {
        // Entity already inside a pillar with a second wall just past its far face
        let wall = Aabb::new(Vec3::new(1.3, -10.0, -10.0), Vec3::new(2.0, 10.0, 10.0));
        let pillar = Aabb::new(Vec3::new(-0.2, -10.0, -10.0), Vec3::new(0.6, 10.0, 10.0));
        let world = vec![wall, pillar];
        let result = solve_world_collision(
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.55, 0.0, 0.0),
            half(),
            &world,
            DEFAULT_WORLD_EPSILON,
        );
        // 0.498 lands in the pillar and 1.402 in the wall; only -1.002 is clear
        assert_relative_eq!(result.position.x, -1.002, epsilon = 1e-5);
        let entity_box = Aabb::from_center_half_extents(result.position, half());
        assert!(world.iter().all(|obstacle| !entity_box.overlaps(obstacle)));
    }

    #[test]
    fn test_straddling_picks_smaller_correction() {
        // Entity already inside a thin pillar on X; it leaves through the nearer face
        let pillar = Aabb::new(Vec3::new(-0.2, -10.0, -10.0), Vec3::new(0.6, 10.0, 10.0));
        let result = solve_world_collision(
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.55, 0.0, 0.0),
            half(),
            &vec![pillar],
            DEFAULT_WORLD_EPSILON,
        );
        // To min face: -0.2 - 0.802 = -1.002 (distance 1.552); to max face: 0.6 + 0.802 = 1.402 (0.852)
        assert_relative_eq!(result.position.x, 1.402, epsilon = 1e-5);
    }

    #[test]
    fn test_resolved_box_never_penetrates() {
        let world = vec![
            floor(),
            Aabb::new(Vec3::new(3.0, 0.0, -4.0), Vec3::new(4.0, 3.0, 4.0)),
            Aabb::new(Vec3::new(-4.0, 0.0, 3.0), Vec3::new(4.0, 3.0, 4.0)),
        ];
        let deltas = [
            Vec3::new(0.4, -0.3, 0.0),
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(-0.6, 0.2, 0.45),
            Vec3::new(0.0, -0.5, 0.6),
            Vec3::new(-0.35, -0.1, -0.35),
        ];

        let mut position = Vec3::new(0.5, 2.01, 0.5);
        for step in 0..60 {
            let delta = deltas[step % deltas.len()];
            let result = solve_world_collision(position, position + delta, half(), &world, DEFAULT_WORLD_EPSILON);
            position = result.position;
            let entity_box = Aabb::from_center_half_extents(position, half());
            for obstacle in &world {
                assert!(!entity_box.overlaps(obstacle), "step {step}: {position:?} inside {obstacle:?}");
            }
        }
    }

    #[test]
    fn test_free_move_is_untouched() {
        let world: Vec<Aabb> = Vec::new();
        let target = Vec3::new(1.0, 2.0, 3.0);
        let result = solve_world_collision(Vec3::zeros(), target, half(), &world, DEFAULT_WORLD_EPSILON);
        assert_eq!(result.position, target);
        assert_eq!(result.blocked, [false; 3]);
    }
}
