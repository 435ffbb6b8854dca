//! Primitive collision shapes and intersection algorithms
//!
//! Provides axis-aligned boxes for static level geometry, oriented boxes for
//! bodies and strike volumes, and capsules for swept projectiles.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Axes shorter than this are treated as degenerate and skipped by SAT
pub const SAT_AXIS_EPSILON: f32 = 1e-5;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half extents of the AABB
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Whether min <= max on every axis
    pub fn is_valid(&self) -> bool {
        (0..3).all(|axis| self.min[axis] <= self.max[axis])
    }

    /// Strict interval overlap on all three axes
    ///
    /// Boxes that only share a face do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] < other.max[axis] && self.max[axis] > other.min[axis])
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }
}

/// An oriented bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    /// World-space center
    pub center: Vec3,
    /// Orthonormal local axes in world space
    pub axes: [Vec3; 3],
    /// Half size along each local axis
    pub half_extents: Vec3,
}

impl Obb {
    /// Box aligned with the world axes
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
            half_extents,
        }
    }

    /// Box rotated about the world Y axis by `yaw` radians
    pub fn from_yaw(center: Vec3, half_extents: Vec3, yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        Self {
            center,
            axes: [
                Vec3::new(cos, 0.0, -sin),
                Vec3::y(),
                Vec3::new(sin, 0.0, cos),
            ],
            half_extents,
        }
    }

    /// Oriented view of an axis-aligned box
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::axis_aligned(aabb.center(), aabb.half_extents())
    }

    /// Half length of this box projected onto a unit axis
    pub fn projected_radius(&self, axis: &Vec3) -> f32 {
        (0..3)
            .map(|i| self.axes[i].dot(axis).abs() * self.half_extents[i])
            .sum()
    }

    /// Separating-axis test against another box
    ///
    /// Tests the three face axes of each box and the nine edge cross products.
    /// Near-zero cross products (parallel edges) are skipped rather than being
    /// treated as separating. Boxes that only touch are reported as disjoint.
    pub fn intersects(&self, other: &Obb) -> bool {
        let offset = other.center - self.center;

        let separated_on = |axis: Vec3| -> bool {
            let length = axis.norm();
            if length < SAT_AXIS_EPSILON {
                return false;
            }
            let axis = axis / length;
            let distance = offset.dot(&axis).abs();
            distance >= self.projected_radius(&axis) + other.projected_radius(&axis)
        };

        for axis in self.axes.iter().chain(other.axes.iter()) {
            if separated_on(*axis) {
                return false;
            }
        }

        for a in &self.axes {
            for b in &other.axes {
                if separated_on(a.cross(b)) {
                    return false;
                }
            }
        }

        true
    }

    /// Closest point on or inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let local = point - self.center;
        let mut result = self.center;
        for i in 0..3 {
            let extent = self.half_extents[i];
            let distance = local.dot(&self.axes[i]).clamp(-extent, extent);
            result += self.axes[i] * distance;
        }
        result
    }

    /// Squared distance from `point` to the box (zero when inside)
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        (self.closest_point(point) - point).norm_squared()
    }

    /// Tight world-space AABB around this box
    pub fn bounding_aabb(&self) -> Aabb {
        let extent = Vec3::new(
            self.projected_radius(&Vec3::x()),
            self.projected_radius(&Vec3::y()),
            self.projected_radius(&Vec3::z()),
        );
        Aabb::from_center_half_extents(self.center, extent)
    }
}

/// A line segment with a radius, used for bullets and their sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Segment start
    pub start: Vec3,
    /// Segment end
    pub end: Vec3,
    /// Radius around the segment
    pub radius: f32,
}

impl Capsule {
    /// Creates a capsule from a segment and radius
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// A sphere is a capsule with a zero-length segment
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::new(center, center, radius)
    }

    /// Midpoint of the segment
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Point on the segment at parameter `t` in [0, 1]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start + (self.end - self.start) * t
    }

    /// Overlap test against another capsule
    pub fn intersects_capsule(&self, other: &Capsule) -> bool {
        let (p, q) = closest_points_between_segments(self.start, self.end, other.start, other.end);
        let radius_sum = self.radius + other.radius;
        (p - q).norm_squared() < radius_sum * radius_sum
    }

    /// Overlap test against an oriented box
    pub fn intersects_obb(&self, obb: &Obb) -> bool {
        segment_distance_squared_to_obb(self.start, self.end, obb) < self.radius * self.radius
    }
}

/// Closest points between segments `p1-q1` and `p2-q2`
///
/// Returns the point on the first segment and the point on the second segment.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    const EPSILON: f32 = 1e-8;

    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        // Both segments degenerate into points
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                // Parallel segments: any s works, pick the start
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

/// Minimum squared distance between segment `start-end` and an oriented box
///
/// Distance to a convex set is convex along a line, so a ternary search over the
/// segment parameter converges to the minimum.
pub fn segment_distance_squared_to_obb(start: Vec3, end: Vec3, obb: &Obb) -> f32 {
    const ITERATIONS: usize = 48;

    let distance_at = |t: f32| obb.distance_squared_to_point(start + (end - start) * t);

    if (end - start).norm_squared() <= f32::EPSILON {
        return distance_at(0.0);
    }

    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    for _ in 0..ITERATIONS {
        let third = (high - low) / 3.0;
        let m1 = low + third;
        let m2 = high - third;
        if distance_at(m1) <= distance_at(m2) {
            high = m2;
        } else {
            low = m1;
        }
    }

    distance_at((low + high) * 0.5)
        .min(distance_at(0.0))
        .min(distance_at(1.0))
}
