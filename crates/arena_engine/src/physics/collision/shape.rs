//! Collider shape variants and pairwise intersection dispatch

use super::primitives::{Aabb, Capsule, Obb};
use crate::foundation::math::Vec3;

/// Collision shape in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Oriented box (bodies, strike volumes, static geometry)
    Obb(Obb),
    /// Segment plus radius (projectiles and their sweep)
    Capsule(Capsule),
}

impl ColliderShape {
    /// Axis-aligned box shape
    pub fn aabb(aabb: &Aabb) -> Self {
        Self::Obb(Obb::from_aabb(aabb))
    }

    /// Sphere shape
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Capsule(Capsule::sphere(center, radius))
    }

    /// World-space center of the shape
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Obb(obb) => obb.center,
            Self::Capsule(capsule) => capsule.center(),
        }
    }

    /// Move the shape so that its center lands on `center`
    pub fn set_center(&mut self, center: Vec3) {
        match self {
            Self::Obb(obb) => obb.center = center,
            Self::Capsule(capsule) => {
                let offset = center - capsule.center();
                capsule.start += offset;
                capsule.end += offset;
            }
        }
    }

    /// Test if this shape intersects with another shape
    pub fn intersects(&self, other: &ColliderShape) -> bool {
        match (self, other) {
            (Self::Obb(a), Self::Obb(b)) => a.intersects(b),
            (Self::Capsule(capsule), Self::Obb(obb)) | (Self::Obb(obb), Self::Capsule(capsule)) => {
                capsule.intersects_obb(obb)
            }
            (Self::Capsule(a), Self::Capsule(b)) => a.intersects_capsule(b),
        }
    }
}
