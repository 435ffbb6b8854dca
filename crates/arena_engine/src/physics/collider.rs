//! Colliders owned by gameplay entities

use super::collision::ColliderShape;
use super::collision_layers::CollisionLayers;
use crate::foundation::math::Vec3;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_COLLIDER_ID: AtomicU32 = AtomicU32::new(1);

/// Category tag used to pick a collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// Player body
    Player,
    /// Regular enemy body
    Enemy,
    /// Boss body
    Boss,
    /// Boss melee strike volume, live only during the swing window
    BossStrike,
    /// Projectile
    Bullet,
    /// Pickup
    Item,
    /// Static level geometry
    StaticWorld,
}

impl ColliderKind {
    /// Layer a collider of this kind lives on
    pub fn default_layer(self) -> CollisionLayers {
        match self {
            Self::Player => CollisionLayers::PLAYER,
            Self::Enemy => CollisionLayers::ENEMY,
            Self::Boss => CollisionLayers::BOSS,
            Self::BossStrike => CollisionLayers::STRIKE,
            Self::Bullet => CollisionLayers::PROJECTILE,
            Self::Item => CollisionLayers::PICKUP,
            Self::StaticWorld => CollisionLayers::ENVIRONMENT,
        }
    }
}

/// A collision volume with a stable serial id
///
/// The id is assigned at construction, never changes, and is what
/// [`ContactRecord`](super::ContactRecord) stores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    id: u32,
    /// Response category
    pub kind: ColliderKind,
    /// World-space shape
    pub shape: ColliderShape,
    /// Layer this collider is on
    pub layer: CollisionLayers,
    /// Layers this collider wants to be tested against
    pub mask: CollisionLayers,
}

impl Collider {
    /// Create a collider on its kind's default layer that accepts every layer
    pub fn new(kind: ColliderKind, shape: ColliderShape) -> Self {
        Self {
            id: NEXT_COLLIDER_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            shape,
            layer: kind.default_layer(),
            mask: CollisionLayers::all(),
        }
    }

    /// Restrict which layers this collider is tested against
    pub fn with_mask(mut self, mask: CollisionLayers) -> Self {
        self.mask = mask;
        self
    }

    /// Serial id
    pub fn id(&self) -> u32 {
        self.id
    }

    /// World-space center
    pub fn center(&self) -> Vec3 {
        self.shape.center()
    }

    /// Move the shape to a new center
    pub fn set_center(&mut self, center: Vec3) {
        self.shape.set_center(center);
    }

    /// Shape overlap test, ignoring layers
    pub fn intersects(&self, other: &Collider) -> bool {
        self.shape.intersects(&other.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_monotonically() {
        let a = Collider::new(ColliderKind::Enemy, ColliderShape::sphere(Vec3::zeros(), 1.0));
        let b = Collider::new(ColliderKind::Enemy, ColliderShape::sphere(Vec3::zeros(), 1.0));
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_copy_keeps_id() {
        let a = Collider::new(ColliderKind::Item, ColliderShape::sphere(Vec3::zeros(), 0.5));
        let mut moved = a;
        moved.set_center(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(moved.id(), a.id());
        assert_eq!(a.kind.default_layer(), CollisionLayers::PICKUP);
    }
}
