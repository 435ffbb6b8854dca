//! Heal pickups dropped by enemies

use arena_engine::foundation::math::Vec3;
use arena_engine::physics::{Collider, ColliderKind, ColliderShape, CollisionLayers};

use crate::config::ItemConfig;

const BOB_HEIGHT: f32 = 0.15;
const BOB_SPEED: f32 = 3.0;

/// A heal pickup
#[derive(Debug, Clone)]
pub struct Item {
    base_position: Vec3,
    position: Vec3,
    age: f32,
    lifetime: f32,
    heal_amount: i32,
    consumed: bool,
    collider: Collider,
}

impl Item {
    /// Item resting at `position`
    pub fn new(config: &ItemConfig, position: Vec3) -> Self {
        Self {
            base_position: position,
            position,
            age: 0.0,
            lifetime: config.lifetime,
            heal_amount: config.heal_amount,
            consumed: false,
            collider: Collider::new(ColliderKind::Item, ColliderShape::sphere(position, config.radius))
                .with_mask(CollisionLayers::PLAYER),
        }
    }

    /// Age and bob
    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        self.position = self.base_position + Vec3::new(0.0, (self.age * BOB_SPEED).sin() * BOB_HEIGHT, 0.0);
        self.collider.set_center(self.position);
    }

    /// Take the heal; only the first call gets it
    pub fn try_consume(&mut self) -> Option<i32> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        Some(self.heal_amount)
    }

    /// Picked up or past its lifetime
    pub fn is_expired(&self) -> bool {
        self.consumed || self.age >= self.lifetime
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Pickup collider
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    /// Serial id, also used as the model id
    pub fn id(&self) -> u32 {
        self.collider.id()
    }
}
