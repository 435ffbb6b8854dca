//! Collision layer system for filtering collision detection
//!
//! Layers prune pairs before the narrow phase. Gameplay responses still
//! filter on the collider kind of the other party.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Regular enemies
        const ENEMY = 1 << 1;
        /// Boss body
        const BOSS = 1 << 2;
        /// Projectiles (bullets)
        const PROJECTILE = 1 << 3;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 4;
        /// Pickups and collectibles
        const PICKUP = 1 << 5;
        /// Melee strike volumes
        const STRIKE = 1 << 6;
    }
}

impl CollisionLayers {
    /// Check if two colliders should be tested based on their layers and masks
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    ///
    /// # Example
    /// ```
    /// use arena_engine::physics::CollisionLayers;
    ///
    /// let player_mask = CollisionLayers::ENEMY | CollisionLayers::ENVIRONMENT;
    /// let enemy_mask = CollisionLayers::PLAYER | CollisionLayers::PROJECTILE;
    ///
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::PLAYER, player_mask,
    ///     CollisionLayers::ENEMY, enemy_mask,
    /// ));
    /// ```
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}
