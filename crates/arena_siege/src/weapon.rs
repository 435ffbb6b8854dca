//! Weapons and projectiles
//!
//! A weapon owns the bullets it fires. Bullets sweep a capsule from their
//! previous to their current position so fast shots cannot tunnel through thin
//! bodies, and die on their first accepted hit or once they have travelled
//! their maximum distance.

use arena_engine::foundation::math::Vec3;
use arena_engine::foundation::time::IntervalTimer;
use arena_engine::physics::{Capsule, Collider, ColliderKind, ColliderShape, CollisionLayers, ContactRecord};
use serde::Serialize;

use crate::combat::Strike;
use crate::config::WeaponConfig;

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Shooter {
    /// The player's gun
    Player,
    /// The boss's ranged attack
    Boss,
}

impl Shooter {
    fn target_layers(self) -> CollisionLayers {
        match self {
            Self::Player => CollisionLayers::ENEMY | CollisionLayers::BOSS | CollisionLayers::ENVIRONMENT,
            Self::Boss => CollisionLayers::PLAYER | CollisionLayers::ENVIRONMENT,
        }
    }
}

/// A single projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    shooter: Shooter,
    position: Vec3,
    velocity: Vec3,
    damage: i32,
    knockback_power: f32,
    knockback_duration: f32,
    radius: f32,
    traveled: f32,
    max_distance: f32,
    dead: bool,
    hit_record: ContactRecord,
    collider: Collider,
}

impl Bullet {
    fn new(shooter: Shooter, origin: Vec3, direction: Vec3, config: &WeaponConfig) -> Self {
        let shape = ColliderShape::Capsule(Capsule::sphere(origin, config.bullet_radius));
        Self {
            shooter,
            position: origin,
            velocity: direction * config.bullet_speed,
            damage: config.bullet_damage,
            knockback_power: config.knockback_power,
            knockback_duration: config.knockback_duration,
            radius: config.bullet_radius,
            traveled: 0.0,
            max_distance: config.max_distance,
            dead: false,
            hit_record: ContactRecord::new(),
            collider: Collider::new(ColliderKind::Bullet, shape).with_mask(shooter.target_layers()),
        }
    }

    /// Advance along the velocity and refresh the swept capsule
    pub fn update(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        let start = self.position;
        self.position += self.velocity * dt;
        self.traveled += self.velocity.norm() * dt;
        if self.traveled > self.max_distance {
            self.dead = true;
        }
        self.collider.shape = ColliderShape::Capsule(Capsule::new(start, self.position, self.radius));
    }

    /// Accept a hit on `target_id`, at most once per bullet
    ///
    /// Returns the strike to apply, or `None` when the bullet is already spent
    /// or has already hit this target.
    pub fn register_hit(&mut self, target_id: u32) -> Option<Strike> {
        if self.dead || self.hit_record.check(target_id) {
            return None;
        }
        self.hit_record.add(target_id);
        self.dead = true;
        Some(Strike {
            damage: self.damage,
            direction: self.velocity.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros),
            power: self.knockback_power,
            duration: self.knockback_duration,
        })
    }

    /// Kill the bullet without a hit (it struck level geometry)
    pub fn expire(&mut self) {
        self.dead = true;
    }

    /// Marked for pruning
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Who fired it
    pub fn shooter(&self) -> Shooter {
        self.shooter
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Distance covered so far
    pub fn traveled(&self) -> f32 {
        self.traveled
    }

    /// Swept collider
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    /// Serial id, also used as the model id
    pub fn id(&self) -> u32 {
        self.collider.id()
    }
}

/// Cooldown-gated gun with burst fire
#[derive(Debug, Clone)]
pub struct Weapon {
    config: WeaponConfig,
    shooter: Shooter,
    fire_timer: IntervalTimer,
    bullets: Vec<Bullet>,
    burst_remaining: u32,
    burst_timer: f32,
    burst_direction: Vec3,
    shots_fired: u64,
}

impl Weapon {
    /// Weapon that can fire immediately
    pub fn new(config: WeaponConfig, shooter: Shooter) -> Self {
        Self {
            config,
            shooter,
            fire_timer: IntervalTimer::new_ready(config.fire_interval),
            bullets: Vec::new(),
            burst_remaining: 0,
            burst_timer: 0.0,
            burst_direction: Vec3::zeros(),
            shots_fired: 0,
        }
    }

    /// Fire one bullet if the fire interval has elapsed
    ///
    /// A zero-length direction never fires.
    pub fn try_fire(&mut self, origin: Vec3, direction: Vec3) -> bool {
        if !self.fire_timer.is_ready() {
            return false;
        }
        let Some(direction) = direction.try_normalize(f32::EPSILON) else {
            return false;
        };
        self.fire_timer.reset();
        self.bullets.push(Bullet::new(self.shooter, origin, direction, &self.config));
        self.shots_fired += 1;
        true
    }

    /// Begin a burst of `max_burst_count` shots unless one is already running
    ///
    /// The first shot goes out immediately when the fire interval allows it;
    /// the rest follow every `burst_interval` during [`update`](Self::update).
    pub fn start_burst_fire(&mut self, origin: Vec3, direction: Vec3) -> bool {
        if self.is_bursting() || direction.norm_squared() <= f32::EPSILON {
            return false;
        }
        self.burst_remaining = self.config.max_burst_count;
        self.burst_direction = direction;
        self.burst_timer = 0.0;
        if self.burst_remaining > 0 && self.try_fire(origin, direction) {
            self.burst_remaining -= 1;
        }
        true
    }

    /// Advance timers, fire pending burst shots, move bullets and prune the dead
    ///
    /// `aim` re-targets a running burst.
    pub fn update(&mut self, dt: f32, origin: Vec3, aim: Option<Vec3>) {
        self.fire_timer.tick(dt);

        if self.burst_remaining > 0 {
            if let Some(aim) = aim.filter(|aim| aim.norm_squared() > f32::EPSILON) {
                self.burst_direction = aim;
            }
            self.burst_timer += dt;
            if self.burst_timer >= self.config.burst_interval && self.try_fire(origin, self.burst_direction) {
                self.burst_remaining -= 1;
                self.burst_timer = 0.0;
            }
        }

        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        self.bullets.retain(|bullet| !bullet.is_dead());
    }

    /// Drop any queued burst shots
    pub fn cancel_burst(&mut self) {
        self.burst_remaining = 0;
    }

    /// A burst still has shots to fire
    pub fn is_bursting(&self) -> bool {
        self.burst_remaining > 0
    }

    /// Live bullets
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// Mutable access for collision responses
    pub fn bullet_mut(&mut self, index: usize) -> Option<&mut Bullet> {
        self.bullets.get_mut(index)
    }

    /// Total shots fired
    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }

    /// Weapon settings
    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> WeaponConfig {
        WeaponConfig {
            fire_interval: 0.05,
            bullet_speed: 30.0,
            max_distance: 10.0,
            max_burst_count: 3,
            burst_interval: 0.1,
            ..WeaponConfig::default()
        }
    }

    #[test]
    fn test_fire_interval_gates_shots() {
        let mut weapon = Weapon::new(config(), Shooter::Player);
        assert!(weapon.try_fire(Vec3::zeros(), Vec3::z()));
        assert!(!weapon.try_fire(Vec3::zeros(), Vec3::z()));

        weapon.update(0.06, Vec3::zeros(), None);
        assert!(weapon.try_fire(Vec3::zeros(), Vec3::new(0.0, 0.0, 5.0)));
        assert_eq!(weapon.bullets().len(), 2);
        assert_relative_eq!(weapon.bullets()[1].velocity().norm(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_direction_never_fires() {
        let mut weapon = Weapon::new(config(), Shooter::Player);
        assert!(!weapon.try_fire(Vec3::zeros(), Vec3::zeros()));
        assert!(!weapon.start_burst_fire(Vec3::zeros(), Vec3::zeros()));
        assert_eq!(weapon.shots_fired(), 0);
    }

    #[test]
    fn test_burst_fires_exact_count_with_spacing() {
        let mut weapon = Weapon::new(config(), Shooter::Boss);
        assert!(weapon.start_burst_fire(Vec3::zeros(), Vec3::x()));
        assert!(!weapon.start_burst_fire(Vec3::zeros(), Vec3::x()), "already bursting");
        assert_eq!(weapon.shots_fired(), 1);

        let dt = 0.01;
        let mut shot_times = vec![0.0];
        for step in 1..=100 {
            let before = weapon.shots_fired();
            weapon.update(dt, Vec3::zeros(), None);
            if weapon.shots_fired() > before {
                shot_times.push(step as f32 * dt);
            }
        }

        assert_eq!(shot_times.len(), 3);
        assert!(!weapon.is_bursting());
        for pair in shot_times.windows(2) {
            assert!(pair[1] - pair[0] >= 0.1 - 1e-3, "{shot_times:?}");
        }
    }

    #[test]
    fn test_burst_follows_aim() {
        let mut weapon = Weapon::new(config(), Shooter::Boss);
        weapon.start_burst_fire(Vec3::zeros(), Vec3::x());
        for _ in 0..30 {
            weapon.update(0.01, Vec3::zeros(), Some(Vec3::z()));
        }
        let last = weapon.bullets().last().unwrap();
        assert_relative_eq!(last.velocity().normalize(), Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_bullets_expire_by_distance() {
        let mut weapon = Weapon::new(config(), Shooter::Player);
        weapon.try_fire(Vec3::zeros(), Vec3::x());
        // 30 u/s at 0.01 s per step: 0.3 per step, past 10 units after 34 steps
        for _ in 0..30 {
            weapon.update(0.01, Vec3::zeros(), None);
        }
        assert_eq!(weapon.bullets().len(), 1);
        for _ in 0..10 {
            weapon.update(0.01, Vec3::zeros(), None);
        }
        assert!(weapon.bullets().is_empty());
    }

    #[test]
    fn test_bullet_hits_once() {
        let mut weapon = Weapon::new(config(), Shooter::Player);
        weapon.try_fire(Vec3::zeros(), Vec3::x());
        let bullet = weapon.bullet_mut(0).unwrap();

        let strike = bullet.register_hit(7).unwrap();
        assert_eq!(strike.damage, config().bullet_damage);
        assert_relative_eq!(strike.direction, Vec3::x());
        assert!(bullet.register_hit(7).is_none());
        assert!(bullet.register_hit(8).is_none(), "spent bullets hit nothing else");
        assert!(bullet.is_dead());
    }

    #[test]
    fn test_swept_capsule_covers_the_step() {
        let mut weapon = Weapon::new(config(), Shooter::Player);
        weapon.try_fire(Vec3::zeros(), Vec3::x());
        weapon.update(0.1, Vec3::zeros(), None);
        let ColliderShape::Capsule(capsule) = weapon.bullets()[0].collider().shape else {
            panic!("bullets use capsules");
        };
        assert_relative_eq!(capsule.start, Vec3::zeros());
        assert_relative_eq!(capsule.end, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-5);
    }
}
