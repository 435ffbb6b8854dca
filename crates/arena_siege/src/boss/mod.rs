//! The boss: a melee brute with burst-fire ranged attacks
//!
//! Melee damage is not applied directly. During the swing window the boss
//! exposes a strike volume in front of itself, and the collision pass reports
//! overlaps with it. The strike's contact record keeps that to one hit per
//! target per swing.

mod brain;

pub use brain::{BossBrain, BossPerception, BossState};

use arena_engine::foundation::math::{utils, Transform, Vec3};
use arena_engine::physics::{
    solve_world_collision, Collider, ColliderKind, ColliderShape, CollisionLayers, ContactRecord, Obb,
    WorldGeometry,
};
use log::{debug, info};

use crate::ai::AiCommand;
use crate::combat::{Attackable, Health, Knockback, Strike, TargetView};
use crate::config::{BossConfig, SimConfig};
use crate::weapon::{Shooter, Weapon};

/// The boss
#[derive(Debug, Clone)]
pub struct Boss {
    transform: Transform,
    half_extents: Vec3,
    arm_angle: f32,
    health: Health,
    knockback: Knockback,
    brain: BossBrain,
    body: Collider,
    strike: Collider,
    strike_active: bool,
    strike_record: ContactRecord,
    weapon: Weapon,
    active: bool,
    stagger_threshold: i32,
    stagger_accumulated: i32,
    stagger_pending: bool,
}

impl Boss {
    /// Boss centered at `position`
    pub fn new(config: &BossConfig, position: Vec3) -> Self {
        let body = ColliderShape::Obb(Obb::from_yaw(position, config.half_extents, 0.0));
        let strike = ColliderShape::Obb(Obb::from_yaw(position, config.strike_half_extents, 0.0));
        Self {
            transform: Transform::from_position(position),
            half_extents: config.half_extents,
            arm_angle: config.attack.idle_angle,
            health: Health::new(config.max_hp),
            knockback: Knockback::default(),
            brain: BossBrain::new(config.spawn_delay),
            body: Collider::new(ColliderKind::Boss, body)
                .with_mask(CollisionLayers::PLAYER | CollisionLayers::PROJECTILE),
            strike: Collider::new(ColliderKind::BossStrike, strike).with_mask(CollisionLayers::PLAYER),
            strike_active: false,
            strike_record: ContactRecord::new(),
            weapon: Weapon::new(config.weapon, Shooter::Boss),
            active: false,
            stagger_threshold: config.stagger_threshold.max(1),
            stagger_accumulated: 0,
            stagger_pending: false,
        }
    }

    /// Step AI, movement, world collision and the gun
    pub fn update(
        &mut self,
        dt: f32,
        config: &BossConfig,
        sim: &SimConfig,
        target: Option<TargetView>,
        world: &(impl WorldGeometry + ?Sized),
    ) {
        let perception = BossPerception {
            position: self.transform.position,
            yaw: self.transform.yaw(),
            target,
            health_fraction: self.health.fraction(),
            health_depleted: self.health.is_depleted(),
            stagger_pending: std::mem::take(&mut self.stagger_pending),
            bursting: self.weapon.is_bursting(),
        };

        let previous_state = self.brain.state();
        let commands = self.brain.update(dt, config, sim.swing_hit_policy, &perception);

        let old_position = self.transform.position;
        let mut desired = old_position;
        for command in commands {
            match command {
                AiCommand::Move(step) => desired += step,
                AiCommand::Face(yaw) => self.transform.rotation.y = yaw,
                AiCommand::SetArmAngle(angle) => self.arm_angle = angle,
                AiCommand::Activate => {
                    self.active = true;
                    info!("Boss has entered the arena");
                }
                AiCommand::SetStrikeVolume(on) => self.strike_active = on,
                AiCommand::Fire(direction) => {
                    let muzzle = self.muzzle();
                    self.weapon.start_burst_fire(muzzle, direction);
                }
                AiCommand::TransitionTo(state) => self.on_transition(previous_state, state),
                AiCommand::Strike(_) => {}
            }
        }

        desired += self.knockback.update(dt);
        if self.active && desired != old_position {
            let resolution = solve_world_collision(old_position, desired, self.half_extents, world, sim.world_epsilon);
            self.transform.position = resolution.position;
        }

        let yaw = self.transform.yaw();
        self.body.shape = ColliderShape::Obb(Obb::from_yaw(self.transform.position, self.half_extents, yaw));
        let strike_center = self.transform.position + utils::forward_from_yaw(yaw) * config.strike_reach;
        self.strike.shape = ColliderShape::Obb(Obb::from_yaw(strike_center, config.strike_half_extents, yaw));

        let muzzle = self.muzzle();
        let aim = TargetView::alive(target).map(|view| view.position - muzzle);
        self.weapon.update(dt, muzzle, aim);
    }

    fn on_transition(&mut self, from: BossState, to: BossState) {
        debug!("boss: {} -> {}", from.name(), to.name());
        match to {
            BossState::MeleeAttack => self.strike_record.clear(),
            BossState::Damaged => {
                self.weapon.cancel_burst();
                self.strike_active = false;
            }
            BossState::Dead => {
                self.weapon.cancel_burst();
                self.strike_active = false;
                self.knockback.clear();
                info!("Boss defeated");
            }
            _ => {}
        }
    }

    /// Accept a strike-volume hit on `target_id`
    ///
    /// Returns the strike to apply when the volume is live and this target has
    /// not been hit during the current swing.
    pub fn strike_hit(&mut self, config: &BossConfig, target_id: u32, target_position: Vec3) -> Option<Strike> {
        if !self.strike_active || self.strike_record.check(target_id) {
            return None;
        }
        self.strike_record.add(target_id);
        let direction = utils::flatten(target_position - self.transform.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| utils::forward_from_yaw(self.transform.yaw()));
        Some(Strike {
            damage: config.melee_damage,
            direction,
            power: config.knockback_power,
            duration: config.knockback_duration,
        })
    }

    fn muzzle(&self) -> Vec3 {
        self.transform.position + Vec3::new(0.0, self.half_extents.y * 0.5, 0.0)
    }

    /// Body collider serial id, also used as the model id
    pub fn id(&self) -> u32 {
        self.body.id()
    }

    /// Current AI state
    pub fn state(&self) -> BossState {
        self.brain.state()
    }

    /// Enraged phase reached
    pub fn is_enraged(&self) -> bool {
        self.brain.is_enraged()
    }

    /// Visible and collidable
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Body takes part in collision this frame
    pub fn is_collidable(&self) -> bool {
        self.active && !self.is_dead_now()
    }

    /// Death time has elapsed
    pub fn is_removable(&self, config: &BossConfig) -> bool {
        self.brain.is_removable(config)
    }

    /// Body collider
    pub fn body(&self) -> &Collider {
        &self.body
    }

    /// Strike volume, when live
    pub fn strike_volume(&self) -> Option<&Collider> {
        self.strike_active.then_some(&self.strike)
    }

    /// Body transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Arm angle (radians)
    pub fn arm_angle(&self) -> f32 {
        self.arm_angle
    }

    /// Hit points
    pub fn health(&self) -> Health {
        self.health
    }

    /// The boss's gun
    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Mutable gun access for collision responses
    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapon
    }
}

impl Attackable for Boss {
    fn center_position(&self) -> Vec3 {
        self.transform.position
    }

    fn is_dead_now(&self) -> bool {
        self.health.is_depleted() || self.brain.state() == BossState::Dead
    }

    fn take_damage(&mut self, amount: i32) {
        if !self.active || self.is_dead_now() {
            return;
        }
        self.stagger_accumulated += self.health.damage(amount);
        if self.stagger_accumulated >= self.stagger_threshold {
            self.stagger_accumulated = 0;
            self.stagger_pending = true;
        }
    }

    fn apply_damage_impulse(&mut self, direction: Vec3, power: f32, duration: f32) {
        if self.is_dead_now() {
            return;
        }
        // Heavy: only a fraction of the push lands
        self.knockback.apply(direction, power * 0.25, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_engine::physics::Aabb;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Vec<Aabb> {
        vec![Aabb::new(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0))]
    }

    fn spawn(config: &BossConfig) -> Boss {
        let mut boss = Boss::new(config, Vec3::new(0.0, config.half_extents.y + 0.002, 0.0));
        let sim = SimConfig::default();
        let world = floor();
        while !boss.is_active() {
            boss.update(DT, config, &sim, None, &world);
        }
        boss
    }

    #[test]
    fn test_strike_volume_hits_each_target_once_per_swing() {
        let config = BossConfig::default();
        let sim = SimConfig::default();
        let world = floor();
        let mut boss = spawn(&config);
        let target = TargetView { position: Vec3::new(0.0, 1.0, 2.5), dead: false };

        let mut hits = 0;
        let mut swings = 0;
        let mut was_live = false;
        for _ in 0..(60 * 10) {
            boss.update(DT, &config, &sim, Some(target), &world);
            let live = boss.strike_volume().is_some();
            if live && !was_live {
                swings += 1;
            }
            was_live = live;
            // Report the overlap every frame the volume is live
            if live && boss.strike_hit(&config, 42, target.position).is_some() {
                hits += 1;
            }
        }
        assert!(swings >= 2);
        assert_eq!(hits, swings);
    }

    #[test]
    fn test_strike_volume_sits_in_front() {
        let config = BossConfig::default();
        let boss = spawn(&config);
        let ColliderShape::Obb(obb) = boss.strike.shape else {
            panic!("strike volume is a box");
        };
        let offset = obb.center - boss.transform().position;
        assert!((offset.z - config.strike_reach).abs() < 1e-4, "{offset:?}");
        assert!(boss.strike_volume().is_none());
    }

    #[test]
    fn test_stagger_threshold() {
        let config = BossConfig::default();
        let sim = SimConfig::default();
        let world = floor();
        let mut boss = spawn(&config);

        boss.take_damage(config.stagger_threshold - 1);
        boss.update(DT, &config, &sim, None, &world);
        assert_ne!(boss.state(), BossState::Damaged);

        boss.take_damage(1);
        boss.update(DT, &config, &sim, None, &world);
        assert_eq!(boss.state(), BossState::Damaged);
    }

    #[test]
    fn test_ranged_burst_aims_at_target() {
        let config = BossConfig::default();
        let sim = SimConfig::default();
        let world = floor();
        let mut boss = spawn(&config);
        let target = TargetView { position: Vec3::new(10.0, 1.0, 0.0), dead: false };

        for _ in 0..120 {
            boss.update(DT, &config, &sim, Some(target), &world);
        }
        assert!(boss.weapon().shots_fired() > 0);
        assert!(boss.weapon().bullets().iter().all(|bullet| bullet.velocity().x > 0.0));
    }
}
