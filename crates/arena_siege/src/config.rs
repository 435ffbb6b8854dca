//! Game configuration
//!
//! Every tunable of the simulation lives here. The whole tree loads from a
//! single TOML or RON file through [`Config`]; missing fields fall back to the
//! defaults below.

use arena_engine::config::{Config, ConfigError};
use arena_engine::foundation::math::Vec3;
use arena_engine::physics::DEFAULT_WORLD_EPSILON;
use serde::{Deserialize, Serialize};

use crate::attack::{AttackTiming, SwingHitPolicy};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frame stepping and determinism
    pub sim: SimConfig,

    /// Player settings
    pub player: PlayerConfig,

    /// Regular enemy settings
    pub enemy: EnemyConfig,

    /// Boss settings
    pub boss: BossConfig,

    /// Waves, consumed in order
    pub waves: Vec<WaveConfig>,

    /// Item drops
    pub items: ItemConfig,
}

/// Frame stepping and determinism
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the scene RNG; every entity seed derives from it
    pub seed: u64,

    /// Longest frame the simulation will step (seconds, 0 disables the clamp)
    pub max_frame_delta: f32,

    /// Gap left by the world collision resolver
    pub world_epsilon: f32,

    /// How melee swings detect their single hit
    pub swing_hit_policy: SwingHitPolicy,

    /// Vertical acceleration (negative is down)
    pub gravity: f32,
}

/// Player configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting and maximum health
    pub max_hp: i32,

    /// Horizontal speed (units/second)
    pub move_speed: f32,

    /// Initial upward speed of a jump
    pub jump_speed: f32,

    /// Body box half extents
    pub half_extents: Vec3,

    /// Invulnerability after taking a hit (seconds)
    pub invincible_duration: f32,

    /// Height of the muzzle above the body center
    pub muzzle_height: f32,

    /// Player gun
    pub weapon: WeaponConfig,
}

/// Weapon configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Minimum time between shots
    pub fire_interval: f32,

    /// Bullet speed (units/second)
    pub bullet_speed: f32,

    /// Damage per bullet
    pub bullet_damage: i32,

    /// Bullet capsule radius
    pub bullet_radius: f32,

    /// Distance after which a bullet expires
    pub max_distance: f32,

    /// Knockback applied by a bullet hit
    pub knockback_power: f32,

    /// Knockback duration of a bullet hit
    pub knockback_duration: f32,

    /// Shots per burst
    pub max_burst_count: u32,

    /// Time between burst shots
    pub burst_interval: f32,
}

/// Regular enemy configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Health at spawn
    pub max_hp: i32,

    /// Body box half extents
    pub half_extents: Vec3,

    /// Base spawn delay before the enemy activates
    pub spawn_delay: f32,

    /// Extra delay per enemy spawned earlier in the same batch
    pub spawn_delay_step: f32,

    /// Wander speed
    pub walk_speed: f32,

    /// Chase speed
    pub chase_speed: f32,

    /// Maximum yaw change (radians/second)
    pub turn_rate: f32,

    /// Target detection radius
    pub detect_radius: f32,

    /// Own personal space radius
    pub personal_space: f32,

    /// Space kept free around the target
    pub target_space: f32,

    /// Extra reach beyond the stopping distance
    pub reach_margin: f32,

    /// Attack range
    pub attack_range: f32,

    /// Time between attacks
    pub attack_cooldown: f32,

    /// Damage per swing
    pub attack_damage: i32,

    /// Knockback speed applied to the target
    pub knockback_power: f32,

    /// Knockback duration applied to the target
    pub knockback_duration: f32,

    /// Swing timeline
    pub attack: AttackTiming,

    /// Shortest wander leg
    pub wander_min: f32,

    /// Longest wander leg
    pub wander_max: f32,

    /// Frame displacement below which a wandering enemy counts as stuck
    pub stuck_threshold: f32,

    /// Stagger after being hit
    pub stagger_duration: f32,

    /// Time from death until removal
    pub death_duration: f32,
}

/// Boss configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Health at spawn
    pub max_hp: i32,

    /// Body box half extents
    pub half_extents: Vec3,

    /// Delay before the boss activates
    pub spawn_delay: f32,

    /// Pause between decisions while idle
    pub idle_duration: f32,

    /// Chase speed
    pub move_speed: f32,

    /// Maximum yaw change (radians/second)
    pub turn_rate: f32,

    /// Distance kept from the target while chasing
    pub personal_space: f32,

    /// Range at which melee starts
    pub melee_range: f32,

    /// Time between melee attacks
    pub melee_cooldown: f32,

    /// Melee damage
    pub melee_damage: i32,

    /// Melee knockback speed
    pub knockback_power: f32,

    /// Melee knockback duration
    pub knockback_duration: f32,

    /// Melee swing timeline
    pub attack: AttackTiming,

    /// Strike volume half extents
    pub strike_half_extents: Vec3,

    /// Distance of the strike volume center in front of the boss
    pub strike_reach: f32,

    /// Range at which ranged bursts are used
    pub ranged_range: f32,

    /// Time between bursts
    pub ranged_cooldown: f32,

    /// Pause after a burst before the next decision
    pub ranged_recover: f32,

    /// Boss gun
    pub weapon: WeaponConfig,

    /// Accumulated damage that causes a stagger
    pub stagger_threshold: i32,

    /// Stagger duration
    pub stagger_duration: f32,

    /// Health fraction at or below which the boss enrages
    pub enrage_hp_fraction: f32,

    /// Speed and cooldown multiplier while enraged
    pub enrage_multiplier: f32,

    /// Time from death until the run is cleared
    pub death_duration: f32,
}

/// One wave of regular enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Enemies in this wave
    pub total_enemies: u32,

    /// Enemies per batch
    pub batch_size: u32,

    /// Time between spawns inside a batch
    pub spawn_interval: f32,

    /// Time between batches (and before the wave's first batch, except wave 0)
    pub batch_interval: f32,
}

/// Item drop configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Probability that a dead enemy drops a heal item
    pub drop_chance: f32,

    /// Health restored on pickup
    pub heal_amount: i32,

    /// Time before an untouched item disappears
    pub lifetime: f32,

    /// Pickup sphere radius
    pub radius: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            boss: BossConfig::default(),
            waves: vec![
                WaveConfig { total_enemies: 4, batch_size: 2, spawn_interval: 0.6, batch_interval: 4.0 },
                WaveConfig { total_enemies: 8, batch_size: 4, spawn_interval: 0.5, batch_interval: 5.0 },
                WaveConfig { total_enemies: 12, batch_size: 4, spawn_interval: 0.4, batch_interval: 5.0 },
            ],
            items: ItemConfig::default(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            max_frame_delta: 0.05,
            world_epsilon: DEFAULT_WORLD_EPSILON,
            swing_hit_policy: SwingHitPolicy::InstantWindow,
            gravity: -25.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_hp: 100,
            move_speed: 6.0,
            jump_speed: 9.0,
            half_extents: Vec3::new(0.5, 1.0, 0.5),
            invincible_duration: 0.6,
            muzzle_height: 0.4,
            weapon: WeaponConfig::default(),
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            fire_interval: 0.15,
            bullet_speed: 30.0,
            bullet_damage: 10,
            bullet_radius: 0.15,
            max_distance: 40.0,
            knockback_power: 2.0,
            knockback_duration: 0.1,
            max_burst_count: 3,
            burst_interval: 0.12,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_hp: 30,
            half_extents: Vec3::new(0.8, 2.0, 0.8),
            spawn_delay: 0.8,
            spawn_delay_step: 0.35,
            walk_speed: 2.0,
            chase_speed: 3.5,
            turn_rate: 4.0,
            detect_radius: 12.0,
            personal_space: 0.8,
            target_space: 0.8,
            reach_margin: 0.3,
            attack_range: 1.8,
            attack_cooldown: 1.2,
            attack_damage: 10,
            knockback_power: 6.0,
            knockback_duration: 0.25,
            attack: AttackTiming::default(),
            wander_min: 1.5,
            wander_max: 4.0,
            stuck_threshold: 0.005,
            stagger_duration: 0.3,
            death_duration: 1.0,
        }
    }
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            max_hp: 400,
            half_extents: Vec3::new(1.6, 3.0, 1.6),
            spawn_delay: 1.5,
            idle_duration: 0.8,
            move_speed: 3.0,
            turn_rate: 2.5,
            personal_space: 2.2,
            melee_range: 3.5,
            melee_cooldown: 2.0,
            melee_damage: 25,
            knockback_power: 12.0,
            knockback_duration: 0.35,
            attack: AttackTiming {
                windup: 0.6,
                swing: 0.2,
                recover: 0.6,
                raise_angle: -2.0,
                hit_angle: 1.2,
                idle_angle: 0.0,
            },
            strike_half_extents: Vec3::new(1.5, 1.2, 1.5),
            strike_reach: 2.4,
            ranged_range: 18.0,
            ranged_cooldown: 3.5,
            ranged_recover: 0.5,
            weapon: WeaponConfig {
                fire_interval: 0.1,
                bullet_speed: 18.0,
                bullet_damage: 8,
                bullet_radius: 0.3,
                max_distance: 35.0,
                knockback_power: 4.0,
                knockback_duration: 0.15,
                max_burst_count: 5,
                burst_interval: 0.15,
            },
            stagger_threshold: 60,
            stagger_duration: 0.25,
            enrage_hp_fraction: 0.5,
            enrage_multiplier: 1.4,
            death_duration: 2.0,
        }
    }
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            drop_chance: 0.35,
            heal_amount: 20,
            lifetime: 12.0,
            radius: 0.5,
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn check_positive_extents(name: &str, extents: Vec3) -> Result<(), ConfigError> {
    if extents.iter().all(|e| e.is_finite() && *e > 0.0) {
        Ok(())
    } else {
        Err(invalid(format!("{name} half extents must be positive, got {extents:?}")))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a non-negative number, got {value}")))
    }
}

impl AttackTiming {
    fn validate(&self, owner: &str) -> Result<(), ConfigError> {
        check_non_negative(&format!("{owner} windup"), self.windup)?;
        check_non_negative(&format!("{owner} recover"), self.recover)?;
        if !(self.swing.is_finite() && self.swing > 0.0) {
            return Err(invalid(format!("{owner} swing must be positive, got {}", self.swing)));
        }
        Ok(())
    }
}

impl WeaponConfig {
    fn validate(&self, owner: &str) -> Result<(), ConfigError> {
        check_non_negative(&format!("{owner} fire_interval"), self.fire_interval)?;
        check_non_negative(&format!("{owner} burst_interval"), self.burst_interval)?;
        check_non_negative(&format!("{owner} max_distance"), self.max_distance)?;
        if self.bullet_speed <= 0.0 || self.bullet_radius <= 0.0 {
            return Err(invalid(format!("{owner} bullets need positive speed and radius")));
        }
        Ok(())
    }
}

impl Config for GameConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("sim.max_frame_delta", self.sim.max_frame_delta)?;
        check_non_negative("sim.world_epsilon", self.sim.world_epsilon)?;

        if self.player.max_hp <= 0 {
            return Err(invalid("player.max_hp must be positive"));
        }
        check_positive_extents("player", self.player.half_extents)?;
        check_non_negative("player.invincible_duration", self.player.invincible_duration)?;
        self.player.weapon.validate("player.weapon")?;

        let enemy = &self.enemy;
        if enemy.max_hp <= 0 {
            return Err(invalid("enemy.max_hp must be positive"));
        }
        check_positive_extents("enemy", enemy.half_extents)?;
        check_non_negative("enemy.spawn_delay", enemy.spawn_delay)?;
        check_non_negative("enemy.spawn_delay_step", enemy.spawn_delay_step)?;
        check_non_negative("enemy.attack_cooldown", enemy.attack_cooldown)?;
        check_non_negative("enemy.stagger_duration", enemy.stagger_duration)?;
        check_non_negative("enemy.death_duration", enemy.death_duration)?;
        check_non_negative("enemy.wander_min", enemy.wander_min)?;
        if enemy.wander_max < enemy.wander_min {
            return Err(invalid(format!(
                "enemy.wander_max ({}) is below enemy.wander_min ({})",
                enemy.wander_max, enemy.wander_min
            )));
        }
        enemy.attack.validate("enemy.attack")?;

        let boss = &self.boss;
        if boss.max_hp <= 0 {
            return Err(invalid("boss.max_hp must be positive"));
        }
        check_positive_extents("boss", boss.half_extents)?;
        check_positive_extents("boss strike", boss.strike_half_extents)?;
        check_non_negative("boss.spawn_delay", boss.spawn_delay)?;
        check_non_negative("boss.death_duration", boss.death_duration)?;
        if !(0.0..=1.0).contains(&boss.enrage_hp_fraction) {
            return Err(invalid("boss.enrage_hp_fraction must be within [0, 1]"));
        }
        if boss.enrage_multiplier <= 0.0 {
            return Err(invalid("boss.enrage_multiplier must be positive"));
        }
        boss.attack.validate("boss.attack")?;
        boss.weapon.validate("boss.weapon")?;

        for (index, wave) in self.waves.iter().enumerate() {
            if wave.total_enemies > 0 && wave.batch_size == 0 {
                return Err(invalid(format!("wave {index} has enemies but a zero batch size")));
            }
            check_non_negative(&format!("wave {index} spawn_interval"), wave.spawn_interval)?;
            check_non_negative(&format!("wave {index} batch_interval"), wave.batch_interval)?;
        }

        if !(0.0..=1.0).contains(&self.items.drop_chance) {
            return Err(invalid("items.drop_chance must be within [0, 1]"));
        }
        check_non_negative("items.lifetime", self.items.lifetime)?;

        Ok(())
    }
}
