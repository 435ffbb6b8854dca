//! Regular enemies

mod brain;

pub use brain::{EnemyBrain, EnemyState, Perception};

use arena_engine::foundation::math::{Transform, Vec3};
use arena_engine::physics::{
    solve_world_collision, Collider, ColliderKind, ColliderShape, CollisionLayers, Obb, WorldGeometry,
};
use log::debug;

use crate::ai::AiCommand;
use crate::combat::{Attackable, Health, Knockback, Strike, TargetView};
use crate::config::{EnemyConfig, SimConfig};

/// A melee enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    transform: Transform,
    half_extents: Vec3,
    arm_angle: f32,
    health: Health,
    knockback: Knockback,
    brain: EnemyBrain,
    collider: Collider,
    active: bool,
    pending_damage_reaction: bool,
    last_displacement: Vec3,
}

impl Enemy {
    /// Enemy centered at `position`, appearing after `spawn_delay`
    pub fn new(config: &EnemyConfig, position: Vec3, spawn_delay: f32, seed: u64) -> Self {
        let shape = ColliderShape::Obb(Obb::from_yaw(position, config.half_extents, 0.0));
        Self {
            transform: Transform::from_position(position),
            half_extents: config.half_extents,
            arm_angle: config.attack.idle_angle,
            health: Health::new(config.max_hp),
            knockback: Knockback::default(),
            brain: EnemyBrain::new(spawn_delay, seed),
            collider: Collider::new(ColliderKind::Enemy, shape)
                .with_mask(CollisionLayers::PLAYER | CollisionLayers::PROJECTILE),
            active: false,
            pending_damage_reaction: false,
            last_displacement: Vec3::zeros(),
        }
    }

    /// Step AI, movement and world collision; returns strikes aimed at the target
    pub fn update(
        &mut self,
        dt: f32,
        config: &EnemyConfig,
        sim: &SimConfig,
        target: Option<TargetView>,
        world: &(impl WorldGeometry + ?Sized),
    ) -> Vec<Strike> {
        let perception = Perception {
            position: self.transform.position,
            yaw: self.transform.yaw(),
            last_displacement: self.last_displacement,
            target,
            health_depleted: self.health.is_depleted(),
            damage_pending: std::mem::take(&mut self.pending_damage_reaction),
        };

        let previous_state = self.brain.state();
        let commands = self.brain.update(dt, config, sim.swing_hit_policy, &perception);

        let old_position = self.transform.position;
        let mut desired = old_position;
        let mut strikes = Vec::new();
        for command in commands {
            match command {
                AiCommand::Move(step) => desired += step,
                AiCommand::Face(yaw) => self.transform.rotation.y = yaw,
                AiCommand::SetArmAngle(angle) => self.arm_angle = angle,
                AiCommand::Activate => self.active = true,
                AiCommand::Strike(strike) => strikes.push(strike),
                AiCommand::TransitionTo(state) => {
                    debug!("enemy {}: {} -> {}", self.id(), previous_state.name(), state.name());
                    if state == EnemyState::Dead {
                        self.knockback.clear();
                    }
                }
                AiCommand::SetStrikeVolume(_) | AiCommand::Fire(_) => {}
            }
        }

        desired += self.knockback.update(dt);

        if self.active && desired != old_position {
            let resolution = solve_world_collision(old_position, desired, self.half_extents, world, sim.world_epsilon);
            self.transform.position = resolution.position;
        }
        self.last_displacement = self.transform.position - old_position;
        self.collider.shape = ColliderShape::Obb(Obb::from_yaw(
            self.transform.position,
            self.half_extents,
            self.transform.yaw(),
        ));

        strikes
    }

    /// Collider serial id, also used as the model id
    pub fn id(&self) -> u32 {
        self.collider.id()
    }

    /// Current AI state
    pub fn state(&self) -> EnemyState {
        self.brain.state()
    }

    /// Visible and collidable
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Counts toward the alive total of the wave spawner
    pub fn is_alive(&self) -> bool {
        self.brain.state() != EnemyState::Dead
    }

    /// Takes part in collision this frame
    pub fn is_collidable(&self) -> bool {
        self.active && !self.is_dead_now()
    }

    /// Death time has elapsed
    pub fn is_removable(&self, config: &EnemyConfig) -> bool {
        self.brain.is_removable(config)
    }

    /// Roll for an item drop with the enemy's own random source
    pub fn roll_drop(&mut self, chance: f32) -> bool {
        self.brain.roll(chance)
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

    /// Body collider
    pub fn collider(&self) -> &Collider {
        &self.collider
    }
}

impl Attackable for Enemy {
    fn center_position(&self) -> Vec3 {
        self.transform.position
    }

    fn is_dead_now(&self) -> bool {
        self.health.is_depleted() || self.brain.state() == EnemyState::Dead
    }

    fn take_damage(&mut self, amount: i32) {
        if !self.active || self.is_dead_now() {
            return;
        }
        self.health.damage(amount);
        self.pending_damage_reaction = true;
    }

    fn apply_damage_impulse(&mut self, direction: Vec3, power: f32, duration: f32) {
        if self.is_dead_now() {
            return;
        }
        self.knockback.apply(direction, power, duration);
    }
}
