//! Player character

use arena_engine::foundation::math::{utils, Transform, Vec3};
use arena_engine::foundation::time::Cooldown;
use arena_engine::physics::{
    solve_world_collision, Collider, ColliderKind, ColliderShape, CollisionLayers, Obb, WorldGeometry,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::combat::{Attackable, Health, Knockback};
use crate::config::{PlayerConfig, SimConfig};
use crate::weapon::{Shooter, Weapon};

/// One frame of player intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Desired horizontal movement; longer than 1 is clamped to 1
    pub move_dir: Vec3,
    /// Aim direction; zero keeps the current facing
    pub aim_dir: Vec3,
    /// Trigger held
    pub fire: bool,
    /// Jump pressed
    pub jump: bool,
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    transform: Transform,
    half_extents: Vec3,
    health: Health,
    vertical_speed: f32,
    grounded: bool,
    knockback: Knockback,
    invincible: Cooldown,
    pending_invincibility: bool,
    weapon: Weapon,
    collider: Collider,
}

impl Player {
    /// Player centered at `position`
    pub fn new(config: &PlayerConfig, position: Vec3) -> Self {
        let shape = ColliderShape::Obb(Obb::from_yaw(position, config.half_extents, 0.0));
        Self {
            transform: Transform::from_position(position),
            half_extents: config.half_extents,
            health: Health::new(config.max_hp),
            vertical_speed: 0.0,
            grounded: false,
            knockback: Knockback::default(),
            invincible: Cooldown::ready(),
            pending_invincibility: false,
            weapon: Weapon::new(config.weapon, Shooter::Player),
            collider: Collider::new(ColliderKind::Player, shape).with_mask(
                CollisionLayers::ENEMY
                    | CollisionLayers::BOSS
                    | CollisionLayers::STRIKE
                    | CollisionLayers::PROJECTILE
                    | CollisionLayers::PICKUP,
            ),
        }
    }

    /// Move, jump, fall, resolve against the world and fire
    pub fn update(
        &mut self,
        dt: f32,
        input: &PlayerInput,
        config: &PlayerConfig,
        sim: &SimConfig,
        world: &(impl WorldGeometry + ?Sized),
    ) {
        self.invincible.tick(dt);
        if std::mem::take(&mut self.pending_invincibility) {
            self.invincible.trigger(config.invincible_duration);
        }

        let muzzle = self.muzzle(config);
        self.weapon.update(dt, muzzle, None);
        if self.is_dead_now() {
            return;
        }

        let mut planar = utils::flatten(input.move_dir);
        if planar.norm_squared() > 1.0 {
            planar = planar.normalize();
        }

        let aim = utils::flatten(input.aim_dir);
        if aim.norm_squared() > f32::EPSILON {
            self.transform.rotation.y = utils::yaw_from_direction(aim);
        } else if planar.norm_squared() > f32::EPSILON {
            self.transform.rotation.y = utils::yaw_from_direction(planar);
        }

        if input.jump && self.grounded {
            self.vertical_speed = config.jump_speed;
            self.grounded = false;
        }
        self.vertical_speed += sim.gravity * dt;

        let old_position = self.transform.position;
        let desired = old_position
            + planar * (config.move_speed * dt)
            + Vec3::new(0.0, self.vertical_speed * dt, 0.0)
            + self.knockback.update(dt);

        let resolution = solve_world_collision(old_position, desired, self.half_extents, world, sim.world_epsilon);
        self.transform.position = resolution.position;
        self.grounded = resolution.grounded;
        if (resolution.grounded && self.vertical_speed < 0.0) || (resolution.hit_ceiling && self.vertical_speed > 0.0) {
            self.vertical_speed = 0.0;
        }
        self.collider.shape = ColliderShape::Obb(Obb::from_yaw(
            self.transform.position,
            self.half_extents,
            self.transform.yaw(),
        ));

        if input.fire {
            let direction = if input.aim_dir.norm_squared() > f32::EPSILON {
                input.aim_dir
            } else {
                utils::forward_from_yaw(self.transform.yaw())
            };
            let muzzle = self.muzzle(config);
            if self.weapon.try_fire(muzzle, direction) {
                debug!("player fired, {} bullets live", self.weapon.bullets().len());
            }
        }
    }

    /// Restore health, returning the amount restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.is_dead_now() {
            return 0;
        }
        self.health.heal(amount)
    }

    fn muzzle(&self, config: &PlayerConfig) -> Vec3 {
        self.transform.position + Vec3::new(0.0, config.muzzle_height, 0.0)
    }

    /// Collider serial id, also used as the model id
    pub fn id(&self) -> u32 {
        self.collider.id()
    }

    /// Body transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Hit points
    pub fn health(&self) -> Health {
        self.health
    }

    /// Standing on something
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Ignoring damage
    pub fn is_invincible(&self) -> bool {
        !self.invincible.is_ready() || self.pending_invincibility
    }

    /// Body collider
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    /// The player's gun
    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Mutable gun access for collision responses
    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapon
    }
}

impl Attackable for Player {
    fn center_position(&self) -> Vec3 {
        self.transform.position
    }

    fn is_dead_now(&self) -> bool {
        self.health.is_depleted()
    }

    fn take_damage(&mut self, amount: i32) {
        if self.is_dead_now() || !self.invincible.is_ready() {
            return;
        }
        self.health.damage(amount);
        self.pending_invincibility = true;
        debug!("player took {amount} damage, {} hp left", self.health.current());
    }

    fn apply_damage_impulse(&mut self, direction: Vec3, power: f32, duration: f32) {
        if self.is_dead_now() || !self.invincible.is_ready() {
            return;
        }
        self.knockback.apply(direction, power, duration);
    }
}
