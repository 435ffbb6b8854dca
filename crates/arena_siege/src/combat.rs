//! Damage, knockback and the attackable-target contract

use arena_engine::foundation::math::{utils, Vec3};

/// Anything that can be hit by a strike or a bullet
pub trait Attackable {
    /// Center used for aiming and knockback direction
    fn center_position(&self) -> Vec3;

    /// Whether the target is already dead
    fn is_dead_now(&self) -> bool;

    /// Subtract health; reactions are left to the target's own update
    fn take_damage(&mut self, amount: i32);

    /// Push the target along `direction` at `power` units/second for `duration` seconds
    fn apply_damage_impulse(&mut self, direction: Vec3, power: f32, duration: f32);
}

/// One resolved hit, produced by an attacker and applied to a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    /// Health removed
    pub damage: i32,
    /// Horizontal knockback direction (unit length or zero)
    pub direction: Vec3,
    /// Knockback speed
    pub power: f32,
    /// Knockback duration
    pub duration: f32,
}

impl Strike {
    /// Apply damage and knockback; dead targets are left alone
    pub fn apply_to<T: Attackable + ?Sized>(&self, target: &mut T) -> bool {
        if target.is_dead_now() {
            return false;
        }
        target.take_damage(self.damage);
        target.apply_damage_impulse(self.direction, self.power, self.duration);
        true
    }
}

/// What an AI sees of its target this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    /// Target center
    pub position: Vec3,
    /// Target already dead
    pub dead: bool,
}

impl TargetView {
    /// Snapshot any attackable
    pub fn of<T: Attackable + ?Sized>(target: &T) -> Self {
        Self {
            position: target.center_position(),
            dead: target.is_dead_now(),
        }
    }

    /// The target if it is alive
    pub fn alive(target: Option<Self>) -> Option<Self> {
        target.filter(|view| !view.dead)
    }

    /// Horizontal offset from `from` to the target
    pub fn flat_offset(&self, from: Vec3) -> Vec3 {
        utils::flatten(self.position - from)
    }
}

/// Hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Full health
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Current hit points, never negative
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Maximum hit points
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Current over maximum
    pub fn fraction(&self) -> f32 {
        if self.max > 0 {
            self.current as f32 / self.max as f32
        } else {
            0.0
        }
    }

    /// Remove health, returning the amount actually removed
    pub fn damage(&mut self, amount: i32) -> i32 {
        let removed = amount.clamp(0, self.current);
        self.current -= removed;
        removed
    }

    /// Restore health up to the maximum, returning the amount restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let restored = amount.clamp(0, self.max - self.current);
        self.current += restored;
        restored
    }

    /// Whether health has run out
    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

/// Knockback impulse decaying linearly to zero over its duration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Knockback {
    velocity: Vec3,
    remaining: f32,
    duration: f32,
}

impl Knockback {
    /// Replace any running impulse
    pub fn apply(&mut self, direction: Vec3, power: f32, duration: f32) {
        let direction = utils::flatten(direction);
        if duration <= 0.0 || power <= 0.0 || direction.norm_squared() <= f32::EPSILON {
            return;
        }
        self.velocity = direction.normalize() * power;
        self.remaining = duration;
        self.duration = duration;
    }

    /// Whether an impulse is still running
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Displacement for this frame
    pub fn update(&mut self, dt: f32) -> Vec3 {
        if !self.is_active() {
            return Vec3::zeros();
        }
        let step = dt.min(self.remaining);
        // Average the linear falloff across the step
        let start = self.remaining / self.duration;
        let end = (self.remaining - step) / self.duration;
        self.remaining -= step;
        self.velocity * (step * (start + end) * 0.5)
    }

    /// Drop any running impulse
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}
