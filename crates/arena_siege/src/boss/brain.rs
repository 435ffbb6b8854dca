//! Boss state machine

use arena_engine::foundation::math::{utils, Vec3};
use arena_engine::foundation::time::Cooldown;
use log::info;
use serde::Serialize;

use crate::ai::{approach_step, turn_toward, AiCommand};
use crate::attack::{AttackClock, SwingHitPolicy};
use crate::combat::TargetView;
use crate::config::BossConfig;

/// Boss AI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BossState {
    /// Waiting to appear
    SpawnDelay,
    /// Facing the target, deciding what to do next
    Idle,
    /// Closing in on the target
    Chase,
    /// Melee swing with a live strike volume
    MeleeAttack,
    /// Burst fire
    RangedAttack,
    /// Staggered after taking heavy damage
    Damaged,
    /// Dead, waiting for removal
    Dead,
}

impl BossState {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::SpawnDelay => "SpawnDelay",
            Self::Idle => "Idle",
            Self::Chase => "Chase",
            Self::MeleeAttack => "MeleeAttack",
            Self::RangedAttack => "RangedAttack",
            Self::Damaged => "Damaged",
            Self::Dead => "Dead",
        }
    }
}

/// What the boss knows this frame
#[derive(Debug, Clone, Copy)]
pub struct BossPerception {
    /// Body center
    pub position: Vec3,
    /// Body yaw
    pub yaw: f32,
    /// Target, if any
    pub target: Option<TargetView>,
    /// Current health over maximum
    pub health_fraction: f32,
    /// Health has run out
    pub health_depleted: bool,
    /// Enough damage accumulated to stagger
    pub stagger_pending: bool,
    /// The gun still has burst shots queued
    pub bursting: bool,
}

/// Boss state machine
#[derive(Debug, Clone)]
pub struct BossBrain {
    state: BossState,
    state_timer: f32,
    spawn_delay: f32,
    enraged: bool,
    attack: AttackClock,
    melee_cooldown: Cooldown,
    ranged_cooldown: Cooldown,
}

impl BossBrain {
    /// Brain that activates after `spawn_delay`
    pub fn new(spawn_delay: f32) -> Self {
        Self {
            state: BossState::SpawnDelay,
            state_timer: 0.0,
            spawn_delay,
            enraged: false,
            attack: AttackClock::default(),
            melee_cooldown: Cooldown::ready(),
            ranged_cooldown: Cooldown::ready(),
        }
    }

    /// Current state
    pub fn state(&self) -> BossState {
        self.state
    }

    /// Seconds spent in the current state
    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    /// Enraged phase reached
    pub fn is_enraged(&self) -> bool {
        self.enraged
    }

    /// Whether the death time has elapsed
    pub fn is_removable(&self, config: &BossConfig) -> bool {
        self.state == BossState::Dead && self.state_timer >= config.death_duration
    }

    /// Run the current state for one frame
    pub fn update(
        &mut self,
        dt: f32,
        config: &BossConfig,
        policy: SwingHitPolicy,
        perception: &BossPerception,
    ) -> Vec<AiCommand<BossState>> {
        let mut commands = Vec::new();
        self.melee_cooldown.tick(dt);
        self.ranged_cooldown.tick(dt);

        if !self.enraged
            && self.state != BossState::SpawnDelay
            && !perception.health_depleted
            && perception.health_fraction <= config.enrage_hp_fraction
        {
            self.enraged = true;
            info!("Boss enraged at {:.0}% health", perception.health_fraction * 100.0);
        }

        let next = match self.state {
            BossState::SpawnDelay => {
                self.state_timer += dt;
                (self.state_timer >= self.spawn_delay).then(|| {
                    commands.push(AiCommand::Activate);
                    BossState::Idle
                })
            }
            BossState::Dead => {
                self.state_timer += dt;
                None
            }
            _ => Self::react_to_damage(perception).or_else(|| {
                self.state_timer += dt;
                match self.state {
                    BossState::Idle => self.update_idle(dt, config, perception, &mut commands),
                    BossState::Chase => self.update_chase(dt, config, perception, &mut commands),
                    BossState::MeleeAttack => self.update_melee(dt, config, policy, perception, &mut commands),
                    BossState::RangedAttack => self.update_ranged(config, perception, &mut commands),
                    _ => (self.state_timer >= config.stagger_duration).then_some(BossState::Idle),
                }
            }),
        };

        if let Some(next) = next {
            self.enter(next, config, &mut commands);
        }
        commands
    }

    fn multiplier(&self, config: &BossConfig) -> f32 {
        if self.enraged {
            config.enrage_multiplier
        } else {
            1.0
        }
    }

    fn enter(&mut self, next: BossState, config: &BossConfig, commands: &mut Vec<AiCommand<BossState>>) {
        if matches!(self.state, BossState::MeleeAttack) || matches!(next, BossState::Damaged | BossState::Dead) {
            commands.push(AiCommand::SetStrikeVolume(false));
            commands.push(AiCommand::SetArmAngle(config.attack.idle_angle));
        }
        self.state = next;
        self.state_timer = 0.0;
        if next == BossState::MeleeAttack {
            self.attack.start();
        }
        commands.push(AiCommand::TransitionTo(next));
    }

    fn react_to_damage(perception: &BossPerception) -> Option<BossState> {
        if perception.health_depleted {
            Some(BossState::Dead)
        } else if perception.stagger_pending {
            Some(BossState::Damaged)
        } else {
            None
        }
    }

    fn face(
        &self,
        dt: f32,
        config: &BossConfig,
        perception: &BossPerception,
        offset: Vec3,
        commands: &mut Vec<AiCommand<BossState>>,
    ) {
        if offset.norm_squared() > f32::EPSILON {
            let yaw = turn_toward(
                perception.yaw,
                utils::yaw_from_direction(offset),
                config.turn_rate * self.multiplier(config),
                dt,
            );
            commands.push(AiCommand::Face(yaw));
        }
    }

    fn decide(
        &self,
        config: &BossConfig,
        distance: f32,
        direction: Vec3,
        commands: &mut Vec<AiCommand<BossState>>,
    ) -> Option<BossState> {
        if distance <= config.melee_range {
            return self.melee_cooldown.is_ready().then_some(BossState::MeleeAttack);
        }
        if distance <= config.ranged_range && self.ranged_cooldown.is_ready() {
            commands.push(AiCommand::Fire(direction));
            return Some(BossState::RangedAttack);
        }
        Some(BossState::Chase)
    }

    fn update_idle(
        &mut self,
        dt: f32,
        config: &BossConfig,
        perception: &BossPerception,
        commands: &mut Vec<AiCommand<BossState>>,
    ) -> Option<BossState> {
        let target = TargetView::alive(perception.target)?;
        let offset = target.flat_offset(perception.position);
        self.face(dt, config, perception, offset, commands);

        if self.state_timer < config.idle_duration / self.multiplier(config) {
            return None;
        }
        self.decide(config, offset.norm(), target.position - perception.position, commands)
    }

    fn update_chase(
        &mut self,
        dt: f32,
        config: &BossConfig,
        perception: &BossPerception,
        commands: &mut Vec<AiCommand<BossState>>,
    ) -> Option<BossState> {
        let Some(target) = TargetView::alive(perception.target) else {
            return Some(BossState::Idle);
        };
        let offset = target.flat_offset(perception.position);
        self.face(dt, config, perception, offset, commands);

        let speed = config.move_speed * self.multiplier(config);
        let step = approach_step(offset, config.personal_space, speed * dt);
        commands.push(AiCommand::Move(step));

        let distance_after = (offset.norm() - step.norm()).max(0.0);
        if distance_after <= config.melee_range {
            return Some(if self.melee_cooldown.is_ready() { BossState::MeleeAttack } else { BossState::Idle });
        }
        // Open fire from mid range rather than walking all the way in
        if distance_after > config.melee_range * 2.0
            && distance_after <= config.ranged_range
            && self.ranged_cooldown.is_ready()
        {
            commands.push(AiCommand::Fire(target.position - perception.position));
            return Some(BossState::RangedAttack);
        }
        None
    }

    fn update_melee(
        &mut self,
        dt: f32,
        config: &BossConfig,
        policy: SwingHitPolicy,
        perception: &BossPerception,
        commands: &mut Vec<AiCommand<BossState>>,
    ) -> Option<BossState> {
        let Some(target) = TargetView::alive(perception.target) else {
            return Some(BossState::Idle);
        };
        // Turning is locked once the swing starts
        if self.attack.elapsed() < config.attack.windup {
            self.face(dt, config, perception, target.flat_offset(perception.position), commands);
        }

        let tick = self.attack.advance(dt, &config.attack, policy);
        commands.push(AiCommand::SetArmAngle(tick.arm_angle));
        commands.push(AiCommand::SetStrikeVolume(tick.in_swing || tick.strike_now));

        if tick.finished {
            self.melee_cooldown.trigger(config.melee_cooldown / self.multiplier(config));
            Some(BossState::Idle)
        } else {
            None
        }
    }

    fn update_ranged(
        &mut self,
        config: &BossConfig,
        perception: &BossPerception,
        commands: &mut Vec<AiCommand<BossState>>,
    ) -> Option<BossState> {
        if TargetView::alive(perception.target).is_none() {
            return Some(BossState::Idle);
        }
        if perception.bursting {
            self.state_timer = 0.0;
            return None;
        }
        if self.state_timer >= config.ranged_recover {
            self.ranged_cooldown.trigger(config.ranged_cooldown / self.multiplier(config));
            commands.push(AiCommand::SetArmAngle(config.attack.idle_angle));
            return Some(BossState::Idle);
        }
        None
    }
}
