//! Enemy state machine

use arena_engine::foundation::math::{constants, utils, Vec3};
use arena_engine::foundation::time::Cooldown;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::ai::{approach_step, turn_toward, AiCommand};
use crate::attack::{AttackClock, SwingHitPolicy};
use crate::combat::{Strike, TargetView};
use crate::config::EnemyConfig;

/// Enemy AI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnemyState {
    /// Waiting to appear
    SpawnDelay,
    /// Roaming without a target
    Wander,
    /// Closing in on the target
    Chase,
    /// Running the melee timeline
    Attack,
    /// Staggered by a hit
    Damaged,
    /// Dead, waiting for removal
    Dead,
}

impl EnemyState {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::SpawnDelay => "SpawnDelay",
            Self::Wander => "Wander",
            Self::Chase => "Chase",
            Self::Attack => "Attack",
            Self::Damaged => "Damaged",
            Self::Dead => "Dead",
        }
    }
}

/// What the enemy knows about itself and its target this frame
#[derive(Debug, Clone, Copy)]
pub struct Perception {
    /// Body center
    pub position: Vec3,
    /// Body yaw
    pub yaw: f32,
    /// Displacement actually achieved last frame, after world collision
    pub last_displacement: Vec3,
    /// Target, if any
    pub target: Option<TargetView>,
    /// Health has run out
    pub health_depleted: bool,
    /// A hit landed since the last update
    pub damage_pending: bool,
}

/// Enemy state machine with its timers and random source
#[derive(Debug, Clone)]
pub struct EnemyBrain {
    state: EnemyState,
    state_timer: f32,
    spawn_delay: f32,
    wander_timer: f32,
    wander_yaw: f32,
    last_requested_step: f32,
    attack: AttackClock,
    attack_cooldown: Cooldown,
    rng: ChaCha8Rng,
}

impl EnemyBrain {
    /// Brain in `SpawnDelay` that activates after `spawn_delay` seconds
    pub fn new(spawn_delay: f32, seed: u64) -> Self {
        Self {
            state: EnemyState::SpawnDelay,
            state_timer: 0.0,
            spawn_delay,
            wander_timer: 0.0,
            wander_yaw: 0.0,
            last_requested_step: 0.0,
            attack: AttackClock::default(),
            attack_cooldown: Cooldown::ready(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Current state
    pub fn state(&self) -> EnemyState {
        self.state
    }

    /// Seconds spent in the current state
    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    /// Heading the wander state is turning toward
    pub fn wander_yaw(&self) -> f32 {
        self.wander_yaw
    }

    /// Whether the running attack has already struck
    pub fn did_hit_this_attack(&self) -> bool {
        self.attack.did_hit()
    }

    /// Roll against `chance` with the enemy's own random source
    pub fn roll(&mut self, chance: f32) -> bool {
        self.rng.gen::<f32>() < chance
    }

    /// Run the current state for one frame
    pub fn update(
        &mut self,
        dt: f32,
        config: &EnemyConfig,
        policy: SwingHitPolicy,
        perception: &Perception,
    ) -> Vec<AiCommand<EnemyState>> {
        let mut commands = Vec::new();
        self.attack_cooldown.tick(dt);
        let requested_step = std::mem::take(&mut self.last_requested_step);

        let next = match self.state {
            EnemyState::SpawnDelay => self.update_spawn_delay(dt, &mut commands),
            EnemyState::Dead => {
                self.state_timer += dt;
                None
            }
            _ => Self::react_to_damage(perception).or_else(|| match self.state {
                EnemyState::Wander => {
                    self.update_wander(dt, config, perception, requested_step, &mut commands)
                }
                EnemyState::Chase => self.update_chase(dt, config, perception, &mut commands),
                EnemyState::Attack => self.update_attack(dt, config, policy, perception, &mut commands),
                _ => self.update_damaged(dt, config, perception),
            }),
        };

        if let Some(next) = next {
            self.enter(next, config, &mut commands);
        }
        commands
    }

    /// Whether a dead enemy has finished its death time
    pub fn is_removable(&self, config: &EnemyConfig) -> bool {
        self.state == EnemyState::Dead && self.state_timer >= config.death_duration
    }

    fn enter(&mut self, next: EnemyState, config: &EnemyConfig, commands: &mut Vec<AiCommand<EnemyState>>) {
        self.state = next;
        self.state_timer = 0.0;
        match next {
            EnemyState::Wander => {
                self.attack.clear_hit();
                self.pick_wander(config);
                commands.push(AiCommand::SetArmAngle(config.attack.idle_angle));
            }
            EnemyState::Attack => self.attack.start(),
            EnemyState::Damaged | EnemyState::Dead => {
                commands.push(AiCommand::SetArmAngle(config.attack.idle_angle));
            }
            EnemyState::SpawnDelay | EnemyState::Chase => {}
        }
        commands.push(AiCommand::TransitionTo(next));
    }

    fn react_to_damage(perception: &Perception) -> Option<EnemyState> {
        if perception.health_depleted {
            Some(EnemyState::Dead)
        } else if perception.damage_pending {
            Some(EnemyState::Damaged)
        } else {
            None
        }
    }

    fn pick_wander(&mut self, config: &EnemyConfig) {
        self.wander_yaw = utils::wrap_angle(self.rng.gen_range(0.0..constants::TAU));
        self.wander_timer = self.rng.gen_range(config.wander_min..=config.wander_max);
    }

    fn update_spawn_delay(&mut self, dt: f32, commands: &mut Vec<AiCommand<EnemyState>>) -> Option<EnemyState> {
        self.state_timer += dt;
        if self.state_timer >= self.spawn_delay {
            commands.push(AiCommand::Activate);
            Some(EnemyState::Wander)
        } else {
            None
        }
    }

    fn update_wander(
        &mut self,
        dt: f32,
        config: &EnemyConfig,
        perception: &Perception,
        requested_step: f32,
        commands: &mut Vec<AiCommand<EnemyState>>,
    ) -> Option<EnemyState> {
        self.state_timer += dt;

        if let Some(target) = TargetView::alive(perception.target) {
            if target.flat_offset(perception.position).norm() <= config.detect_radius {
                return Some(EnemyState::Chase);
            }
        }

        self.wander_timer -= dt;
        let threshold = config.stuck_threshold;
        let stuck = requested_step > threshold
            && perception.last_displacement.norm_squared() < threshold * threshold;
        if self.wander_timer <= 0.0 || stuck {
            self.pick_wander(config);
        }

        let yaw = turn_toward(perception.yaw, self.wander_yaw, config.turn_rate, dt);
        let step = utils::forward_from_yaw(yaw) * (config.walk_speed * dt);
        self.last_requested_step = step.norm();
        commands.push(AiCommand::Face(yaw));
        commands.push(AiCommand::Move(step));
        None
    }

    fn update_chase(
        &mut self,
        dt: f32,
        config: &EnemyConfig,
        perception: &Perception,
        commands: &mut Vec<AiCommand<EnemyState>>,
    ) -> Option<EnemyState> {
        self.state_timer += dt;
        let Some(target) = TargetView::alive(perception.target) else {
            return Some(EnemyState::Wander);
        };

        let offset = target.flat_offset(perception.position);
        let distance = offset.norm();
        if distance > config.detect_radius * 1.5 {
            return Some(EnemyState::Wander);
        }
        if distance > f32::EPSILON {
            commands.push(AiCommand::Face(utils::yaw_from_direction(offset)));
        }

        let min_distance = config.personal_space + config.target_space;
        let step = approach_step(offset, min_distance, config.chase_speed * dt);
        self.last_requested_step = step.norm();
        commands.push(AiCommand::Move(step));

        let distance_after = (distance - step.norm()).max(0.0);
        let reach = config.attack_range.max(min_distance + config.reach_margin);
        if distance_after <= reach && self.attack_cooldown.is_ready() {
            Some(EnemyState::Attack)
        } else {
            None
        }
    }

    fn update_attack(
        &mut self,
        dt: f32,
        config: &EnemyConfig,
        policy: SwingHitPolicy,
        perception: &Perception,
        commands: &mut Vec<AiCommand<EnemyState>>,
    ) -> Option<EnemyState> {
        self.state_timer += dt;
        let Some(target) = TargetView::alive(perception.target) else {
            return Some(EnemyState::Wander);
        };

        let offset = target.flat_offset(perception.position);
        let direction = if offset.norm_squared() > f32::EPSILON {
            commands.push(AiCommand::Face(utils::yaw_from_direction(offset)));
            offset.normalize()
        } else {
            utils::forward_from_yaw(perception.yaw)
        };

        let tick = self.attack.advance(dt, &config.attack, policy);
        commands.push(AiCommand::SetArmAngle(tick.arm_angle));

        if tick.strike_now {
            commands.push(AiCommand::Strike(Strike {
                damage: config.attack_damage,
                direction,
                power: config.knockback_power,
                duration: config.knockback_duration,
            }));
            self.attack_cooldown.trigger(config.attack_cooldown);
        }

        if tick.finished {
            commands.push(AiCommand::SetArmAngle(config.attack.idle_angle));
            Some(EnemyState::Chase)
        } else {
            None
        }
    }

    fn update_damaged(&mut self, dt: f32, config: &EnemyConfig, perception: &Perception) -> Option<EnemyState> {
        self.state_timer += dt;
        if self.state_timer < config.stagger_duration {
            return None;
        }
        let target_near = TargetView::alive(perception.target)
            .is_some_and(|target| target.flat_offset(perception.position).norm() <= config.detect_radius);
        Some(if target_near { EnemyState::Chase } else { EnemyState::Wander })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn perception(position: Vec3, target: Option<Vec3>) -> Perception {
        Perception {
            position,
            yaw: 0.0,
            last_displacement: Vec3::zeros(),
            target: target.map(|position| TargetView { position, dead: false }),
            health_depleted: false,
            damage_pending: false,
        }
    }

    fn transitions(commands: &[AiCommand<EnemyState>]) -> Vec<EnemyState> {
        commands
            .iter()
            .filter_map(|command| match command {
                AiCommand::TransitionTo(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    fn active_brain(config: &EnemyConfig, seed: u64) -> EnemyBrain {
        let mut brain = EnemyBrain::new(0.0, seed);
        brain.update(DT, config, SwingHitPolicy::InstantWindow, &perception(Vec3::zeros(), None));
        assert_eq!(brain.state(), EnemyState::Wander);
        brain
    }

    #[test]
    fn test_spawn_delay_then_activate() {
        let config = EnemyConfig::default();
        let mut brain = EnemyBrain::new(0.5, 1);
        let view = perception(Vec3::zeros(), None);

        let mut activated_at = None;
        for frame in 0..60 {
            let commands = brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
            if commands.contains(&AiCommand::Activate) {
                activated_at = Some(frame);
                assert_eq!(transitions(&commands), vec![EnemyState::Wander]);
                break;
            }
        }
        // 0.5 s at 60 Hz: the 30th frame reaches the delay
        assert!(matches!(activated_at, Some(28..=30)), "{activated_at:?}");
    }

    #[test]
    fn test_wander_sees_target_and_chases() {
        let config = EnemyConfig::default();
        let mut brain = active_brain(&config, 2);

        let far = perception(Vec3::zeros(), Some(Vec3::new(0.0, 0.0, config.detect_radius + 5.0)));
        let commands = brain.update(DT, &config, SwingHitPolicy::InstantWindow, &far);
        assert!(transitions(&commands).is_empty());
        assert!(commands.iter().any(|command| matches!(command, AiCommand::Move(_))));

        let near = perception(Vec3::zeros(), Some(Vec3::new(0.0, 0.0, config.detect_radius - 1.0)));
        let commands = brain.update(DT, &config, SwingHitPolicy::InstantWindow, &near);
        assert_eq!(transitions(&commands), vec![EnemyState::Chase]);
    }

    #[test]
    fn test_chase_never_passes_min_distance() {
        let config = EnemyConfig { attack_cooldown: 100.0, ..EnemyConfig::default() };
        let mut brain = active_brain(&config, 3);
        let target = Vec3::new(0.0, 0.0, 6.0);
        let min_distance = config.personal_space + config.target_space;

        let mut position = Vec3::zeros();
        for _ in 0..600 {
            let view = perception(position, Some(target));
            for command in brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view) {
                if let AiCommand::Move(step) = command {
                    position += step;
                }
            }
            assert!((target - position).norm() >= min_distance - 1e-4);
        }
    }

    #[test]
    fn test_single_strike_per_attack() {
        let config = EnemyConfig::default();
        let mut brain = active_brain(&config, 4);
        let view = perception(Vec3::zeros(), Some(Vec3::new(0.0, 0.0, 1.0)));

        let mut attacks_finished = 0;
        let mut strikes_this_attack = 0;
        for _ in 0..(60 * 20) {
            let commands = brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
            strikes_this_attack += commands
                .iter()
                .filter(|command| matches!(command, AiCommand::Strike(_)))
                .count();
            let entered = transitions(&commands);
            if entered.contains(&EnemyState::Chase) && strikes_this_attack > 0 {
                assert_eq!(strikes_this_attack, 1);
                attacks_finished += 1;
                strikes_this_attack = 0;
            }
            if entered.contains(&EnemyState::Attack) {
                assert!(!brain.did_hit_this_attack());
            }
        }
        // Cooldown 1.2 s plus 0.87 s attack: several attacks in 20 s
        assert!(attacks_finished >= 8, "{attacks_finished}");
    }

    #[test]
    fn test_target_death_returns_to_wander() {
        let config = EnemyConfig::default();
        let mut brain = active_brain(&config, 5);
        let mut view = perception(Vec3::zeros(), Some(Vec3::new(0.0, 0.0, 1.0)));
        brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        assert_eq!(brain.state(), EnemyState::Attack);

        view.target = view.target.map(|target| TargetView { dead: true, ..target });
        let commands = brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        assert_eq!(transitions(&commands), vec![EnemyState::Wander]);
        assert!(!brain.did_hit_this_attack());
    }

    #[test]
    fn test_damage_reaction_and_death() {
        let config = EnemyConfig::default();
        let mut brain = active_brain(&config, 6);
        let mut view = perception(Vec3::zeros(), Some(Vec3::new(0.0, 0.0, 5.0)));

        view.damage_pending = true;
        brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        assert_eq!(brain.state(), EnemyState::Damaged);

        view.damage_pending = false;
        let mut recovered = Vec::new();
        for _ in 0..60 {
            recovered.extend(transitions(&brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view)));
        }
        assert_eq!(recovered.first(), Some(&EnemyState::Chase));

        view.health_depleted = true;
        brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        assert_eq!(brain.state(), EnemyState::Dead);
        assert!(!brain.is_removable(&config));
        for _ in 0..90 {
            assert!(brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view).is_empty());
        }
        assert!(brain.is_removable(&config));
    }

    #[test]
    fn test_stuck_wanderer_picks_new_heading() {
        let config = EnemyConfig { wander_min: 10.0, wander_max: 10.0, ..EnemyConfig::default() };
        let mut brain = active_brain(&config, 7);
        let heading = brain.wander_yaw();

        let mut view = perception(Vec3::zeros(), None);
        view.last_displacement = Vec3::new(0.0, 0.0, config.walk_speed * DT);
        brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        assert_eq!(brain.wander_yaw(), heading, "moving freely keeps the heading");

        view.last_displacement = Vec3::zeros();
        brain.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
        assert_ne!(brain.wander_yaw(), heading);
    }

    #[test]
    fn test_same_seed_same_wander() {
        let config = EnemyConfig { wander_min: 0.1, wander_max: 0.3, ..EnemyConfig::default() };
        let mut a = active_brain(&config, 99);
        let mut b = active_brain(&config, 99);
        let view = perception(Vec3::zeros(), None);
        for _ in 0..300 {
            let commands_a = a.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
            let commands_b = b.update(DT, &config, SwingHitPolicy::InstantWindow, &view);
            assert_eq!(commands_a, commands_b);
        }
    }
}
