//! The game scene: owns every entity and runs one frame at a time
//!
//! Frame order:
//!
//! 1. clamp `dt` to `max_frame_delta`
//! 2. wave spawner, enemies created at random spawn points
//! 3. player movement and world resolution
//! 4. enemy AI, movement and world resolution; enemy strikes land on the player
//! 5. boss AI, strike volume and ranged bursts
//! 6. bullets advance and are pruned inside their weapon's update
//! 7. items age
//! 8. collision manager rebuilt and every overlapping pair dispatched both ways
//! 9. spent items pruned, dead enemies removed after their death timer and
//!    item drops rolled
//! 10. run status updated

use arena_engine::config::{Config, ConfigError};
use arena_engine::foundation::math::{utils, Vec3};
use arena_engine::foundation::time::clamp_delta;
use arena_engine::physics::{Collider, ColliderKind, ColliderShape, CollisionLayers, CollisionManager, Registered};
use arena_engine::render::ModelSink;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};

use crate::boss::Boss;
use crate::combat::{Attackable, TargetView};
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::item::Item;
use crate::level::LevelGeometry;
use crate::player::{Player, PlayerInput};
use crate::wave::{SpawnRequest, WaveSpawner};
use crate::weapon::{Bullet, Shooter};

/// Horizontal jitter applied around a spawn point
const SPAWN_JITTER: f32 = 1.0;

new_key_type! {
    /// Stable key of a live enemy
    pub struct EnemyKey;
    /// Stable key of a live item
    pub struct ItemKey;
}

/// Who a registered collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderOwner {
    /// The player body
    Player,
    /// An enemy body
    Enemy(EnemyKey),
    /// The boss body
    Boss,
    /// The boss melee volume
    BossStrike,
    /// A bullet, by index into its weapon's list for this frame
    Bullet {
        /// Owning weapon
        shooter: Shooter,
        /// Index in the weapon's bullet list
        index: usize,
    },
    /// A pickup
    Item(ItemKey),
    /// A level box, by index
    StaticWorld(usize),
}

/// Progress of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Waves are in progress
    Running,
    /// Waves cleared, the boss is in the arena
    BossFight,
    /// The boss is dead
    Cleared,
    /// The player is dead
    PlayerDefeated,
}

impl RunStatus {
    /// No further frames will be simulated
    pub fn is_over(self) -> bool {
        matches!(self, Self::Cleared | Self::PlayerDefeated)
    }
}

/// Running totals for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SceneStats {
    /// Enemies created by the wave spawner
    pub enemies_spawned: u32,
    /// Enemies removed after dying
    pub enemies_killed: u32,
    /// Heal items dropped
    pub items_dropped: u32,
    /// Heal items picked up
    pub items_collected: u32,
    /// Enemy swings and boss strikes that connected with the player
    pub melee_hits_on_player: u32,
    /// Bullets that damaged something, from either side
    pub bullet_hits: u32,
}

/// Render/HUD view of one actor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSnapshot {
    /// Box center
    pub position: [f32; 3],
    /// Facing (radians)
    pub yaw: f32,
    /// Current hit points
    pub hp: i32,
    /// Maximum hit points
    pub max_hp: i32,
    /// AI state name
    pub state: &'static str,
    /// Past its spawn delay
    pub active: bool,
}

/// Serializable view of the whole scene
///
/// Collider ids are left out: they come from a process-wide counter and differ
/// between otherwise identical scenes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    /// Frames simulated
    pub frame: u64,
    /// Simulated seconds after clamping
    pub elapsed: f32,
    /// Run status
    pub status: RunStatus,
    /// Current wave index
    pub wave: usize,
    /// Number of waves
    pub wave_count: usize,
    /// The player
    pub player: ActorSnapshot,
    /// Enemies, in slot order
    pub enemies: Vec<ActorSnapshot>,
    /// The boss, once summoned
    pub boss: Option<ActorSnapshot>,
    /// Boss has entered its enraged phase
    pub boss_enraged: bool,
    /// Live bullets from both sides
    pub bullets: usize,
    /// Item positions
    pub items: Vec<[f32; 3]>,
    /// Running totals
    pub stats: SceneStats,
}

fn to_array(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Owner of the level, the actors and the per-frame collision registry
#[derive(Debug)]
pub struct GameScene {
    config: GameConfig,
    level: LevelGeometry,
    player: Player,
    enemies: SlotMap<EnemyKey, Enemy>,
    boss: Option<Boss>,
    items: SlotMap<ItemKey, Item>,
    waves: WaveSpawner,
    collisions: CollisionManager<ColliderOwner>,
    static_colliders: Vec<Collider>,
    rng: ChaCha8Rng,
    status: RunStatus,
    frame: u64,
    elapsed: f32,
    stats: SceneStats,
}

impl GameScene {
    /// Validate both inputs and build the opening state
    pub fn new(config: GameConfig, level: LevelGeometry) -> Result<Self, ConfigError> {
        config.validate()?;
        level.validate()?;

        let player_center =
            LevelGeometry::standing_center(level.player_start, config.player.half_extents, config.sim.world_epsilon);
        let player = Player::new(&config.player, player_center);
        let static_colliders = level
            .aabbs
            .iter()
            .map(|aabb| {
                Collider::new(ColliderKind::StaticWorld, ColliderShape::aabb(aabb)).with_mask(CollisionLayers::PROJECTILE)
            })
            .collect();

        info!(
            "Scene ready: seed {:#x}, {} waves, {} level boxes",
            config.sim.seed,
            config.waves.len(),
            level.aabbs.len()
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.sim.seed),
            waves: WaveSpawner::new(config.waves.clone()),
            player,
            enemies: SlotMap::with_key(),
            boss: None,
            items: SlotMap::with_key(),
            collisions: CollisionManager::new(),
            static_colliders,
            status: RunStatus::Running,
            frame: 0,
            elapsed: 0.0,
            stats: SceneStats::default(),
            config,
            level,
        })
    }

    /// Simulate one frame
    ///
    /// Does nothing once the run is over.
    pub fn update(&mut self, dt: f32, input: &PlayerInput) {
        if self.status.is_over() {
            return;
        }
        let dt = clamp_delta(dt, self.config.sim.max_frame_delta);
        self.frame += 1;
        self.elapsed += dt;

        let alive = self.enemies.values().filter(|enemy| enemy.is_alive()).count();
        for request in self.waves.update(dt, alive) {
            self.spawn_enemy(request);
        }
        if self.waves.is_finished() && self.boss.is_none() && self.status == RunStatus::Running {
            self.spawn_boss();
        }

        self.player.update(dt, input, &self.config.player, &self.config.sim, &self.level);

        let target = TargetView::of(&self.player);
        for enemy in self.enemies.values_mut() {
            for strike in enemy.update(dt, &self.config.enemy, &self.config.sim, Some(target), &self.level) {
                if strike.apply_to(&mut self.player) {
                    self.stats.melee_hits_on_player += 1;
                }
            }
        }

        if let Some(boss) = &mut self.boss {
            let target = TargetView::of(&self.player);
            boss.update(dt, &self.config.boss, &self.config.sim, Some(target), &self.level);
        }

        for item in self.items.values_mut() {
            item.update(dt);
        }

        self.run_collisions();
        self.items.retain(|_, item| !item.is_expired());
        self.remove_dead_enemies();
        self.update_status();
    }

    fn spawn_enemy(&mut self, request: SpawnRequest) {
        let points = &self.level.spawn_points;
        if points.is_empty() {
            warn!("No spawn point for wave {} enemy", request.wave_index + 1);
            return;
        }
        let point = points[self.rng.gen_range(0..points.len())];
        let jitter = Vec3::new(
            self.rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
            0.0,
            self.rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
        );
        let center = LevelGeometry::standing_center(
            point + jitter,
            self.config.enemy.half_extents,
            self.config.sim.world_epsilon,
        );
        let delay = self.config.enemy.spawn_delay + request.order_in_batch as f32 * self.config.enemy.spawn_delay_step;
        let seed = self.rng.gen::<u64>();

        let key = self.enemies.insert(Enemy::new(&self.config.enemy, center, delay, seed));
        self.stats.enemies_spawned += 1;
        debug!(
            "Spawned enemy {:?} for wave {} at ({:.1}, {:.1}) after {:.2}s",
            key,
            request.wave_index + 1,
            center.x,
            center.z,
            delay
        );
    }

    fn spawn_boss(&mut self) {
        let center = LevelGeometry::standing_center(
            self.level.boss_spawn,
            self.config.boss.half_extents,
            self.config.sim.world_epsilon,
        );
        self.boss = Some(Boss::new(&self.config.boss, center));
        self.status = RunStatus::BossFight;
        info!("Waves cleared, the boss approaches");
    }

    fn run_collisions(&mut self) {
        self.collisions.reset();

        if !self.player.is_dead_now() {
            self.collisions.add_collider(ColliderOwner::Player, self.player.collider());
        }
        for (key, enemy) in &self.enemies {
            if enemy.is_collidable() {
                self.collisions.add_collider(ColliderOwner::Enemy(key), enemy.collider());
            }
        }
        if let Some(boss) = &self.boss {
            if boss.is_collidable() {
                self.collisions.add_collider(ColliderOwner::Boss, boss.body());
            }
            if let Some(strike) = boss.strike_volume() {
                self.collisions.add_collider(ColliderOwner::BossStrike, strike);
            }
        }
        for (index, bullet) in self.player.weapon().bullets().iter().enumerate() {
            if !bullet.is_dead() {
                let owner = ColliderOwner::Bullet { shooter: Shooter::Player, index };
                self.collisions.add_collider(owner, bullet.collider());
            }
        }
        if let Some(boss) = &self.boss {
            for (index, bullet) in boss.weapon().bullets().iter().enumerate() {
                if !bullet.is_dead() {
                    let owner = ColliderOwner::Bullet { shooter: Shooter::Boss, index };
                    self.collisions.add_collider(owner, bullet.collider());
                }
            }
        }
        for (key, item) in self.items.iter().filter(|(_, item)| !item.is_expired()) {
            self.collisions.add_collider(ColliderOwner::Item(key), item.collider());
        }
        for (index, collider) in self.static_colliders.iter().enumerate() {
            self.collisions.add_collider(ColliderOwner::StaticWorld(index), collider);
        }

        for pair in self.collisions.check_all_collisions() {
            for (me, other) in pair.directed() {
                self.on_collision(&me, &other);
            }
        }
    }

    /// Response of `me` to touching `other`
    ///
    /// Only the active side of a pair reacts; bodies, items and level boxes
    /// are passive.
    fn on_collision(&mut self, me: &Registered<ColliderOwner>, other: &Registered<ColliderOwner>) {
        match (me.owner, other.owner) {
            (ColliderOwner::Bullet { shooter, index }, ColliderOwner::StaticWorld(_)) => {
                if let Some(bullet) = self.bullet_mut(shooter, index) {
                    bullet.expire();
                }
            }
            (ColliderOwner::Bullet { shooter: Shooter::Player, index }, ColliderOwner::Enemy(key)) => {
                let Some(strike) = self.bullet_mut(Shooter::Player, index).and_then(|b| b.register_hit(other.id()))
                else {
                    return;
                };
                if let Some(enemy) = self.enemies.get_mut(key) {
                    if strike.apply_to(enemy) {
                        self.stats.bullet_hits += 1;
                    }
                }
            }
            (ColliderOwner::Bullet { shooter: Shooter::Player, index }, ColliderOwner::Boss) => {
                let Some(strike) = self.bullet_mut(Shooter::Player, index).and_then(|b| b.register_hit(other.id()))
                else {
                    return;
                };
                if let Some(boss) = &mut self.boss {
                    if strike.apply_to(boss) {
                        self.stats.bullet_hits += 1;
                    }
                }
            }
            (ColliderOwner::Bullet { shooter: Shooter::Boss, index }, ColliderOwner::Player) => {
                let Some(strike) = self.bullet_mut(Shooter::Boss, index).and_then(|b| b.register_hit(other.id()))
                else {
                    return;
                };
                if strike.apply_to(&mut self.player) {
                    self.stats.bullet_hits += 1;
                }
            }
            (ColliderOwner::BossStrike, ColliderOwner::Player) => {
                let player_position = self.player.center_position();
                let Some(strike) = self
                    .boss
                    .as_mut()
                    .and_then(|boss| boss.strike_hit(&self.config.boss, other.id(), player_position))
                else {
                    return;
                };
                if strike.apply_to(&mut self.player) {
                    self.stats.melee_hits_on_player += 1;
                }
            }
            (ColliderOwner::Item(key), ColliderOwner::Player) => {
                if self.player.is_dead_now() {
                    return;
                }
                let Some(amount) = self.items.get_mut(key).and_then(Item::try_consume) else {
                    return;
                };
                let healed = self.player.heal(amount);
                self.stats.items_collected += 1;
                debug!("Player picked up an item, healed {healed}");
            }
            _ => {}
        }
    }

    fn bullet_mut(&mut self, shooter: Shooter, index: usize) -> Option<&mut Bullet> {
        match shooter {
            Shooter::Player => self.player.weapon_mut().bullet_mut(index),
            Shooter::Boss => self.boss.as_mut()?.weapon_mut().bullet_mut(index),
        }
    }

    fn remove_dead_enemies(&mut self) {
        let removable: Vec<EnemyKey> = self
            .enemies
            .iter()
            .filter(|(_, enemy)| enemy.is_removable(&self.config.enemy))
            .map(|(key, _)| key)
            .collect();

        for key in removable {
            let Some(mut enemy) = self.enemies.remove(key) else {
                continue;
            };
            self.stats.enemies_killed += 1;
            if enemy.roll_drop(self.config.items.drop_chance) {
                let center = enemy.transform().position;
                let ground = center.y - self.config.enemy.half_extents.y;
                let position = Vec3::new(center.x, ground + self.config.items.radius, center.z);
                self.items.insert(Item::new(&self.config.items, position));
                self.stats.items_dropped += 1;
                debug!("Enemy {key:?} dropped an item");
            }
        }
    }

    fn update_status(&mut self) {
        if self.player.is_dead_now() {
            self.status = RunStatus::PlayerDefeated;
            info!("Player defeated after {:.1}s", self.elapsed);
            return;
        }
        if self.boss.as_ref().is_some_and(|boss| boss.is_removable(&self.config.boss)) {
            self.boss = None;
            self.status = RunStatus::Cleared;
            info!("Arena cleared in {:.1}s", self.elapsed);
        }
    }

    /// Position of the closest active, living enemy or boss
    pub fn nearest_threat(&self) -> Option<Vec3> {
        let origin = self.player.center_position();
        let enemies = self
            .enemies
            .values()
            .filter(|enemy| enemy.is_collidable())
            .map(|enemy| enemy.center_position());
        let boss = self
            .boss
            .iter()
            .filter(|boss| boss.is_collidable())
            .map(|boss| boss.center_position());
        enemies.chain(boss).min_by(|a, b| {
            let da = utils::flatten(a - origin).norm_squared();
            let db = utils::flatten(b - origin).norm_squared();
            da.total_cmp(&db)
        })
    }

    /// Serializable view for HUD and tooling
    pub fn snapshot(&self) -> SceneSnapshot {
        let player = &self.player;
        let player_snapshot = ActorSnapshot {
            position: to_array(player.transform().position),
            yaw: player.transform().yaw(),
            hp: player.health().current(),
            max_hp: player.health().max(),
            state: if player.is_dead_now() { "Dead" } else { "Alive" },
            active: true,
        };
        let enemies = self
            .enemies
            .values()
            .map(|enemy| ActorSnapshot {
                position: to_array(enemy.transform().position),
                yaw: enemy.transform().yaw(),
                hp: enemy.health().current(),
                max_hp: enemy.health().max(),
                state: enemy.state().name(),
                active: enemy.is_active(),
            })
            .collect();
        let boss = self.boss.as_ref().map(|boss| ActorSnapshot {
            position: to_array(boss.transform().position),
            yaw: boss.transform().yaw(),
            hp: boss.health().current(),
            max_hp: boss.health().max(),
            state: boss.state().name(),
            active: boss.is_active(),
        });
        let boss_bullets = self.boss.as_ref().map_or(0, |boss| boss.weapon().bullets().len());

        SceneSnapshot {
            frame: self.frame,
            elapsed: self.elapsed,
            status: self.status,
            wave: self.waves.wave_index(),
            wave_count: self.waves.wave_count(),
            player: player_snapshot,
            enemies,
            boss,
            boss_enraged: self.boss.as_ref().is_some_and(Boss::is_enraged),
            bullets: player.weapon().bullets().len() + boss_bullets,
            items: self.items.values().map(|item| to_array(item.position())).collect(),
            stats: self.stats,
        }
    }

    /// Push every visible transform to the renderer
    ///
    /// Model ids are collider ids.
    pub fn sync_models(&self, sink: &mut dyn ModelSink) {
        sink.set_transform(u64::from(self.player.id()), self.player.transform());
        for enemy in self.enemies.values().filter(|enemy| enemy.is_active()) {
            sink.set_transform(u64::from(enemy.id()), enemy.transform());
        }
        if let Some(boss) = self.boss.as_ref().filter(|boss| boss.is_active()) {
            sink.set_transform(u64::from(boss.id()), boss.transform());
            for bullet in boss.weapon().bullets() {
                sink.set_translate(u64::from(bullet.id()), bullet.position());
            }
        }
        for bullet in self.player.weapon().bullets() {
            sink.set_translate(u64::from(bullet.id()), bullet.position());
        }
        for item in self.items.values() {
            sink.set_translate(u64::from(item.id()), item.position());
        }
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Enemies still in the scene, dying ones included
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// The boss, once summoned and until removed
    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    /// Items on the ground
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Wave progression
    pub fn waves(&self) -> &WaveSpawner {
        &self.waves
    }

    /// Run status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Running totals
    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// Frames simulated
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Game settings
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Level layout
    pub fn level(&self) -> &LevelGeometry {
        &self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveConfig;
    use arena_engine::physics::Aabb;
    use arena_engine::render::RecordingSink;

    const DT: f32 = 1.0 / 60.0;

    /// Open floor with a single spawn point ahead of the player
    fn open_floor() -> LevelGeometry {
        LevelGeometry {
            aabbs: vec![Aabb::new(Vec3::new(-40.0, -1.0, -40.0), Vec3::new(40.0, 0.0, 40.0))],
            spawn_points: vec![Vec3::new(0.0, 0.0, 6.0)],
            player_start: Vec3::zeros(),
            boss_spawn: Vec3::new(0.0, 0.0, 30.0),
        }
    }

    fn single_enemy() -> GameConfig {
        GameConfig {
            waves: vec![WaveConfig { total_enemies: 1, batch_size: 1, spawn_interval: 0.5, batch_interval: 2.0 }],
            ..GameConfig::default()
        }
    }

    fn aim_at_threat(scene: &GameScene) -> PlayerInput {
        let aim = scene
            .nearest_threat()
            .map(|threat| utils::flatten(threat - scene.player().center_position()))
            .unwrap_or_else(Vec3::z);
        PlayerInput { aim_dir: aim, fire: true, ..PlayerInput::default() }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GameConfig::default();
        config.waves[0].batch_size = 0;
        assert!(matches!(GameScene::new(config, LevelGeometry::default()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_first_enemy_spawns_on_first_frame() {
        let mut scene = GameScene::new(GameConfig::default(), LevelGeometry::default()).unwrap();
        scene.update(DT, &PlayerInput::default());
        assert_eq!(scene.enemies().count(), 1);
        assert_eq!(scene.stats().enemies_spawned, 1);
        assert!(!scene.enemies().next().unwrap().is_active(), "still in its spawn delay");
    }

    #[test]
    fn test_empty_wave_list_summons_the_boss() {
        let config = GameConfig { waves: Vec::new(), ..GameConfig::default() };
        let mut scene = GameScene::new(config, LevelGeometry::default()).unwrap();
        scene.update(DT, &PlayerInput::default());
        assert!(scene.boss().is_some());
        assert_eq!(scene.status(), RunStatus::BossFight);
    }

    #[test]
    fn test_bullets_kill_an_enemy_and_it_is_removed() {
        let mut scene = GameScene::new(single_enemy(), open_floor()).unwrap();
        for _ in 0..(60 * 6) {
            let input = aim_at_threat(&scene);
            scene.update(DT, &input);
            if scene.stats().enemies_killed == 1 {
                break;
            }
        }
        let stats = scene.stats();
        assert_eq!(stats.enemies_killed, 1);
        assert!(stats.bullet_hits >= 3, "{stats:?}");
        assert_eq!(scene.enemies().count(), 0);
    }

    #[test]
    fn test_wave_clear_leads_to_boss_fight() {
        let mut scene = GameScene::new(single_enemy(), open_floor()).unwrap();
        for _ in 0..(60 * 8) {
            let input = aim_at_threat(&scene);
            scene.update(DT, &input);
            if scene.boss().is_some() {
                break;
            }
        }
        assert_eq!(scene.status(), RunStatus::BossFight);
        assert!(scene.waves().is_finished());
    }

    #[test]
    fn test_item_pickup_heals_the_player() {
        let config = GameConfig { waves: Vec::new(), ..GameConfig::default() };
        let mut scene = GameScene::new(config, open_floor()).unwrap();
        scene.player.take_damage(30);
        let position = scene.player.center_position();
        scene.items.insert(Item::new(&scene.config.items, position));

        scene.update(DT, &PlayerInput::default());

        assert_eq!(scene.player().health().current(), 90);
        assert_eq!(scene.stats().items_collected, 1);
        assert_eq!(scene.items().count(), 0, "consumed item is gone next frame");
        scene.update(DT, &PlayerInput::default());
        assert_eq!(scene.player().health().current(), 90);
    }

    #[test]
    fn test_dead_player_ends_the_run() {
        let mut scene = GameScene::new(GameConfig::default(), LevelGeometry::default()).unwrap();
        scene.player.take_damage(1_000);
        scene.update(DT, &PlayerInput::default());
        assert_eq!(scene.status(), RunStatus::PlayerDefeated);

        let frame = scene.frame();
        scene.update(DT, &PlayerInput::default());
        assert_eq!(scene.frame(), frame, "finished runs do not advance");
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut scene = GameScene::new(GameConfig::default(), LevelGeometry::default()).unwrap();
        scene.update(1.0, &PlayerInput::default());
        assert!((scene.elapsed() - scene.config().sim.max_frame_delta).abs() < 1e-6);
    }

    #[test]
    fn test_sync_models_pushes_visible_actors() {
        let mut scene = GameScene::new(GameConfig::default(), LevelGeometry::default()).unwrap();
        let mut sink = RecordingSink::default();
        for _ in 0..60 {
            scene.update(DT, &PlayerInput { fire: true, ..PlayerInput::default() });
        }
        scene.sync_models(&mut sink);

        let player_id = u64::from(scene.player().id());
        assert_eq!(sink.transforms[&player_id].position, scene.player().transform().position);
        for enemy in scene.enemies().filter(|enemy| enemy.is_active()) {
            assert!(sink.transforms.contains_key(&u64::from(enemy.id())));
        }
        for bullet in scene.player().weapon().bullets() {
            assert!(sink.transforms.contains_key(&u64::from(bullet.id())));
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut scene = GameScene::new(GameConfig::default(), LevelGeometry::default()).unwrap();
        scene.update(DT, &PlayerInput::default());
        let snapshot = scene.snapshot();
        assert_eq!(snapshot.frame, 1);
        assert_eq!(snapshot.enemies.len(), 1);
        assert_eq!(snapshot.enemies[0].state, "SpawnDelay");

        let text = ron::to_string(&snapshot).unwrap();
        assert!(text.contains("SpawnDelay"));
    }
}
