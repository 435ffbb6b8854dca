//! Wave spawner
//!
//! Waves are consumed in order. Inside a wave, batches start every
//! `batch_interval` and each batch releases one enemy per `spawn_interval`.
//! The next wave only begins once every enemy of the current one has been
//! spawned and none of them is still alive.

use log::{debug, info};

use crate::config::WaveConfig;

/// One enemy the scene should create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Wave the enemy belongs to
    pub wave_index: usize,
    /// Position of the enemy within its batch, starting at 0
    pub order_in_batch: u32,
}

/// Wave progression
#[derive(Debug, Clone)]
pub struct WaveSpawner {
    waves: Vec<WaveConfig>,
    wave_index: usize,
    enemies_to_spawn: u32,
    batch_left_in_this_wave: u32,
    batch_remainder: u32,
    batch_spawned: u32,
    batch_timer: f32,
    spawn_timer: f32,
    finished: bool,
}

impl WaveSpawner {
    /// Spawner positioned at the start of the first wave
    pub fn new(waves: Vec<WaveConfig>) -> Self {
        let mut spawner = Self {
            waves,
            wave_index: 0,
            enemies_to_spawn: 0,
            batch_left_in_this_wave: 0,
            batch_remainder: 0,
            batch_spawned: 0,
            batch_timer: 0.0,
            spawn_timer: 0.0,
            finished: false,
        };
        if spawner.waves.is_empty() {
            spawner.finished = true;
            info!("No waves configured");
        } else {
            spawner.start_wave(true);
        }
        spawner
    }

    /// Advance by `dt` given how many spawned enemies are still alive
    pub fn update(&mut self, dt: f32, alive: usize) -> Vec<SpawnRequest> {
        let mut requests = Vec::new();
        if self.finished {
            return requests;
        }

        if self.enemies_to_spawn == 0 {
            if alive == 0 {
                self.advance_wave();
            }
            return requests;
        }

        let wave = self.waves[self.wave_index];

        if self.batch_remainder == 0 {
            self.batch_timer += dt;
            if self.batch_timer >= wave.batch_interval {
                self.batch_timer = 0.0;
                self.batch_remainder = wave.batch_size.min(self.enemies_to_spawn);
                self.batch_left_in_this_wave = self.batch_left_in_this_wave.saturating_sub(1);
                self.batch_spawned = 0;
                // First enemy of a batch appears at once
                self.spawn_timer = wave.spawn_interval;
                debug!(
                    "Wave {} batch of {} started, {} batches left",
                    self.wave_index + 1,
                    self.batch_remainder,
                    self.batch_left_in_this_wave
                );
            }
        } else {
            self.spawn_timer += dt;
        }

        while self.batch_remainder > 0 && self.spawn_timer >= wave.spawn_interval {
            self.spawn_timer -= wave.spawn_interval;
            requests.push(SpawnRequest {
                wave_index: self.wave_index,
                order_in_batch: self.batch_spawned,
            });
            self.batch_spawned += 1;
            self.batch_remainder -= 1;
            self.enemies_to_spawn -= 1;
        }

        requests
    }

    fn start_wave(&mut self, immediate: bool) {
        let wave = self.waves[self.wave_index];
        self.enemies_to_spawn = wave.total_enemies;
        self.batch_left_in_this_wave = if wave.batch_size == 0 {
            0
        } else {
            wave.total_enemies.div_ceil(wave.batch_size)
        };
        self.batch_remainder = 0;
        self.batch_spawned = 0;
        self.spawn_timer = 0.0;
        self.batch_timer = if immediate { wave.batch_interval } else { 0.0 };
        info!(
            "Wave {}/{} begins: {} enemies in {} batches",
            self.wave_index + 1,
            self.waves.len(),
            wave.total_enemies,
            self.batch_left_in_this_wave
        );
    }

    fn advance_wave(&mut self) {
        info!("Wave {} cleared", self.wave_index + 1);
        self.wave_index += 1;
        if self.wave_index >= self.waves.len() {
            self.finished = true;
            info!("All {} waves cleared", self.waves.len());
        } else {
            self.start_wave(false);
        }
    }

    /// Index of the current wave
    pub fn wave_index(&self) -> usize {
        self.wave_index
    }

    /// Number of configured waves
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Enemies of the current wave not yet spawned
    pub fn enemies_to_spawn(&self) -> u32 {
        self.enemies_to_spawn
    }

    /// Batches of the current wave not yet started
    pub fn batch_left_in_this_wave(&self) -> u32 {
        self.batch_left_in_this_wave
    }

    /// Enemies left in the running batch
    pub fn batch_remainder(&self) -> u32 {
        self.batch_remainder
    }

    /// Every wave has been spawned and cleared
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn waves() -> Vec<WaveConfig> {
        vec![
            WaveConfig { total_enemies: 5, batch_size: 2, spawn_interval: 0.25, batch_interval: 1.0 },
            WaveConfig { total_enemies: 3, batch_size: 3, spawn_interval: 0.0, batch_interval: 0.5 },
        ]
    }

    #[test]
    fn test_first_batch_spawns_immediately() {
        let mut spawner = WaveSpawner::new(waves());
        let requests = spawner.update(DT, 0);
        assert_eq!(requests, vec![SpawnRequest { wave_index: 0, order_in_batch: 0 }]);
        assert_eq!(spawner.batch_left_in_this_wave(), 2);
        assert_eq!(spawner.batch_remainder(), 1);
    }

    #[test]
    fn test_zero_spawn_interval_releases_whole_batch() {
        let mut spawner = WaveSpawner::new(waves()[1..].to_vec());
        let requests = spawner.update(DT, 0);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests.iter().map(|request| request.order_in_batch).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_wave_waits_for_survivors() {
        let mut spawner = WaveSpawner::new(waves());
        let mut alive = 0;
        for _ in 0..(60 * 10) {
            alive += spawner.update(DT, alive).len();
        }
        assert_eq!(spawner.enemies_to_spawn(), 0);
        assert_eq!(alive, 5);
        assert_eq!(spawner.wave_index(), 0, "survivors hold the wave");

        alive = 0;
        spawner.update(DT, alive);
        assert_eq!(spawner.wave_index(), 1);
    }

    #[test]
    fn test_remaining_plus_alive_decreases_to_zero() {
        let mut spawner = WaveSpawner::new(waves());
        let mut alive = 0usize;
        let mut wave = spawner.wave_index();
        let mut budget = spawner.enemies_to_spawn() as usize;

        for frame in 0..(60 * 60) {
            // Kill one enemy every half second
            if frame % 30 == 29 && alive > 0 {
                alive -= 1;
            }
            let before_wave = spawner.wave_index();
            let before_to_spawn = spawner.enemies_to_spawn();
            alive += spawner.update(DT, alive).len();

            if spawner.wave_index() != before_wave {
                assert_eq!(before_to_spawn, 0);
                assert_eq!(alive, 0);
                wave = spawner.wave_index();
                budget = spawner.enemies_to_spawn() as usize;
            }
            if spawner.is_finished() {
                break;
            }

            let total = spawner.enemies_to_spawn() as usize + alive;
            assert!(total <= budget, "wave {wave} frame {frame}: {total} > {budget}");
            budget = total;
        }

        assert!(spawner.is_finished());
        assert_eq!(alive, 0);
    }

    #[test]
    fn test_batch_interval_separates_batches() {
        let mut spawner = WaveSpawner::new(waves());
        let mut spawn_frames = Vec::new();
        for frame in 0..(60 * 5) {
            if !spawner.update(DT, 1).is_empty() {
                spawn_frames.push(frame);
            }
        }
        assert_eq!(spawn_frames.len(), 5);
        // Batch 1 at frames 0 and 15, batch 2 a second after it drained
        assert!(spawn_frames[2] - spawn_frames[1] >= 59, "{spawn_frames:?}");
    }

    #[test]
    fn test_empty_wave_list_is_finished() {
        let mut spawner = WaveSpawner::new(Vec::new());
        assert!(spawner.is_finished());
        assert!(spawner.update(DT, 0).is_empty());
    }
}
