//! Headless arena run
//!
//! Usage: `arena_siege [config.toml|config.ron] [level.toml|level.ron] [seconds]`
//!
//! Missing files fall back to the built-in defaults. The player is driven by
//! the autopilot; progress is logged once per simulated second.

use arena_engine::foundation::logging;
use arena_engine::render::RecordingSink;
use arena_siege::prelude::*;
use log::info;

const FRAME: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 120.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load_or_default(path)?,
        None => GameConfig::default(),
    };
    let level = match args.next() {
        Some(path) => LevelGeometry::load_or_default(path)?,
        None => LevelGeometry::default(),
    };
    let seconds = match args.next() {
        Some(text) => text.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };

    let mut scene = GameScene::new(config, level)?;
    let pilot = Autopilot::default();
    let mut sink = RecordingSink::default();
    let frames = (seconds / FRAME).ceil() as u64;

    info!("Running {seconds:.0}s ({frames} frames) headless");
    for frame in 1..=frames {
        let input = pilot.input_for(&scene);
        scene.update(FRAME, &input);
        scene.sync_models(&mut sink);

        if frame % 60 == 0 {
            let snapshot = scene.snapshot();
            info!(
                "t={:>5.1}s wave {}/{} hp {}/{} enemies {} boss {} status {:?}",
                snapshot.elapsed,
                (snapshot.wave + 1).min(snapshot.wave_count),
                snapshot.wave_count,
                snapshot.player.hp,
                snapshot.player.max_hp,
                snapshot.enemies.len(),
                snapshot.boss.as_ref().map_or("-", |boss| boss.state),
                snapshot.status
            );
        }
        if scene.status().is_over() {
            break;
        }
    }

    let stats = scene.stats();
    info!("Finished after {:.1}s: {:?}", scene.elapsed(), scene.status());
    info!(
        "Spawned {} killed {} | items dropped {} collected {} | melee hits taken {} bullet hits {} | {} models tracked",
        stats.enemies_spawned,
        stats.enemies_killed,
        stats.items_dropped,
        stats.items_collected,
        stats.melee_hits_on_player,
        stats.bullet_hits,
        sink.transforms.len()
    );
    Ok(())
}
