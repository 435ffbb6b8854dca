//! Configuration and level files on disk

use std::path::PathBuf;

use arena_engine::config::ConfigError;
use arena_engine::foundation::logging;
use arena_siege::config::WaveConfig;
use arena_siege::prelude::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("arena_siege_{}_{name}", std::process::id()))
}

#[test]
fn test_game_config_file_round_trip() {
    logging::init_for_tests();
    for name in ["game.toml", "game.ron"] {
        let path = temp_path(name);
        let mut config = GameConfig::default();
        config.sim.seed = 99;
        config.waves.push(WaveConfig { total_enemies: 2, batch_size: 1, spawn_interval: 0.1, batch_interval: 1.0 });

        config.save_to_file(&path).expect("save");
        let loaded = GameConfig::load_from_file(&path).expect("load");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.sim.seed, 99);
        assert_eq!(loaded.waves, config.waves);
        assert!(loaded.validate().is_ok());
    }
}

#[test]
fn test_level_file_round_trip() {
    logging::init_for_tests();
    let path = temp_path("level.ron");
    let level = LevelGeometry::arena(12.0);
    level.save_to_file(&path).expect("save");
    let loaded = LevelGeometry::load_from_file(&path).expect("load");
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, level);
}

#[test]
fn test_missing_file_uses_defaults() {
    logging::init_for_tests();
    let loaded = GameConfig::load_or_default(temp_path("missing.toml")).expect("defaults");
    assert_eq!(loaded.waves.len(), GameConfig::default().waves.len());
}

#[test]
fn test_unknown_extension_is_rejected() {
    logging::init_for_tests();
    let result = GameConfig::load_from_file(temp_path("game.json"));
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
}

#[test]
fn test_scene_rejects_invalid_level() {
    logging::init_for_tests();
    let level = LevelGeometry { spawn_points: Vec::new(), ..LevelGeometry::default() };
    assert!(matches!(GameScene::new(GameConfig::default(), level), Err(ConfigError::Invalid(_))));
}
