use std::fs;
use std::path::{Path, PathBuf};

use te::Error;
use te::config::*;
use te::game::*;
use te::window::WindowMode;

// ── Config ──────────────────────────────────────────────────────────────────

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.title, "te");
    assert_eq!(config.font, PathBuf::from("font.png"));
    assert_eq!((config.cell_width, config.cell_height), (16, 16));
    assert!(config.hot_reload);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        r#"{ "title": "rogue", "cell_height": 24, "window": { "mode": "windowed" } }"#,
    )
    .unwrap();

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.title, "rogue");
    assert_eq!(config.cell_width, 16);
    assert_eq!(config.cell_height, 24);
    assert_eq!(config.window.mode, WindowMode::Windowed);
    assert_eq!(config.window.width, 1280);
}

#[test]
fn unknown_key_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), r#"{ "titel": "typo" }"#).unwrap();
    let err = Config::load(dir.path()).unwrap_err();
    match err {
        Error::Config { path, .. } => assert_eq!(path, dir.path().join(CONFIG_FILE)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_cell_size_is_rejected() {
    let err = Config::from_json(r#"{ "cell_width": 0 }"#, Path::new("conf.json")).unwrap_err();
    assert!(matches!(err, Error::ConfigValue(_)));
}

#[test]
fn defaults_survive_serialization() {
    let config = Config::default();
    let parsed = Config::from_json(&config.to_json(), Path::new("conf.json")).unwrap();
    assert_eq!(parsed, config);
}

// ── GameDir ─────────────────────────────────────────────────────────────────

#[test]
fn open_requires_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not_a_dir");
    fs::write(&file, "").unwrap();

    assert!(matches!(GameDir::open(&file), Err(Error::NotADirectory(_))));
    assert!(matches!(GameDir::open(dir.path().join("missing")), Err(Error::NotADirectory(_))));
}

#[test]
fn open_requires_main_lua() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(GameDir::open(dir.path()), Err(Error::MissingEntryScript(_))));

    fs::write(dir.path().join(ENTRY_SCRIPT), "").unwrap();
    let game = GameDir::open(dir.path()).unwrap();
    assert_eq!(game.root(), dir.path());
    assert_eq!(game.entry_script(), dir.path().join("main.lua"));
    assert_eq!(game.resolve("sfx/hit.wav"), dir.path().join("sfx/hit.wav"));
}

#[test]
fn init_scaffolds_a_runnable_game() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("new_game");

    let game = GameDir::init(&root).unwrap();
    assert!(game.entry_script().is_file());
    let config = Config::load(game.root()).unwrap();
    assert_eq!(config, Config::default());

    let script = String::from_utf8(game.read_asset(ENTRY_SCRIPT).unwrap()).unwrap();
    assert!(script.contains("function te.draw()"));
}

#[test]
fn init_never_overwrites_main_lua() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ENTRY_SCRIPT), "-- mine").unwrap();

    assert!(matches!(GameDir::init(dir.path()), Err(Error::AlreadyExists(_))));
    assert_eq!(fs::read_to_string(dir.path().join(ENTRY_SCRIPT)).unwrap(), "-- mine");
}

#[test]
fn read_asset_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ENTRY_SCRIPT), "").unwrap();
    let game = GameDir::open(dir.path()).unwrap();

    match game.read_asset("font.png") {
        Err(Error::Io { path, .. }) => assert_eq!(path, dir.path().join("font.png")),
        other => panic!("unexpected result: {other:?}"),
    }
}
