use std::fs;

use bt_agents::Strategy;
use bt_sim::{run, write_default_config, SimConfig};
use tempfile::TempDir;

#[test]
fn init_writes_loadable_config_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sim.yaml");

    write_default_config(&path).unwrap();
    let config = SimConfig::load(&path).unwrap();
    assert_eq!(config, SimConfig::default());

    fs::write(&path, "ticks: 1\n").unwrap();
    let err = write_default_config(&path).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "ticks: 1\n");
}

#[test]
fn load_or_default_without_path() {
    assert_eq!(SimConfig::load_or_default(None).unwrap(), SimConfig::default());
}

#[test]
fn load_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.yaml");
    let err = SimConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

#[test]
fn load_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "dt_seconds: -1\n").unwrap();
    let err = SimConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("dt_seconds must be positive"));

    fs::write(&path, "zombies:\n  - { id: 2 }\n  - { id: 2 }\n").unwrap();
    assert!(SimConfig::load(&path).is_err());
}

#[test]
fn load_rejects_nan_patrol_point() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nan.yaml");
    fs::write(
        &path,
        "zombies:\n  - { id: 1, strategy: patrol, patrol: [{ x: 10, y: 20 }, { x: .nan, y: 200 }] }\n",
    )
    .unwrap();
    let err = SimConfig::load(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("zombie 1 patrol point 1 must be finite"), "{message}");

    fs::write(&path, "boy:\n  speed_kmph: -3\n").unwrap();
    let message = format!("{:#}", SimConfig::load(&path).unwrap_err());
    assert!(message.contains("boy has invalid speed"), "{message}");
}

#[test]
fn partial_file_keeps_defaults_elsewhere() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.yaml");
    fs::write(
        &path,
        "seed: 9\nzombies:\n  - id: 4\n    strategy: wander\n    speed_kmph: 5\n",
    )
    .unwrap();

    let config = SimConfig::load(&path).unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.ticks, 600);
    assert_eq!(config.zombies.len(), 1);
    assert_eq!(config.zombies[0].strategy, Strategy::Wander);
    assert_eq!(config.zombies[0].speed_kmph, 5.0);
    assert_eq!(config.balls.len(), 4);
}

#[test]
fn config_survives_yaml_round_trip() {
    let config = SimConfig {
        seed: 17,
        ticks: 12,
        ..SimConfig::default()
    };
    let text = config.to_yaml().unwrap();
    let back: SimConfig = serde_yaml::from_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn run_emits_one_snapshot_per_tick() {
    let config = SimConfig {
        ticks: 20,
        seed: 4,
        ..SimConfig::default()
    };
    let mut out = Vec::new();
    let summary = run(&config, true, &mut out).unwrap();
    assert_eq!(summary.ticks, 20);
    assert_eq!(summary.zombies.len(), 5);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 20);
    let last: serde_json::Value = serde_json::from_str(lines[19]).unwrap();
    assert_eq!(last["tick"], 19);
}

#[test]
fn runs_are_reproducible() {
    let config = SimConfig {
        ticks: 50,
        seed: 123,
        ..SimConfig::default()
    };
    let mut a = Vec::new();
    let mut b = Vec::new();
    run(&config, true, &mut a).unwrap();
    run(&config, true, &mut b).unwrap();
    assert_eq!(a, b);
}
