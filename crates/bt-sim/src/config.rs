//! Simulation configuration, loaded from YAML.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bt_agents::{Arena, BoySpec, Strategy, Vec2, ZombieSpec};
use serde::{Deserialize, Serialize};

/// Written by `bt-sim init`. Parses to [`SimConfig::default`].
pub const DEFAULT_CONFIG: &str = r#"# bt-sim configuration

# Frames to simulate and the timestep of each frame.
ticks: 600
dt_seconds: 0.05
seed: 0

# Log a progress line every N ticks (0 disables).
report_every: 100

arena:
  width: 1280
  height: 1024
  margin: 100

boy:
  id: 0
  name: boy
  position: { x: 640, y: 512 }
  speed_kmph: 6
  waypoints:
    - { x: 200, y: 200 }
    - { x: 1080, y: 200 }
    - { x: 1080, y: 824 }
    - { x: 200, y: 824 }

# strategy: target_location | wander | chase_or_wander | patrol | chase_or_flee
# position and patrol are optional; missing positions are random.
zombies:
  - { id: 1, strategy: patrol }
  - { id: 2, strategy: wander }
  - { id: 3, strategy: chase_or_wander }
  - { id: 4, strategy: chase_or_flee }
  - { id: 5, strategy: target_location }

balls:
  - { x: 320, y: 320 }
  - { x: 640, y: 260 }
  - { x: 960, y: 700 }
  - { x: 400, y: 860 }
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of frames `run` simulates.
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Seconds per frame.
    #[serde(default = "default_dt")]
    pub dt_seconds: f32,

    pub seed: u64,

    #[serde(default = "default_report_every")]
    pub report_every: u64,

    pub arena: Arena,

    pub boy: BoySpec,

    #[serde(default = "default_zombies")]
    pub zombies: Vec<ZombieSpec>,

    #[serde(default = "default_balls")]
    pub balls: Vec<Vec2>,
}

fn default_ticks() -> u64 {
    600
}

fn default_dt() -> f32 {
    0.05
}

fn default_report_every() -> u64 {
    100
}

fn default_zombies() -> Vec<ZombieSpec> {
    [
        Strategy::Patrol,
        Strategy::Wander,
        Strategy::ChaseOrWander,
        Strategy::ChaseOrFlee,
        Strategy::TargetLocation,
    ]
    .into_iter()
    .zip(1..)
    .map(|(strategy, id)| ZombieSpec::new(id, strategy))
    .collect()
}

fn default_balls() -> Vec<Vec2> {
    vec![
        Vec2::new(320.0, 320.0),
        Vec2::new(640.0, 260.0),
        Vec2::new(960.0, 700.0),
        Vec2::new(400.0, 860.0),
    ]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            dt_seconds: default_dt(),
            seed: 0,
            report_every: default_report_every(),
            arena: Arena::default(),
            boy: BoySpec::default(),
            zombies: default_zombies(),
            balls: default_balls(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Loads `path` if given, the built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt_seconds.is_finite() && self.dt_seconds > 0.0) {
            bail!("dt_seconds must be positive, got {}", self.dt_seconds);
        }
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            bail!(
                "arena must have a positive size, got {}x{}",
                self.arena.width,
                self.arena.height
            );
        }

        let boy = &self.boy;
        if !(boy.speed_kmph.is_finite() && boy.speed_kmph >= 0.0) {
            bail!("boy has invalid speed {}", boy.speed_kmph);
        }
        check_point("boy position", boy.position)?;
        check_points("boy waypoint", &boy.waypoints)?;

        let mut ids = BTreeSet::new();
        ids.insert(boy.id);
        for zombie in &self.zombies {
            if !ids.insert(zombie.id) {
                bail!("duplicate agent id {}", zombie.id);
            }
            if !(zombie.speed_kmph.is_finite() && zombie.speed_kmph >= 0.0) {
                bail!("zombie {} has invalid speed {}", zombie.id, zombie.speed_kmph);
            }
            if let Some(position) = zombie.position {
                check_point(&format!("zombie {} position", zombie.id), position)?;
            }
            if let Some(route) = &zombie.patrol {
                check_points(&format!("zombie {} patrol point", zombie.id), route)?;
            }
        }
        check_points("ball", &self.balls)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

fn check_point(what: &str, point: Vec2) -> Result<()> {
    if !point.is_finite() {
        bail!("{what} must be finite, got ({}, {})", point.x, point.y);
    }
    Ok(())
}

fn check_points(what: &str, points: &[Vec2]) -> Result<()> {
    for (index, &point) in points.iter().enumerate() {
        check_point(&format!("{what} {index}"), point)?;
    }
    Ok(())
}

/// Writes [`DEFAULT_CONFIG`] to `path`, refusing to replace an existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists, not overwriting", path.display());
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
