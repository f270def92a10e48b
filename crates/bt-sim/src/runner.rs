use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};
use bt_agents::{zombie, AgentSnapshot, Strategy, World, ZombieReport};
use bt_engine::BehaviorTree;
use tracing::info;

use crate::SimConfig;

/// Final state after a run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub ticks: u64,
    pub boy: AgentSnapshot,
    pub zombies: Vec<ZombieReport>,
    pub balls_left: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulated {} ticks", self.ticks)?;
        writeln!(f, "Balls left: {}", self.balls_left)?;
        writeln!(
            f,
            "  {:<12} ({:>7.1}, {:>7.1})  balls {}",
            self.boy.name, self.boy.position.x, self.boy.position.y, self.boy.ball_count
        )?;
        for z in &self.zombies {
            writeln!(
                f,
                "  {:<12} ({:>7.1}, {:>7.1})  balls {}  {}",
                z.name, z.position.x, z.position.y, z.ball_count, z.status
            )?;
        }
        Ok(())
    }
}

pub fn build_world(config: &SimConfig) -> Result<World> {
    config.validate()?;
    World::new(
        config.arena,
        config.seed,
        &config.boy,
        &config.zombies,
        &config.balls,
    )
    .context("Failed to build world")
}

/// Steps the world `config.ticks` times.
///
/// With `snapshots` set, every step report is written to `out` as one JSON
/// line.
pub fn run(config: &SimConfig, snapshots: bool, out: &mut impl Write) -> Result<Summary> {
    let mut world = build_world(config)?;
    info!(
        ticks = config.ticks,
        dt = config.dt_seconds,
        seed = config.seed,
        zombies = world.zombies().len(),
        "Starting simulation"
    );

    let mut last = None;
    for _ in 0..config.ticks {
        let report = world
            .step(config.dt_seconds)
            .with_context(|| format!("Step {} failed", world.tick()))?;

        if snapshots {
            serde_json::to_writer(&mut *out, &report).context("Failed to encode snapshot")?;
            writeln!(out)?;
        }
        if config.report_every > 0 && (report.tick + 1) % config.report_every == 0 {
            let running = report.zombies.iter().filter(|z| z.status.is_running()).count();
            let free = world.balls().iter().filter(|b| b.is_free()).count();
            info!(tick = report.tick, running, balls_left = free, "Progress");
        }
        for pickup in &report.pickups {
            info!(tick = report.tick, by = %pickup.by, ball = pickup.ball, "Ball picked up");
        }
        last = Some(report);
    }

    let zombies = match last {
        Some(report) => report.zombies,
        None => Vec::new(),
    };
    Ok(Summary {
        ticks: world.tick(),
        boy: world.boy().snapshot(),
        zombies,
        balls_left: world.balls().iter().filter(|b| b.is_free()).count(),
    })
}

/// Topology of the tree a zombie with `strategy` would run.
pub fn render_tree(strategy: Strategy) -> Result<String> {
    let tree: BehaviorTree<zombie::ZombieBody> = zombie::build_tree(strategy)
        .with_context(|| format!("Failed to build {strategy} tree"))?;
    Ok(tree.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_chase_or_flee() {
        let text = render_tree(Strategy::ChaseOrFlee).unwrap();
        assert!(text.starts_with("selector \"Chase or Flee\""));
        assert!(text.contains("reactive sequence \"Flee boy\""));
        assert!(text.contains("action \"Get Patrol Location\""));
    }

    #[test]
    fn zero_ticks_is_an_empty_run() {
        let config = SimConfig {
            ticks: 0,
            ..SimConfig::default()
        };
        let mut out = Vec::new();
        let summary = run(&config, true, &mut out).unwrap();
        assert_eq!(summary.ticks, 0);
        assert!(summary.zombies.is_empty());
        assert!(out.is_empty());
    }
}
