//! bt-sim - zombies chasing a boy, one behavior tree per zombie.
//!
//! - `bt-sim run` - simulate a configured world
//! - `bt-sim tree` - print the tree a strategy builds
//! - `bt-sim init` - write the default config

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use bt_agents::Strategy;
use bt_sim::{render_tree, run, write_default_config, SimConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "bt-sim")]
#[command(about = "Behavior tree zombie simulation", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run {
        /// YAML config; built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Override the seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print one JSON snapshot per tick to stdout
        #[arg(long)]
        snapshots: bool,
    },

    /// Print the behavior tree of a zombie strategy
    Tree {
        #[arg(short, long, default_value_t = Strategy::Patrol)]
        strategy: Strategy,
    },

    /// Write the default config
    Init {
        #[arg(default_value = "bt-sim.yaml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so snapshots on stdout stay machine readable.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            snapshots,
        } => run_simulation(config.as_deref(), ticks, seed, snapshots),
        Commands::Tree { strategy } => {
            print!("{}", render_tree(strategy)?);
            Ok(())
        }
        Commands::Init { path } => init_config(&path),
    }
}

fn run_simulation(
    path: Option<&Path>,
    ticks: Option<u64>,
    seed: Option<u64>,
    snapshots: bool,
) -> Result<()> {
    let mut config = SimConfig::load_or_default(path)?;
    if let Some(ticks) = ticks {
        config.ticks = ticks;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run(&config, snapshots, &mut out)?;
    if snapshots {
        out.flush()?;
        eprint!("{summary}");
    } else {
        write!(out, "{summary}")?;
    }
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    write_default_config(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
