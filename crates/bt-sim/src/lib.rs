//! Headless simulation around `bt-agents`.
//!
//! The binary is a thin clap front end; everything it does is reachable from
//! here so it can be tested without spawning a process.

pub mod config;
pub mod runner;

pub use config::{write_default_config, SimConfig, DEFAULT_CONFIG};
pub use runner::{build_world, render_tree, run, Summary};
