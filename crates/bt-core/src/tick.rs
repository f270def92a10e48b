use crate::SplitMix64;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-frame timing handed to agents by the simulation loop.
///
/// The engine never reads it; movement leaves consume `dt_seconds`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            seed,
        }
    }

    /// The context for the following frame with the same timestep and seed.
    pub fn next(self) -> Self {
        Self {
            tick: self.tick.wrapping_add(1),
            ..self
        }
    }

    /// Generator for one agent and purpose, independent of the frame.
    pub fn rng_for_agent(&self, agent: u64, stream: u64) -> SplitMix64 {
        SplitMix64::for_stream(self.seed, agent, stream)
    }
}
