//! Deterministic, engine-agnostic primitives shared by the behavior-tree engine and its agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod rng;
pub mod status;
pub mod tick;

pub use error::{BtError, LeafError, Result};
pub use rng::{DeterministicRng, SplitMix64};
pub use status::Status;
pub use tick::TickContext;
