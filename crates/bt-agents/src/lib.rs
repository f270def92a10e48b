//! Reference agents built on `bt-engine`.
//!
//! The engine only knows node topology and status codes. This crate supplies
//! the other half: agents that own a tree, wire their own behaviors in as
//! leaves, and tick it once per frame.
//!
//! - [`Zombie`]: patrols, wanders, chases or flees depending on its [`Strategy`]
//! - [`Boy`]: scripted quarry walking a waypoint loop
//! - [`Registry`]: explicit cross-agent lookup, refreshed every frame
//! - [`World`]: frame loop tying agents, registry and ball pickups together

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod boy;
pub mod error;
pub mod math;
pub mod registry;
pub mod steering;
pub mod units;
pub mod world;
pub mod zombie;

pub use boy::{Boy, BoySpec};
pub use error::{AgentError, Result};
pub use math::{Rect, Vec2};
pub use registry::{AgentSnapshot, Registry};
pub use world::{Arena, Ball, Frame, Pickup, StepReport, World, ZombieReport};
pub use zombie::{Pose, Senses, Strategy, Zombie, ZombieBody, ZombieSpec};
