//! Reactive behavior tree runtime built on `bt-core`.
//!
//! A tree is declared once as data (leaves wrapping agent callbacks, composites
//! ordering them by priority) and re-evaluated once per simulation frame.
//!
//! - [`Node`]: tick protocol shared by every node
//! - Leaves: [`Action`], [`Condition`]
//! - Composites: [`Sequence`] (ordered AND), [`Selector`] (ordered OR)
//! - [`BehaviorTree`]: owns the root and exposes [`BehaviorTree::run`]
//!
//! Composites remember which child returned `Running` so the next frame can
//! re-enter that child directly. Whether a composite resumes there or rescans
//! from its first child is controlled by [`Resume`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod builder;
pub mod composite;
pub mod leaf;
pub mod node;
pub mod tree;

pub use bt_core::{BtError, LeafError, Result, Status};
pub use builder::{action, condition, selector, sequence};
pub use composite::{Resume, Selector, Sequence};
pub use leaf::{Action, Condition};
pub use node::Node;
pub use tree::BehaviorTree;
