use core::fmt;

use bt_core::{Result, Status};
use tracing::trace;

use crate::Node;

/// Owns the root node of an agent's tree.
///
/// The owning agent calls [`run`](Self::run) once per frame. All resumable
/// state lives in the composites of the root's subtree.
pub struct BehaviorTree<C: ?Sized + 'static> {
    root: Box<dyn Node<C>>,
    last: Option<Status>,
    runs: u64,
}

impl<C: ?Sized + 'static> BehaviorTree<C> {
    pub fn new(root: Box<dyn Node<C>>) -> Self {
        Self {
            root,
            last: None,
            runs: 0,
        }
    }

    /// Ticks the root once.
    ///
    /// Callers usually ignore the returned status: the root of an agent's tree
    /// has no consumer above it. Errors raised by leaves are passed through
    /// untouched and the tree keeps whatever state it had when they occurred.
    pub fn run(&mut self, ctx: &mut C) -> Result<Status> {
        self.runs = self.runs.wrapping_add(1);
        let status = self.root.tick(ctx)?;
        trace!(root = %self.root.name(), %status, run = self.runs, "tree ran");
        self.last = Some(status);
        Ok(status)
    }

    /// Status of the most recent successful `run`, `None` before the first.
    pub fn last_status(&self) -> Option<Status> {
        self.last
    }

    /// Number of times `run` has been called.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn root(&self) -> &dyn Node<C> {
        self.root.as_ref()
    }

    /// Drops all in-flight state so the next run starts from scratch.
    pub fn reset(&mut self) {
        self.root.reset();
        self.last = None;
    }
}

impl<C: ?Sized + 'static> fmt::Debug for BehaviorTree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("root", &self.root.name())
            .field("last", &self.last)
            .field("runs", &self.runs)
            .finish()
    }
}

/// Renders the topology as an indented outline, one node per line.
impl<C: ?Sized + 'static> fmt::Display for BehaviorTree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.root.as_ref(), 0)
    }
}

fn write_node<C: ?Sized + 'static>(
    f: &mut fmt::Formatter<'_>,
    node: &dyn Node<C>,
    depth: usize,
) -> fmt::Result {
    writeln!(f, "{:indent$}{} \"{}\"", "", node.kind(), node.name(), indent = depth * 2)?;
    for child in node.children() {
        write_node(f, child.as_ref(), depth + 1)?;
    }
    Ok(())
}
