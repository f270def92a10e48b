//! Composite nodes.
//!
//! Composites control which of their children run and in what order. Both
//! kinds walk their children in insertion order, which is priority order:
//! [`Sequence`] is a short-circuited AND, [`Selector`] a short-circuited OR.
//!
//! Each composite remembers the index of the child that returned `Running`
//! last frame. [`Resume`] decides what that memory is used for.

use std::borrow::Cow;

use bt_core::{BtError, Result, Status};
use tracing::debug;

use crate::Node;

/// Where a composite starts scanning its children on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resume {
    /// Start at the child that returned `Running` last tick.
    ///
    /// Earlier siblings are not re-evaluated, so side-effecting steps such as
    /// "pick a destination" run once per traversal instead of once per frame.
    /// A started branch keeps running until it finishes on its own.
    Running,

    /// Start at the first child every tick.
    ///
    /// Higher-priority children get a chance to take over each frame. When
    /// one of them does, the previously running child is reset and abandoned.
    Rescan,
}

/// Child list plus the bookkeeping shared by both composite kinds.
struct Children<C: ?Sized + 'static> {
    name: Cow<'static, str>,
    nodes: Vec<Box<dyn Node<C>>>,
    running: Option<usize>,
    resume: Resume,
}

impl<C: ?Sized + 'static> Children<C> {
    fn new(
        name: Cow<'static, str>,
        nodes: Vec<Box<dyn Node<C>>>,
        resume: Resume,
    ) -> Result<Self> {
        if nodes.is_empty() {
            return Err(BtError::EmptyComposite {
                node: name.into_owned(),
            });
        }
        Ok(Self {
            name,
            nodes,
            running: None,
            resume,
        })
    }

    /// Ticks children in order.
    ///
    /// `pass` is the status that moves on to the next sibling (`Success` for a
    /// sequence, `Failure` for a selector). The opposite terminal status ends
    /// the composite immediately, and so does `pass` once every child has
    /// produced it.
    fn evaluate(&mut self, ctx: &mut C, pass: Status) -> Result<Status> {
        let start = match self.resume {
            Resume::Running => self.running.unwrap_or(0),
            Resume::Rescan => 0,
        };

        for index in start..self.nodes.len() {
            match self.nodes[index].tick(ctx)? {
                Status::Running => {
                    self.mark_running(index);
                    return Ok(Status::Running);
                }
                status if status == pass => continue,
                status => {
                    self.finish();
                    return Ok(status);
                }
            }
        }

        self.finish();
        Ok(pass)
    }

    fn mark_running(&mut self, index: usize) {
        if self.running == Some(index) {
            return;
        }
        if let Some(previous) = self.running {
            // Under `Running` a later index means the previous child finished.
            if self.resume == Resume::Rescan || index < previous {
                debug!(
                    node = %self.name,
                    abandoned = %self.nodes[previous].name(),
                    running = %self.nodes[index].name(),
                    "branch preempted"
                );
            } else {
                debug!(
                    node = %self.name,
                    finished = %self.nodes[previous].name(),
                    running = %self.nodes[index].name(),
                    "child running"
                );
            }
            self.nodes[previous].reset();
        } else {
            debug!(node = %self.name, running = %self.nodes[index].name(), "child running");
        }
        self.running = Some(index);
    }

    fn finish(&mut self) {
        if let Some(previous) = self.running.take() {
            debug!(node = %self.name, resumed = %self.nodes[previous].name(), "composite finished");
        }
        for node in self.nodes.iter_mut() {
            node.reset();
        }
    }

    fn reset(&mut self) {
        self.running = None;
        for node in self.nodes.iter_mut() {
            node.reset();
        }
    }
}

/// Executes children in order until one fails.
///
/// # Semantics
///
/// Evaluation starts at the resume point (see [`Resume`], default
/// [`Resume::Running`]):
/// - `Failure` stops the sequence immediately and returns `Failure`; the next
///   tick starts over at the first child
/// - `Running` records the child and returns `Running`
/// - `Success` continues with the next child **in the same tick**
/// - once every remaining child has succeeded the sequence returns `Success`
///
/// Effects of children that already succeeded are never rolled back.
pub struct Sequence<C: ?Sized + 'static> {
    inner: Children<C>,
}

impl<C: ?Sized + 'static> Sequence<C> {
    /// Creates a sequence over `children`.
    ///
    /// # Errors
    ///
    /// [`BtError::EmptyComposite`] if `children` is empty.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        children: Vec<Box<dyn Node<C>>>,
    ) -> Result<Self> {
        Ok(Self {
            inner: Children::new(name.into(), children, Resume::Running)?,
        })
    }

    pub fn with_resume(mut self, resume: Resume) -> Self {
        self.inner.resume = resume;
        self
    }

    pub fn resume(&self) -> Resume {
        self.inner.resume
    }

    /// Index of the child that returned `Running` last tick, `0` if none did.
    pub fn running_child_index(&self) -> usize {
        self.inner.running.unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }
}

impl<C: ?Sized + 'static> Node<C> for Sequence<C> {
    fn tick(&mut self, ctx: &mut C) -> Result<Status> {
        self.inner.evaluate(ctx, Status::Success)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn kind(&self) -> &'static str {
        match self.inner.resume {
            Resume::Running => "sequence",
            Resume::Rescan => "reactive sequence",
        }
    }

    fn children(&self) -> &[Box<dyn Node<C>>] {
        &self.inner.nodes
    }
}

/// Executes children in order until one succeeds.
///
/// # Semantics
///
/// Evaluation starts at the resume point (see [`Resume`], default
/// [`Resume::Rescan`]):
/// - `Success` stops the selector immediately and returns `Success`
/// - `Running` records the child and returns `Running`
/// - `Failure` continues with the next child in the same tick
/// - once every remaining child has failed the selector returns `Failure`
///
/// With the default policy a higher-priority branch that becomes viable
/// preempts a lower-priority branch that is still running.
pub struct Selector<C: ?Sized + 'static> {
    inner: Children<C>,
}

impl<C: ?Sized + 'static> Selector<C> {
    /// Creates a selector over `children`.
    ///
    /// # Errors
    ///
    /// [`BtError::EmptyComposite`] if `children` is empty.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        children: Vec<Box<dyn Node<C>>>,
    ) -> Result<Self> {
        Ok(Self {
            inner: Children::new(name.into(), children, Resume::Rescan)?,
        })
    }

    pub fn with_resume(mut self, resume: Resume) -> Self {
        self.inner.resume = resume;
        self
    }

    pub fn resume(&self) -> Resume {
        self.inner.resume
    }

    /// Index of the child that returned `Running` last tick, `0` if none did.
    pub fn running_child_index(&self) -> usize {
        self.inner.running.unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }
}

impl<C: ?Sized + 'static> Node<C> for Selector<C> {
    fn tick(&mut self, ctx: &mut C) -> Result<Status> {
        self.inner.evaluate(ctx, Status::Failure)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn kind(&self) -> &'static str {
        match self.inner.resume {
            Resume::Rescan => "selector",
            Resume::Running => "memory selector",
        }
    }

    fn children(&self) -> &[Box<dyn Node<C>>] {
        &self.inner.nodes
    }
}
