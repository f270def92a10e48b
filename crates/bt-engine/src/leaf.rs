//! Leaf nodes.
//!
//! Leaves do the actual work of a tree. Both kinds wrap a callback captured
//! when the tree is built, optionally together with bound arguments that are
//! passed back verbatim on every tick. Leaves hold no lifecycle state of
//! their own: everything they need lives in the context they are ticked with.

use std::borrow::Cow;

use bt_core::{BtError, LeafError, Result, Status};
use tracing::trace;

use crate::Node;

type ActionFn<C> = Box<dyn FnMut(&mut C) -> std::result::Result<Status, LeafError>>;

/// A leaf that may change the context and may take several frames to finish.
///
/// # Semantics
///
/// `tick` calls the callback and returns exactly what it returns. A callback
/// returning `Running` is ticked again on the next frame, unless an ancestor
/// moves on to a different branch, in which case it is simply not called
/// again. Callbacks must therefore leave the context valid after every call.
///
/// Expected failure ("no reachable target") should be `Status::Failure`.
/// Errors returned from a fallible callback are reserved for programmer
/// mistakes; they abort the tick and reach the caller of
/// [`BehaviorTree::run`](crate::BehaviorTree::run) unchanged.
pub struct Action<C: ?Sized> {
    name: Cow<'static, str>,
    callback: ActionFn<C>,
}

impl<C: ?Sized + 'static> Action<C> {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        mut callback: impl FnMut(&mut C) -> Status + 'static,
    ) -> Self {
        Self::from_boxed(name, Box::new(move |ctx: &mut C| Ok(callback(ctx))))
    }

    /// Creates an action whose callback receives `args` on every tick.
    ///
    /// ```rust,ignore
    /// let step = Action::bind("Move to", |z: &mut Zombie, &(radius,)| z.move_to(radius), (0.5,));
    /// ```
    pub fn bind<A: 'static>(
        name: impl Into<Cow<'static, str>>,
        mut callback: impl FnMut(&mut C, &A) -> Status + 'static,
        args: A,
    ) -> Self {
        Self::from_boxed(name, Box::new(move |ctx: &mut C| Ok(callback(ctx, &args))))
    }

    /// Creates an action whose callback may raise an error.
    pub fn try_new(
        name: impl Into<Cow<'static, str>>,
        callback: impl FnMut(&mut C) -> std::result::Result<Status, LeafError> + 'static,
    ) -> Self {
        Self::from_boxed(name, Box::new(callback))
    }

    pub fn try_bind<A: 'static>(
        name: impl Into<Cow<'static, str>>,
        mut callback: impl FnMut(&mut C, &A) -> std::result::Result<Status, LeafError> + 'static,
        args: A,
    ) -> Self {
        Self::from_boxed(name, Box::new(move |ctx: &mut C| callback(ctx, &args)))
    }

    fn from_boxed(name: impl Into<Cow<'static, str>>, callback: ActionFn<C>) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<C: ?Sized + 'static> Node<C> for Action<C> {
    fn tick(&mut self, ctx: &mut C) -> Result<Status> {
        let status = (self.callback)(ctx).map_err(|source| BtError::Leaf {
            node: self.name.to_string(),
            source,
        })?;
        trace!(node = %self.name, %status, "action ticked");
        Ok(status)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "action"
    }
}

enum Predicate<C: ?Sized> {
    Bool(Box<dyn Fn(&C) -> bool>),
    Status(Box<dyn Fn(&C) -> Status>),
}

/// A leaf that checks the context without changing it.
///
/// The callback only gets a shared borrow of the context, so it cannot
/// mutate agent state. It always finishes in the tick it is called.
///
/// Predicates written against [`Status`] are accepted through
/// [`Condition::from_status`]; if one of them reports `Running` the tick
/// fails with [`BtError::ConditionRunning`] rather than passing it upward.
pub struct Condition<C: ?Sized> {
    name: Cow<'static, str>,
    predicate: Predicate<C>,
}

impl<C: ?Sized + 'static> Condition<C> {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        predicate: impl Fn(&C) -> bool + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Predicate::Bool(Box::new(predicate)),
        }
    }

    /// Creates a condition whose predicate receives `args` on every tick.
    pub fn bind<A: 'static>(
        name: impl Into<Cow<'static, str>>,
        predicate: impl Fn(&C, &A) -> bool + 'static,
        args: A,
    ) -> Self {
        Self::new(name, move |ctx| predicate(ctx, &args))
    }

    pub fn from_status(
        name: impl Into<Cow<'static, str>>,
        predicate: impl Fn(&C) -> Status + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Predicate::Status(Box::new(predicate)),
        }
    }

    pub fn bind_status<A: 'static>(
        name: impl Into<Cow<'static, str>>,
        predicate: impl Fn(&C, &A) -> Status + 'static,
        args: A,
    ) -> Self {
        Self::from_status(name, move |ctx| predicate(ctx, &args))
    }
}

impl<C: ?Sized + 'static> Node<C> for Condition<C> {
    fn tick(&mut self, ctx: &mut C) -> Result<Status> {
        let view: &C = ctx;
        let status = match &self.predicate {
            Predicate::Bool(f) => Status::from_bool(f(view)),
            Predicate::Status(f) => match f(view) {
                Status::Running => {
                    return Err(BtError::ConditionRunning {
                        node: self.name.to_string(),
                    })
                }
                done => done,
            },
        };
        trace!(node = %self.name, %status, "condition ticked");
        Ok(status)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "condition"
    }
}
