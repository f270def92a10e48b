//! Builder utilities for ergonomic tree construction.
//!
//! Instead of writing `Box::new(Sequence::new(name, vec![...])?)` you can use
//! shorter functions like `sequence(name, vec![...])?`.

use std::borrow::Cow;

use bt_core::{Result, Status};

use crate::{Action, Condition, Node, Selector, Sequence};

/// Creates a boxed sequence with the default [`Resume::Running`](crate::Resume::Running) policy.
#[inline]
pub fn sequence<C: ?Sized + 'static>(
    name: impl Into<Cow<'static, str>>,
    children: Vec<Box<dyn Node<C>>>,
) -> Result<Box<dyn Node<C>>> {
    Ok(Box::new(Sequence::new(name, children)?))
}

/// Creates a boxed selector with the default [`Resume::Rescan`](crate::Resume::Rescan) policy.
#[inline]
pub fn selector<C: ?Sized + 'static>(
    name: impl Into<Cow<'static, str>>,
    children: Vec<Box<dyn Node<C>>>,
) -> Result<Box<dyn Node<C>>> {
    Ok(Box::new(Selector::new(name, children)?))
}

/// Shorthand for `Box::new(Action::new(name, callback))`.
#[inline]
pub fn action<C: ?Sized + 'static>(
    name: impl Into<Cow<'static, str>>,
    callback: impl FnMut(&mut C) -> Status + 'static,
) -> Box<dyn Node<C>> {
    Box::new(Action::new(name, callback))
}

/// Shorthand for `Box::new(Condition::new(name, predicate))`.
#[inline]
pub fn condition<C: ?Sized + 'static>(
    name: impl Into<Cow<'static, str>>,
    predicate: impl Fn(&C) -> bool + 'static,
) -> Box<dyn Node<C>> {
    Box::new(Condition::new(name, predicate))
}
