//! Core node trait.
//!
//! Every node in a tree implements [`Node`]. The trait is generic over a
//! context type `C`: the owning agent's state, handed down mutably on every
//! tick so leaves can read and update it without shared ownership.

use bt_core::{Result, Status};

/// A behavior tree node that can be ticked against a context.
pub trait Node<C: ?Sized>: 'static {
    /// Evaluate this node once.
    ///
    /// # Returns
    ///
    /// - `Ok(Status::Success)` / `Ok(Status::Failure)` when the node finished
    /// - `Ok(Status::Running)` when it wants to be ticked again next frame
    /// - `Err(_)` for configuration mistakes or errors raised by a leaf; these
    ///   propagate to the caller untouched
    fn tick(&mut self, ctx: &mut C) -> Result<Status>;

    /// Return to the never-ticked state, recursively.
    fn reset(&mut self) {}

    /// Diagnostic label.
    fn name(&self) -> &str;

    /// Short kind label used when rendering a tree.
    fn kind(&self) -> &'static str;

    fn children(&self) -> &[Box<dyn Node<C>>] {
        &[]
    }
}

/// Blanket implementation for boxed nodes.
///
/// This allows `Box<dyn Node<C>>` to also implement `Node<C>`, so composites
/// can hold heterogeneous children and trees can take either form as root.
impl<C: ?Sized + 'static> Node<C> for Box<dyn Node<C>> {
    #[inline]
    fn tick(&mut self, ctx: &mut C) -> Result<Status> {
        (**self).tick(ctx)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }

    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    #[inline]
    fn children(&self) -> &[Box<dyn Node<C>>] {
        (**self).children()
    }
}
