//! Command values.
//!
//! A command is whatever a matcher builds out of an input line. The engine
//! never looks inside one; it only moves it from the matcher to the handler
//! registry and back to the caller.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A typed command produced by a syntax matcher.
///
/// Implement this marker for each concrete command struct. Handlers and
/// callers recover the concrete type with `downcast_ref`.
pub trait Command: Any + Send + Sync + fmt::Debug + 'static {}

/// A settled command as delivered to continuations.
pub type SharedCommand = Arc<dyn Command>;

impl dyn Command {
    /// Returns true if the command is of type `T`.
    #[must_use]
    pub fn is<T: Command>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Returns the command as `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: Command>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Returns the command mutably as `T`, if it is one.
    #[must_use]
    pub fn downcast_mut<T: Command>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// The `TypeId` of the concrete command type.
    #[must_use]
    pub fn command_type(&self) -> TypeId {
        (self as &dyn Any).type_id()
    }
}
