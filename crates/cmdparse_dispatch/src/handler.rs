//! Command handlers and the handler registry.
//!
//! The dispatch engine hands every matched command to an [`Executor`].
//! [`HandlerRegistry`] is the standard executor: it routes each command to the
//! [`CommandHandler`] registered for the command's concrete type.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cmdparse_foundation::{Command, Deferred, Error, SharedCommand};

/// Executes matched commands.
pub trait Executor: Send + Sync {
    /// Runs `command`, settling the returned cell with the (possibly updated)
    /// command on success.
    fn execute(&self, command: Box<dyn Command>) -> Deferred<SharedCommand>;
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, command: Box<dyn Command>) -> Deferred<SharedCommand> {
        (**self).execute(command)
    }
}

/// Executes one concrete command type.
///
/// A handler may update the command (e.g. set a success flag) before
/// returning; the returned cell may settle immediately or later from another
/// thread.
pub trait CommandHandler: Send + Sync + 'static {
    /// The command type this handler executes.
    type Command: Command;

    /// Executes the command.
    fn execute(&self, command: &mut Self::Command) -> Deferred<()>;
}

trait ErasedHandler: Send + Sync {
    fn run(&self, command: Box<dyn Command>) -> Deferred<SharedCommand>;
}

impl<H: CommandHandler> ErasedHandler for H {
    fn run(&self, mut command: Box<dyn Command>) -> Deferred<SharedCommand> {
        let Some(typed) = command.downcast_mut::<H::Command>() else {
            return Deferred::rejected(Error::unsupported(&command));
        };
        let done = self.execute(typed);

        let result = Deferred::pending();
        let (resolved, rejected) = (result.clone(), result.clone());
        done.then(
            move |()| resolved.resolve(Arc::from(command)),
            move |err| rejected.reject(err),
        );
        result
    }
}

/// Routes commands to handlers by concrete command type.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TypeId, Box<dyn ErasedHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for its command type.
    ///
    /// Returns true if it replaced a handler already registered for that type.
    pub fn register<H: CommandHandler>(&mut self, handler: H) -> bool {
        let replaced = self
            .handlers
            .insert(TypeId::of::<H::Command>(), Box::new(handler))
            .is_some();
        tracing::debug!(
            command = std::any::type_name::<H::Command>(),
            replaced,
            "registered command handler"
        );
        replaced
    }

    /// Returns true if a handler is registered for `T`.
    #[must_use]
    pub fn handles<T: Command>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Executor for HandlerRegistry {
    fn execute(&self, command: Box<dyn Command>) -> Deferred<SharedCommand> {
        match self.handlers.get(&command.command_type()) {
            Some(handler) => handler.run(command),
            None => Deferred::rejected(Error::unsupported(&command)),
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
