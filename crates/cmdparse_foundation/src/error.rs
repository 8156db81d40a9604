//! Error types for the cmdparse system.
//!
//! Every failure reported through a [`Deferred`](crate::Deferred) is an
//! [`Error`]: a categorized [`ErrorKind`], a human message, and an optional
//! wrapped inner cause. Errors are cheap to clone so a single rejection can be
//! delivered to any number of continuations.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A shared, type-erased inner cause.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// The main error type for cmdparse operations.
#[derive(Clone, Debug, Error)]
#[error("{kind}: {message}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Human readable description.
    pub message: String,
    #[source]
    inner: Option<Cause>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            inner: None,
        }
    }

    /// Wraps `inner` as the cause of this error.
    #[must_use]
    pub fn with_inner<E>(mut self, inner: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.inner = Some(Arc::new(inner));
        self
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn bad_syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadSyntax, message)
    }

    /// Creates the error reported when no matcher claimed an input.
    #[must_use]
    pub fn no_handler() -> Self {
        Self::new(
            ErrorKind::NoHandler,
            "no handler supported the given command",
        )
    }

    /// Creates a command failure wrapping the error that caused it.
    #[must_use]
    pub fn command_failed(message: impl Into<String>, inner: Error) -> Self {
        Self::new(ErrorKind::CommandFailed, message).with_inner(inner)
    }

    /// Creates a rejection carrying a handler's own error type.
    ///
    /// The domain error is kept as the inner cause so callers can recover it
    /// with [`Error::find_cause`].
    #[must_use]
    pub fn rejected<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(ErrorKind::Rejected, cause.to_string()).with_inner(cause)
    }

    /// Creates the error for a command type nobody handles.
    #[must_use]
    pub fn unsupported(command: impl fmt::Debug) -> Self {
        Self::new(
            ErrorKind::Unsupported,
            format!("no command handler registered for {command:?}"),
        )
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Converts a caught panic payload into a fault.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::new(ErrorKind::Fault, detail)
    }

    /// Returns true if this error is of the given kind.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Returns the wrapped inner cause, if any.
    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.inner.as_deref()
    }

    /// Returns the inner cause if it is itself an [`Error`].
    #[must_use]
    pub fn inner_error(&self) -> Option<&Error> {
        self.inner()?.downcast_ref::<Error>()
    }

    /// Returns the kind of the wrapped inner [`Error`], if any.
    ///
    /// For a [`ErrorKind::CommandFailed`] this tells a matcher-level rejection
    /// (`BadSyntax`, `Configuration`, `Fault`) apart from a handler-level one
    /// (`Rejected`, `Unsupported`).
    #[must_use]
    pub fn inner_kind(&self) -> Option<ErrorKind> {
        self.inner_error().map(|e| e.kind)
    }

    /// Walks the cause chain looking for an error of type `E`.
    ///
    /// Shared [`Cause`] links in the chain are looked through.
    #[must_use]
    pub fn find_cause<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        let mut current = self.source();
        while let Some(link) = current {
            let err = match link.downcast_ref::<Cause>() {
                Some(shared) => shared.as_ref() as &(dyn StdError + 'static),
                None => link,
            };
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// The input could not be tokenized, or a grammar rejected its shape.
    #[error("bad syntax")]
    BadSyntax,

    /// No registered matcher claimed the input.
    #[error("no handler")]
    NoHandler,

    /// A matcher rejected the input, or the matched command failed to execute.
    #[error("command failed")]
    CommandFailed,

    /// A command handler rejected the command with its own error.
    #[error("rejected")]
    Rejected,

    /// No command handler is registered for the command's type.
    #[error("unsupported command")]
    Unsupported,

    /// A matcher was registered in an unusable state.
    #[error("configuration error")]
    Configuration,

    /// A panic was intercepted at a matcher or dispatch boundary.
    #[error("internal fault")]
    Fault,
}

/// Result type alias for cmdparse operations.
pub type Result<T> = std::result::Result<T, Error>;
