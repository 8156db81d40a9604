//! Core types for cmdparse.
//!
//! This crate provides:
//! - [`Error`] / [`ErrorKind`] - Categorized errors with wrapped causes
//! - [`Command`] - The opaque value a matcher produces and a handler executes
//! - [`Deferred`] - Single-settlement result cells with attached continuations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod deferred;
pub mod error;

pub use command::{Command, SharedCommand};
pub use deferred::Deferred;
pub use error::{Cause, Error, ErrorKind, Result};
