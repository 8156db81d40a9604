//! Command dispatch for cmdparse.
//!
//! Ties the layers together: a [`CommandParser`] tokenizes input, picks the
//! first registered matcher that claims it, hands the command to an
//! [`Executor`] and reports the outcome through a
//! [`Deferred`](cmdparse_foundation::Deferred).
//!
//! # Example
//!
//! ```
//! use cmdparse_dispatch::{CommandHandler, CommandParser};
//! use cmdparse_foundation::{Command, Deferred};
//! use cmdparse_parser::Params;
//!
//! #[derive(Debug)]
//! struct Go {
//!     direction: String,
//! }
//!
//! impl Command for Go {}
//!
//! struct GoHandler;
//!
//! impl CommandHandler for GoHandler {
//!     type Command = Go;
//!
//!     fn execute(&self, _: &mut Go) -> Deferred<()> {
//!         Deferred::resolved(())
//!     }
//! }
//!
//! let mut parser: CommandParser = CommandParser::new();
//! parser.commands_mut().register(GoHandler);
//! parser.register(parser.command(&["go", "[direction]"]).with(|p: &Params, _: &()| {
//!     Ok(Box::new(Go { direction: p.require("direction")?.to_string() }))
//! }));
//!
//! let cmd = parser.wait("go north", &()).unwrap();
//! assert_eq!(cmd.downcast_ref::<Go>().unwrap().direction, "north");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod dispatcher;
pub mod handler;

pub use config::ParserConfig;
pub use dispatcher::CommandParser;
pub use handler::{CommandHandler, Executor, HandlerRegistry};
