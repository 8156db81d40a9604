//! cmdparse - Text-command dispatch engine
//!
//! This crate re-exports all layers of the cmdparse system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: cmdparse_dispatch   - Matcher registry, dispatch engine, handler registry
//! Layer 1: cmdparse_parser     - Tokenizer, matcher contract, word/placeholder grammars
//! Layer 0: cmdparse_foundation - Core types (Error, Command, Deferred)
//! ```

pub use cmdparse_dispatch as dispatch;
pub use cmdparse_foundation as foundation;
pub use cmdparse_parser as parser;

pub use cmdparse_dispatch::{CommandHandler, CommandParser, Executor, HandlerRegistry, ParserConfig};
pub use cmdparse_foundation::{Command, Deferred, Error, ErrorKind, Result, SharedCommand};
pub use cmdparse_parser::{Grammar, GrammarBuilder, MatchOutcome, Params, SyntaxMatcher};
