//! Syntax matching for text commands.
//!
//! This crate turns player input like "use hammer on door" into typed command
//! values.
//!
//! # Architecture
//!
//! ```text
//! "use hammer on door"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → [Word(use), Word(hammer), Word(on), Word(door)]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SYNTAX          │  → use [tool] on [target]
//! │ MATCHER         │     { tool: "hammer", target: "door" }
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ BUILDER         │  → UseCommand { tool: "hammer", target: "door" }
//! │ FUNCTION        │
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - Convert raw input to an ordered token sequence
//! - [`matcher`] - The matcher contract and its three outcomes
//! - [`syntax`] - Declarative word/placeholder grammars

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod matcher;
pub mod syntax;
pub mod tokenizer;

// Re-export main types for convenience
pub use matcher::{MatchOutcome, SyntaxMatcher};
pub use syntax::{BuildFn, Grammar, GrammarBuilder, GrammarItem, Params};
pub use tokenizer::{InputTokenizer, Token, TokenKind, Tokenize, TokenizerConfig, Tokens};
