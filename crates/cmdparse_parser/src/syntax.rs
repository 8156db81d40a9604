//! Word/placeholder grammars.
//!
//! A [`Grammar`] is an ordered list of fixed words and named placeholders,
//! such as `use [tool] on [target]`. It is declared with a [`GrammarBuilder`],
//! finalized by attaching a builder function, and is immutable from then on.
//!
//! # Matching
//!
//! The grammar and the tokens are walked in lockstep, one item per token,
//! until either runs out. A fixed word that equals the token's raw text counts
//! as matched; a placeholder always matches and captures the token's raw text.
//! Tokens past the end of the grammar are ignored.
//!
//! - every item matched: the builder function turns the captures into a command
//! - otherwise, if a *unique* word matched along the way: the input is
//!   reported as malformed, since the caller clearly meant this command
//! - otherwise: not this grammar's input
//!
//! A grammar made of a single unique word is therefore a catch-all for that
//! verb. Registered after the specific grammars, with a builder that returns
//! a syntax error, it turns `put foo under bar` into a helpful error instead
//! of an unknown command.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use cmdparse_foundation::{Command, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::matcher::{MatchOutcome, SyntaxMatcher};
use crate::tokenizer::Tokens;

/// One position in a grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GrammarItem {
    /// A word that must literally equal the token's raw text
    FixedWord {
        /// The word
        name: String,
        /// Matching this word promotes a failed parse to a syntax error
        unique: bool,
    },
    /// Captures one token's raw text
    Placeholder(String),
    /// Captures the raw text of this token and every token after it, joined
    /// by single spaces. Items declared after a rest capture never match.
    Rest(String),
}

impl GrammarItem {
    /// Returns true for a unique fixed word.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        matches!(self, Self::FixedWord { unique: true, .. })
    }
}

impl fmt::Display for GrammarItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedWord { name, .. } => f.write_str(name),
            Self::Placeholder(name) => write!(f, "[{name}]"),
            Self::Rest(name) => write!(f, "[{name}...]"),
        }
    }
}

/// Parameters captured by placeholders, keyed by placeholder name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a capture, replacing any earlier one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The value captured for `name`, or a syntax error naming it.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::bad_syntax(format!("missing value for [{name}]")))
    }

    /// Returns true if `name` was captured.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Captured placeholder names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates `(name, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Turns captured parameters plus the caller's context into a command.
pub type BuildFn<C> = dyn Fn(&Params, &C) -> Result<Box<dyn Command>> + Send + Sync;

/// Declares a [`Grammar`].
pub struct GrammarBuilder<C> {
    items: Vec<GrammarItem>,
    case_insensitive: bool,
    builder: Option<Arc<BuildFn<C>>>,
}

impl<C> GrammarBuilder<C> {
    /// Starts an empty grammar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            case_insensitive: false,
            builder: None,
        }
    }

    /// Starts a grammar from a word list.
    ///
    /// `"[name]"` declares a placeholder, `"[name...]"` a rest capture, and
    /// anything else a fixed, non-unique word.
    #[must_use]
    pub fn from_words(words: &[&str]) -> Self {
        words.iter().fold(Self::new(), |builder, word| {
            match word.strip_prefix('[').and_then(|w| w.strip_suffix(']')) {
                Some(name) if !name.is_empty() => match name.strip_suffix("...") {
                    Some(rest) if !rest.is_empty() => builder.rest(rest),
                    _ => builder.placeholder(name),
                },
                _ => builder.word(*word),
            }
        })
    }

    /// Appends a fixed word.
    #[must_use]
    pub fn word(mut self, name: impl Into<String>) -> Self {
        self.items.push(GrammarItem::FixedWord {
            name: name.into(),
            unique: false,
        });
        self
    }

    /// Appends a unique fixed word (see the module docs).
    #[must_use]
    pub fn unique_word(mut self, name: impl Into<String>) -> Self {
        self.items.push(GrammarItem::FixedWord {
            name: name.into(),
            unique: true,
        });
        self
    }

    /// Appends a placeholder capturing one token.
    #[must_use]
    pub fn placeholder(mut self, name: impl Into<String>) -> Self {
        self.items.push(GrammarItem::Placeholder(name.into()));
        self
    }

    /// Appends a capture of the remaining input.
    #[must_use]
    pub fn rest(mut self, name: impl Into<String>) -> Self {
        self.items.push(GrammarItem::Rest(name.into()));
        self
    }

    /// Compares fixed words without regard to case.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Attaches the builder function and finalizes the grammar.
    #[must_use]
    pub fn with<F>(mut self, builder: F) -> Grammar<C>
    where
        F: Fn(&Params, &C) -> Result<Box<dyn Command>> + Send + Sync + 'static,
    {
        self.builder = Some(Arc::new(builder));
        self.build()
    }

    /// Finalizes the grammar as declared so far.
    ///
    /// A grammar finalized without a builder reports a configuration error
    /// whenever it matches.
    #[must_use]
    pub fn build(self) -> Grammar<C> {
        Grammar {
            items: self.items,
            case_insensitive: self.case_insensitive,
            builder: self.builder,
        }
    }
}

impl<C> Default for GrammarBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A finalized word/placeholder grammar; a [`SyntaxMatcher`].
pub struct Grammar<C> {
    items: Vec<GrammarItem>,
    case_insensitive: bool,
    builder: Option<Arc<BuildFn<C>>>,
}

impl<C> Grammar<C> {
    /// The declared items, in order.
    #[must_use]
    pub fn items(&self) -> &[GrammarItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the grammar has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if a builder function is attached.
    #[must_use]
    pub fn has_builder(&self) -> bool {
        self.builder.is_some()
    }

    /// Names of the declared placeholders and rest captures, in order.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            GrammarItem::Placeholder(name) | GrammarItem::Rest(name) => Some(name.as_str()),
            GrammarItem::FixedWord { .. } => None,
        })
    }

    fn word_matches(&self, word: &str, raw: &str) -> bool {
        if self.case_insensitive {
            word.to_lowercase() == raw.to_lowercase()
        } else {
            word == raw
        }
    }

    /// Walks the tokens against the grammar.
    fn scan(&self, tokens: &Tokens) -> Scan {
        let mut params = Params::new();
        let mut matched = 0;
        let mut unique_seen = false;
        let mut cursor = 0;

        for item in &self.items {
            let Some(token) = tokens.get(cursor) else {
                break;
            };
            match item {
                GrammarItem::FixedWord { name, unique } => {
                    if self.word_matches(name, &token.raw) {
                        matched += 1;
                        unique_seen |= *unique;
                    }
                    cursor += 1;
                }
                GrammarItem::Placeholder(name) => {
                    params.insert(name.as_str(), token.raw.as_str());
                    matched += 1;
                    cursor += 1;
                }
                GrammarItem::Rest(name) => {
                    params.insert(name.as_str(), tokens.collect_raw(cursor, " "));
                    matched += 1;
                    cursor = tokens.len();
                }
            }
        }

        if matched == self.items.len() {
            Scan::Complete(params)
        } else {
            Scan::Partial { unique_seen }
        }
    }
}

enum Scan {
    Complete(Params),
    Partial { unique_seen: bool },
}

impl<C> SyntaxMatcher<C> for Grammar<C> {
    fn try_match(&self, tokens: &Tokens, context: &C) -> MatchOutcome {
        let params = match self.scan(tokens) {
            Scan::Complete(params) => params,
            Scan::Partial { unique_seen: true } => {
                tracing::trace!(grammar = %self, "unique word seen, reporting malformed input");
                return MatchOutcome::Malformed(Error::bad_syntax(format!(
                    "invalid syntax for command, did not match: {self}"
                )));
            }
            Scan::Partial { unique_seen: false } => return MatchOutcome::NotMine,
        };

        let Some(builder) = &self.builder else {
            return MatchOutcome::Malformed(Error::configuration(format!(
                "no builder attached to grammar `{self}`"
            )));
        };

        match panic::catch_unwind(AssertUnwindSafe(|| builder(&params, context))) {
            Ok(Ok(command)) => MatchOutcome::Matched(command),
            Ok(Err(err)) => MatchOutcome::Malformed(err),
            Err(payload) => {
                tracing::warn!(grammar = %self, "command builder panicked");
                MatchOutcome::Malformed(Error::from_panic(payload.as_ref()))
            }
        }
    }
}

impl<C> Clone for Grammar<C> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            case_insensitive: self.case_insensitive,
            builder: self.builder.clone(),
        }
    }
}

impl<C> fmt::Display for Grammar<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for Grammar<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("items", &self.items)
            .field("case_insensitive", &self.case_insensitive)
            .field("has_builder", &self.has_builder())
            .finish()
    }
}
