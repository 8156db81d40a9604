//! The syntax matcher contract.
//!
//! A matcher looks at a token sequence and decides whether the input is
//! its command, not its command, or its command written wrongly.

use std::fmt;

use cmdparse_foundation::{Command, Error};

use crate::tokenizer::Tokens;

/// The result of one matching attempt.
pub enum MatchOutcome {
    /// The input is not for this matcher; dispatch moves on.
    NotMine,
    /// The matcher claims the input; dispatch stops here.
    Matched(Box<dyn Command>),
    /// The input belongs to this matcher but is invalid; dispatch stops and
    /// reports the detail.
    Malformed(Error),
}

impl MatchOutcome {
    /// Returns true for [`MatchOutcome::NotMine`].
    #[must_use]
    pub fn is_not_mine(&self) -> bool {
        matches!(self, Self::NotMine)
    }

    /// Returns the built command, if matched.
    #[must_use]
    pub fn command(&self) -> Option<&dyn Command> {
        match self {
            Self::Matched(cmd) => Some(cmd.as_ref()),
            _ => None,
        }
    }

    /// Returns the malformed detail, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Debug for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMine => f.write_str("NotMine"),
            Self::Matched(cmd) => f.debug_tuple("Matched").field(cmd).finish(),
            Self::Malformed(err) => f.debug_tuple("Malformed").field(err).finish(),
        }
    }
}

/// Decides whether a token sequence is a particular command.
///
/// `C` is the caller-supplied execution context passed through dispatch
/// (a player id, a session handle, or `()`).
///
/// Implementations must be pure functions of the tokens and the context so
/// that the same matcher can be tried again on the next input, from any
/// thread.
pub trait SyntaxMatcher<C>: Send + Sync {
    /// Tries to match `tokens`.
    fn try_match(&self, tokens: &Tokens, context: &C) -> MatchOutcome;
}

impl<C, F> SyntaxMatcher<C> for F
where
    F: Fn(&Tokens, &C) -> MatchOutcome + Send + Sync,
{
    fn try_match(&self, tokens: &Tokens, context: &C) -> MatchOutcome {
        self(tokens, context)
    }
}
