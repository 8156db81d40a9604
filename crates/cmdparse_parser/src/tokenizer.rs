//! Input tokenization.
//!
//! Converts a raw command line into an ordered sequence of tokens. Matchers
//! walk the sequence with an integer cursor; there is no linked structure.

use std::fmt;

use cmdparse_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The semantic type of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    /// A bare whitespace-delimited word
    Word,
    /// A `"quoted block"`, kept as one token
    QuotedBlock,
}

/// A token from player input.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// Word or quoted block
    pub kind: TokenKind,
    /// Raw text; for a quoted block this is the text between the quotes
    pub raw: String,
}

impl Token {
    /// Creates a word token.
    #[must_use]
    pub fn word(raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Word,
            raw: raw.into(),
        }
    }

    /// Creates a quoted block token.
    #[must_use]
    pub fn quoted(raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::QuotedBlock,
            raw: raw.into(),
        }
    }

    /// Returns true if the token has the given kind and raw text.
    #[must_use]
    pub fn is(&self, kind: TokenKind, raw: &str) -> bool {
        self.kind == kind && self.raw == raw
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Word => f.write_str(&self.raw),
            TokenKind::QuotedBlock => write!(f, "\"{}\"", self.raw),
        }
    }
}

/// An owned, ordered token sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokens {
    tokens: Vec<Token>,
}

impl Tokens {
    /// Wraps an ordered list of tokens.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token at `cursor`, if any.
    #[must_use]
    pub fn get(&self, cursor: usize) -> Option<&Token> {
        self.tokens.get(cursor)
    }

    /// The first token, if any.
    #[must_use]
    pub fn front(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// Iterates the tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Joins the raw text of the token at `from` and every token after it.
    ///
    /// Returns an empty string when `from` is past the end.
    #[must_use]
    pub fn collect_raw(&self, from: usize, separator: &str) -> String {
        self.tokens
            .get(from..)
            .unwrap_or_default()
            .iter()
            .map(|t| t.raw.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl FromIterator<Token> for Tokens {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Something that can turn a raw command line into tokens.
pub trait Tokenize: Send + Sync {
    /// Tokenizes `input`, failing with a `BadSyntax` error on malformed quoting.
    fn tokenize(&self, input: &str) -> Result<Tokens>;
}

/// Options for [`InputTokenizer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenizerConfig {
    /// Lowercase bare words (quoted blocks are never touched).
    pub lowercase: bool,
    /// Drop `. , ! ? ; : '` from bare words.
    pub strip_punctuation: bool,
}

impl TokenizerConfig {
    /// Lowercases words and strips punctuation, for free-form player input.
    #[must_use]
    pub fn forgiving() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
        }
    }

    /// Builder method to enable/disable lowercasing.
    #[must_use]
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Builder method to enable/disable punctuation stripping.
    #[must_use]
    pub fn with_strip_punctuation(mut self, strip: bool) -> Self {
        self.strip_punctuation = strip;
        self
    }
}

/// Tokenizes player input.
///
/// - Whitespace separates words
/// - `"..."` becomes one quoted block; an unterminated quote is an error
/// - Words keep their case unless [`TokenizerConfig::lowercase`] is set
#[derive(Clone, Debug, Default)]
pub struct InputTokenizer {
    config: TokenizerConfig,
}

impl InputTokenizer {
    /// Creates a tokenizer with the given options.
    #[must_use]
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// The active options.
    #[must_use]
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn flush_word(&self, word: &mut String, tokens: &mut Vec<Token>) {
        if word.is_empty() {
            return;
        }
        let text = if self.config.lowercase {
            word.to_lowercase()
        } else {
            word.clone()
        };
        word.clear();
        tokens.push(Token::word(text));
    }
}

impl Tokenize for InputTokenizer {
    fn tokenize(&self, input: &str) -> Result<Tokens> {
        let mut tokens = Vec::new();
        let mut chars = input.char_indices();
        let mut current_word = String::new();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '"' => {
                    self.flush_word(&mut current_word, &mut tokens);
                    let mut quoted = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '"' {
                            closed = true;
                            break;
                        }
                        quoted.push(c);
                    }
                    if !closed {
                        return Err(Error::bad_syntax(format!(
                            "unterminated quoted block starting at offset {offset}"
                        )));
                    }
                    tokens.push(Token::quoted(quoted));
                }
                c if c.is_whitespace() => {
                    self.flush_word(&mut current_word, &mut tokens);
                }
                '.' | ',' | '!' | '?' | ';' | ':' | '\'' if self.config.strip_punctuation => {}
                _ => current_word.push(ch),
            }
        }

        self.flush_word(&mut current_word, &mut tokens);
        Ok(Tokens::new(tokens))
    }
}
