//! Configuration for the command parser.

use cmdparse_parser::TokenizerConfig;

/// Configuration for a [`CommandParser`](crate::CommandParser).
///
/// Dispatch events go through `tracing` under this crate's targets; filter
/// them with the subscriber rather than here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Options for the default tokenizer.
    pub tokenizer: TokenizerConfig,
}

impl ParserConfig {
    /// Lowercases words and strips punctuation before matching.
    #[must_use]
    pub fn forgiving() -> Self {
        Self {
            tokenizer: TokenizerConfig::forgiving(),
        }
    }

    /// Builder method to set tokenizer options.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }
}
