//! The dispatch engine.
//!
//! Orchestrates the full flow from raw input to an executed command:
//!
//! 1. Tokenize; failure rejects with `BadSyntax` and no matcher is tried
//! 2. Try each registered matcher in registration order
//! 3. First `Matched` wins: execute the command and forward its outcome
//! 4. First `Malformed` stops dispatch and rejects with `CommandFailed`
//! 5. Nobody claimed the input: reject with `NoHandler`

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use cmdparse_foundation::{Command, Deferred, Error, ErrorKind, Result, SharedCommand};
use cmdparse_parser::{
    GrammarBuilder, InputTokenizer, MatchOutcome, Params, SyntaxMatcher, Tokenize,
};

use crate::config::ParserConfig;
use crate::handler::{Executor, HandlerRegistry};

/// Dispatches text commands to registered matchers and executes the result.
///
/// `C` is the context value passed to every matcher (and through grammars
/// to their builder functions). `E` executes matched commands.
///
/// Register every matcher before dispatching concurrently; `dispatch` and
/// `wait` only need `&self` and can run from many threads at once.
pub struct CommandParser<C = (), E = HandlerRegistry> {
    commands: E,
    tokenizer: Box<dyn Tokenize>,
    matchers: Vec<Box<dyn SyntaxMatcher<C>>>,
    config: ParserConfig,
}

impl<C> CommandParser<C, HandlerRegistry> {
    /// Creates a parser with an empty handler registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(HandlerRegistry::new())
    }
}

impl<C> Default for CommandParser<C, HandlerRegistry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E: Executor> CommandParser<C, E> {
    /// Creates a parser that executes matched commands with `commands`.
    #[must_use]
    pub fn with_executor(commands: E) -> Self {
        let config = ParserConfig::default();
        Self {
            commands,
            tokenizer: Box::new(InputTokenizer::new(config.tokenizer.clone())),
            matchers: Vec::new(),
            config,
        }
    }

    /// Applies `config`, rebuilding the default tokenizer from it.
    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.tokenizer = Box::new(InputTokenizer::new(config.tokenizer.clone()));
        self.config = config;
        self
    }

    /// Replaces the tokenizer.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenize + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// The command executor.
    #[must_use]
    pub fn commands(&self) -> &E {
        &self.commands
    }

    /// The command executor, mutably (to register handlers).
    pub fn commands_mut(&mut self) -> &mut E {
        &mut self.commands
    }

    /// Starts a grammar from a word list; `"[name]"` entries are placeholders.
    #[must_use]
    pub fn command(&self, words: &[&str]) -> GrammarBuilder<C> {
        GrammarBuilder::from_words(words)
    }

    /// Appends a matcher. Matchers are tried in registration order.
    pub fn register(&mut self, matcher: impl SyntaxMatcher<C> + 'static) {
        self.matchers.push(Box::new(matcher));
    }

    /// Attaches `build` to `grammar` and appends the finished grammar.
    pub fn register_grammar<F>(&mut self, grammar: GrammarBuilder<C>, build: F)
    where
        C: 'static,
        F: Fn(&Params, &C) -> Result<Box<dyn Command>> + Send + Sync + 'static,
    {
        self.register(grammar.with(build));
    }

    /// Number of registered matchers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Returns true if no matcher is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Parses `text` and executes the first command that claims it.
    ///
    /// Never panics: every failure, including a panicking matcher, arrives
    /// through the returned cell's rejection path.
    pub fn dispatch(&self, text: &str, context: &C) -> Deferred<SharedCommand> {
        tracing::debug!(input = text, matchers = self.matchers.len(), "dispatching command");

        let tokens = match self.tokenizer.tokenize(text) {
            Ok(tokens) => tokens,
            Err(err) => {
                return Self::failed(
                    Error::new(ErrorKind::BadSyntax, "invalid command string").with_inner(err),
                );
            }
        };

        for (index, matcher) in self.matchers.iter().enumerate() {
            let outcome = match Self::guard(|| matcher.try_match(&tokens, context)) {
                Ok(outcome) => outcome,
                Err(fault) => {
                    return Self::failed(Error::command_failed("command matcher faulted", fault));
                }
            };

            match outcome {
                MatchOutcome::NotMine => {
                    tracing::trace!(matcher = index, "matcher declined");
                }
                MatchOutcome::Malformed(detail) => {
                    return Self::failed(Error::command_failed("command syntax error", detail));
                }
                MatchOutcome::Matched(command) => {
                    tracing::debug!(matcher = index, ?command, "command matched");
                    return self.execute(command);
                }
            }
        }

        Self::failed(Error::no_handler())
    }

    /// Dispatches `text` and blocks until the command settles.
    ///
    /// Commands whose handlers settle synchronously return without parking.
    pub fn wait(&self, text: &str, context: &C) -> Result<SharedCommand> {
        self.dispatch(text, context).wait()
    }

    fn execute(&self, command: Box<dyn Command>) -> Deferred<SharedCommand> {
        let handle = match Self::guard(|| self.commands.execute(command)) {
            Ok(handle) => handle,
            Err(fault) => {
                return Self::failed(Error::command_failed("command failed to execute", fault));
            }
        };

        let result = Deferred::pending();
        let (resolved, rejected) = (result.clone(), result.clone());
        handle.then(
            move |command| {
                tracing::debug!(?command, "command executed");
                resolved.resolve(command);
            },
            move |err| {
                tracing::debug!(error = %err, "command failed to execute");
                rejected.reject(Error::command_failed("command failed to execute", err));
            },
        );
        result
    }

    /// Runs `f`, turning a panic into a `Fault` error.
    fn guard<T>(f: impl FnOnce() -> T) -> Result<T> {
        panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
            let fault = Error::from_panic(payload.as_ref());
            tracing::warn!(error = %fault, "intercepted panic during dispatch");
            fault
        })
    }

    fn failed(err: Error) -> Deferred<SharedCommand> {
        tracing::debug!(error = %err, "dispatch rejected");
        Deferred::rejected(err)
    }
}

impl<C, E: fmt::Debug> fmt::Debug for CommandParser<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParser")
            .field("commands", &self.commands)
            .field("matchers", &self.matchers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
