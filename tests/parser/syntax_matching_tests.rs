//! Syntax matching tests.
//!
//! Tests for word/placeholder grammars against tokenized input.

use cmdparse_foundation::{Command, Error, ErrorKind, Result};
use cmdparse_parser::{
    Grammar, GrammarBuilder, GrammarItem, InputTokenizer, MatchOutcome, Params, SyntaxMatcher,
    Tokenize,
};

#[derive(Debug)]
struct Put {
    item: String,
    target: String,
    player: u32,
}

impl Command for Put {}

fn put_grammar() -> Grammar<u32> {
    GrammarBuilder::from_words(&["put", "[item]", "on", "[target]"]).with(
        |params: &Params, player: &u32| -> Result<Box<dyn Command>> {
            Ok(Box::new(Put {
                item: params.require("item")?.to_string(),
                target: params.require("target")?.to_string(),
                player: *player,
            }))
        },
    )
}

fn try_put(grammar: &Grammar<u32>, input: &str) -> MatchOutcome {
    let tokens = InputTokenizer::default().tokenize(input).unwrap();
    grammar.try_match(&tokens, &42)
}

#[test]
fn grammar_matches_and_builds_with_context() {
    let outcome = try_put(&put_grammar(), "put lamp on table");
    let put = outcome.command().unwrap().downcast_ref::<Put>().unwrap();
    assert_eq!(put.item, "lamp");
    assert_eq!(put.target, "table");
    assert_eq!(put.player, 42);
}

#[test]
fn grammar_declines_other_shapes() {
    let grammar = put_grammar();
    for input in ["put lamp in box", "put lamp", "take lamp on table", ""] {
        assert!(try_put(&grammar, input).is_not_mine(), "{input:?}");
    }
}

#[test]
fn grammar_ignores_trailing_tokens() {
    let outcome = try_put(&put_grammar(), "put lamp on table carefully");
    assert!(outcome.command().unwrap().is::<Put>());
}

#[test]
fn grammar_placeholder_accepts_quoted_block() {
    let outcome = try_put(&put_grammar(), "put \"brass lamp\" on table");
    let put = outcome.command().unwrap().downcast_ref::<Put>().unwrap();
    assert_eq!(put.item, "brass lamp");
}

#[test]
fn grammar_non_matching_word_does_not_stop_the_walk() {
    // "under" misses, but "bar" still lines up with [target].
    let grammar = GrammarBuilder::new()
        .unique_word("put")
        .placeholder("item")
        .word("on")
        .placeholder("target")
        .with(|_: &Params, _: &u32| -> Result<Box<dyn Command>> {
            Err(Error::configuration("builder must not run"))
        });
    let err = try_put(&grammar, "put foo under bar").error().unwrap().clone();
    assert_eq!(err.kind, ErrorKind::BadSyntax);
    assert_eq!(
        err.message,
        "invalid syntax for command, did not match: put [item] on [target]"
    );
}

#[test]
fn grammar_shape_accessors() {
    let grammar = put_grammar();
    assert_eq!(grammar.len(), 4);
    assert!(grammar.has_builder());
    assert_eq!(grammar.placeholder_names().collect::<Vec<_>>(), ["item", "target"]);
    assert!(!grammar.items()[0].is_unique());
    assert_eq!(grammar.items()[1], GrammarItem::Placeholder("item".into()));
    assert_eq!(format!("{grammar}"), "put [item] on [target]");
}

#[test]
fn grammar_clone_shares_builder() {
    let grammar = put_grammar();
    let copy = grammar.clone();
    drop(grammar);
    assert!(try_put(&copy, "put lamp on table").command().is_some());
}

#[test]
fn rest_capture_in_word_list() {
    let grammar = GrammarBuilder::from_words(&["say", "[text...]"])
        .with(|params: &Params, _: &u32| -> Result<Box<dyn Command>> {
            Err(Error::bad_syntax(params.require("text")?.to_string()))
        });
    let outcome = try_put(&grammar, "say \"good\" morning all");
    assert_eq!(outcome.error().unwrap().message, "good morning all");
    assert_eq!(grammar.to_string(), "say [text...]");
}
