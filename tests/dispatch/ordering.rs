//! Matcher ordering and continuation delivery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use cmdparse::parser::Tokens;
use cmdparse::{
    Command, CommandHandler, CommandParser, Deferred, Error, ErrorKind, MatchOutcome, Result,
    SharedCommand,
};
use proptest::prelude::*;

use crate::fixtures::{GoCommand, NOBODY, fixture};

#[derive(Debug)]
struct Claimed {
    by: usize,
}

impl Command for Claimed {}

struct ClaimedHandler;

impl CommandHandler for ClaimedHandler {
    type Command = Claimed;

    fn execute(&self, _: &mut Claimed) -> Deferred<()> {
        Deferred::resolved(())
    }
}

/// Builds a parser whose matchers claim (or reject) everything they see,
/// counting how often each is consulted.
fn claiming_parser(outcomes: &[Option<bool>]) -> (CommandParser, Vec<Arc<AtomicUsize>>) {
    let mut parser = CommandParser::new();
    parser.commands_mut().register(ClaimedHandler);
    let mut calls = Vec::new();

    for (index, outcome) in outcomes.iter().copied().enumerate() {
        let counter = Arc::new(AtomicUsize::new(0));
        calls.push(Arc::clone(&counter));
        parser.register(move |_: &Tokens, _: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
            match outcome {
                None => MatchOutcome::NotMine,
                Some(true) => MatchOutcome::Matched(Box::new(Claimed { by: index })),
                Some(false) => MatchOutcome::Malformed(Error::bad_syntax(format!("matcher {index}"))),
            }
        });
    }
    (parser, calls)
}

fn counts(calls: &[Arc<AtomicUsize>]) -> Vec<usize> {
    calls.iter().map(|c| c.load(Ordering::SeqCst)).collect()
}

// =============================================================================
// First match wins
// =============================================================================

#[test]
fn first_claiming_matcher_wins() {
    let (parser, calls) = claiming_parser(&[None, Some(true), Some(true)]);
    let cmd = parser.wait("anything", &()).unwrap();
    assert_eq!(cmd.downcast_ref::<Claimed>().unwrap().by, 1);
    assert_eq!(counts(&calls), vec![1, 1, 0]);
}

#[test]
fn malformed_stops_the_search() {
    let (parser, calls) = claiming_parser(&[None, Some(false), Some(true)]);
    let err = parser.wait("anything", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::CommandFailed);
    assert_eq!(err.inner_error().unwrap().message, "matcher 1");
    assert_eq!(counts(&calls), vec![1, 1, 0]);
}

#[test]
fn every_matcher_is_consulted_before_no_handler() {
    let (parser, calls) = claiming_parser(&[None, None, None]);
    let err = parser.wait("anything", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoHandler);
    assert_eq!(counts(&calls), vec![1, 1, 1]);
}

#[test]
fn unique_word_promotes_even_when_alone() {
    let mut parser = CommandParser::new();
    parser.register_grammar(
        parser.command(&[]).unique_word("go").placeholder("direction"),
        |_: &cmdparse::Params, _: &()| -> Result<Box<dyn Command>> {
            Err(Error::configuration("builder must not run"))
        },
    );

    let err = parser.wait("go", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::CommandFailed);
    assert_eq!(err.inner_kind(), Some(ErrorKind::BadSyntax));

    let err = parser.wait("run north", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoHandler);
}

proptest! {
    #[test]
    fn outcome_is_decided_by_the_first_non_declining_matcher(
        outcomes in prop::collection::vec(prop::option::of(any::<bool>()), 0..12),
    ) {
        let (parser, calls) = claiming_parser(&outcomes);
        let result = parser.wait("anything", &());
        let decider = outcomes.iter().position(Option::is_some);

        match decider {
            None => {
                prop_assert_eq!(result.unwrap_err().kind, ErrorKind::NoHandler);
            }
            Some(index) if outcomes[index] == Some(true) => {
                let cmd = result.unwrap();
                prop_assert_eq!(cmd.downcast_ref::<Claimed>().unwrap().by, index);
            }
            Some(_) => {
                prop_assert_eq!(result.unwrap_err().inner_kind(), Some(ErrorKind::BadSyntax));
            }
        }

        let consulted = decider.map_or(outcomes.len(), |index| index + 1);
        let expected: Vec<usize> = (0..outcomes.len())
            .map(|i| usize::from(i < consulted))
            .collect();
        prop_assert_eq!(counts(&calls), expected);
    }
}

// =============================================================================
// Continuations
// =============================================================================

fn via_then(deferred: &Deferred<SharedCommand>) -> Result<SharedCommand> {
    let (tx, rx) = mpsc::channel();
    let tx2 = tx.clone();
    deferred.then(
        move |cmd| tx.send(Ok(cmd)).unwrap(),
        move |err| tx2.send(Err(err)).unwrap(),
    );
    rx.recv().unwrap()
}

#[test]
fn then_and_wait_observe_the_same_outcome() {
    let parser = fixture();
    for input in ["go north", "go", "use hammer on spoon", "fly north", "rest 3"] {
        let waited = parser.wait(input, &NOBODY);
        let continued = via_then(&parser.dispatch(input, &NOBODY));
        match (waited, continued) {
            (Ok(a), Ok(b)) => assert_eq!(format!("{a:?}"), format!("{b:?}"), "{input}"),
            (Err(a), Err(b)) => {
                assert_eq!(a.kind, b.kind, "{input}");
                assert_eq!(a.inner_kind(), b.inner_kind(), "{input}");
            }
            (a, b) => panic!("{input}: wait gave {a:?}, then gave {b:?}"),
        }
    }
}

#[test]
fn continuations_attached_after_settlement_still_run_once() {
    let deferred = fixture().dispatch("go west", &NOBODY);
    assert!(deferred.is_settled());

    let seen = Arc::new(Mutex::new(Vec::new()));
    for i in 0..3 {
        let seen = Arc::clone(&seen);
        deferred.then(
            move |cmd| {
                let go = cmd.downcast_ref::<GoCommand>().unwrap();
                seen.lock().unwrap().push((i, go.direction.clone()));
            },
            |err| panic!("unexpected rejection: {err}"),
        );
    }
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(0, "west".to_string()), (1, "west".to_string()), (2, "west".to_string())]
    );
}

#[test]
fn rejection_leaves_the_parser_usable() {
    let parser = fixture();
    assert!(parser.wait("put dragon on table", &NOBODY).is_err());
    assert!(parser.wait("put lamp on table", &NOBODY).is_ok());
}
