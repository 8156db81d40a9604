//! Integration tests for Error types
//!
//! Tests error construction, display, cause chains, and error kinds.

use std::error::Error as StdError;

use cmdparse_foundation::{Error, ErrorKind};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("the {0} is locked")]
struct Locked(String);

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_bad_syntax() {
    let err = Error::bad_syntax("expected a direction");
    assert!(err.is(ErrorKind::BadSyntax));
    assert_eq!(err.to_string(), "bad syntax: expected a direction");
    assert!(err.source().is_none());
}

#[test]
fn error_no_handler() {
    let err = Error::no_handler();
    assert_eq!(err.kind, ErrorKind::NoHandler);
    assert_eq!(err.message, "no handler supported the given command");
}

#[test]
fn error_unsupported_names_the_command() {
    #[derive(Debug)]
    struct Dance;
    let err = Error::unsupported(Dance);
    assert_eq!(err.kind, ErrorKind::Unsupported);
    assert!(err.message.contains("Dance"));
}

#[test]
fn error_from_panic_payloads() {
    let err = Error::from_panic(&"static message");
    assert_eq!(err.kind, ErrorKind::Fault);
    assert_eq!(err.message, "static message");

    let err = Error::from_panic(&String::from("owned message"));
    assert_eq!(err.message, "owned message");

    let err = Error::from_panic(&42_u8);
    assert_eq!(err.message, "unknown panic payload");
}

#[test]
fn error_from_caught_panic() {
    let payload = std::panic::catch_unwind(|| -> u8 { panic!("boom {}", 7) }).unwrap_err();
    let err = Error::from_panic(payload.as_ref());
    assert_eq!(err.message, "boom 7");
}

// =============================================================================
// Cause Chains
// =============================================================================

#[test]
fn rejected_keeps_the_domain_error() {
    let err = Error::rejected(Locked("door".into()));
    assert_eq!(err.kind, ErrorKind::Rejected);
    assert_eq!(err.message, "the door is locked");
    assert_eq!(err.find_cause::<Locked>(), Some(&Locked("door".into())));
    assert!(err.inner_error().is_none());
}

#[test]
fn find_cause_walks_nested_errors() {
    let err = Error::command_failed(
        "command failed to execute",
        Error::rejected(Locked("chest".into())),
    );
    assert_eq!(err.find_cause::<Locked>().unwrap().0, "chest");
    assert_eq!(err.find_cause::<Error>().unwrap().kind, ErrorKind::Rejected);
    assert!(err.find_cause::<std::fmt::Error>().is_none());
}

#[test]
fn clones_share_the_cause() {
    let err = Error::rejected(Locked("gate".into()));
    let copy = err.clone();
    assert_eq!(copy.find_cause::<Locked>(), err.find_cause::<Locked>());
}

// =============================================================================
// Error Kinds
// =============================================================================

#[test]
fn error_kinds_display() {
    let cases = [
        (ErrorKind::BadSyntax, "bad syntax"),
        (ErrorKind::NoHandler, "no handler"),
        (ErrorKind::CommandFailed, "command failed"),
        (ErrorKind::Rejected, "rejected"),
        (ErrorKind::Unsupported, "unsupported command"),
        (ErrorKind::Configuration, "configuration error"),
        (ErrorKind::Fault, "internal fault"),
    ];
    for (kind, text) in cases {
        assert_eq!(kind.to_string(), text);
    }
}

#[test]
fn with_inner_accepts_foreign_errors() {
    let io = std::io::Error::other("disk on fire");
    let err = Error::configuration("cannot load grammar").with_inner(io);
    assert_eq!(err.find_cause::<std::io::Error>().unwrap().to_string(), "disk on fire");
}
