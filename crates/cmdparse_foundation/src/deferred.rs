//! Single-settlement result cells.
//!
//! A [`Deferred`] starts pending and settles exactly once, either resolved
//! with a value or rejected with an [`Error`]. Any number of continuations
//! can be attached with [`Deferred::then`], before or after settlement, and a
//! blocking caller can park on [`Deferred::wait`].
//!
//! # Settlement contract
//!
//! Settling a cell twice is a programming error and panics. Continuations
//! attached before settlement run in attachment order on the thread that
//! settles the cell; continuations attached afterwards run immediately on the
//! attaching thread, before `then` returns. Continuations never run while the
//! cell's lock is held, so they may freely attach further continuations or
//! settle other cells.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::bounded;

use crate::error::{Error, ErrorKind, Result};

type OnResolve<T> = Box<dyn FnOnce(T) + Send>;
type OnReject = Box<dyn FnOnce(Error) + Send>;

enum State<T> {
    Pending(Vec<(OnResolve<T>, OnReject)>),
    Resolved(T),
    Rejected(Error),
}

/// A handle to a single-settlement result cell.
///
/// Cloning the handle shares the cell.
pub struct Deferred<T> {
    cell: Arc<Mutex<State<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Clone + Send + 'static> Deferred<T> {
    /// Creates a pending cell.
    #[must_use]
    pub fn pending() -> Self {
        Self::with_state(State::Pending(Vec::new()))
    }

    /// Creates a cell that is already resolved.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        Self::with_state(State::Resolved(value))
    }

    /// Creates a cell that is already rejected.
    #[must_use]
    pub fn rejected(error: Error) -> Self {
        Self::with_state(State::Rejected(error))
    }

    fn with_state(state: State<T>) -> Self {
        Self {
            cell: Arc::new(Mutex::new(state)),
        }
    }

    /// Resolves the cell with `value` and runs pending continuations.
    ///
    /// # Panics
    ///
    /// Panics if the cell is already settled.
    #[track_caller]
    pub fn resolve(&self, value: T) {
        self.settle(Ok(value));
    }

    /// Rejects the cell with `error` and runs pending continuations.
    ///
    /// # Panics
    ///
    /// Panics if the cell is already settled.
    #[track_caller]
    pub fn reject(&self, error: Error) {
        self.settle(Err(error));
    }

    #[track_caller]
    fn settle(&self, outcome: Result<T>) {
        let next = match &outcome {
            Ok(value) => State::Resolved(value.clone()),
            Err(error) => State::Rejected(error.clone()),
        };

        let continuations = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, next) {
                State::Pending(continuations) => continuations,
                previous => {
                    *state = previous;
                    drop(state);
                    panic!("deferred result settled twice");
                }
            }
        };

        for (on_resolve, on_reject) in continuations {
            match &outcome {
                Ok(value) => on_resolve(value.clone()),
                Err(error) => on_reject(error.clone()),
            }
        }
    }

    /// Attaches a continuation pair.
    ///
    /// Exactly one of the two closures runs, exactly once.
    pub fn then<S, F>(&self, on_resolve: S, on_reject: F)
    where
        S: FnOnce(T) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        let outcome = {
            let mut state = self.lock();
            match &mut *state {
                State::Pending(continuations) => {
                    continuations.push((Box::new(on_resolve), Box::new(on_reject)));
                    return;
                }
                State::Resolved(value) => Ok(value.clone()),
                State::Rejected(error) => Err(error.clone()),
            }
        };

        match outcome {
            Ok(value) => on_resolve(value),
            Err(error) => on_reject(error),
        }
    }

    /// Returns true once the cell has resolved or rejected.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(*self.lock(), State::Pending(_))
    }

    /// Returns the outcome without blocking, or `None` while pending.
    #[must_use]
    pub fn peek(&self) -> Option<Result<T>> {
        match &*self.lock() {
            State::Pending(_) => None,
            State::Resolved(value) => Some(Ok(value.clone())),
            State::Rejected(error) => Some(Err(error.clone())),
        }
    }

    /// Blocks the calling thread until the cell settles.
    ///
    /// Returns immediately if the cell is already settled, so a cell resolved
    /// synchronously by its producer never parks the caller.
    pub fn wait(&self) -> Result<T> {
        let (tx, rx) = bounded(1);
        let on_reject = tx.clone();
        self.then(
            move |value| {
                let _ = tx.send(Ok(value));
            },
            move |error| {
                let _ = on_reject.send(Err(error));
            },
        );
        rx.recv().unwrap_or_else(|_| {
            Err(Error::new(
                ErrorKind::Fault,
                "deferred result dropped its continuations before settling",
            ))
        })
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + 'static> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.lock() {
            State::Pending(continuations) => format!("Pending({})", continuations.len()),
            State::Resolved(_) => "Resolved".to_string(),
            State::Rejected(error) => format!("Rejected({error})"),
        };
        f.debug_struct("Deferred").field("state", &state).finish()
    }
}
