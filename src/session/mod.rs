//! Edit sessions - The confirmation-gated workflow between a store
//! snapshot and a committed write.
//!
//! A session loads a record, lets the caller mutate a working copy, and
//! only writes back through the store after validation passes and the
//! caller explicitly confirms. Every terminal state is absorbing: once a
//! session commits, cancels or fails, a fresh session is needed to retry.
//!
//! ```text
//! load ── Editing ──submit──► ConfirmationPending ──confirm──► Committed
//!            │                        │        └──(link down)──► Failed
//!            │                        └──cancel──► Cancelled
//!            ├──submit (invalid)──► Failed
//!            ├──submit (unchanged)──► Committed
//!            └──cancel──► Cancelled
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::record::Record;
use crate::store::{Store, StoreError};
use crate::validate::Validate;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Working copy is open for edits.
    Editing,
    /// Validation passed with changes; an explicit confirm or cancel is
    /// required before anything reaches the store.
    ConfirmationPending,
    /// Changes written (or nothing to write). Terminal.
    Committed,
    /// Caller backed out; the store was never touched. Terminal.
    Cancelled,
    /// Validation or the store rejected the session. Terminal.
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Committed | SessionState::Cancelled | SessionState::Failed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Editing => "editing",
            SessionState::ConfirmationPending => "confirmation pending",
            SessionState::Committed => "committed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a session ended in [`SessionState::Failed`].
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// One or more field constraints violated; no store access was made.
    Invalid(Vec<String>),
    /// The store rejected the commit. Connection-family errors are
    /// distinguishable via [`StoreError::is_connection_error`].
    Store(StoreError),
    /// The record disappeared between load and confirm.
    Vanished { id: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Invalid(errors) => {
                write!(f, "validation failed: {}", errors.join("; "))
            }
            FailureReason::Store(err) => write!(f, "commit rejected: {}", err),
            FailureReason::Vanished { id } => {
                write!(f, "record {} vanished before commit", id)
            }
        }
    }
}

/// Error returned when a session operation is called in the wrong state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session already reached a terminal state; start a new one.
    Terminal(SessionState),
    /// The operation is not legal in the current (non-terminal) state.
    UnexpectedState {
        operation: &'static str,
        state: SessionState,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Terminal(state) => {
                write!(f, "session already {}", state)
            }
            SessionError::UnexpectedState { operation, state } => {
                write!(f, "cannot {} while {}", operation, state)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// A single edit workflow over one record.
///
/// Holds the immutable snapshot taken at load time and the mutable
/// working copy; only [`confirm`](EditSession::confirm) ever writes to
/// the store, and only after [`submit`](EditSession::submit) validated
/// the working copy.
pub struct EditSession<R> {
    snapshot: R,
    working: R,
    state: SessionState,
    failure: Option<FailureReason>,
}

impl<R: fmt::Debug> fmt::Debug for EditSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("snapshot", &self.snapshot)
            .field("working", &self.working)
            .field("state", &self.state)
            .field("failure", &self.failure)
            .finish()
    }
}

impl<R: Record + Validate + PartialEq> EditSession<R> {
    /// Fetch the record and open a session in [`SessionState::Editing`].
    pub fn load<S: Store<R>>(store: &S, id: &str) -> Result<Self, StoreError> {
        let snapshot = store.get(id)?;
        debug!(kind = R::KIND, id = id, "edit session opened");
        Ok(EditSession {
            working: snapshot.clone(),
            snapshot,
            state: SessionState::Editing,
            failure: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The failure payload, present exactly when the state is
    /// [`SessionState::Failed`].
    pub fn failure(&self) -> Option<&FailureReason> {
        self.failure.as_ref()
    }

    /// The record as loaded.
    pub fn snapshot(&self) -> &R {
        &self.snapshot
    }

    /// The working copy with edits applied so far.
    pub fn working(&self) -> &R {
        &self.working
    }

    /// Apply a delta to the working copy. Legal any number of times
    /// while editing; nothing is validated or persisted yet.
    pub fn edit(&mut self, apply: impl FnOnce(&mut R)) -> Result<(), SessionError> {
        self.expect(SessionState::Editing, "edit")?;
        apply(&mut self.working);
        Ok(())
    }

    /// Validate the working copy and advance.
    ///
    /// Invalid → [`SessionState::Failed`] with the full error list, no
    /// store access. Valid but unchanged → [`SessionState::Committed`]
    /// with no store write. Valid and changed →
    /// [`SessionState::ConfirmationPending`].
    pub fn submit(&mut self) -> Result<SessionState, SessionError> {
        self.expect(SessionState::Editing, "submit")?;

        let mut report = self.working.validate();
        if self.working.id() != self.snapshot.id() {
            report.push(format!(
                "id: cannot change (was {:?})",
                self.snapshot.id()
            ));
        }
        if !report.is_valid() {
            self.fail(FailureReason::Invalid(report.into_errors()));
            return Ok(self.state);
        }

        if self.working == self.snapshot {
            debug!(kind = R::KIND, id = self.snapshot.id(), "no changes, trivially committed");
            self.state = SessionState::Committed;
        } else {
            self.state = SessionState::ConfirmationPending;
        }
        Ok(self.state)
    }

    /// Explicitly approve the pending changes and write them through the
    /// store. A connection failure leaves the store's prior state (and
    /// its link flag) untouched for the caller to deal with; no retry is
    /// attempted.
    pub fn confirm<S: Store<R>>(&mut self, store: &S) -> Result<SessionState, SessionError> {
        self.expect(SessionState::ConfirmationPending, "confirm")?;

        match store.update(&self.working) {
            Ok(true) => {
                debug!(kind = R::KIND, id = self.working.id(), "session committed");
                self.state = SessionState::Committed;
            }
            Ok(false) => {
                self.fail(FailureReason::Vanished {
                    id: self.working.id().to_string(),
                });
            }
            Err(err) => {
                warn!(kind = R::KIND, id = self.working.id(), error = %err, "commit rejected");
                self.fail(FailureReason::Store(err));
            }
        }
        Ok(self.state)
    }

    /// Back out without touching the store. Legal from any non-terminal
    /// state.
    pub fn cancel(&mut self) -> Result<SessionState, SessionError> {
        if self.state.is_terminal() {
            return Err(SessionError::Terminal(self.state));
        }
        debug!(kind = R::KIND, id = self.snapshot.id(), "session cancelled");
        self.state = SessionState::Cancelled;
        Ok(self.state)
    }

    fn expect(&self, wanted: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.state == wanted {
            Ok(())
        } else if self.state.is_terminal() {
            Err(SessionError::Terminal(self.state))
        } else {
            Err(SessionError::UnexpectedState {
                operation,
                state: self.state,
            })
        }
    }

    fn fail(&mut self, reason: FailureReason) {
        self.failure = Some(reason);
        self.state = SessionState::Failed;
    }
}
