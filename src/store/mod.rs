//! Stores - Keyed record storage behind a narrow CRUD seam.

use std::fmt;
use std::time::Duration;

use crate::record::Record;

#[cfg(feature = "emitter")]
mod feed;
mod memory;

#[cfg(feature = "emitter")]
pub use feed::ChangeFeed;
pub use memory::MemoryStore;

/// Abstract CRUD storage for records. Edit sessions only talk through
/// this seam, so a real backend can replace the in-memory store.
pub trait Store<R: Record>: Send + Sync {
    /// Get a record by id. Fails with [`StoreError::NotFound`] when the
    /// id is absent; link health is checked before the lookup.
    fn get(&self, id: &str) -> Result<R, StoreError>;

    /// Insert a new record. Returns `false` (not an error) if the id is
    /// already present.
    fn add(&self, record: &R) -> Result<bool, StoreError>;

    /// Replace an existing record. Returns `false` if the id is absent.
    /// A value identical to the stored one is a successful no-op.
    fn update(&self, record: &R) -> Result<bool, StoreError>;

    /// Remove a record by id. Returns `true` if it existed.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The simulated remote link is down.
    Disconnected,
    /// The simulated link latency exceeded the configured timeout.
    TimedOut { latency: Duration, timeout: Duration },
    /// No record with the given id.
    NotFound { kind: &'static str, id: String },
    /// Record serialization/deserialization error.
    Serde(String),
    /// A store lock was poisoned by a panicking holder.
    LockPoisoned(&'static str),
}

impl StoreError {
    /// Whether this error belongs to the connection family (retryable
    /// once the link is restored).
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            StoreError::Disconnected | StoreError::TimedOut { .. }
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Disconnected => write!(f, "store link is down"),
            StoreError::TimedOut { latency, timeout } => write!(
                f,
                "store link timed out ({:?} latency exceeds {:?} timeout)",
                latency, timeout
            ),
            StoreError::NotFound { kind, id } => {
                write!(f, "record not found: {}:{}", kind, id)
            }
            StoreError::Serde(message) => {
                write!(f, "record serialization error: {}", message)
            }
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StoreError {}
