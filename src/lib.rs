//! curated - Confirmation-gated record editing.
//!
//! The crate is built from four pieces:
//!
//! - [`Record`]: a uniquely-identified, serializable value with a `KIND`.
//! - [`Validate`] / [`Checks`]: pure field validation that reports every
//!   violation in one pass.
//! - [`MemoryStore`]: a lock-guarded in-memory keyed store with a
//!   deterministic simulated-link fault hook.
//! - [`EditSession`]: the workflow that loads a record, applies a delta,
//!   validates, and only writes back after explicit confirmation.
//!
//! ## Example
//!
//! ```ignore
//! use curated::{EditSession, MemoryStore, SessionState};
//!
//! let store = MemoryStore::seeded([site])?;
//! let mut session = EditSession::load(&store, "CH001")?;
//! session.edit(|site| site.location = "Berlin".to_string())?;
//! assert_eq!(session.submit()?, SessionState::ConfirmationPending);
//! assert_eq!(session.confirm(&store)?, SessionState::Committed);
//! ```

mod record;
mod session;
mod store;
mod validate;

pub use record::{ParseStatusError, Record, Status};
pub use session::{EditSession, FailureReason, SessionError, SessionState};
pub use store::{MemoryStore, Store, StoreError};
pub use validate::{Checks, Validate, ValidationReport};

#[cfg(feature = "emitter")]
pub use store::ChangeFeed;
