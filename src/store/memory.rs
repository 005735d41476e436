//! MemoryStore - Lock-guarded in-memory keyed store with a simulated link.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use super::{Store, StoreError};
use crate::record::Record;

#[cfg(feature = "emitter")]
use super::feed::ChangeFeed;

/// Internal stored representation of a record.
struct Stored {
    bytes: Vec<u8>,
    version: u64,
}

struct Inner {
    map: HashMap<String, Stored>,
    connected: bool,
    latency: Duration,
    op_counter: u64,
    #[cfg(feature = "emitter")]
    feed: ChangeFeed,
}

/// In-memory keyed store for a single record type.
///
/// The store is a monitor: one mutex guards the map, the link state, the
/// operation counter and the change feed, so at most one operation runs
/// at a time and results are linearizable with call order. Records are
/// held as serialized bytes; a byte-identical `update` is detected as a
/// no-op.
///
/// The simulated remote link is controlled by two deterministic hooks:
/// [`set_connected`](MemoryStore::set_connected) downs the link outright,
/// and [`with_latency`](MemoryStore::with_latency) /
/// [`with_timeout`](MemoryStore::with_timeout) model slow links — the
/// latency is compared against the timeout synchronously, so tests never
/// sleep.
pub struct MemoryStore<R> {
    inner: Mutex<Inner>,
    timeout: Option<Duration>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MemoryStore<R> {
    /// Create a new empty store with a healthy, instant link.
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                connected: true,
                latency: Duration::ZERO,
                op_counter: 0,
                #[cfg(feature = "emitter")]
                feed: ChangeFeed::new(),
            }),
            timeout: None,
            _record: PhantomData,
        }
    }

    /// Set the simulated link latency for all subsequent operations.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.set_latency(latency);
        self
    }

    /// Treat any operation whose simulated latency exceeds `timeout` as a
    /// connection failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Flip the simulated link. Never connection-checked itself; an
    /// operation already holding the lock completes unaffected.
    pub fn set_connected(&self, connected: bool) {
        self.recovered().connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.recovered().connected
    }

    pub fn set_latency(&self, latency: Duration) {
        self.recovered().latency = latency;
    }

    /// Number of successful mutations since creation. Diagnostics only.
    pub fn operation_count(&self) -> u64 {
        self.recovered().op_counter
    }

    pub fn len(&self) -> usize {
        self.recovered().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recovered().map.is_empty()
    }

    /// Register a listener for one of the [`ChangeFeed`] events.
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.recovered().feed.on(event, listener);
    }

    /// Lock for a fallible operation; poisoning becomes a typed error.
    fn guard(&self, operation: &'static str) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    /// Lock for infallible hooks; a poisoned mutex still holds valid
    /// state here (plain fields, no invariants spanning the panic), so
    /// recover rather than fail.
    fn recovered(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_link(&self, inner: &Inner) -> Result<(), StoreError> {
        if !inner.connected {
            return Err(StoreError::Disconnected);
        }
        if let Some(timeout) = self.timeout {
            if inner.latency > timeout {
                warn!(latency = ?inner.latency, timeout = ?timeout, "simulated link timed out");
                return Err(StoreError::TimedOut {
                    latency: inner.latency,
                    timeout,
                });
            }
        }
        Ok(())
    }
}

impl<R: Record> MemoryStore<R> {
    /// Create a store pre-seeded with fixture records.
    pub fn seeded(records: impl IntoIterator<Item = R>) -> Result<Self, StoreError> {
        let store = MemoryStore::new();
        {
            let mut inner = store.guard("seed")?;
            for record in records {
                let bytes = encode(&record)?;
                inner
                    .map
                    .insert(record.id().to_string(), Stored { bytes, version: 1 });
            }
        }
        Ok(store)
    }

    /// Version of the stored record, bumped on every replacing update.
    pub fn version(&self, id: &str) -> Result<u64, StoreError> {
        let inner = self.guard("version")?;
        inner
            .map
            .get(id)
            .map(|stored| stored.version)
            .ok_or_else(|| StoreError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            })
    }
}

impl<R: Record> Store<R> for MemoryStore<R> {
    fn get(&self, id: &str) -> Result<R, StoreError> {
        let inner = self.guard("get")?;
        self.check_link(&inner)?;

        match inner.map.get(id) {
            Some(stored) => decode(&stored.bytes),
            None => Err(StoreError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            }),
        }
    }

    fn add(&self, record: &R) -> Result<bool, StoreError> {
        let mut inner = self.guard("add")?;
        self.check_link(&inner)?;

        if inner.map.contains_key(record.id()) {
            debug!(kind = R::KIND, id = record.id(), "add skipped, id present");
            return Ok(false);
        }

        let bytes = encode(record)?;
        inner
            .map
            .insert(record.id().to_string(), Stored { bytes, version: 1 });
        inner.op_counter += 1;
        debug!(kind = R::KIND, id = record.id(), "record added");
        #[cfg(feature = "emitter")]
        inner.feed.emit(ChangeFeed::ADDED, record.id());
        Ok(true)
    }

    fn update(&self, record: &R) -> Result<bool, StoreError> {
        let mut inner = self.guard("update")?;
        self.check_link(&inner)?;

        let bytes = encode(record)?;
        let Some(stored) = inner.map.get_mut(record.id()) else {
            return Ok(false);
        };

        // Identical value: successful no-op, counter untouched.
        if stored.bytes == bytes {
            debug!(kind = R::KIND, id = record.id(), "no-op update");
            return Ok(true);
        }

        stored.bytes = bytes;
        stored.version += 1;
        inner.op_counter += 1;
        debug!(kind = R::KIND, id = record.id(), "record updated");
        #[cfg(feature = "emitter")]
        inner.feed.emit(ChangeFeed::UPDATED, record.id());
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.guard("delete")?;
        self.check_link(&inner)?;

        if inner.map.remove(id).is_none() {
            return Ok(false);
        }
        inner.op_counter += 1;
        debug!(kind = R::KIND, id = id, "record deleted");
        #[cfg(feature = "emitter")]
        inner.feed.emit(ChangeFeed::DELETED, id);
        Ok(true)
    }
}

fn encode<R: Record>(record: &R) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(record).map_err(|e| StoreError::Serde(e.to_string()))
}

fn decode<R: Record>(bytes: &[u8]) -> Result<R, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
}
