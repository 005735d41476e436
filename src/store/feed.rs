//! ChangeFeed - Post-mutation notifications for store listeners.

use event_emitter_rs::EventEmitter;

/// Publishes a record id under one of the `record:*` events after each
/// successful store mutation. Listeners must be `Send + Sync`; every
/// listener is joined before `emit` returns, and emission happens while
/// the store's lock is held, so listeners should stay cheap.
pub struct ChangeFeed {
    emitter: EventEmitter,
}

impl ChangeFeed {
    pub const ADDED: &'static str = "record:added";
    pub const UPDATED: &'static str = "record:updated";
    pub const DELETED: &'static str = "record:deleted";

    pub(crate) fn new() -> Self {
        ChangeFeed {
            emitter: EventEmitter::new(),
        }
    }

    pub fn on<F>(&mut self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(event, listener);
    }

    pub(crate) fn emit(&mut self, event: &str, id: &str) {
        // The emitter runs each listener on its own thread; join them so
        // delivery completes before the mutation returns.
        for handle in self.emitter.emit(event, id.to_string()) {
            let _ = handle.join();
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        ChangeFeed::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn delivery_completes_before_emit_returns() {
        let mut feed = ChangeFeed::new();
        let (tx, rx) = mpsc::channel::<String>();
        feed.on(ChangeFeed::ADDED, move |id| {
            tx.send(id).unwrap();
        });

        feed.emit(ChangeFeed::ADDED, "CH001");
        // No blocking recv: the listener must already have run.
        assert_eq!(rx.try_recv().unwrap(), "CH001");
    }

    #[test]
    fn events_are_independent() {
        let mut feed = ChangeFeed::new();
        let (tx, rx) = mpsc::channel::<String>();
        feed.on(ChangeFeed::DELETED, move |id| {
            tx.send(id).unwrap();
        });

        feed.emit(ChangeFeed::UPDATED, "CH001");
        assert!(rx.try_recv().is_err());
    }
}
