//! Change notification for views that render the history.
//!
//! Listeners run on the emitter's own threads, so delivery is asynchronous and
//! never blocks the caller that mutated the history. Every event carries a
//! revision; a listener only ever sees increasing revisions, and an event that
//! arrives after a newer one has been delivered is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};

use crate::item::ViewedItem;

/// Event emitted after every completed mutation of the history.
pub const CHANGED_EVENT: &str = "recently_viewed:changed";

/// Handle returned by `on_change`, used to unregister the listener.
pub type ListenerId = String;

#[derive(Serialize, Deserialize)]
struct ChangeEvent {
    revision: u64,
    items: Vec<ViewedItem>,
}

/// Broadcasts the current history to registered listeners.
pub struct ChangeNotifier {
    emitter: Mutex<EventEmitter>,
    revision: AtomicU64,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
            revision: AtomicU64::new(0),
        }
    }

    /// Reserve the revision for the next event. Callers take it while holding
    /// the lock that orders their mutations.
    pub fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Register a listener that receives the full history after each change.
    pub fn on_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Vec<ViewedItem>) + Send + Sync + 'static,
    {
        let delivered = Mutex::new(0u64);
        let mut emitter = self.emitter.lock().unwrap_or_else(PoisonError::into_inner);
        emitter.on(CHANGED_EVENT, move |payload: String| {
            let event = match serde_json::from_str::<ChangeEvent>(&payload) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping undecodable change event");
                    return;
                }
            };

            // held across the call so deliveries to this listener never overlap
            let mut last = delivered.lock().unwrap_or_else(PoisonError::into_inner);
            if event.revision <= *last {
                tracing::trace!(
                    revision = event.revision,
                    last = *last,
                    "dropping stale change event"
                );
                return;
            }
            *last = event.revision;
            listener(event.items);
        })
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: &str) -> bool {
        let mut emitter = self.emitter.lock().unwrap_or_else(PoisonError::into_inner);
        emitter.remove_listener(id).is_some()
    }

    /// Emit the history as of `revision` to all listeners.
    pub fn notify(&self, revision: u64, items: &[ViewedItem]) {
        let event = ChangeEvent {
            revision,
            items: items.to_vec(),
        };
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode change event");
                return;
            }
        };
        let mut emitter = self.emitter.lock().unwrap_or_else(PoisonError::into_inner);
        emitter.emit(CHANGED_EVENT, payload);
    }
}
