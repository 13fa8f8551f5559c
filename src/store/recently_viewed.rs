use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clock::{Clock, SystemClock};
use crate::config::RecentlyViewedConfig;
use crate::error::RecentlyViewedError;
#[cfg(feature = "emitter")]
use crate::emitter::{ChangeNotifier, ListenerId};
use crate::item::{ItemId, ViewedItem, ViewedItemInput};
use crate::storage::Storage;

use super::history::History;

/// A mutation issued before the persisted history was loaded.
#[derive(Debug, Clone)]
enum Intent {
    Add(ViewedItem),
    Clear,
}

enum State {
    /// Waiting for `initialize()`; mutations are queued in arrival order.
    Pending(Vec<Intent>),
    Ready(History),
}

struct Inner<S> {
    storage: S,
    config: RecentlyViewedConfig,
    clock: Box<dyn Clock>,
    state: Mutex<State>,
    #[cfg(feature = "emitter")]
    notifier: ChangeNotifier,
}

/// The recently-viewed history of one session.
///
/// Construct one per session and hand clones to every view that records or
/// renders views; clones share the same history. All mutations go through a
/// single lock and are written through to storage while it is held, so the
/// persisted copy always reflects the latest mutation.
///
/// Storage failures never reach the caller: a history that cannot be loaded
/// starts empty, and a history that cannot be saved stays authoritative in
/// memory for the rest of the session.
pub struct RecentlyViewedStore<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for RecentlyViewedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for [`RecentlyViewedStore`] with a custom config or clock.
pub struct RecentlyViewedBuilder<S> {
    storage: S,
    config: RecentlyViewedConfig,
    clock: Box<dyn Clock>,
}

impl<S: Storage> RecentlyViewedBuilder<S> {
    pub fn config(mut self, config: RecentlyViewedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Build the store and load the persisted history right away.
    pub fn open(self) -> Result<RecentlyViewedStore<S>, RecentlyViewedError> {
        let store = self.deferred()?;
        store.initialize();
        Ok(store)
    }

    /// Build the store in the pending state; call `initialize()` once storage
    /// is reachable.
    pub fn deferred(self) -> Result<RecentlyViewedStore<S>, RecentlyViewedError> {
        self.config.validate()?;
        Ok(RecentlyViewedStore::from_parts(
            self.storage,
            self.config,
            self.clock,
        ))
    }
}

impl<S: Storage> RecentlyViewedStore<S> {
    pub fn builder(storage: S) -> RecentlyViewedBuilder<S> {
        RecentlyViewedBuilder {
            storage,
            config: RecentlyViewedConfig::default(),
            clock: Box::new(SystemClock),
        }
    }

    /// Open a store with the default config, loading the persisted history.
    pub fn open(storage: S) -> Self {
        let store = Self::deferred(storage);
        store.initialize();
        store
    }

    /// Create a store in the pending state with the default config.
    pub fn deferred(storage: S) -> Self {
        Self::from_parts(storage, RecentlyViewedConfig::default(), Box::new(SystemClock))
    }

    fn from_parts(storage: S, config: RecentlyViewedConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                config,
                clock,
                state: Mutex::new(State::Pending(Vec::new())),
                #[cfg(feature = "emitter")]
                notifier: ChangeNotifier::new(),
            }),
        }
    }

    /// Load the persisted history and replay anything queued while pending.
    ///
    /// Missing or unreadable data yields an empty history. Calling this on a
    /// store that is already loaded does nothing.
    pub fn initialize(&self) {
        let mut state = self.lock_state();
        let intents = match &mut *state {
            State::Ready(_) => {
                tracing::debug!("recently viewed history already initialized");
                return;
            }
            State::Pending(intents) => std::mem::take(intents),
        };

        let mut history = self.load_history();
        if intents.is_empty() {
            *state = State::Ready(history);
            return;
        }

        tracing::debug!(queued = intents.len(), "replaying queued history changes");
        for intent in intents {
            match intent {
                Intent::Add(item) => {
                    history.push(item);
                }
                Intent::Clear => history.clear(),
            }
        }

        if history.is_empty() {
            self.remove_persisted();
        } else {
            self.persist(&history);
        }
        let snapshot = history.items().to_vec();
        *state = State::Ready(history);
        let revision = self.next_revision();
        drop(state);

        self.notify(revision, &snapshot);
    }

    /// Record that the user viewed `candidate`, moving it to the front.
    ///
    /// Fails only for candidates that cannot be stored (blank id, non-finite
    /// price); the history is left untouched in that case.
    pub fn add_item(&self, candidate: ViewedItemInput) -> Result<(), RecentlyViewedError> {
        candidate.validate()?;
        let item = candidate.stamp(self.inner.clock.now_millis());

        let mut state = self.lock_state();
        let history = match &mut *state {
            State::Pending(intents) => {
                tracing::debug!(id = %item.id, "queued view until history is loaded");
                intents.push(Intent::Add(item));
                return Ok(());
            }
            State::Ready(history) => history,
        };

        let id = item.id.clone();
        let evicted = history.push(item);
        for old in &evicted {
            tracing::trace!(id = %old.id, "evicted oldest viewed item");
        }
        tracing::debug!(id = %id, len = history.len(), "recorded view");

        self.persist(history);
        let snapshot = history.items().to_vec();
        let revision = self.next_revision();
        drop(state);

        self.notify(revision, &snapshot);
        Ok(())
    }

    /// Forget the whole history, in memory and in storage.
    pub fn clear_items(&self) {
        let mut state = self.lock_state();
        match &mut *state {
            State::Pending(intents) => {
                intents.push(Intent::Clear);
                return;
            }
            State::Ready(history) => history.clear(),
        }
        self.remove_persisted();
        let revision = self.next_revision();
        drop(state);

        tracing::debug!("cleared recently viewed history");
        self.notify(revision, &[]);
    }

    /// Current history, most recent first. Empty until loaded.
    pub fn items(&self) -> Vec<ViewedItem> {
        match &*self.lock_state() {
            State::Ready(history) => history.items().to_vec(),
            State::Pending(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match &*self.lock_state() {
            State::Ready(history) => history.len(),
            State::Pending(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        match &*self.lock_state() {
            State::Ready(history) => history.items().iter().any(|item| &item.id == id),
            State::Pending(_) => false,
        }
    }

    /// Whether the persisted history has been loaded.
    pub fn is_ready(&self) -> bool {
        matches!(&*self.lock_state(), State::Ready(_))
    }

    pub fn config(&self) -> &RecentlyViewedConfig {
        &self.inner.config
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Register a listener that receives the full history after every change.
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Vec<ViewedItem>) + Send + Sync + 'static,
    {
        self.inner.notifier.on_change(listener)
    }

    #[cfg(feature = "emitter")]
    pub fn remove_listener(&self, id: &str) -> bool {
        self.inner.notifier.remove_listener(id)
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        // State is plain data and every mutation leaves it consistent.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn load_history(&self) -> History {
        let key = &self.inner.config.storage_key;
        let capacity = self.inner.config.max_items;

        let raw = match self.inner.storage.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return History::new(capacity),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to load recently viewed items");
                return History::new(capacity);
            }
        };

        match History::decode(&raw, capacity) {
            Ok(history) => {
                tracing::debug!(key = %key, len = history.len(), "loaded recently viewed items");
                history
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "discarding unreadable recently viewed items"
                );
                History::new(capacity)
            }
        }
    }

    fn persist(&self, history: &History) {
        let key = &self.inner.config.storage_key;
        let result = history
            .encode()
            .map_err(RecentlyViewedError::from)
            .and_then(|json| {
                self.inner
                    .storage
                    .save(key, &json)
                    .map_err(RecentlyViewedError::from)
            });

        if let Err(e) = result {
            tracing::error!(key = %key, error = %e, "failed to store recently viewed items");
        }
    }

    fn remove_persisted(&self) {
        let key = &self.inner.config.storage_key;
        if let Err(e) = self.inner.storage.remove(key) {
            tracing::error!(key = %key, error = %e, "failed to clear recently viewed items");
        }
    }

    /// Must be called with the state lock held so revisions follow mutation order.
    #[cfg(feature = "emitter")]
    fn next_revision(&self) -> u64 {
        self.inner.notifier.next_revision()
    }

    #[cfg(not(feature = "emitter"))]
    fn next_revision(&self) -> u64 {
        0
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, revision: u64, items: &[ViewedItem]) {
        self.inner.notifier.notify(revision, items);
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _revision: u64, _items: &[ViewedItem]) {}
}
