use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use recently_viewed::{
    InMemoryStorage, ManualClock, RecentlyViewedStore, Storage, StorageError, ViewedItem,
    ViewedItemInput,
};

pub const START: i64 = 1_700_000_000_000;

static TRACING: Once = Once::new();

/// Route store logs to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn listing(id: i64) -> ViewedItemInput {
    ViewedItemInput::new(
        id,
        format!("Item {}", id),
        100.0 * id as f64,
        format!("/test{}.jpg", id),
        format!("/test/{}", id),
    )
}

pub fn product(id: &str) -> ViewedItemInput {
    ViewedItemInput::new(id, "Test Item", 100.0, "/test.jpg", format!("/marketplace/{}", id))
}

pub fn ids(items: &[ViewedItem]) -> Vec<String> {
    items.iter().map(|item| item.id.to_string()).collect()
}

/// Store over `storage` whose clock advances one second per view.
pub struct Session<S> {
    pub store: RecentlyViewedStore<S>,
    pub clock: ManualClock,
}

impl<S: Storage> Session<S> {
    pub fn open(storage: S) -> Self {
        init_tracing();
        let clock = ManualClock::new(START);
        let store = RecentlyViewedStore::builder(storage)
            .clock(clock.clone())
            .open()
            .unwrap();
        Self { store, clock }
    }

    pub fn view(&self, item: ViewedItemInput) {
        self.store.add_item(item).unwrap();
        self.clock.advance(1_000);
    }
}

pub fn session() -> Session<InMemoryStorage> {
    Session::open(InMemoryStorage::new())
}

/// Storage wrapper that can be told to fail, and counts calls.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    pub inner: InMemoryStorage,
    pub fail_load: Arc<AtomicBool>,
    pub fail_save: Arc<AtomicBool>,
    pub fail_remove: Arc<AtomicBool>,
    pub loads: Arc<AtomicUsize>,
    pub saves: Arc<AtomicUsize>,
    pub removes: Arc<AtomicUsize>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        let storage = Self::new();
        storage.fail_save.store(true, Ordering::SeqCst);
        storage.fail_remove.store(true, Ordering::SeqCst);
        storage
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Storage for FlakyStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage disabled".into()));
        }
        self.inner.load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        self.inner.save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage disabled".into()));
        }
        self.inner.remove(key)
    }
}
