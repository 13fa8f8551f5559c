use recently_viewed::{InMemoryStorage, ManualClock, RecentlyViewedStore, Storage, STORAGE_KEY};
use serde_json::json;

use crate::support::{ids, listing, FlakyStorage, START};

fn deferred<S: Storage>(storage: S) -> (RecentlyViewedStore<S>, ManualClock) {
    let clock = ManualClock::new(START);
    let store = RecentlyViewedStore::builder(storage)
        .clock(clock.clone())
        .deferred()
        .unwrap();
    (store, clock)
}

fn seeded() -> InMemoryStorage {
    let persisted = json!([
        {"id": 1, "name": "Item 1", "price": 100, "image": "", "path": "/test/1",
         "viewedAt": START - 2_000},
        {"id": 2, "name": "Item 2", "price": 200, "image": "", "path": "/test/2",
         "viewedAt": START - 3_000},
    ]);
    InMemoryStorage::with_entry(STORAGE_KEY, persisted.to_string())
}

#[test]
fn pending_store_reads_empty_and_touches_no_storage() {
    let storage = FlakyStorage::new();
    let (store, _) = deferred(storage.clone());

    assert!(!store.is_ready());
    assert!(store.items().is_empty());

    store.add_item(listing(1)).unwrap();
    store.clear_items();

    assert!(store.items().is_empty());
    assert_eq!(storage.loads(), 0);
    assert_eq!(storage.saves(), 0);
    assert_eq!(storage.removes(), 0);
}

#[test]
fn queued_views_replay_on_top_of_loaded_history() {
    let storage = seeded();
    let (store, clock) = deferred(storage.clone());

    store.add_item(listing(3)).unwrap();
    clock.advance(1_000);
    store.add_item(listing(1)).unwrap();

    store.initialize();

    assert!(store.is_ready());
    assert_eq!(ids(&store.items()), vec!["1", "3", "2"]);

    let reopened = RecentlyViewedStore::open(storage);
    assert_eq!(reopened.items(), store.items());
}

#[test]
fn queued_clear_applies_in_order() {
    let storage = seeded();
    let (store, clock) = deferred(storage.clone());

    store.add_item(listing(5)).unwrap();
    store.clear_items();
    clock.advance(1_000);
    store.add_item(listing(6)).unwrap();

    store.initialize();

    assert_eq!(ids(&store.items()), vec!["6"]);
    assert_eq!(RecentlyViewedStore::open(storage).items().len(), 1);
}

#[test]
fn queued_clear_last_removes_persisted_key() {
    let storage = seeded();
    let (store, _) = deferred(storage.clone());

    store.add_item(listing(5)).unwrap();
    store.clear_items();
    store.initialize();

    assert!(store.items().is_empty());
    assert!(!storage.contains_key(STORAGE_KEY));
}

#[test]
fn initialize_without_queued_changes_does_not_write() {
    let storage = FlakyStorage::new();
    let (store, _) = deferred(storage.clone());

    store.initialize();

    assert!(store.is_ready());
    assert_eq!(storage.loads(), 1);
    assert_eq!(storage.saves(), 0);
    assert_eq!(storage.removes(), 0);
}

#[test]
fn views_stamped_at_call_time_not_replay_time() {
    let (store, clock) = deferred(InMemoryStorage::new());

    store.add_item(listing(1)).unwrap();
    clock.advance(60_000);
    store.initialize();

    assert_eq!(store.items()[0].viewed_at, START);
}

#[test]
fn invalid_candidate_rejected_while_pending() {
    let (store, _) = deferred(InMemoryStorage::new());

    assert!(store
        .add_item(recently_viewed::ViewedItemInput::new(1, "x", f64::NAN, "", ""))
        .is_err());

    store.initialize();
    assert!(store.items().is_empty());
}

#[test]
fn second_initialize_is_a_no_op() {
    let storage = FlakyStorage::new();
    let (store, _) = deferred(storage.clone());

    store.initialize();
    store.add_item(listing(1)).unwrap();
    store.initialize();

    assert_eq!(storage.loads(), 1);
    assert_eq!(store.len(), 1);
}
