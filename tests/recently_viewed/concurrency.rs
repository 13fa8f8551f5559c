use std::collections::HashSet;
use std::thread;

use recently_viewed::{InMemoryStorage, RecentlyViewedStore, MAX_ITEMS};

use crate::support::listing;

#[test]
fn concurrent_views_keep_invariants() {
    let storage = InMemoryStorage::new();
    let store = RecentlyViewedStore::open(storage.clone());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for n in 0..50 {
                    store.add_item(listing((worker * 50 + n) % 23)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let items = store.items();
    assert_eq!(items.len(), MAX_ITEMS);

    let unique: HashSet<_> = items.iter().map(|item| item.id.clone()).collect();
    assert_eq!(unique.len(), items.len());
    assert!(items.windows(2).all(|w| w[0].viewed_at >= w[1].viewed_at));

    // the last write matches the final in-memory state
    let reopened = RecentlyViewedStore::open(storage);
    assert_eq!(reopened.items(), items);
}

#[test]
fn readers_see_consistent_snapshots_while_writing() {
    let store = RecentlyViewedStore::open(InMemoryStorage::new());

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for n in 0..500 {
                store.add_item(listing(n % 30)).unwrap();
                if n % 97 == 0 {
                    store.clear_items();
                }
            }
        })
    };

    for _ in 0..500 {
        let items = store.items();
        assert!(items.len() <= MAX_ITEMS);
        let unique: HashSet<_> = items.iter().map(|item| item.id.clone()).collect();
        assert_eq!(unique.len(), items.len());
    }
    writer.join().unwrap();
}
