mod clock;
mod config;
#[cfg(feature = "emitter")]
mod emitter;
mod error;
mod item;
mod storage;
mod store;
mod strip;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RecentlyViewedConfig, MAX_ITEMS, STORAGE_KEY};
#[cfg(feature = "emitter")]
pub use emitter::{ChangeNotifier, ListenerId, CHANGED_EVENT};
pub use error::RecentlyViewedError;
pub use item::{ItemId, ViewedItem, ViewedItemInput};
pub use storage::{FileStorage, InMemoryStorage, Storage, StorageError};
pub use store::{History, RecentlyViewedBuilder, RecentlyViewedStore};
pub use strip::{price_label, RecentlyViewedStrip, StripCard, STRIP_TITLE};
