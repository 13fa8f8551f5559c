//! Store - the session's recently-viewed history and its persistence.
//!
//! ## Example
//!
//! ```ignore
//! use recently_viewed::{FileStorage, RecentlyViewedStore, ViewedItemInput};
//!
//! let store = RecentlyViewedStore::open(FileStorage::in_data_dir());
//!
//! // listing detail page
//! let barn = ViewedItemInput::new(42, "Lakeside Barn", 4500.0, "/img/42.jpg", "/listing/42");
//! store.add_item(barn)?;
//!
//! // strip under the page
//! for item in store.items() {
//!     println!("{} {}", item.name, item.path);
//! }
//! ```

mod history;
mod recently_viewed;

pub use history::History;
pub use recently_viewed::{RecentlyViewedBuilder, RecentlyViewedStore};
