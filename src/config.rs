use serde::Deserialize;

use crate::error::RecentlyViewedError;

/// Storage key the history is persisted under.
pub const STORAGE_KEY: &str = "recently_viewed";

/// Maximum number of entries kept in the history.
pub const MAX_ITEMS: usize = 10;

/// Settings for a [`RecentlyViewedStore`](crate::RecentlyViewedStore).
///
/// Deserializable so hosts can keep it next to the rest of their settings;
/// missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecentlyViewedConfig {
    pub storage_key: String,
    pub max_items: usize,
}

impl Default for RecentlyViewedConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            max_items: MAX_ITEMS,
        }
    }
}

impl RecentlyViewedConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn validate(&self) -> Result<(), RecentlyViewedError> {
        if self.storage_key.is_empty() {
            return Err(RecentlyViewedError::InvalidConfig(
                "storage_key must not be empty".into(),
            ));
        }
        if self.max_items == 0 {
            return Err(RecentlyViewedError::InvalidConfig(
                "max_items must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
