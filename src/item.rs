use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RecentlyViewedError;

/// Catalog identifier of a viewed entry.
///
/// Listings use numeric ids, marketplace products use string ids; both are
/// accepted. Equality is strict: `Int(1)` and `Text("1")` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{}", id),
            ItemId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<i32> for ItemId {
    fn from(id: i32) -> Self {
        ItemId::Int(id.into())
    }
}

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        ItemId::Int(id.into())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId::Text(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

/// One entry of the history: what was viewed, plus what is needed to render a
/// thumbnail linking back to it.
///
/// Serialized as `{id, name, price, image, path, viewedAt}`. Entries written by
/// older clients used `timestamp` for the view time, which is still accepted;
/// entries without any view time load as `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedItem {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub path: String,
    #[serde(alias = "timestamp", default)]
    pub viewed_at: i64,
}

impl ViewedItem {
    /// The candidate fields of this entry, without the view time.
    pub fn to_input(&self) -> ViewedItemInput {
        ViewedItemInput {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            path: self.path.clone(),
        }
    }
}

/// A candidate entry as handed in by a detail page, before it is stamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewedItemInput {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub path: String,
}

impl ViewedItemInput {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        price: f64,
        image: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
            path: path.into(),
        }
    }

    /// Reject candidates the history cannot hold.
    ///
    /// Names, images and paths may be empty. A blank string id cannot identify
    /// anything, and a non-finite price has no JSON representation.
    pub fn validate(&self) -> Result<(), RecentlyViewedError> {
        if let ItemId::Text(id) = &self.id {
            if id.trim().is_empty() {
                return Err(RecentlyViewedError::InvalidArgument(
                    "item id must not be empty".into(),
                ));
            }
        }
        if !self.price.is_finite() {
            return Err(RecentlyViewedError::InvalidArgument(format!(
                "price of item {} must be a finite number, got {}",
                self.id, self.price
            )));
        }
        Ok(())
    }

    /// Stamp the candidate with its view time.
    pub fn stamp(self, viewed_at: i64) -> ViewedItem {
        ViewedItem {
            id: self.id,
            name: self.name,
            price: self.price,
            image: self.image,
            path: self.path,
            viewed_at,
        }
    }
}
