//! History - the ordering, uniqueness and capacity policy, free of storage.

use std::collections::HashSet;

use serde::de::Error as _;
use serde_json::Value;

use crate::item::ViewedItem;

/// Ordered, deduplicated, bounded list of viewed items, most recent first.
///
/// Invariants, upheld by every constructor and mutator:
/// - no two entries share an id
/// - entries are sorted by `viewed_at`, descending
/// - `len() <= capacity`
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    items: Vec<ViewedItem>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a history from arbitrary entries, restoring the invariants:
    /// stable sort by recency, keep the most recent entry per id, truncate.
    pub fn normalized(mut items: Vec<ViewedItem>, capacity: usize) -> Self {
        items.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));

        let mut seen = HashSet::with_capacity(items.len());
        items.retain(|item| seen.insert(item.id.clone()));
        items.truncate(capacity);

        Self { items, capacity }
    }

    /// Decode a persisted history.
    ///
    /// The payload must be a JSON array. Elements that are not valid entries
    /// are skipped rather than failing the whole load.
    pub fn decode(raw: &str, capacity: usize) -> Result<Self, serde_json::Error> {
        let values = match serde_json::from_str::<Value>(raw)? {
            Value::Array(values) => values,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected a JSON array, found {}",
                    json_kind(&other)
                )))
            }
        };

        let total = values.len();
        let items: Vec<ViewedItem> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed history entry");
                    None
                }
            })
            .collect();

        let history = Self::normalized(items, capacity);
        if history.len() != total {
            tracing::debug!(
                stored = total,
                kept = history.len(),
                "normalized persisted history"
            );
        }
        Ok(history)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Put `item` at the front, replacing any entry with the same id and
    /// evicting the oldest entries past capacity. Returns the evicted entries.
    ///
    /// A `viewed_at` older than the current front entry is raised to match it,
    /// so a clock stepping backwards cannot break the ordering.
    pub fn push(&mut self, mut item: ViewedItem) -> Vec<ViewedItem> {
        if let Some(front) = self.items.first() {
            item.viewed_at = item.viewed_at.max(front.viewed_at);
        }

        self.items.retain(|existing| existing.id != item.id);
        self.items.insert(0, item);

        if self.items.len() > self.capacity {
            self.items.split_off(self.capacity)
        } else {
            Vec::new()
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[ViewedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
