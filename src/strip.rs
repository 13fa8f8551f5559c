//! Display model for the horizontal "Recently Viewed" strip.

use serde::Serialize;

use crate::item::{ItemId, ViewedItem};

pub const STRIP_TITLE: &str = "Recently Viewed";

/// One thumbnail link in the strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripCard {
    pub id: ItemId,
    pub name: String,
    pub image: String,
    pub href: String,
    pub price_label: String,
}

impl From<&ViewedItem> for StripCard {
    fn from(item: &ViewedItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            href: item.path.clone(),
            price_label: price_label(item.price),
        }
    }
}

/// The strip as rendered under a page: a title and cards in history order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentlyViewedStrip {
    pub title: &'static str,
    pub cards: Vec<StripCard>,
}

impl RecentlyViewedStrip {
    /// Build the strip, or `None` when there is nothing to show.
    pub fn from_items(items: &[ViewedItem]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            title: STRIP_TITLE,
            cards: items.iter().map(StripCard::from).collect(),
        })
    }

    /// Hide the entry currently on screen. Returns `None` if nothing is left.
    pub fn excluding(mut self, id: &ItemId) -> Option<Self> {
        self.cards.retain(|card| &card.id != id);
        if self.cards.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// `$` followed by the price as a browser prints a number: whole amounts have
/// no decimals (`$100`), fractional ones keep theirs (`$99.5`), negative zero
/// is `$0`, and magnitudes from 1e21 up or below 1e-6 use exponent form
/// (`$1e+21`, `$1e-7`).
pub fn price_label(price: f64) -> String {
    if price == 0.0 {
        return "$0".to_string();
    }
    let magnitude = price.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", price);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("${}e+{}", mantissa, power)
            }
            _ => format!("${}", exp),
        };
    }
    format!("${}", price)
}
