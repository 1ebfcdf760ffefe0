//! Core data types for the auction house listing store
//!
//! This module defines the fundamental types used throughout the storage layer:
//! - `Listing`: One item offered for sale
//! - `Trader`: Display name plus stable id of a buyer or seller
//! - `ItemHandle`: The payload being sold (opaque to the indexes)
//! - `Category`: Closed set of listing categories

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a listing, assigned once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(Uuid);

impl ListingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category a listing is filed under
///
/// "No category" is not a variant: queries express it as `None`, so it
/// can never end up in an index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Armor,
    Tools,
    Items,
    Blocks,
}

impl Category {
    /// Every category, in index iteration order
    pub const ALL: [Category; 4] = [
        Category::Armor,
        Category::Tools,
        Category::Items,
        Category::Blocks,
    ];

    /// Get all categories for iteration
    pub fn all() -> &'static [Category] {
        &Self::ALL
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Armor => write!(f, "armor"),
            Category::Tools => write!(f, "tools"),
            Category::Items => write!(f, "items"),
            Category::Blocks => write!(f, "blocks"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "armor" => Ok(Category::Armor),
            "tools" => Ok(Category::Tools),
            "items" => Ok(Category::Items),
            "blocks" => Ok(Category::Blocks),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// A market participant (seller or buyer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trader {
    /// Display name (key of the seller index)
    pub name: String,
    /// Stable player id
    pub id: String,
}

impl Trader {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// The goods behind a listing. The store never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemHandle {
    /// Item type, e.g. "minecraft:diamond_sword"
    pub type_id: String,
    /// Stack size
    pub amount: u32,
}

impl ItemHandle {
    pub fn new(type_id: impl Into<String>, amount: u32) -> Self {
        Self {
            type_id: type_id.into(),
            amount,
        }
    }
}

/// Relative lifetime of a new listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingDuration {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl ListingDuration {
    pub fn hours(hours: i64) -> Self {
        Self {
            hours,
            ..Default::default()
        }
    }

    pub fn minutes(minutes: i64) -> Self {
        Self {
            minutes,
            ..Default::default()
        }
    }

    /// Total length, or `None` if it does not fit a `chrono::Duration`
    pub fn to_duration(self) -> Option<Duration> {
        Duration::try_days(self.days)?
            .checked_add(&Duration::try_hours(self.hours)?)?
            .checked_add(&Duration::try_minutes(self.minutes)?)?
            .checked_add(&Duration::try_seconds(self.seconds)?)
    }
}

/// One item offered for sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Identity used to locate the record on removal
    pub id: ListingId,
    /// What is being sold
    pub item: ItemHandle,
    /// Asking price in coins
    pub price: u64,
    /// When the listing stops being valid
    pub expires_at: DateTime<Utc>,
    /// Who listed it
    pub seller: Trader,
    /// Category it is indexed under
    pub category: Category,
    /// Set once a purchase completes; the record stays indexed
    #[serde(default)]
    pub sold: bool,
}

impl Listing {
    /// Create a listing with an absolute expiry
    pub fn new(
        item: ItemHandle,
        price: u64,
        expires_at: DateTime<Utc>,
        seller: Trader,
        category: Category,
    ) -> Self {
        Self {
            id: ListingId::new(),
            item,
            price,
            expires_at,
            seller,
            category,
            sold: false,
        }
    }

    /// Create a listing that expires `duration` after `now`.
    ///
    /// Returns `None` if the expiry falls outside the representable range.
    pub fn from_duration(
        item: ItemHandle,
        price: u64,
        duration: ListingDuration,
        seller: Trader,
        category: Category,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_at = now.checked_add_signed(duration.to_duration()?)?;
        Some(Self::new(item, price, expires_at, seller, category))
    }

    /// Seller display name
    pub fn seller_name(&self) -> &str {
        &self.seller.name
    }

    /// Seller stable id
    pub fn seller_id(&self) -> &str {
        &self.seller.id
    }

    /// Check whether the listing has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Remaining lifetime as "0d 1h 23m 5s", clamped at zero
    pub fn time_remaining(&self, now: DateTime<Utc>) -> String {
        let secs_left = (self.expires_at - now).num_seconds().max(0);

        let d = secs_left / 86_400;
        let h = (secs_left % 86_400) / 3_600;
        let m = (secs_left % 3_600) / 60;
        let s = secs_left % 60;

        format!("{}d {}h {}m {}s", d, h, m, s)
    }
}
