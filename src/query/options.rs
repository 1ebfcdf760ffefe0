//! Query and sale request types
//!
//! `QueryOptions` is what callers build; every field is optional and the
//! service fills the gaps (see `NormalizedQuery`).

use crate::storage::{Category, Trader};
use serde::{Deserialize, Serialize};

/// Pagination control for listing queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOptions {
    /// Position to start from (default 0)
    pub offset: Option<usize>,
    /// Page size (default: the configured page size)
    pub max_listings: Option<usize>,
}

/// Search filters for querying listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Only listings in this category
    pub category: Option<Category>,
    /// Only listings by this seller (by display name)
    pub seller_name: Option<String>,
    /// Only listings priced at or below this amount
    pub max_price: Option<u64>,
    #[serde(default)]
    pub page: PageOptions,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: filter by category
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder method: filter by seller name
    pub fn seller(mut self, name: impl Into<String>) -> Self {
        self.seller_name = Some(name.into());
        self
    }

    /// Builder method: cap the price
    pub fn max_price(mut self, price: u64) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Builder method: set the page offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.page.offset = Some(offset);
        self
    }

    /// Builder method: set the page size
    pub fn limit(mut self, max_listings: usize) -> Self {
        self.page.max_listings = Some(max_listings);
        self
    }

    /// Resolve defaults. An empty seller name means "no seller filter".
    pub fn normalize(&self, default_page_size: usize) -> NormalizedQuery {
        NormalizedQuery {
            category: self.category,
            seller_name: self.seller_name.clone().unwrap_or_default(),
            max_price: self.max_price,
            offset: self.page.offset.unwrap_or(0),
            limit: self.page.max_listings.unwrap_or(default_page_size),
        }
    }
}

/// Query with every default filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub category: Option<Category>,
    pub seller_name: String,
    pub max_price: Option<u64>,
    pub offset: usize,
    pub limit: usize,
}

impl NormalizedQuery {
    /// True if a secondary index has to be consulted
    pub fn has_index_filter(&self) -> bool {
        self.category.is_some() || !self.seller_name.is_empty()
    }
}

/// Payload for a purchase attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyInformation {
    /// Who is buying
    pub buyer: Trader,
    /// Coins offered
    pub amount: u64,
    /// Store index of the listing
    pub index: usize,
}

impl BuyInformation {
    pub fn new(buyer: Trader, amount: u64, index: usize) -> Self {
        Self {
            buyer,
            amount,
            index,
        }
    }
}

/// Outcome of a purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Sold,
    NotEnoughFunds,
    AlreadyBought,
    InvalidListing,
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleStatus::Sold => write!(f, "sold"),
            SaleStatus::NotEnoughFunds => write!(f, "not enough funds"),
            SaleStatus::AlreadyBought => write!(f, "already bought"),
            SaleStatus::InvalidListing => write!(f, "invalid listing"),
        }
    }
}

/// Result of `buy_listing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleResponse {
    pub success: bool,
    pub reason: SaleStatus,
}

impl SaleResponse {
    pub fn sold() -> Self {
        Self {
            success: true,
            reason: SaleStatus::Sold,
        }
    }

    pub fn rejected(reason: SaleStatus) -> Self {
        Self {
            success: false,
            reason,
        }
    }
}
