//! Auction House Query Engine
//!
//! - **options**: Query filters, pagination and sale request/response types
//! - **service**: `AuctionService`, which owns the store and indexes and
//!   resolves queries against them
//!
//! # Example
//!
//! ```rust
//! use auctionhouse::query::{AuctionService, BuyInformation, QueryOptions, SaleStatus};
//! use auctionhouse::settings::Settings;
//! use auctionhouse::storage::{Category, ItemHandle, Listing, ListingDuration, Trader};
//! use chrono::Utc;
//!
//! let mut market = AuctionService::new(Settings::default());
//!
//! let index = market.insert_listing(Listing::from_duration(
//!     ItemHandle::new("minecraft:diamond_sword", 1),
//!     100,
//!     ListingDuration::hours(1),
//!     Trader::new("Curtidor", "123"),
//!     Category::Tools,
//!     Utc::now(),
//! ).unwrap());
//!
//! let tools = market.query_listing(Some(&QueryOptions::new().category(Category::Tools)));
//! assert_eq!(tools.len(), 1);
//!
//! let sale = market.buy_listing(&BuyInformation::new(Trader::new("bob", "7"), 150, index));
//! assert_eq!(sale.reason, SaleStatus::Sold);
//! ```

pub mod options;
pub mod service;

pub use options::{
    BuyInformation, NormalizedQuery, PageOptions, QueryOptions, SaleResponse, SaleStatus,
};
pub use service::AuctionService;
