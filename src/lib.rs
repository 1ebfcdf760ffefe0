//! # Auction House
//!
//! In-memory, multi-index listing store for an auction house: listings are
//! inserted, looked up by store index, category or seller, bought, removed,
//! and queried with pagination and a price cap.
//!
//! ## Modules
//!
//! - [`storage`]: Listing model, primary store and snapshot persistence
//! - [`index`]: Slot array plus category and seller indexes
//! - [`query`]: `AuctionService` and its query/sale types
//! - [`event`]: Prioritized "listing added" notification
//! - [`settings`]: Operator settings (page size, currency scoreboard)
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use auctionhouse::{AuctionService, Category, ItemHandle, Listing, QueryOptions, Settings, Trader};
//! use chrono::{Duration, Utc};
//!
//! let mut market = AuctionService::new(Settings::default());
//!
//! market.insert_listing(Listing::new(
//!     ItemHandle::new("minecraft:iron_chestplate", 1),
//!     40,
//!     Utc::now() + Duration::hours(2),
//!     Trader::new("MrBreezy", "42"),
//!     Category::Armor,
//! ));
//!
//! let cheap_armor = market.query_listing(Some(
//!     &QueryOptions::new().category(Category::Armor).max_price(50),
//! ));
//! assert_eq!(cheap_armor.len(), 1);
//! ```

pub mod config;
pub mod event;
pub mod index;
pub mod query;
pub mod settings;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    Category, ItemHandle, Listing, ListingDuration, ListingId, ListingStore, Snapshot,
    StorageError, StorageResult, StoredListing, Trader,
};

pub use index::{CategoryIndex, IndexStats, SellerIndex, SlotArray};

pub use query::{
    AuctionService, BuyInformation, PageOptions, QueryOptions, SaleResponse, SaleStatus,
};

pub use event::{Event, ListenerId};

pub use settings::{PageSizeSource, Settings, SettingsError};

pub use config::{Config, ConfigError, LoggingConfig, MarketConfig, PersistenceConfig};
