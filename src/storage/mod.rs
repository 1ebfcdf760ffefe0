//! Auction House Storage
//!
//! This module owns the listing records themselves:
//!
//! - **types**: Core data structures (Listing, Trader, Category)
//! - **listing_store**: Primary store addressed by stable store index
//! - **snapshot**: JSON dump/restore used across restarts
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   Listing → ListingStore (store index) → CategoryIndex + SellerIndex
//!
//! Dump Path:
//!   ListingStore → Snapshot (JSON, store index per listing) → clear
//!
//! Load Path:
//!   Snapshot → ListingStore::restore (same indices) → indexes rebuilt
//! ```

pub mod error;
pub mod listing_store;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use listing_store::ListingStore;
pub use snapshot::{Snapshot, StoredListing, SNAPSHOT_VERSION};
pub use types::{Category, ItemHandle, Listing, ListingDuration, ListingId, Trader};
