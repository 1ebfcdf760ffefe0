//! Auction House Index Structures
//!
//! Secondary indexes over the listing store:
//!
//! - **SlotArray**: Sparse container with tombstones and a free-list
//! - **CategoryIndex**: Category → store indices
//! - **SellerIndex**: Seller name → that seller's `CategoryIndex`
//!
//! # Architecture
//!
//! ```text
//! insert(listing in Tools by "bob") → store index 7
//!        ↓
//! CategoryIndex[Tools].push(7)
//! SellerIndex["bob"][Tools].push(7)
//!
//! query(category = Tools) → CategoryIndex[Tools] → [3, 7] → ListingStore
//! ```
//!
//! Indexes hold store indices only, never the listings themselves.

mod category_index;
mod seller_index;
mod slot_array;

pub use category_index::CategoryIndex;
pub use seller_index::SellerIndex;
pub use slot_array::SlotArray;

/// Statistics about index usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Live listings in the primary store
    pub listings: usize,
    /// Live entries in the global category index
    pub category_entries: usize,
    /// Slots in the global category index, tombstones included
    pub category_slots: usize,
    /// Number of seller entries
    pub sellers: usize,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} listings, {} category entries ({} slots), {} sellers",
            self.listings, self.category_entries, self.category_slots, self.sellers
        )
    }
}
