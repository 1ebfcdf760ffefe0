//! Seller Index - Per-seller view partitioned by category
//!
//! Maps seller display name → `CategoryIndex`. Entries are created on the
//! first listing and kept even after they empty out.

use crate::index::CategoryIndex;
use std::collections::HashMap;

/// Seller name → that seller's category index
#[derive(Debug, Clone, Default)]
pub struct SellerIndex {
    index: HashMap<String, CategoryIndex>,
}

impl SellerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category index for a seller, created on first access
    pub fn category_index_for(&mut self, seller_name: &str) -> &mut CategoryIndex {
        if !self.index.contains_key(seller_name) {
            tracing::debug!(seller = %seller_name, "Creating seller index entry");
        }

        self.index
            .entry(seller_name.to_string())
            .or_default()
    }

    /// Category index for a seller, without creating one
    pub fn get(&self, seller_name: &str) -> Option<&CategoryIndex> {
        self.index.get(seller_name)
    }

    /// Check if a seller has an entry (possibly empty)
    pub fn contains(&self, seller_name: &str) -> bool {
        self.index.contains_key(seller_name)
    }

    /// All known seller names
    pub fn sellers(&self) -> Vec<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    /// Number of seller entries
    pub fn seller_count(&self) -> usize {
        self.index.len()
    }

    /// Drop every seller entry
    pub fn clear(&mut self) {
        self.index.clear();
    }
}
