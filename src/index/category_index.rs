//! Category Index - One slot array of store indices per category
//!
//! Every category gets its (empty) slot array at construction, so lookups
//! for a known category never miss.
//!
//! # Design Notes
//! - `size()` and `has_entries()` read raw slot counts, tombstones included.
//!   A category that had listings which were all removed still reports
//!   entries; `live_len()` gives the exact count.

use crate::index::SlotArray;
use crate::storage::Category;
use std::collections::HashMap;

/// Category → store indices
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    index: HashMap<Category, SlotArray<usize>>,
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryIndex {
    /// Create an index with an empty entry for every category
    pub fn new() -> Self {
        let index = Category::all()
            .iter()
            .map(|&category| (category, SlotArray::new()))
            .collect();

        Self { index }
    }

    /// Slot array for a category, created if somehow missing
    pub fn index_array_mut(&mut self, category: Category) -> &mut SlotArray<usize> {
        self.index.entry(category).or_default()
    }

    /// Slot array for a category
    pub fn index_array(&self, category: Category) -> Option<&SlotArray<usize>> {
        self.index.get(&category)
    }

    /// Record a store index under a category; returns its slot
    pub fn insert(&mut self, category: Category, store_index: usize) -> usize {
        self.index_array_mut(category).push(store_index)
    }

    /// Drop a store index from a category; returns the freed slot
    pub fn remove(&mut self, category: Category, store_index: usize) -> Option<usize> {
        self.index_array_mut(category).remove_by_value(&store_index)
    }

    /// True if any category has ever had a slot allocated
    pub fn has_entries(&self) -> bool {
        Category::all()
            .iter()
            .any(|c| self.index.get(c).map(|a| a.len() != 0).unwrap_or(false))
    }

    /// Sum of slot counts across categories, tombstones included
    pub fn size(&self) -> usize {
        Category::all()
            .iter()
            .filter_map(|c| self.index.get(c))
            .map(SlotArray::len)
            .sum()
    }

    /// Number of live store indices across categories
    pub fn live_len(&self) -> usize {
        self.index.values().map(SlotArray::live_len).sum()
    }

    /// Live store indices, category by category in `Category::ALL` order
    pub fn iter_store_indices(&self) -> impl Iterator<Item = usize> + '_ {
        Category::all()
            .iter()
            .filter_map(|c| self.index.get(c))
            .flat_map(|array| array.iter_live().map(|(_, &store_index)| store_index))
    }

    /// Empty every category, keeping the entries
    pub fn clear(&mut self) {
        for array in self.index.values_mut() {
            array.clear();
        }
    }
}
