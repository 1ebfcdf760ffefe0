//! Listing Store - Primary store of listing records
//!
//! Single owner of every `Listing`. Everything else refers to a record by
//! its store index.
//!
//! # Design Notes
//! - Backed by a `SlotArray`, so a store index stays valid until that
//!   record is removed; unrelated inserts and removals never move it
//! - Freed indices are handed out again, most recently freed first
//! - `listing_added` fires after every successful `add`

use crate::event::Event;
use crate::index::SlotArray;
use crate::storage::types::{Listing, ListingId};

/// Primary record store addressed by stable store index
#[derive(Debug, Default)]
pub struct ListingStore {
    /// Store index → listing
    listings: SlotArray<Listing>,
    /// Fired with each newly stored listing
    listing_added: Event<Listing>,
}

impl ListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a listing and return its store index
    pub fn add(&mut self, listing: Listing) -> usize {
        let index = self.listings.push(listing);

        if let Some(stored) = self.listings.get(index) {
            self.listing_added.invoke(stored);
        }

        index
    }

    /// Remove a listing, located by identity.
    ///
    /// Returns the store index it occupied, or `None` if it is not stored.
    pub fn remove(&mut self, listing: &Listing) -> Option<usize> {
        let index = self.index_of(listing.id)?;
        self.listings.remove_at(index);
        Some(index)
    }

    /// Remove whatever is stored at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<Listing> {
        self.listings.remove_at(index)
    }

    /// Find the store index of a listing by identity
    pub fn index_of(&self, id: ListingId) -> Option<usize> {
        self.listings
            .iter_live()
            .find(|(_, listing)| listing.id == id)
            .map(|(index, _)| index)
    }

    /// Bounds-checked lookup
    pub fn get(&self, index: usize) -> Option<&Listing> {
        self.listings.get(index)
    }

    /// Bounds-checked mutable lookup
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Listing> {
        self.listings.get_mut(index)
    }

    /// Listings stored in slots `[start, start + count)`, skipping holes.
    ///
    /// Empty when `count` is zero or `start` is past the last slot.
    pub fn slice(&self, start: usize, count: usize) -> Vec<&Listing> {
        self.slice_indexed(start, count)
            .into_iter()
            .map(|(_, listing)| listing)
            .collect()
    }

    /// Same window as `slice`, paired with each listing's store index
    pub fn slice_indexed(&self, start: usize, count: usize) -> Vec<(usize, &Listing)> {
        if count == 0 || start >= self.listings.len() {
            return Vec::new();
        }

        let end = start.saturating_add(count).min(self.listings.len());
        self.listings.values()[start..end]
            .iter()
            .enumerate()
            .filter_map(|(offset, slot)| slot.as_ref().map(|l| (start + offset, l)))
            .collect()
    }

    /// Iterate `(store index, listing)` pairs in store order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Listing)> {
        self.listings.iter_live()
    }

    /// Remove and return every listing, in store order
    pub fn drain(&mut self) -> Vec<Listing> {
        let indices: Vec<usize> = self.listings.iter_live().map(|(i, _)| i).collect();
        let drained = indices
            .into_iter()
            .filter_map(|i| self.listings.remove_at(i))
            .collect();
        self.listings.clear();
        drained
    }

    /// Replace the contents with listings at known store indices.
    ///
    /// Indices left unoccupied become holes, reused like any freed slot.
    /// Does not fire `listing_added`. On a duplicate index the store is left
    /// unchanged and the index is returned as the error.
    pub fn restore(&mut self, entries: Vec<(usize, Listing)>) -> Result<(), usize> {
        self.listings = SlotArray::from_entries(entries)?;
        Ok(())
    }

    /// Drop every listing. Secondary indexes are not touched.
    pub fn clear(&mut self) {
        self.listings.clear();
    }

    /// Number of live listings
    pub fn len(&self) -> usize {
        self.listings.live_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total slots including holes; the exclusive upper bound of store indices
    pub fn capacity_slots(&self) -> usize {
        self.listings.len()
    }

    /// Subscription point for the "item added" notification
    pub fn listing_added(&mut self) -> &mut Event<Listing> {
        &mut self.listing_added
    }
}
