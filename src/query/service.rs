//! Auction Service - Coordinates the listing store and its indexes
//!
//! Owns the primary `ListingStore`, the global `CategoryIndex` and the
//! per-seller `SellerIndex`, and keeps them consistent across inserts and
//! removals.
//!
//! # Query Resolution
//!
//! ```text
//! Query: "tools by bob, at most 100 coins"
//!
//! 1. Normalize: fill offset/limit/defaults
//! 2. Gather: CategoryIndex[tools][offset..] ∪ SellerIndex[bob]
//!    → candidate store indices, first-seen order, capped at limit
//! 3. Resolve: store index → listing (stale indices dropped)
//!    (no category/seller filter → plain store slice instead)
//! 4. Filter: price <= 100
//! ```
//!
//! Results are not sorted by price, expiry or insertion time.

use crate::event::Event;
use crate::index::{CategoryIndex, IndexStats, SellerIndex};
use crate::query::options::{BuyInformation, NormalizedQuery, QueryOptions, SaleResponse, SaleStatus};
use crate::settings::{PageSizeSource, Settings};
use crate::storage::{Category, Listing, ListingStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The market: listing store plus category and seller indexes
#[derive(Debug)]
pub struct AuctionService<S = Settings> {
    /// Primary store, single owner of every listing
    store: ListingStore,
    /// Category → store indices, across all sellers
    categories: CategoryIndex,
    /// Seller → category → store indices
    sellers: SellerIndex,
    /// Supplies the default page size
    settings: S,
}

impl Default for AuctionService<Settings> {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl<S: PageSizeSource> AuctionService<S> {
    pub fn new(settings: S) -> Self {
        Self {
            store: ListingStore::new(),
            categories: CategoryIndex::new(),
            sellers: SellerIndex::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    // ==================== Write Methods ====================

    /// Store a listing and index it by category and seller.
    ///
    /// Returns the store index.
    pub fn insert_listing(&mut self, listing: Listing) -> usize {
        let category = listing.category;
        let seller = listing.seller.name.clone();

        let index = self.store.add(listing);

        self.categories.insert(category, index);
        self.sellers
            .category_index_for(&seller)
            .insert(category, index);

        tracing::debug!(store_index = index, %category, seller = %seller, "Listing inserted");
        index
    }

    /// Remove a listing (located by identity) and unindex it.
    ///
    /// Returns the store index it occupied, or `None` if it was not stored.
    pub fn remove_listing(&mut self, listing: &Listing) -> Option<usize> {
        let index = self.store.remove(listing)?;
        self.unindex(index, listing.category, &listing.seller.name);

        tracing::debug!(store_index = index, "Listing removed");
        Some(index)
    }

    /// Remove whatever listing sits at a store index
    pub fn remove_at(&mut self, index: usize) -> Option<Listing> {
        let listing = self.store.remove_at(index)?;
        self.unindex(index, listing.category, &listing.seller.name);

        tracing::debug!(store_index = index, "Listing removed");
        Some(listing)
    }

    fn unindex(&mut self, index: usize, category: Category, seller: &str) {
        self.categories.remove(category, index);

        if self.sellers.contains(seller) {
            self.sellers.category_index_for(seller).remove(category, index);
        }
    }

    /// Attempt a purchase.
    ///
    /// Marks the listing sold on success; it stays indexed until removed.
    pub fn buy_listing(&mut self, info: &BuyInformation) -> SaleResponse {
        let Some(listing) = self.store.get_mut(info.index) else {
            return SaleResponse::rejected(SaleStatus::InvalidListing);
        };

        if listing.sold {
            return SaleResponse::rejected(SaleStatus::AlreadyBought);
        }
        if info.amount < listing.price {
            return SaleResponse::rejected(SaleStatus::NotEnoughFunds);
        }

        listing.sold = true;

        tracing::debug!(
            store_index = info.index,
            buyer = %info.buyer.name,
            price = listing.price,
            "Listing sold"
        );
        SaleResponse::sold()
    }

    /// Remove every listing that is sold or expired at `now`
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> Vec<Listing> {
        let stale: Vec<usize> = self
            .store
            .iter()
            .filter(|(_, l)| l.sold || l.is_expired_at(now))
            .map(|(index, _)| index)
            .collect();

        let removed: Vec<Listing> = stale
            .into_iter()
            .filter_map(|index| self.remove_at(index))
            .collect();

        if !removed.is_empty() {
            tracing::info!(removed = removed.len(), "Swept sold and expired listings");
        }
        removed
    }

    /// Remove every listing and reset the indexes
    pub fn clear(&mut self) {
        self.store.clear();
        self.categories.clear();
        self.sellers.clear();
    }

    /// Remove and return every listing, in store order
    pub fn drain(&mut self) -> Vec<Listing> {
        let listings = self.store.drain();
        self.categories.clear();
        self.sellers.clear();
        listings
    }

    /// Replace the market with listings at known store indices.
    ///
    /// Used when restoring a snapshot: every listing keeps the store index
    /// it had when dumped, and the category and seller indexes are rebuilt.
    /// No "item added" notification fires. If two listings claim the same
    /// index nothing is changed.
    pub fn restore(&mut self, entries: Vec<(usize, Listing)>) -> StorageResult<()> {
        self.store
            .restore(entries)
            .map_err(StorageError::DuplicateIndex)?;

        self.categories.clear();
        self.sellers.clear();
        for (index, listing) in self.store.iter() {
            self.categories.insert(listing.category, index);
            self.sellers
                .category_index_for(&listing.seller.name)
                .insert(listing.category, index);
        }

        tracing::debug!(listings = self.store.len(), "Market restored");
        Ok(())
    }

    /// Subscription point for the "item added" notification
    pub fn listing_added(&mut self) -> &mut Event<Listing> {
        self.store.listing_added()
    }

    // ==================== Query Methods ====================

    /// Look up a listing by store index
    pub fn get_listing(&self, index: usize) -> Option<&Listing> {
        self.store.get(index)
    }

    /// Iterate `(store index, listing)` pairs in store order
    pub fn listings(&self) -> impl Iterator<Item = (usize, &Listing)> {
        self.store.iter()
    }

    /// Store indices of a seller's listings, category by category.
    ///
    /// Stops after `limit` indices; without a limit it stops at the
    /// seller's slot count.
    pub fn seller_listings(&self, seller_name: &str, limit: Option<usize>) -> Vec<usize> {
        let Some(seller) = self.sellers.get(seller_name) else {
            return Vec::new();
        };
        if !seller.has_entries() {
            return Vec::new();
        }

        let total_limit = limit.unwrap_or_else(|| seller.size());
        seller.iter_store_indices().take(total_limit).collect()
    }

    /// Store indices filed under a category.
    ///
    /// `offset` counts raw slots (holes included); at most `limit` live
    /// indices are returned.
    pub fn category_listings(
        &self,
        category: Category,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<usize> {
        let Some(array) = self.categories.index_array(category) else {
            return Vec::new();
        };

        let live = array
            .values()
            .iter()
            .skip(offset)
            .filter_map(|slot| *slot);

        match limit {
            Some(limit) => live.take(limit).collect(),
            None => live.collect(),
        }
    }

    /// Run a query. `None` means "no filters".
    ///
    /// A category or seller filter that matches nothing yields an empty
    /// result, not an unfiltered page.
    pub fn query_listing(&self, options: Option<&QueryOptions>) -> Vec<&Listing> {
        self.query_listing_indexed(options)
            .into_iter()
            .map(|(_, listing)| listing)
            .collect()
    }

    /// Same as `query_listing`, paired with each listing's store index
    pub fn query_listing_indexed(&self, options: Option<&QueryOptions>) -> Vec<(usize, &Listing)> {
        let query = options
            .cloned()
            .unwrap_or_default()
            .normalize(self.settings.default_page_size());

        let candidates = self.gather_candidates(&query);
        let listings = self.resolve(&query, &candidates);

        Self::filter_by_price(listings, query.max_price)
    }

    /// Union of matching store indices, in first-seen order
    fn gather_candidates(&self, query: &NormalizedQuery) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        if let Some(category) = query.category {
            for index in self.category_listings(category, query.offset, Some(query.limit)) {
                if seen.insert(index) {
                    candidates.push(index);
                }
            }
        }

        if !query.seller_name.is_empty() {
            if let Some(seller) = self.sellers.get(&query.seller_name) {
                for index in seller.iter_store_indices() {
                    if candidates.len() >= query.limit {
                        break;
                    }
                    if seen.insert(index) {
                        candidates.push(index);
                    }
                }
            }
        }

        candidates
    }

    fn resolve(&self, query: &NormalizedQuery, candidates: &[usize]) -> Vec<(usize, &Listing)> {
        if !query.has_index_filter() {
            return self.store.slice_indexed(query.offset, query.limit);
        }

        candidates
            .iter()
            .filter_map(|&index| match self.store.get(index) {
                Some(listing) => Some((index, listing)),
                None => {
                    tracing::warn!(store_index = index, "Dropping stale index entry");
                    None
                }
            })
            .collect()
    }

    fn filter_by_price(
        listings: Vec<(usize, &Listing)>,
        max_price: Option<u64>,
    ) -> Vec<(usize, &Listing)> {
        match max_price {
            Some(cap) => listings.into_iter().filter(|(_, l)| l.price <= cap).collect(),
            None => listings,
        }
    }

    // ==================== Stats ====================

    /// Number of live listings
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            listings: self.store.len(),
            category_entries: self.categories.live_len(),
            category_slots: self.categories.size(),
            sellers: self.sellers.seller_count(),
        }
    }
}
