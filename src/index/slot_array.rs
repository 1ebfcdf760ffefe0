//! Slot Array - Sparse, index-stable container with a free-list
//!
//! Maps a small integer "slot" to a stored value. Removal leaves a
//! tombstone (`None`) in place and pushes the slot onto a LIFO free-list;
//! the next `push` reuses the most recently freed slot.
//!
//! ```text
//! push(10) push(11) push(12)   → [Some(10), Some(11), Some(12)]   free = []
//! remove_at(1)                 → [Some(10), None,     Some(12)]   free = [1]
//! push(99) → 1                 → [Some(10), Some(99), Some(12)]   free = []
//! ```
//!
//! # Design Notes
//! - Slots never shift, so a slot handed out stays valid until it is removed
//! - `len()` counts holes; use `live_len()` for the number of stored values
//! - `remove_by_value` is a linear scan (collections here stay small)
//! - `from_entries` rebuilds holes and free-list from `(slot, value)` pairs

/// Sparse container with O(1) insert and O(1) tombstone removal
#[derive(Debug, Clone, PartialEq)]
pub struct SlotArray<T> {
    /// Slot contents; `None` marks a tombstone
    slots: Vec<Option<T>>,
    /// Tombstoned slots available for reuse (LIFO)
    free: Vec<usize>,
}

impl<T> Default for SlotArray<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> SlotArray<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an array with each value at its given slot.
    ///
    /// Slots below the highest one that receive no value become tombstones
    /// on the free-list, lowest slot reused first. Fails with the offending
    /// slot if two values claim the same one.
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, T)>) -> Result<Self, usize> {
        let mut slots: Vec<Option<T>> = Vec::new();

        for (slot, value) in entries {
            if slot >= slots.len() {
                slots.resize_with(slot + 1, || None);
            }
            if slots[slot].is_some() {
                return Err(slot);
            }
            slots[slot] = Some(value);
        }

        let free = (0..slots.len()).rev().filter(|&s| slots[s].is_none()).collect();
        Ok(Self { slots, free })
    }

    /// Store a value, reusing the most recently freed slot if any.
    ///
    /// Returns the slot the value was written to.
    pub fn push(&mut self, value: T) -> usize {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(value);
            return slot;
        }

        self.slots.push(Some(value));
        self.slots.len() - 1
    }

    /// Tombstone a slot and return its value.
    ///
    /// Out-of-range and already-empty slots are ignored, so a slot can
    /// never sit on the free-list twice.
    pub fn remove_at(&mut self, slot: usize) -> Option<T> {
        let value = self.slots.get_mut(slot)?.take()?;
        self.free.push(slot);
        Some(value)
    }

    /// Get the value stored in a slot
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Get a mutable reference to the value stored in a slot
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// All slots in slot order, tombstones included
    pub fn values(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Slots currently waiting for reuse, in push order
    pub fn free_slots(&self) -> &[usize] {
        &self.free
    }

    /// Total slot count, including tombstones
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no slot was ever allocated (or the array was cleared)
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding a value
    pub fn live_len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Iterate `(slot, value)` pairs, skipping tombstones
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.as_ref().map(|v| (slot, v)))
    }

    /// Drop every slot and the free-list
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T: PartialEq> SlotArray<T> {
    /// Find the first slot holding `value`
    pub fn position(&self, value: &T) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(value))
    }

    /// Tombstone the first slot holding `value`.
    ///
    /// Returns the slot that was freed, or `None` if no slot matched.
    pub fn remove_by_value(&mut self, value: &T) -> Option<usize> {
        let slot = self.position(value)?;
        self.remove_at(slot);
        Some(slot)
    }
}
