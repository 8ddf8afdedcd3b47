//! Ordered list with insert-time deduplication.
//!
//! Used for provider frequency lists, the channel group registry and the
//! channel list inside each group. The sort key and the duplicate test are
//! supplied by the element type and need not be the same field.

use std::slice;

/// An element that can live in a [`SortedUniqueList`].
pub trait SortedEntry {
    /// Field the list is ordered by.
    type Key: Ord + ?Sized;

    fn sort_key(&self) -> &Self::Key;

    /// Whether `other` would be a duplicate of this entry.
    fn is_duplicate_of(&self, other: &Self) -> bool;
}

/// Ascending list that silently drops duplicates on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedUniqueList<T> {
    items: Vec<T>,
}

impl<T> Default for SortedUniqueList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: SortedEntry> SortedUniqueList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` in sort order.
    ///
    /// Scans from the front: stops without change at the first duplicate,
    /// inserts before the first entry with a greater key, otherwise appends.
    /// Returns whether the item was added.
    pub fn insert(&mut self, item: T) -> bool {
        let mut position = self.items.len();
        for (idx, existing) in self.items.iter().enumerate() {
            if existing.is_duplicate_of(&item) {
                return false;
            }
            if existing.sort_key() > item.sort_key() {
                position = idx;
                break;
            }
        }
        self.items.insert(position, item);
        true
    }

    /// Return the entry with `key`, inserting `make()` at its sorted position
    /// when there is none.
    ///
    /// Only meaningful when the duplicate test is equality of the sort key.
    pub fn get_or_insert_with(&mut self, key: &T::Key, make: impl FnOnce() -> T) -> &mut T {
        let mut position = self.items.len();
        let mut found = None;
        for (idx, existing) in self.items.iter().enumerate() {
            if existing.sort_key() == key {
                found = Some(idx);
                break;
            }
            if existing.sort_key() > key {
                position = idx;
                break;
            }
        }
        if let Some(idx) = found {
            return &mut self.items[idx];
        }
        self.items.insert(position, make());
        &mut self.items[position]
    }

    /// Entry whose sort key equals `key`, if any.
    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.sort_key() == key)
    }
}

impl<T> SortedUniqueList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a SortedUniqueList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
