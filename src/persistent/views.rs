//! Derived views over column maps.
//!
//! [`Map`](super::Map) and [`SortedMap`](super::SortedMap) both store their
//! entries as parallel key and value columns and both implement
//! [`ColumnMap`]. The views in this module borrow nothing: each one holds a
//! cheap clone of the backing map, reads through its columns, and translates
//! its own mutators back into equivalent map mutations.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::map_of;
//!
//! let map = map_of([("a", 1), ("b", 2)]);
//!
//! // Removing an entry only removes the key when the stored value matches.
//! assert!(map.entry_set().without(&"a", &99).ptr_eq(&map));
//! assert_eq!(map.entry_set().without(&"a", &1).len(), 1);
//!
//! // Removing a value drops the first entry holding it.
//! assert_eq!(map.values().without(&2), map_of([("a", 1)]));
//! ```

use std::slice;

use super::{List, Set};

/// A map stored as parallel, index-aligned key and value columns.
pub trait ColumnMap: Clone {
    /// The key type.
    type Key;
    /// The value type.
    type Value;

    /// Returns the key column.
    fn key_column(&self) -> &[Self::Key];

    /// Returns the value column, index-aligned with [`Self::key_column`].
    fn value_column(&self) -> &[Self::Value];

    /// Returns the position of `key`, if present.
    fn position_of(&self, key: &Self::Key) -> Option<usize>;

    /// Returns a map with `key` bound to `value`.
    fn with_entry(&self, key: Self::Key, value: Self::Value) -> Self;

    /// Returns a map without the entries flagged in `marks`.
    ///
    /// Returns the same instance when no position is flagged.
    fn without_positions(&self, marks: &[bool]) -> Self;
}

/// Removes the marked positions, or returns the same map if nothing is marked.
fn without_marked<M: ColumnMap>(map: &M, marks: &[bool]) -> M {
    if marks.iter().any(|marked| *marked) {
        map.without_positions(marks)
    } else {
        map.clone()
    }
}

// =============================================================================
// MapIter
// =============================================================================

/// Lazy forward iterator over the entries of a column map in storage order.
pub struct MapIter<'a, K, V> {
    keys: slice::Iter<'a, K>,
    values: slice::Iter<'a, V>,
}

impl<'a, K, V> MapIter<'a, K, V> {
    pub(crate) fn new(keys: &'a [K], values: &'a [V]) -> Self {
        Self {
            keys: keys.iter(),
            values: values.iter(),
        }
    }
}

impl<'a, K, V> Iterator for MapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?, self.values.next()?))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.keys.len().min(self.values.len());
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for MapIter<'_, K, V> {}

impl<K, V> Clone for MapIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
        }
    }
}

// =============================================================================
// EntrySet
// =============================================================================

/// The entries of a column map, viewed as a set of key/value pairs.
#[derive(Clone)]
pub struct EntrySet<M> {
    map: M,
}

impl<M: ColumnMap> EntrySet<M> {
    pub(crate) const fn new(map: M) -> Self {
        Self { map }
    }

    /// Returns the backing map.
    #[must_use]
    pub const fn map(&self) -> &M {
        &self.map
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.key_column().len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the entries in storage order.
    pub fn iter(&self) -> MapIter<'_, M::Key, M::Value> {
        MapIter::new(self.map.key_column(), self.map.value_column())
    }
}

impl<M> EntrySet<M>
where
    M: ColumnMap,
    M::Value: PartialEq,
{
    /// Returns `true` if `key` is bound to a value equal to `value`.
    pub fn contains(&self, key: &M::Key, value: &M::Value) -> bool {
        self.map
            .position_of(key)
            .is_some_and(|position| self.map.value_column()[position] == *value)
    }

    /// Returns the backing map with the entry added.
    #[must_use]
    pub fn with(&self, key: M::Key, value: M::Value) -> M {
        self.map.with_entry(key, value)
    }

    /// Returns the backing map without the entry.
    ///
    /// The key is only removed if its stored value equals `value`; otherwise
    /// the same map instance is returned.
    #[must_use]
    pub fn without(&self, key: &M::Key, value: &M::Value) -> M {
        self.without_all(std::iter::once((key, value)))
    }

    /// Returns the backing map without every listed entry whose stored value
    /// matches.
    #[must_use]
    pub fn without_all<'a, I>(&self, entries: I) -> M
    where
        I: IntoIterator<Item = (&'a M::Key, &'a M::Value)>,
        M::Key: 'a,
        M::Value: 'a,
    {
        let mut marks = vec![false; self.len()];
        for (key, value) in entries {
            if let Some(position) = self.map.position_of(key)
                && self.map.value_column()[position] == *value
            {
                marks[position] = true;
            }
        }
        without_marked(&self.map, &marks)
    }
}

impl<M> EntrySet<M>
where
    M: ColumnMap,
    M::Key: Clone,
    M::Value: Clone,
{
    /// Copies the entries into a list of pairs.
    #[must_use]
    pub fn to_list(&self) -> List<(M::Key, M::Value)> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

// =============================================================================
// KeySet
// =============================================================================

/// The keys of a column map, viewed as a set.
#[derive(Clone)]
pub struct KeySet<M> {
    map: M,
}

impl<M: ColumnMap> KeySet<M> {
    pub(crate) const fn new(map: M) -> Self {
        Self { map }
    }

    /// Returns the backing map.
    #[must_use]
    pub const fn map(&self) -> &M {
        &self.map
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.key_column().len()
    }

    /// Returns `true` if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the keys in storage order.
    pub fn iter(&self) -> slice::Iter<'_, M::Key> {
        self.map.key_column().iter()
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &M::Key) -> bool {
        self.map.position_of(key).is_some()
    }

    /// Returns the backing map without `key`.
    #[must_use]
    pub fn without(&self, key: &M::Key) -> M {
        self.without_all(std::iter::once(key))
    }

    /// Returns the backing map without every listed key.
    #[must_use]
    pub fn without_all<'a, I>(&self, keys: I) -> M
    where
        I: IntoIterator<Item = &'a M::Key>,
        M::Key: 'a,
    {
        let mut marks = vec![false; self.len()];
        for position in keys.into_iter().filter_map(|key| self.map.position_of(key)) {
            marks[position] = true;
        }
        without_marked(&self.map, &marks)
    }
}

impl<M> KeySet<M>
where
    M: ColumnMap,
    M::Key: Clone,
{
    /// Copies the keys into a list.
    #[must_use]
    pub fn to_list(&self) -> List<M::Key> {
        self.iter().cloned().collect()
    }
}

impl<M> KeySet<M>
where
    M: ColumnMap,
    M::Key: Clone + Eq + std::hash::Hash,
{
    /// Copies the keys into a set, keeping storage order.
    #[must_use]
    pub fn to_set(&self) -> Set<M::Key> {
        self.iter().cloned().collect()
    }
}

// =============================================================================
// Values
// =============================================================================

/// The values of a column map, viewed as a sequence.
#[derive(Clone)]
pub struct Values<M> {
    map: M,
}

impl<M: ColumnMap> Values<M> {
    pub(crate) const fn new(map: M) -> Self {
        Self { map }
    }

    /// Returns the backing map.
    #[must_use]
    pub const fn map(&self) -> &M {
        &self.map
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.value_column().len()
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the values in storage order.
    pub fn iter(&self) -> slice::Iter<'_, M::Value> {
        self.map.value_column().iter()
    }
}

impl<M> Values<M>
where
    M: ColumnMap,
    M::Value: PartialEq,
{
    /// Returns `true` if some key is bound to `value`.
    pub fn contains(&self, value: &M::Value) -> bool {
        self.iter().any(|candidate| candidate == value)
    }

    /// Returns the backing map without the first entry holding `value`.
    #[must_use]
    pub fn without(&self, value: &M::Value) -> M {
        let mut marks = vec![false; self.len()];
        if let Some(position) = self.iter().position(|candidate| candidate == value) {
            marks[position] = true;
        }
        without_marked(&self.map, &marks)
    }

    /// Returns the backing map without every entry whose value is listed.
    #[must_use]
    pub fn without_all<'a, I>(&self, values: I) -> M
    where
        I: IntoIterator<Item = &'a M::Value>,
        M::Value: 'a,
    {
        let removal: Vec<&M::Value> = values.into_iter().collect();
        let marks: Vec<bool> = self
            .iter()
            .map(|candidate| removal.iter().any(|value| *value == candidate))
            .collect();
        without_marked(&self.map, &marks)
    }
}

impl<M> Values<M>
where
    M: ColumnMap,
    M::Value: Clone,
{
    /// Copies the values into a list.
    #[must_use]
    pub fn to_list(&self) -> List<M::Value> {
        self.iter().cloned().collect()
    }
}
