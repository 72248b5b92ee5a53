//! Persistent (immutable) sorted map.
//!
//! This module provides [`SortedMap`], an immutable map stored as parallel
//! key and value columns with the key column kept strictly ordered under a
//! [`SortOrder`].
//!
//! When an incoming key ties with a stored key under the order, the stored
//! key is kept and the incoming value replaces the stored value.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{Comparator, SortOrder, sorted_map_of};
//!
//! let case_insensitive = Comparator::new("case-insensitive", |left: &&str, right: &&str| {
//!     left.to_lowercase().cmp(&right.to_lowercase())
//! });
//! let map = sorted_map_of(case_insensitive.into(), [("b", 1), ("A", 2)]);
//! assert_eq!(map.key_column(), &["A", "b"]);
//!
//! let updated = map.with("a", 20);
//! assert_eq!(updated.key_column(), &["A", "b"]);
//! assert_eq!(updated.value_column(), &[20, 1]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use super::array_ops;
use super::comparator::SortOrder;
use super::tier::{Tier, TieredColumns};
use super::views::{ColumnMap, EntrySet, KeySet, MapIter, Values};
use crate::error::CollectionError;

const SORTED_INVARIANT_MESSAGE: &str = "sorted map keys must be strictly ordered";

/// A persistent, size-tiered map whose keys are kept in strict order.
pub struct SortedMap<K, V> {
    order: SortOrder<K>,
    columns: TieredColumns<K, V>,
}

impl<K, V> SortedMap<K, V> {
    /// Creates the empty sorted map for `order`.
    #[must_use]
    pub const fn empty(order: SortOrder<K>) -> Self {
        Self {
            order,
            columns: TieredColumns::Empty,
        }
    }

    pub(crate) fn from_sorted_columns(order: SortOrder<K>, keys: Vec<K>, values: Vec<V>) -> Self {
        debug_assert!(
            array_ops::is_strictly_sorted(&keys, |left, right| order.compare(left, right)),
            "{SORTED_INVARIANT_MESSAGE}"
        );
        Self {
            order,
            columns: TieredColumns::condense(keys, values),
        }
    }

    /// Sorts the columns by key under `order`.
    ///
    /// Each tying run keeps its first key and its last value.
    pub(crate) fn from_unsorted_columns(order: SortOrder<K>, keys: Vec<K>, values: Vec<V>) -> Self {
        let (keys, values) =
            array_ops::sort_unique_columns(keys, values, |left, right| order.compare(left, right));
        Self::from_sorted_columns(order, keys, values)
    }

    /// Returns the order the keys are sorted by.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &SortOrder<K> {
        &self.order
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.columns, TieredColumns::Empty)
    }

    /// Returns the representation tier currently in use.
    #[inline]
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.columns.tier()
    }

    /// Returns `true` if both maps are the same instance.
    ///
    /// Empty maps are the same instance when they share the same order.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.order.same_order(&other.order) && self.columns.ptr_eq(&other.columns)
    }

    /// Returns the key column in order.
    #[inline]
    #[must_use]
    pub fn key_column(&self) -> &[K] {
        self.columns.keys()
    }

    /// Returns the value column, index-aligned with [`SortedMap::key_column`].
    #[inline]
    #[must_use]
    pub fn value_column(&self) -> &[V] {
        self.columns.values()
    }

    /// Returns an iterator over the entries in key order.
    #[inline]
    pub fn iter(&self) -> MapIter<'_, K, V> {
        MapIter::new(self.key_column(), self.value_column())
    }

    /// Returns the key at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NoSuchKey`] if `index >= len()`.
    pub fn get_key(&self, index: usize) -> Result<&K, CollectionError> {
        self.key_column().get(index).ok_or(CollectionError::NoSuchKey {
            index,
            length: self.len(),
        })
    }

    /// Returns the value at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NoSuchKey`] if `index >= len()`.
    pub fn get_value(&self, index: usize) -> Result<&V, CollectionError> {
        self.value_column().get(index).ok_or(CollectionError::NoSuchKey {
            index,
            length: self.len(),
        })
    }

    /// Returns the entry at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NoSuchKey`] if `index >= len()`.
    pub fn get_entry(&self, index: usize) -> Result<(&K, &V), CollectionError> {
        Ok((self.get_key(index)?, self.get_value(index)?))
    }

    /// Returns the smallest key.
    #[must_use]
    pub fn first_key(&self) -> Option<&K> {
        self.key_column().first()
    }

    /// Returns the largest key.
    #[must_use]
    pub fn last_key(&self) -> Option<&K> {
        self.key_column().last()
    }

    fn search(&self, key: &K) -> Result<usize, usize> {
        self.key_column()
            .binary_search_by(|probe| self.order.compare(probe, key))
    }

    fn rank(&self, bound: &K) -> usize {
        self.key_column()
            .partition_point(|probe| self.order.compare(probe, bound) == Ordering::Less)
    }

    /// Returns the position of the key tying with `key`.
    #[must_use]
    pub fn index_of_key(&self, key: &K) -> Option<usize> {
        self.search(key).ok()
    }

    /// Returns the value bound to the key tying with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index_of_key(key)
            .map(|position| &self.value_column()[position])
    }

    /// Returns `true` if some key ties with `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }
}

impl<K: Ord, V> SortedMap<K, V> {
    /// Creates the empty sorted map under natural key ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::empty(SortOrder::natural())
    }
}

impl<K: Clone, V: Clone> SortedMap<K, V> {
    fn rebuild(&self, keys: Vec<K>, values: Vec<V>) -> Self {
        Self::from_sorted_columns(self.order.clone(), keys, values)
    }

    fn remove_positions(&self, marks: &[bool]) -> Self {
        self.rebuild(
            array_ops::delete_marked(self.key_column(), marks),
            array_ops::delete_marked(self.value_column(), marks),
        )
    }

    /// Removes the entry whose key ties with `key`.
    ///
    /// Returns the same instance when none is present.
    #[must_use]
    pub fn without(&self, key: &K) -> Self {
        let Some(position) = self.index_of_key(key) else {
            return self.clone();
        };
        let mut marks = vec![false; self.len()];
        marks[position] = true;
        self.remove_positions(&marks)
    }

    /// Removes every entry whose key ties with one of `keys`.
    ///
    /// Returns the same instance when nothing matches.
    #[must_use]
    pub fn without_all<'a, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut marks = vec![false; self.len()];
        let mut marked = false;
        for position in keys.into_iter().filter_map(|key| self.index_of_key(key)) {
            marks[position] = true;
            marked = true;
        }
        if marked {
            self.remove_positions(&marks)
        } else {
            self.clone()
        }
    }

    fn range(&self, start: usize, end: usize) -> Self {
        if start == 0 && end == self.len() {
            self.clone()
        } else if start >= end {
            Self::empty(self.order.clone())
        } else {
            self.rebuild(
                self.key_column()[start..end].to_vec(),
                self.value_column()[start..end].to_vec(),
            )
        }
    }

    /// Returns the entries whose keys order strictly before `to`.
    #[must_use]
    pub fn head_map(&self, to: &K) -> Self {
        self.range(0, self.rank(to))
    }

    /// Returns the entries whose keys order at or after `from`.
    #[must_use]
    pub fn tail_map(&self, from: &K) -> Self {
        self.range(self.rank(from), self.len())
    }

    /// Returns the entries whose keys order at or after `from` and strictly
    /// before `to`.
    ///
    /// An inverted range yields the empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::{SortOrder, sorted_map_of};
    ///
    /// let map = sorted_map_of(SortOrder::natural(), [(1, 'a'), (2, 'b'), (3, 'c')]);
    /// assert_eq!(map.sub_map(&2, &3).key_column(), &[2]);
    /// assert!(map.sub_map(&0, &9).ptr_eq(&map));
    /// ```
    #[must_use]
    pub fn sub_map(&self, from: &K, to: &K) -> Self {
        self.range(self.rank(from), self.rank(to))
    }
}

impl<K: Clone, V: Clone + PartialEq> SortedMap<K, V> {
    /// Binds `key` to `value`.
    ///
    /// A tying key keeps the stored key and takes the new value. Returns the
    /// same instance when the stored value is already equal.
    #[must_use]
    pub fn with(&self, key: K, value: V) -> Self {
        match self.search(&key) {
            Ok(position) if self.value_column()[position] == value => self.clone(),
            Ok(position) => {
                let mut values = self.value_column().to_vec();
                values[position] = value;
                self.rebuild(self.key_column().to_vec(), values)
            }
            Err(_) => {
                let (keys, values) = array_ops::union_into_sorted_columns(
                    self.key_column(),
                    self.value_column(),
                    std::slice::from_ref(&key),
                    std::slice::from_ref(&value),
                    |left, right| self.order.compare(left, right),
                );
                self.rebuild(keys, values)
            }
        }
    }

    /// Binds every entry of `entries`.
    ///
    /// Incoming entries are sorted and merged in one linear pass. Incoming
    /// values win over stored ones, and among tying incoming keys the last
    /// value wins. Returns the same instance when nothing changed.
    #[must_use]
    pub fn with_all<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let compare = |left: &K, right: &K| self.order.compare(left, right);
        let (incoming_keys, incoming_values) = array_ops::copy_columns(entries);
        if incoming_keys.is_empty() {
            return self.clone();
        }
        let (incoming_keys, incoming_values) =
            array_ops::sort_unique_columns(incoming_keys, incoming_values, compare);
        let (keys, values) = array_ops::union_into_sorted_columns(
            self.key_column(),
            self.value_column(),
            &incoming_keys,
            &incoming_values,
            compare,
        );
        if keys.len() == self.len() && values.as_slice() == self.value_column() {
            self.clone()
        } else {
            self.rebuild(keys, values)
        }
    }

    /// Returns a set view of the entries.
    #[must_use]
    pub fn entry_set(&self) -> EntrySet<Self> {
        EntrySet::new(self.clone())
    }

    /// Returns a set view of the keys.
    #[must_use]
    pub fn key_set(&self) -> KeySet<Self> {
        KeySet::new(self.clone())
    }

    /// Returns a view of the values in key order.
    #[must_use]
    pub fn values(&self) -> Values<Self> {
        Values::new(self.clone())
    }
}

impl<K: Clone, V: Clone + PartialEq> ColumnMap for SortedMap<K, V> {
    type Key = K;
    type Value = V;

    fn key_column(&self) -> &[K] {
        self.columns.keys()
    }

    fn value_column(&self) -> &[V] {
        self.columns.values()
    }

    fn position_of(&self, key: &K) -> Option<usize> {
        self.index_of_key(key)
    }

    fn with_entry(&self, key: K, value: V) -> Self {
        self.with(key, value)
    }

    fn without_positions(&self, marks: &[bool]) -> Self {
        self.remove_positions(marks)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Clone for SortedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<K: Ord, V> Default for SortedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SortedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let (keys, values) = array_ops::copy_columns(iter);
        Self::from_unsorted_columns(SortOrder::natural(), keys, values)
    }
}

impl<'a, K, V> IntoIterator for &'a SortedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapIter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for SortedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.columns.ptr_eq(&other.columns)
            || (self.key_column() == other.key_column()
                && self.value_column() == other.value_column())
    }
}

impl<K: Eq, V: Eq> Eq for SortedMap<K, V> {}

impl<K: Hash, V: Hash> Hash for SortedMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SortedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for SortedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::Comparator;
    use rstest::rstest;

    fn sample() -> SortedMap<i32, &'static str> {
        [(3, "c"), (1, "a"), (2, "b")].into_iter().collect()
    }

    #[rstest]
    fn test_from_iter_sorts_keys_last_value_wins() {
        let map: SortedMap<i32, &str> = [(2, "x"), (1, "a"), (2, "b")].into_iter().collect();
        assert_eq!(map.key_column(), &[1, 2]);
        assert_eq!(map.value_column(), &["a", "b"]);
    }

    #[rstest]
    fn test_with_inserts_in_order() {
        let map = sample().with(0, "zero");
        assert_eq!(map.key_column(), &[0, 1, 2, 3]);
        assert_eq!(map.first_key(), Some(&0));
        assert_eq!(map.last_key(), Some(&3));
    }

    #[rstest]
    fn test_with_equal_value_is_identity() {
        let map = sample();
        assert!(map.with(2, "b").ptr_eq(&map));
        assert_eq!(map.with(2, "B").get(&2), Some(&"B"));
    }

    #[rstest]
    fn test_with_all_source_value_wins() {
        let map = sample();
        let merged = map.with_all([(2, "x"), (4, "d"), (2, "y")]);
        assert_eq!(merged.key_column(), &[1, 2, 3, 4]);
        assert_eq!(merged.value_column(), &["a", "y", "c", "d"]);
        assert!(map.with_all([(1, "a")]).ptr_eq(&map));
    }

    #[rstest]
    fn test_with_all_keeps_stored_key_on_tie() {
        let case_insensitive = Comparator::new("case-insensitive", |left: &String, right: &String| {
            left.to_lowercase().cmp(&right.to_lowercase())
        });
        let map = SortedMap::empty(case_insensitive.into()).with("Key".to_string(), 1);
        let merged = map.with_all([("KEY".to_string(), 2)]);
        assert_eq!(merged.key_column(), &["Key".to_string()]);
        assert_eq!(merged.value_column(), &[2]);
    }

    #[rstest]
    fn test_without_downgrades() {
        let map = sample();
        let single = map.without_all(&[1, 3]);
        assert_eq!(single.tier(), Tier::Single);
        assert!(single.without(&2).ptr_eq(&SortedMap::new()));
        assert!(map.without(&9).ptr_eq(&map));
    }

    #[rstest]
    fn test_navigation() {
        let map = sample();
        assert_eq!(map.head_map(&2).key_column(), &[1]);
        assert_eq!(map.tail_map(&2).key_column(), &[2, 3]);
        assert!(map.tail_map(&0).ptr_eq(&map));
        assert!(map.sub_map(&3, &1).is_empty());
    }

    #[rstest]
    fn test_views() {
        let map = sample();
        assert!(map.entry_set().contains(&1, &"a"));
        assert_eq!(map.key_set().without(&1).key_column(), &[2, 3]);
        assert_eq!(map.values().without(&"c").key_column(), &[1, 2]);
        assert!(map.entry_set().without(&1, &"z").ptr_eq(&map));
    }

    #[rstest]
    #[case::inside(0, Ok((&1, &"a")))]
    #[case::outside(3, Err(CollectionError::NoSuchKey { index: 3, length: 3 }))]
    fn test_get_entry(
        #[case] index: usize,
        #[case] expected: Result<(&i32, &&str), CollectionError>,
    ) {
        assert_eq!(sample().get_entry(index), expected);
    }
}
