//! Persistent (immutable) size-tiered map.
//!
//! This module provides [`Map`], an immutable map stored as two parallel,
//! index-aligned columns: one array of keys and one array of values. Lookups
//! scan the key column; there is no hash table.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{Map, Tier, map_of};
//!
//! let map = map_of([("a", 1), ("b", 2)]);
//! assert_eq!(map.get("a"), Some(&1));
//!
//! let single = map.without(&"a");
//! assert_eq!(single.tier(), Tier::Single);
//! assert!(single.without(&"b").ptr_eq(&Map::new()));
//!
//! // Rebinding a key to an equal value is a no-op
//! assert!(map.with("b", 2).ptr_eq(&map));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use rustc_hash::FxHashMap;

use super::array_ops;
use super::set::unordered_hash;
use super::tier::{Tier, TieredColumns};
use super::views::{ColumnMap, EntrySet, KeySet, MapIter, Values};
use crate::error::CollectionError;

/// A persistent, size-tiered map backed by parallel key and value columns.
///
/// Entries keep the position at which their key was first inserted.
pub struct Map<K, V> {
    columns: TieredColumns<K, V>,
}

impl<K, V> Map<K, V> {
    /// Creates the empty map.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: TieredColumns::Empty,
        }
    }

    pub(crate) const fn from_columns(columns: TieredColumns<K, V>) -> Self {
        Self { columns }
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
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.columns.ptr_eq(&other.columns)
    }

    /// Returns the key column.
    #[inline]
    #[must_use]
    pub fn key_column(&self) -> &[K] {
        self.columns.keys()
    }

    /// Returns the value column, index-aligned with [`Map::key_column`].
    #[inline]
    #[must_use]
    pub fn value_column(&self) -> &[V] {
        self.columns.values()
    }

    /// Returns an iterator over the entries in storage order.
    #[inline]
    pub fn iter(&self) -> MapIter<'_, K, V> {
        MapIter::new(self.key_column(), self.value_column())
    }

    /// Returns the key stored at position `index`.
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

    /// Returns the value stored at position `index`.
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

    /// Returns the entry stored at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NoSuchKey`] if `index >= len()`.
    pub fn get_entry(&self, index: usize) -> Result<(&K, &V), CollectionError> {
        Ok((self.get_key(index)?, self.get_value(index)?))
    }
}

impl<K: Eq, V> Map<K, V> {
    /// Returns the position of `key`.
    pub fn index_of_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.key_column()
            .iter()
            .position(|candidate| candidate.borrow() == key)
    }

    /// Returns the value bound to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::map_of;
    ///
    /// let map = map_of([("one".to_string(), 1)]);
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.index_of_key(key)
            .map(|position| &self.value_column()[position])
    }

    /// Returns `true` if `key` is bound.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.index_of_key(key).is_some()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> Map<K, V> {
    pub(crate) fn from_unique_columns(keys: Vec<K>, values: Vec<V>) -> Self {
        debug_assert_eq!(
            array_ops::distinct(keys.clone()).len(),
            keys.len(),
            "map keys must be unique"
        );
        Self::from_columns(TieredColumns::condense(keys, values))
    }

    /// Removes the entry for `key`.
    ///
    /// Returns the same instance when `key` is absent.
    #[must_use]
    pub fn without(&self, key: &K) -> Self {
        let Some(position) = self.index_of_key(key) else {
            return self.clone();
        };
        let mut marks = vec![false; self.len()];
        marks[position] = true;
        self.remove_positions(&marks)
    }

    /// Removes the entries for every key in `keys`.
    ///
    /// Returns the same instance when nothing matches.
    #[must_use]
    pub fn without_all<'a, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let (remaining_keys, remaining_values) =
            array_ops::delete_all_columns(self.key_column(), self.value_column(), keys);
        if remaining_keys.len() == self.len() {
            self.clone()
        } else {
            Self::from_columns(TieredColumns::condense(remaining_keys, remaining_values))
        }
    }

    fn remove_positions(&self, marks: &[bool]) -> Self {
        Self::from_columns(TieredColumns::condense(
            array_ops::delete_marked(self.key_column(), marks),
            array_ops::delete_marked(self.value_column(), marks),
        ))
    }
}

impl<K: Clone + Eq + Hash, V: Clone + PartialEq> Map<K, V> {
    /// Binds `key` to `value`.
    ///
    /// An existing key keeps its position and gets the new value. Returns the
    /// same instance when the key is already bound to an equal value.
    #[must_use]
    pub fn with(&self, key: K, value: V) -> Self {
        match self.index_of_key(&key) {
            Some(position) if self.value_column()[position] == value => self.clone(),
            Some(position) => {
                let mut values = self.value_column().to_vec();
                values[position] = value;
                Self::from_columns(TieredColumns::condense(self.key_column().to_vec(), values))
            }
            None => Self::from_columns(TieredColumns::condense(
                array_ops::append(self.key_column(), key),
                array_ops::append(self.value_column(), value),
            )),
        }
    }

    /// Binds every entry of `entries`.
    ///
    /// Incoming values win over stored ones, and a key repeated in `entries`
    /// ends up with its last value. Returns the same instance when nothing
    /// changed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::map_of;
    ///
    /// let map = map_of([("a", 1), ("b", 2)]);
    /// let merged = map.with_all([("b", 20), ("c", 3), ("b", 21)]);
    /// assert_eq!(merged.key_column(), &["a", "b", "c"]);
    /// assert_eq!(merged.value_column(), &[1, 21, 3]);
    /// assert!(map.with_all([("a", 1)]).ptr_eq(&map));
    /// ```
    #[must_use]
    pub fn with_all<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let (incoming_keys, incoming_values) = array_ops::copy_columns(entries);
        if incoming_keys.is_empty() {
            return self.clone();
        }
        let (keys, values) = array_ops::union_into_columns(
            self.key_column(),
            self.value_column(),
            &incoming_keys,
            &incoming_values,
        );
        if keys.len() == self.len() && values.as_slice() == self.value_column() {
            self.clone()
        } else {
            Self::from_columns(TieredColumns::condense(keys, values))
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

    /// Returns a view of the values.
    #[must_use]
    pub fn values(&self) -> Values<Self> {
        Values::new(self.clone())
    }
}

impl<K: Clone + Eq + Hash, V: Clone + PartialEq> ColumnMap for Map<K, V> {
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

impl<K, V> Clone for Map<K, V> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<K, V> Default for Map<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let (keys, values) = array_ops::copy_columns(iter);
        let (keys, values) = array_ops::union_into_columns(&[], &[], &keys, &values);
        Self::from_columns(TieredColumns::condense(keys, values))
    }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapIter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        let others: FxHashMap<&K, &V> = other.iter().collect();
        self.iter()
            .all(|(key, value)| others.get(key).is_some_and(|candidate| *candidate == value))
    }
}

impl<K: Eq + Hash, V: Eq> Eq for Map<K, V> {}

impl<K: Hash, V: Hash> Hash for Map<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        unordered_hash(self.iter()).hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Map<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Map<K, V> {
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
