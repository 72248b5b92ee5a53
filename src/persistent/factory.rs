//! Construction and conversion entry points for every collection family.
//!
//! - `empty_*` return the canonical empty instance of a family.
//! - `*_of` build a collection from a fixed number of elements.
//! - `as_*` convert any supported source, returning the source itself when it
//!   already belongs to the target family.
//! - `condense_*` wrap arrays that already satisfy the family's invariants.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{as_list, as_set, empty_list, set_of, Tier};
//!
//! let list = empty_list().with(1);
//! assert_eq!(list.tier(), Tier::Single);
//!
//! let set = set_of([1, 2, 3]);
//! assert!(as_set(set.clone()).ptr_eq(&set));
//!
//! // A list built from a set reuses the set's storage
//! assert_eq!(as_list(&set).as_slice(), set.as_slice());
//! ```

use std::hash::Hash;

use super::array_ops;
use super::comparator::SortOrder;
use super::tier::{Tiered, TieredColumns};
use super::{List, Map, Set, SortedMap, SortedSet};

// =============================================================================
// Empty
// =============================================================================

/// Returns the canonical empty list.
#[inline]
#[must_use]
pub const fn empty_list<T>() -> List<T> {
    List::new()
}

/// Returns the canonical empty set.
#[inline]
#[must_use]
pub const fn empty_set<T>() -> Set<T> {
    Set::new()
}

/// Returns the canonical empty map.
#[inline]
#[must_use]
pub const fn empty_map<K, V>() -> Map<K, V> {
    Map::new()
}

/// Returns the empty sorted set for `order`.
///
/// Empty sorted sets sharing an order are the same instance.
#[inline]
#[must_use]
pub const fn empty_sorted_set<T>(order: SortOrder<T>) -> SortedSet<T> {
    SortedSet::empty(order)
}

/// Returns the empty sorted map for `order`.
#[inline]
#[must_use]
pub const fn empty_sorted_map<K, V>(order: SortOrder<K>) -> SortedMap<K, V> {
    SortedMap::empty(order)
}

// =============================================================================
// Fixed Arity
// =============================================================================

/// Builds a list from `elements`.
#[must_use]
pub fn list_of<T, const N: usize>(elements: [T; N]) -> List<T> {
    condense_list(Vec::from(elements))
}

/// Builds a set from `elements`, keeping the first of any duplicates.
#[must_use]
pub fn set_of<T, const N: usize>(elements: [T; N]) -> Set<T>
where
    T: Clone + Eq + Hash,
{
    condense_set(array_ops::distinct(Vec::from(elements)))
}

/// Builds a map from `entries`.
///
/// A repeated key keeps the position of its first occurrence and the value of
/// its last.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::map_of;
///
/// let map = map_of([("a", 1), ("b", 2), ("a", 3)]);
/// assert_eq!(map.key_column(), &["a", "b"]);
/// assert_eq!(map.value_column(), &[3, 2]);
/// ```
#[must_use]
pub fn map_of<K, V, const N: usize>(entries: [(K, V); N]) -> Map<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    entries.into_iter().collect()
}

/// Builds a sorted set from `elements` under `order`.
#[must_use]
pub fn sorted_set_of<T, const N: usize>(order: SortOrder<T>, elements: [T; N]) -> SortedSet<T> {
    SortedSet::from_unsorted_vec(order, Vec::from(elements))
}

/// Builds a sorted map from `entries` under `order`.
///
/// Among tying keys the first key and the last value are kept.
#[must_use]
pub fn sorted_map_of<K, V, const N: usize>(
    order: SortOrder<K>,
    entries: [(K, V); N],
) -> SortedMap<K, V> {
    let (keys, values) = array_ops::copy_columns(entries);
    SortedMap::from_unsorted_columns(order, keys, values)
}

// =============================================================================
// Condense
// =============================================================================

/// Wraps `elements` in the minimal list tier.
#[must_use]
pub fn condense_list<T>(elements: Vec<T>) -> List<T> {
    List::from_tiered(Tiered::condense(elements))
}

/// Wraps duplicate-free `elements` in the minimal set tier.
///
/// Uniqueness is checked in debug builds only.
#[must_use]
pub fn condense_set<T: Clone + Eq + Hash>(elements: Vec<T>) -> Set<T> {
    Set::from_unique_vec(elements)
}

/// Wraps duplicate-free, index-aligned columns in the minimal map tier.
///
/// Uniqueness and alignment are checked in debug builds only.
#[must_use]
pub fn condense_map<K, V>(keys: Vec<K>, values: Vec<V>) -> Map<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    Map::from_unique_columns(keys, values)
}

/// Wraps strictly ordered `elements` in the minimal sorted set tier.
///
/// Ordering is checked in debug builds only.
#[must_use]
pub fn condense_sorted_set<T>(order: SortOrder<T>, elements: Vec<T>) -> SortedSet<T> {
    SortedSet::from_sorted_vec(order, elements)
}

/// Wraps strictly ordered, index-aligned columns in the minimal sorted map
/// tier.
///
/// Ordering and alignment are checked in debug builds only.
#[must_use]
pub fn condense_sorted_map<K, V>(order: SortOrder<K>, keys: Vec<K>, values: Vec<V>) -> SortedMap<K, V> {
    SortedMap::from_sorted_columns(order, keys, values)
}

// =============================================================================
// Sources
// =============================================================================

/// Something that can become a [`List`].
pub trait ListSource<T> {
    /// Converts `self` into a list.
    fn into_list(self) -> List<T>;
}

/// Something that can become a [`Set`].
pub trait SetSource<T> {
    /// Converts `self` into a set.
    fn into_set(self) -> Set<T>;
}

/// Something that can become a [`Map`].
pub trait MapSource<K, V> {
    /// Converts `self` into a map.
    fn into_map(self) -> Map<K, V>;
}

/// Something that can become a [`SortedSet`] under a given order.
pub trait SortedSetSource<T> {
    /// Converts `self` into a sorted set under `order`.
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T>;
}

/// Something that can become a [`SortedMap`] under a given order.
pub trait SortedMapSource<K, V> {
    /// Converts `self` into a sorted map under `order`.
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V>;
}

/// Converts `source` into a list.
#[must_use]
pub fn as_list<T, S: ListSource<T>>(source: S) -> List<T> {
    source.into_list()
}

/// Converts `source` into a set.
#[must_use]
pub fn as_set<T, S: SetSource<T>>(source: S) -> Set<T> {
    source.into_set()
}

/// Converts `source` into a map.
#[must_use]
pub fn as_map<K, V, S: MapSource<K, V>>(source: S) -> Map<K, V> {
    source.into_map()
}

/// Converts `source` into a sorted set under `order`.
///
/// A sorted set that already uses `order` is returned as is.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::{Comparator, SortOrder, as_sorted_set, sorted_set_of};
///
/// let natural = sorted_set_of(SortOrder::natural(), [3, 1, 2]);
/// assert!(as_sorted_set(SortOrder::natural(), &natural).ptr_eq(&natural));
///
/// let reversed = as_sorted_set(Comparator::reverse_natural().into(), &natural);
/// assert_eq!(reversed.as_slice(), &[3, 2, 1]);
/// ```
#[must_use]
pub fn as_sorted_set<T, S: SortedSetSource<T>>(order: SortOrder<T>, source: S) -> SortedSet<T> {
    source.into_sorted_set(order)
}

/// Converts `source` into a sorted map under `order`.
///
/// A sorted map that already uses `order` is returned as is.
#[must_use]
pub fn as_sorted_map<K, V, S: SortedMapSource<K, V>>(order: SortOrder<K>, source: S) -> SortedMap<K, V> {
    source.into_sorted_map(order)
}

// -----------------------------------------------------------------------------
// ListSource
// -----------------------------------------------------------------------------

impl<T> ListSource<T> for List<T> {
    fn into_list(self) -> List<T> {
        self
    }
}

impl<T> ListSource<T> for &List<T> {
    fn into_list(self) -> List<T> {
        self.clone()
    }
}

impl<T> ListSource<T> for Set<T> {
    fn into_list(self) -> List<T> {
        List::from_tiered(self.tiered().clone())
    }
}

impl<T> ListSource<T> for &Set<T> {
    fn into_list(self) -> List<T> {
        List::from_tiered(self.tiered().clone())
    }
}

impl<T> ListSource<T> for SortedSet<T> {
    fn into_list(self) -> List<T> {
        List::from_tiered(self.tiered().clone())
    }
}

impl<T> ListSource<T> for &SortedSet<T> {
    fn into_list(self) -> List<T> {
        List::from_tiered(self.tiered().clone())
    }
}

impl<T> ListSource<T> for Vec<T> {
    fn into_list(self) -> List<T> {
        condense_list(self)
    }
}

impl<T: Clone> ListSource<T> for &[T] {
    fn into_list(self) -> List<T> {
        condense_list(array_ops::copy(self))
    }
}

impl<T, const N: usize> ListSource<T> for [T; N] {
    fn into_list(self) -> List<T> {
        list_of(self)
    }
}

// -----------------------------------------------------------------------------
// SetSource
// -----------------------------------------------------------------------------

impl<T> SetSource<T> for Set<T> {
    fn into_set(self) -> Set<T> {
        self
    }
}

impl<T> SetSource<T> for &Set<T> {
    fn into_set(self) -> Set<T> {
        self.clone()
    }
}

impl<T: Clone + Eq + Hash> SetSource<T> for &List<T> {
    fn into_set(self) -> Set<T> {
        self.as_slice().into_set()
    }
}

impl<T: Clone + Eq + Hash> SetSource<T> for List<T> {
    fn into_set(self) -> Set<T> {
        (&self).into_set()
    }
}

impl<T: Clone + Eq + Hash> SetSource<T> for &SortedSet<T> {
    fn into_set(self) -> Set<T> {
        self.as_slice().into_set()
    }
}

impl<T: Clone + Eq + Hash> SetSource<T> for SortedSet<T> {
    fn into_set(self) -> Set<T> {
        (&self).into_set()
    }
}

impl<T: Clone + Eq + Hash> SetSource<T> for Vec<T> {
    fn into_set(self) -> Set<T> {
        condense_set(array_ops::distinct(self))
    }
}

impl<T: Clone + Eq + Hash> SetSource<T> for &[T] {
    fn into_set(self) -> Set<T> {
        condense_set(array_ops::distinct(array_ops::copy(self)))
    }
}

impl<T: Clone + Eq + Hash, const N: usize> SetSource<T> for [T; N] {
    fn into_set(self) -> Set<T> {
        set_of(self)
    }
}

// -----------------------------------------------------------------------------
// MapSource
// -----------------------------------------------------------------------------

impl<K, V> MapSource<K, V> for Map<K, V> {
    fn into_map(self) -> Map<K, V> {
        self
    }
}

impl<K, V> MapSource<K, V> for &Map<K, V> {
    fn into_map(self) -> Map<K, V> {
        self.clone()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> MapSource<K, V> for &SortedMap<K, V> {
    fn into_map(self) -> Map<K, V> {
        let (keys, values) = array_ops::union_into_columns(&[], &[], self.key_column(), self.value_column());
        Map::from_columns(TieredColumns::condense(keys, values))
    }
}

impl<K: Clone + Eq + Hash, V: Clone> MapSource<K, V> for SortedMap<K, V> {
    fn into_map(self) -> Map<K, V> {
        (&self).into_map()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> MapSource<K, V> for Vec<(K, V)> {
    fn into_map(self) -> Map<K, V> {
        self.into_iter().collect()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> MapSource<K, V> for &[(K, V)] {
    fn into_map(self) -> Map<K, V> {
        self.iter().cloned().collect()
    }
}

impl<K: Clone + Eq + Hash, V: Clone, const N: usize> MapSource<K, V> for [(K, V); N] {
    fn into_map(self) -> Map<K, V> {
        map_of(self)
    }
}

// -----------------------------------------------------------------------------
// SortedSetSource
// -----------------------------------------------------------------------------

impl<T: Clone> SortedSetSource<T> for SortedSet<T> {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        if self.comparator().same_order(&order) {
            self
        } else {
            SortedSet::from_unsorted_vec(order, array_ops::copy(self.as_slice()))
        }
    }
}

impl<T: Clone> SortedSetSource<T> for &SortedSet<T> {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        self.clone().into_sorted_set(order)
    }
}

impl<T: Clone> SortedSetSource<T> for &List<T> {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        self.as_slice().into_sorted_set(order)
    }
}

impl<T: Clone> SortedSetSource<T> for List<T> {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        (&self).into_sorted_set(order)
    }
}

impl<T: Clone> SortedSetSource<T> for &Set<T> {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        self.as_slice().into_sorted_set(order)
    }
}

impl<T: Clone> SortedSetSource<T> for Set<T> {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        (&self).into_sorted_set(order)
    }
}

impl<T> SortedSetSource<T> for Vec<T> {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        SortedSet::from_unsorted_vec(order, self)
    }
}

impl<T: Clone> SortedSetSource<T> for &[T] {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        SortedSet::from_unsorted_vec(order, array_ops::copy(self))
    }
}

impl<T, const N: usize> SortedSetSource<T> for [T; N] {
    fn into_sorted_set(self, order: SortOrder<T>) -> SortedSet<T> {
        sorted_set_of(order, self)
    }
}

// -----------------------------------------------------------------------------
// SortedMapSource
// -----------------------------------------------------------------------------

impl<K: Clone, V: Clone> SortedMapSource<K, V> for SortedMap<K, V> {
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V> {
        if self.comparator().same_order(&order) {
            self
        } else {
            SortedMap::from_unsorted_columns(
                order,
                array_ops::copy(self.key_column()),
                array_ops::copy(self.value_column()),
            )
        }
    }
}

impl<K: Clone, V: Clone> SortedMapSource<K, V> for &SortedMap<K, V> {
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V> {
        self.clone().into_sorted_map(order)
    }
}

impl<K: Clone, V: Clone> SortedMapSource<K, V> for &Map<K, V> {
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V> {
        SortedMap::from_unsorted_columns(
            order,
            array_ops::copy(self.key_column()),
            array_ops::copy(self.value_column()),
        )
    }
}

impl<K: Clone, V: Clone> SortedMapSource<K, V> for Map<K, V> {
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V> {
        (&self).into_sorted_map(order)
    }
}

impl<K, V> SortedMapSource<K, V> for Vec<(K, V)> {
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V> {
        let (keys, values) = array_ops::copy_columns(self);
        SortedMap::from_unsorted_columns(order, keys, values)
    }
}

impl<K: Clone, V: Clone> SortedMapSource<K, V> for &[(K, V)] {
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V> {
        let (keys, values) = array_ops::copy_columns(self.iter().cloned());
        SortedMap::from_unsorted_columns(order, keys, values)
    }
}

impl<K, V, const N: usize> SortedMapSource<K, V> for [(K, V); N] {
    fn into_sorted_map(self, order: SortOrder<K>) -> SortedMap<K, V> {
        sorted_map_of(order, self)
    }
}

// =============================================================================
// Tests
// =============================================================================
