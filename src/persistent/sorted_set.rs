//! Persistent (immutable) sorted set.
//!
//! This module provides [`SortedSet`], an immutable set whose single flat
//! array is kept strictly ordered under a [`SortOrder`]. Lookups use binary
//! search, and bulk insertion is a linear two-pointer merge.
//!
//! Equality and hashing consider only the ordered sequence of elements. Two
//! sorted sets built with different comparators compare equal whenever they
//! iterate the same elements in the same order.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{Comparator, SortOrder, SortedSet, sorted_set_of};
//!
//! let natural = sorted_set_of(SortOrder::natural(), [5, 3, 1, 4, 2]);
//! assert_eq!(natural.as_slice(), &[1, 2, 3, 4, 5]);
//!
//! let reverse = sorted_set_of(Comparator::reverse_natural().into(), [5, 3, 1, 4, 2]);
//! assert_eq!(reverse.as_slice(), &[5, 4, 3, 2, 1]);
//!
//! // Adding an element that is already present is a no-op
//! assert!(natural.with(3).ptr_eq(&natural));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use super::array_ops;
use super::comparator::SortOrder;
use super::tier::{Tier, Tiered};
use crate::error::CollectionError;

const SORTED_INVARIANT_MESSAGE: &str = "sorted set elements must be strictly ordered";

/// A persistent, size-tiered set kept in strict order.
pub struct SortedSet<T> {
    order: SortOrder<T>,
    elements: Tiered<T>,
}

impl<T> SortedSet<T> {
    /// Creates the empty sorted set for `order`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::{Comparator, SortedSet};
    ///
    /// let set = SortedSet::empty(Comparator::<i32>::reverse_natural().into());
    /// assert_eq!(set.with(1).with(2).as_slice(), &[2, 1]);
    /// ```
    #[must_use]
    pub const fn empty(order: SortOrder<T>) -> Self {
        Self {
            order,
            elements: Tiered::Empty,
        }
    }

    pub(crate) fn from_sorted_vec(order: SortOrder<T>, elements: Vec<T>) -> Self {
        debug_assert!(
            array_ops::is_strictly_sorted(&elements, |left, right| order.compare(left, right)),
            "{SORTED_INVARIANT_MESSAGE}"
        );
        Self {
            order,
            elements: Tiered::condense(elements),
        }
    }

    /// Sorts `elements` under `order` and keeps the first of each tying run.
    pub(crate) fn from_unsorted_vec(order: SortOrder<T>, elements: Vec<T>) -> Self {
        let elements = array_ops::sort_unique(elements, |left, right| order.compare(left, right));
        Self::from_sorted_vec(order, elements)
    }

    pub(crate) const fn tiered(&self) -> &Tiered<T> {
        &self.elements
    }

    /// Returns the order this set is sorted by.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &SortOrder<T> {
        &self.order
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.elements, Tiered::Empty)
    }

    /// Returns the representation tier currently in use.
    #[inline]
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.elements.tier()
    }

    /// Returns `true` if both sets are the same instance.
    ///
    /// Empty sets are the same instance when they share the same order.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.order.same_order(&other.order) && self.elements.ptr_eq(&other.elements)
    }

    /// Returns the elements in order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.elements.as_slice()
    }

    /// Returns an iterator over the elements in order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns the element at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NoSuchKey`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T, CollectionError> {
        self.as_slice().get(index).ok_or(CollectionError::NoSuchKey {
            index,
            length: self.len(),
        })
    }

    /// Returns the smallest element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the largest element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    fn search(&self, element: &T) -> Result<usize, usize> {
        self.as_slice()
            .binary_search_by(|probe| self.order.compare(probe, element))
    }

    /// Returns the number of elements ordered before `bound`.
    fn rank(&self, bound: &T) -> usize {
        self.as_slice()
            .partition_point(|probe| self.order.compare(probe, bound) == Ordering::Less)
    }

    /// Returns `true` if some element ties with `element` under the order.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.search(element).is_ok()
    }

    /// Returns the position of the element tying with `element`.
    #[must_use]
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.search(element).ok()
    }
}

impl<T: Ord> SortedSet<T> {
    /// Creates the empty sorted set under natural ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::empty(SortOrder::natural())
    }
}

impl<T: Clone> SortedSet<T> {
    fn rebuild(&self, elements: Vec<T>) -> Self {
        Self::from_sorted_vec(self.order.clone(), elements)
    }

    /// Adds `element` at its sorted position.
    ///
    /// Returns the same instance when a tying element is already present.
    #[must_use]
    pub fn with(&self, element: T) -> Self {
        if self.contains(&element) {
            return self.clone();
        }
        self.rebuild(array_ops::union_into_sorted(
            self.as_slice(),
            std::slice::from_ref(&element),
            |left, right| self.order.compare(left, right),
        ))
    }

    /// Adds every element of `elements`.
    ///
    /// Incoming elements are sorted and merged in one linear pass. Returns the
    /// same instance when nothing new was added.
    #[must_use]
    pub fn with_all<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let compare = |left: &T, right: &T| self.order.compare(left, right);
        let incoming = array_ops::sort_unique(elements.into_iter().collect(), compare);
        if incoming.is_empty() {
            return self.clone();
        }
        let merged = array_ops::union_into_sorted(self.as_slice(), &incoming, compare);
        if merged.len() == self.len() {
            self.clone()
        } else {
            self.rebuild(merged)
        }
    }

    /// Removes the element tying with `element`.
    ///
    /// Returns the same instance when none is present.
    #[must_use]
    pub fn without(&self, element: &T) -> Self {
        self.index_of(element)
            .and_then(|index| array_ops::delete(self.as_slice(), index).ok())
            .map_or_else(|| self.clone(), |remaining| self.rebuild(remaining))
    }

    /// Removes every element tying with one of `elements`.
    ///
    /// Returns the same instance when nothing matches.
    #[must_use]
    pub fn without_all<'a, I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut marks = vec![false; self.len()];
        let mut marked = false;
        for position in elements.into_iter().filter_map(|element| self.index_of(element)) {
            marks[position] = true;
            marked = true;
        }
        if marked {
            self.rebuild(array_ops::delete_marked(self.as_slice(), &marks))
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
            self.rebuild(self.as_slice()[start..end].to_vec())
        }
    }

    /// Returns the elements ordered strictly before `to`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::{SortOrder, sorted_set_of};
    ///
    /// let set = sorted_set_of(SortOrder::natural(), [1, 2, 3, 4]);
    /// assert_eq!(set.head_set(&3).as_slice(), &[1, 2]);
    /// assert!(set.head_set(&10).ptr_eq(&set));
    /// ```
    #[must_use]
    pub fn head_set(&self, to: &T) -> Self {
        self.range(0, self.rank(to))
    }

    /// Returns the elements ordered at or after `from`.
    #[must_use]
    pub fn tail_set(&self, from: &T) -> Self {
        self.range(self.rank(from), self.len())
    }

    /// Returns the elements ordered at or after `from` and strictly before
    /// `to`.
    ///
    /// An inverted range yields the empty set.
    #[must_use]
    pub fn sub_set(&self, from: &T, to: &T) -> Self {
        self.range(self.rank(from), self.rank(to))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for SortedSet<T> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            elements: self.elements.clone(),
        }
    }
}

impl<T: Ord> Default for SortedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for SortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_unsorted_vec(SortOrder::natural(), iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a SortedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for SortedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.elements.ptr_eq(&other.elements) || self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for SortedSet<T> {}

impl<T: Hash> Hash for SortedSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for SortedSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Tests
// =============================================================================
