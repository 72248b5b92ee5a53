//! Persistent (immutable) size-tiered set.
//!
//! This module provides [`Set`], an immutable set stored as one flat,
//! duplicate-free array in insertion order.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{Set, Tier, set_of};
//!
//! let set = set_of([3, 1, 3, 2]);
//! assert_eq!(set.as_slice(), &[3, 1, 2]);
//!
//! // Adding an element that is already present is a no-op
//! assert!(set.with(1).ptr_eq(&set));
//!
//! // Equality ignores order
//! assert_eq!(set, set_of([1, 2, 3]));
//! ```

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::FromIterator;

use rustc_hash::{FxBuildHasher, FxHashSet};

use super::array_ops;
use super::tier::{Tier, Tiered};
use crate::error::CollectionError;

/// Combines per-element hashes so that iteration order does not matter.
pub(crate) fn unordered_hash<T, I>(elements: I) -> u64
where
    T: Hash,
    I: IntoIterator<Item = T>,
{
    elements
        .into_iter()
        .map(|element| FxBuildHasher.hash_one(element))
        .fold(0_u64, u64::wrapping_add)
}

/// A persistent, size-tiered set with insertion-ordered storage.
pub struct Set<T> {
    elements: Tiered<T>,
}

impl<T> Set<T> {
    /// Creates the empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Tiered::Empty,
        }
    }

    pub(crate) const fn from_tiered(elements: Tiered<T>) -> Self {
        Self { elements }
    }

    pub(crate) const fn tiered(&self) -> &Tiered<T> {
        &self.elements
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
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.elements.ptr_eq(&other.elements)
    }

    /// Returns the elements in storage order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.elements.as_slice()
    }

    /// Returns an iterator over the elements in storage order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns the element stored at position `index`.
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
}

impl<T: PartialEq> Set<T> {
    /// Returns `true` if the set contains `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.as_slice().contains(element)
    }

    /// Returns the storage position of `element`.
    #[must_use]
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.iter().position(|candidate| candidate == element)
    }
}

impl<T: Clone + Eq + Hash> Set<T> {
    pub(crate) fn from_unique_vec(elements: Vec<T>) -> Self {
        debug_assert_eq!(
            array_ops::distinct(elements.clone()).len(),
            elements.len(),
            "set elements must be unique"
        );
        Self::from_tiered(Tiered::condense(elements))
    }

    /// Adds `element`.
    ///
    /// Returns the same instance when `element` is already present.
    #[must_use]
    pub fn with(&self, element: T) -> Self {
        if self.contains(&element) {
            self.clone()
        } else {
            Self::from_tiered(Tiered::condense(array_ops::append(self.as_slice(), element)))
        }
    }

    /// Adds every element of `elements` that is not yet present.
    ///
    /// Returns the same instance when nothing new was added.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::set_of;
    ///
    /// let set = set_of([1, 2]);
    /// assert_eq!(set.with_all([2, 3, 3]).as_slice(), &[1, 2, 3]);
    /// assert!(set.with_all([2, 1]).ptr_eq(&set));
    /// ```
    #[must_use]
    pub fn with_all<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let incoming: Vec<T> = elements.into_iter().collect();
        let union = array_ops::union_into(self.as_slice(), &incoming);
        if union.len() == self.len() {
            self.clone()
        } else {
            Self::from_tiered(Tiered::condense(union))
        }
    }

    /// Removes `element`.
    ///
    /// Returns the same instance when `element` is absent.
    #[must_use]
    pub fn without(&self, element: &T) -> Self {
        self.index_of(element)
            .and_then(|index| array_ops::delete(self.as_slice(), index).ok())
            .map_or_else(|| self.clone(), |remaining| Self::from_tiered(Tiered::condense(remaining)))
    }

    /// Removes every element of `elements`.
    ///
    /// Returns the same instance when nothing matches.
    #[must_use]
    pub fn without_all<'a, I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let remaining = array_ops::delete_all(self.as_slice(), elements);
        if remaining.len() == self.len() {
            self.clone()
        } else {
            Self::from_tiered(Tiered::condense(remaining))
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
        }
    }
}

impl<T> Default for Set<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_tiered(Tiered::condense(array_ops::distinct(iter.into_iter().collect())))
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Eq + Hash> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        let others: FxHashSet<&T> = other.iter().collect();
        self.iter().all(|element| others.contains(element))
    }
}

impl<T: Eq + Hash> Eq for Set<T> {}

impl<T: Hash> Hash for Set<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        unordered_hash(self.iter()).hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Set<T> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[rstest]
    fn test_from_iter_keeps_first_occurrence() {
        let set: Set<i32> = [2, 1, 2, 3, 1].into_iter().collect();
        assert_eq!(set.as_slice(), &[2, 1, 3]);
        assert_eq!(set.tier(), Tier::Multi);
    }

    #[rstest]
    fn test_with_present_is_identity() {
        let set: Set<i32> = [1, 2].into_iter().collect();
        assert!(set.with(2).ptr_eq(&set));
        assert_eq!(set.with(3).as_slice(), &[1, 2, 3]);
    }

    #[rstest]
    fn test_without_downgrades() {
        let set: Set<&str> = ["a", "b"].into_iter().collect();
        let single = set.without(&"a");
        assert_eq!(single.tier(), Tier::Single);
        assert!(single.without(&"b").ptr_eq(&Set::new()));
        assert!(set.without(&"z").ptr_eq(&set));
    }

    #[rstest]
    fn test_without_all_no_match_is_identity() {
        let set: Set<i32> = (0..20).collect();
        assert!(set.without_all(&[100, 200]).ptr_eq(&set));
        assert_eq!(set.without_all(&(0..19).collect::<Vec<_>>()).as_slice(), &[19]);
    }

    #[rstest]
    #[case::first(0, Ok(&'x'))]
    #[case::past_end(2, Err(CollectionError::NoSuchKey { index: 2, length: 2 }))]
    fn test_get(#[case] index: usize, #[case] expected: Result<&char, CollectionError>) {
        let set: Set<char> = ['x', 'y'].into_iter().collect();
        assert_eq!(set.get(index), expected);
    }

    #[rstest]
    fn test_equality_and_hash_ignore_order() {
        let left: Set<i32> = [1, 2, 3].into_iter().collect();
        let right: Set<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(left, right);
        assert_eq!(hash_of(&left), hash_of(&right));
        assert_ne!(left, [1, 2].into_iter().collect());
    }

    #[rstest]
    fn test_display() {
        let set: Set<i32> = [1, 2].into_iter().collect();
        assert_eq!(format!("{set}"), "{1, 2}");
    }
}
