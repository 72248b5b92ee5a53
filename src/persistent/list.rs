//! Persistent (immutable) size-tiered list.
//!
//! This module provides [`List`], an immutable, array-backed sequence that
//! always uses the smallest representation for its length.
//!
//! # Overview
//!
//! - An empty list owns no storage.
//! - A one-element list holds its element in a single cell.
//! - Longer lists hold one flat array.
//!
//! Every mutator returns a new list and leaves the original untouched. When a
//! mutation would not change the content, the original instance itself is
//! returned, which [`List::ptr_eq`] can observe.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{List, Tier, list_of};
//!
//! let list = list_of([1, 2, 3, 4, 5, 6]);
//! let shorter = list.without(&3);
//! assert_eq!(shorter, list_of([1, 2, 4, 5, 6]));
//! assert_eq!(list.len(), 6); // Original unchanged
//!
//! // No-op mutations hand back the very same instance
//! assert!(list.without(&42).ptr_eq(&list));
//!
//! // Removals downgrade the tier
//! let pair = list_of([1, 2]);
//! assert_eq!(pair.without(&1).tier(), Tier::Single);
//! ```
//!
//! # Time Complexity
//!
//! | Operation     | Complexity |
//! |---------------|------------|
//! | `get`         | O(1)       |
//! | `with`        | O(n)       |
//! | `with_at`     | O(n)       |
//! | `without`     | O(n)       |
//! | `without_all` | O(n + m)   |
//! | `sub_list`    | O(to - from) |

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Index;

use super::array_ops;
use super::tier::{Tier, Tiered};
use crate::error::CollectionError;

/// A persistent, size-tiered list.
///
/// Cloning a `List` is O(1) and shares storage with the original.
pub struct List<T> {
    elements: Tiered<T>,
}

impl<T> List<T> {
    /// Creates the empty list.
    ///
    /// The empty list owns no storage, and every empty list is identical to
    /// every other.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::List;
    ///
    /// let list: List<i32> = List::new();
    /// assert!(list.is_empty());
    /// assert!(list.ptr_eq(&List::new()));
    /// ```
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

    pub(crate) fn condense(elements: Vec<T>) -> Self {
        Self::from_tiered(Tiered::condense(elements))
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the list contains no elements.
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

    /// Returns `true` if both lists are the same instance.
    ///
    /// All empty lists are the same instance.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.elements.ptr_eq(&other.elements)
    }

    /// Returns the elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.elements.as_slice()
    }

    /// Returns an iterator over the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::OutOfRange`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::list_of;
    ///
    /// let list = list_of(['a', 'b']);
    /// assert_eq!(list.get(1), Ok(&'b'));
    /// assert!(list.get(2).is_err());
    /// ```
    pub fn get(&self, index: usize) -> Result<&T, CollectionError> {
        self.as_slice().get(index).ok_or(CollectionError::OutOfRange {
            index,
            length: self.len(),
        })
    }

    /// Returns the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the last element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }
}

impl<T: PartialEq> List<T> {
    /// Returns `true` if the list contains `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.as_slice().contains(element)
    }

    /// Returns the position of the first occurrence of `element`.
    #[must_use]
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.iter().position(|candidate| candidate == element)
    }
}

impl<T: Clone> List<T> {
    /// Appends `element`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::{List, Tier};
    ///
    /// let list = List::new().with(1);
    /// assert_eq!(list.tier(), Tier::Single);
    /// assert_eq!(list.as_slice(), &[1]);
    /// ```
    #[must_use]
    pub fn with(&self, element: T) -> Self {
        Self::condense(array_ops::append(self.as_slice(), element))
    }

    /// Inserts `element` at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::OutOfRange`] if `index > len()`.
    pub fn with_at(&self, index: usize, element: T) -> Result<Self, CollectionError> {
        array_ops::insert(self.as_slice(), index, element).map(Self::condense)
    }

    /// Appends every element of `elements`.
    ///
    /// Returns the same instance when `elements` is empty.
    #[must_use]
    pub fn with_all<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let incoming: Vec<T> = elements.into_iter().collect();
        if incoming.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return Self::condense(incoming);
        }
        let mut combined = Vec::with_capacity(self.len() + incoming.len());
        combined.extend_from_slice(self.as_slice());
        combined.extend(incoming);
        Self::condense(combined)
    }

    /// Splices every element of `elements` in at `index`.
    ///
    /// Returns the same instance when `elements` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::OutOfRange`] if `index > len()`, even when
    /// `elements` is empty.
    pub fn with_all_at<I>(&self, index: usize, elements: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut elements = elements.into_iter().peekable();
        if index <= self.len() && elements.peek().is_none() {
            return Ok(self.clone());
        }
        array_ops::insert_all(self.as_slice(), index, elements).map(Self::condense)
    }

    /// Removes the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::OutOfRange`] if `index >= len()`.
    pub fn delete(&self, index: usize) -> Result<Self, CollectionError> {
        array_ops::delete(self.as_slice(), index).map(Self::condense)
    }

    /// Returns the elements in `[from, to)`.
    ///
    /// An empty range yields the empty list and the full range yields the
    /// same instance. Any other range is copied, so the result never keeps
    /// the parent's array alive.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::OutOfRange`] if `from > to` or `to > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::list_of;
    ///
    /// let list = list_of([1, 2, 3, 4]);
    /// assert_eq!(list.sub_list(1, 3).unwrap(), list_of([2, 3]));
    /// assert!(list.sub_list(0, 4).unwrap().ptr_eq(&list));
    /// assert!(list.sub_list(2, 2).unwrap().is_empty());
    /// ```
    pub fn sub_list(&self, from: usize, to: usize) -> Result<Self, CollectionError> {
        let length = self.len();
        if to > length {
            return Err(CollectionError::OutOfRange { index: to, length });
        }
        if from > to {
            return Err(CollectionError::OutOfRange { index: from, length: to });
        }
        if from == to {
            return Ok(Self::new());
        }
        if from == 0 && to == length {
            return Ok(self.clone());
        }
        Ok(Self::condense(self.as_slice()[from..to].to_vec()))
    }
}

impl<T: Clone + PartialEq> List<T> {
    /// Replaces the element at `index`.
    ///
    /// Returns the same instance when the slot already holds an equal element.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::OutOfRange`] if `index >= len()`.
    pub fn replace(&self, index: usize, element: T) -> Result<Self, CollectionError> {
        if self.get(index)? == &element {
            return Ok(self.clone());
        }
        array_ops::replace(self.as_slice(), index, element).map(Self::condense)
    }

    /// Removes the first occurrence of `element`.
    ///
    /// Returns the same instance when `element` is absent.
    #[must_use]
    pub fn without(&self, element: &T) -> Self {
        self.index_of(element)
            .and_then(|index| array_ops::delete(self.as_slice(), index).ok())
            .map_or_else(|| self.clone(), Self::condense)
    }
}

impl<T: Clone + Eq + Hash> List<T> {
    /// Removes every occurrence of every element in `elements`.
    ///
    /// Returns the same instance when nothing matches.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::list_of;
    ///
    /// let list = list_of([1, 2, 1, 3]);
    /// assert_eq!(list.without_all(&[1, 9]), list_of([2, 3]));
    /// assert!(list.without_all(&[]).ptr_eq(&list));
    /// ```
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
            Self::condense(remaining)
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
        }
    }
}

impl<T> Default for List<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::condense(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::condense(elements)
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().to_vec().into_iter()
    }
}

impl<T> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: Hash> Hash for List<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for List<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Tests
// =============================================================================
