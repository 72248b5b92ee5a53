//! Orderings for the sorted collection families.
//!
//! A sorted container stores a [`SortOrder`], which is either the natural
//! ordering of the element type or an explicit, named [`Comparator`]. The
//! order decides placement and lookup, but it never takes part in equality
//! or hashing of the container itself.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{Comparator, SortOrder};
//! use std::cmp::Ordering;
//!
//! let natural: SortOrder<i32> = SortOrder::natural();
//! assert_eq!(natural.compare(&1, &2), Ordering::Less);
//!
//! let reverse: SortOrder<i32> = Comparator::reverse_natural().into();
//! assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
//! assert_eq!(reverse.name(), Some("reverse"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use super::ReferenceCounter;

type CompareFunction<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// A named, shared total ordering over `T`.
///
/// Two comparators are the same comparator only if they share the same
/// underlying function, which is what [`Comparator::ptr_eq`] checks. Cloning
/// a comparator keeps its identity.
///
/// The name is what the serialization proxies write in place of the function,
/// and what a [`ComparatorRegistry`](super::ComparatorRegistry) resolves back.
pub struct Comparator<T> {
    name: &'static str,
    function: ReferenceCounter<CompareFunction<T>>,
}

impl<T> Comparator<T> {
    /// Creates a comparator from a name and a comparison function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condensed::persistent::Comparator;
    /// use std::cmp::Ordering;
    ///
    /// let by_length = Comparator::new("by-length", |left: &String, right: &String| {
    ///     left.len().cmp(&right.len())
    /// });
    /// assert_eq!(by_length.compare(&"ab".to_string(), &"c".to_string()), Ordering::Greater);
    /// ```
    pub fn new<F>(name: &'static str, function: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            name,
            function: ReferenceCounter::new(function),
        }
    }

    /// Returns the name of this comparator.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Compares two values.
    #[inline]
    pub fn compare(&self, left: &T, right: &T) -> Ordering {
        (self.function)(left, right)
    }

    /// Returns `true` if both comparators share the same function.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.function, &other.function)
    }
}

impl<T: Ord + 'static> Comparator<T> {
    /// Returns a fresh comparator that reverses the natural ordering.
    #[must_use]
    pub fn reverse_natural() -> Self {
        Self::new("reverse", |left: &T, right: &T| right.cmp(left))
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            function: ReferenceCounter::clone(&self.function),
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Comparator").field(&self.name).finish()
    }
}

/// The natural ordering of a type, captured as its `Ord::cmp`.
///
/// It can only be constructed for `T: Ord`, so a natural ordering over a
/// non-comparable type is rejected at compile time.
pub struct NaturalOrder<T> {
    compare: fn(&T, &T) -> Ordering,
}

impl<T: Ord> NaturalOrder<T> {
    /// Captures the natural ordering of `T`.
    #[must_use]
    pub fn new() -> Self {
        Self { compare: T::cmp }
    }
}

impl<T: Ord> Default for NaturalOrder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NaturalOrder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NaturalOrder<T> {}

/// The ordering of a sorted container.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::{Comparator, SortOrder};
///
/// let natural: SortOrder<i32> = SortOrder::default();
/// assert!(natural.is_natural());
///
/// let reverse = Comparator::<i32>::reverse_natural();
/// let explicit = SortOrder::from(reverse.clone());
/// assert!(explicit.same_order(&SortOrder::from(reverse)));
/// assert!(!explicit.same_order(&natural));
/// ```
pub enum SortOrder<T> {
    /// The element type's own `Ord` implementation.
    Natural(NaturalOrder<T>),
    /// An explicit comparator.
    Explicit(Comparator<T>),
}

impl<T: Ord> SortOrder<T> {
    /// Returns the natural ordering of `T`.
    #[must_use]
    pub fn natural() -> Self {
        Self::Natural(NaturalOrder::new())
    }
}

impl<T> SortOrder<T> {
    /// Returns an explicit ordering backed by `comparator`.
    #[must_use]
    pub fn by(comparator: Comparator<T>) -> Self {
        Self::Explicit(comparator)
    }

    /// Compares two values under this ordering.
    #[inline]
    pub fn compare(&self, left: &T, right: &T) -> Ordering {
        match self {
            Self::Natural(natural) => (natural.compare)(left, right),
            Self::Explicit(comparator) => comparator.compare(left, right),
        }
    }

    /// Returns `true` for the natural ordering.
    #[inline]
    #[must_use]
    pub const fn is_natural(&self) -> bool {
        matches!(self, Self::Natural(_))
    }

    /// Returns the explicit comparator, or `None` for the natural ordering.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> Option<&Comparator<T>> {
        match self {
            Self::Natural(_) => None,
            Self::Explicit(comparator) => Some(comparator),
        }
    }

    /// Returns the comparator name, or `None` for the natural ordering.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        match self {
            Self::Natural(_) => None,
            Self::Explicit(comparator) => Some(comparator.name()),
        }
    }

    /// Returns `true` if both orderings are the natural ordering, or both
    /// are the same explicit comparator.
    #[must_use]
    pub fn same_order(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Natural(_), Self::Natural(_)) => true,
            (Self::Explicit(left), Self::Explicit(right)) => left.ptr_eq(right),
            _ => false,
        }
    }
}

impl<T: Ord> Default for SortOrder<T> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<T> Clone for SortOrder<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Natural(natural) => Self::Natural(*natural),
            Self::Explicit(comparator) => Self::Explicit(comparator.clone()),
        }
    }
}

impl<T> From<Comparator<T>> for SortOrder<T> {
    fn from(comparator: Comparator<T>) -> Self {
        Self::Explicit(comparator)
    }
}

impl<T> fmt::Debug for SortOrder<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural(_) => formatter.write_str("Natural"),
            Self::Explicit(comparator) => formatter
                .debug_tuple("Explicit")
                .field(&comparator.name())
                .finish(),
        }
    }
}
