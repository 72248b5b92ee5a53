//! Size-tiered storage shared by every collection family.
//!
//! A container stores its content in one of three tiers:
//!
//! ```text
//!     count == 0          count == 1              count >= 2
//!   ┌──────────┐     ┌─────────────────┐     ┌──────────────────────┐
//!   │  Empty   │     │ Single(Rc<T>)   │     │ Multi(Rc<[T]>)       │
//!   │ no alloc │     │ one cell        │     │ one flat array       │
//!   └──────────┘     └─────────────────┘     └──────────────────────┘
//! ```
//!
//! [`Tiered::condense`] and [`TieredColumns::condense`] are the only places
//! that choose a tier. Every construction and mutation path funnels its final
//! array through one of them, which keeps the representation minimal for the
//! size.

use super::ReferenceCounter;

/// The representation tier a container currently uses.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::{Tier, empty_list};
///
/// let list = empty_list::<i32>();
/// assert_eq!(list.tier(), Tier::Empty);
/// assert_eq!(list.with(1).tier(), Tier::Single);
/// assert_eq!(list.with(1).with(2).tier(), Tier::Multi);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// No elements and no storage.
    Empty,
    /// Exactly one element held in a single cell.
    Single,
    /// Two or more elements held in a flat array.
    Multi,
}

impl Tier {
    /// Returns the minimal tier for a collection of `count` elements.
    #[inline]
    #[must_use]
    pub const fn for_count(count: usize) -> Self {
        match count {
            0 => Self::Empty,
            1 => Self::Single,
            _ => Self::Multi,
        }
    }
}

// =============================================================================
// Flat Storage
// =============================================================================

/// Tiered storage for a flat sequence of elements.
pub(crate) enum Tiered<T> {
    Empty,
    Single(ReferenceCounter<T>),
    Multi(ReferenceCounter<[T]>),
}

impl<T> Clone for Tiered<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(element) => Self::Single(ReferenceCounter::clone(element)),
            Self::Multi(elements) => Self::Multi(ReferenceCounter::clone(elements)),
        }
    }
}

impl<T> Tiered<T> {
    /// Selects the minimal tier for `elements`.
    pub(crate) fn condense(mut elements: Vec<T>) -> Self {
        match elements.len() {
            0 => Self::Empty,
            1 => elements
                .pop()
                .map_or(Self::Empty, |element| Self::Single(ReferenceCounter::new(element))),
            _ => Self::Multi(ReferenceCounter::from(elements)),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Multi(elements) => elements.len(),
        }
    }

    #[inline]
    pub(crate) const fn tier(&self) -> Tier {
        match self {
            Self::Empty => Tier::Empty,
            Self::Single(_) => Tier::Single,
            Self::Multi(_) => Tier::Multi,
        }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::Single(element) => std::slice::from_ref(&**element),
            Self::Multi(elements) => elements,
        }
    }

    /// Returns `true` if both share the same storage cell or are both empty.
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Single(left), Self::Single(right)) => ReferenceCounter::ptr_eq(left, right),
            (Self::Multi(left), Self::Multi(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }
}

// =============================================================================
// Column Storage
// =============================================================================

/// Parallel, index-aligned key and value arrays.
pub(crate) struct Columns<K, V> {
    keys: Box<[K]>,
    values: Box<[V]>,
}

/// Tiered storage for a map held as parallel key and value columns.
pub(crate) enum TieredColumns<K, V> {
    Empty,
    Single(ReferenceCounter<(K, V)>),
    Multi(ReferenceCounter<Columns<K, V>>),
}

impl<K, V> Clone for TieredColumns<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(entry) => Self::Single(ReferenceCounter::clone(entry)),
            Self::Multi(columns) => Self::Multi(ReferenceCounter::clone(columns)),
        }
    }
}

impl<K, V> TieredColumns<K, V> {
    /// Selects the minimal tier for the given columns.
    ///
    /// The columns must have equal length. In release builds a longer column
    /// is truncated to the shorter one.
    pub(crate) fn condense(mut keys: Vec<K>, mut values: Vec<V>) -> Self {
        debug_assert_eq!(
            keys.len(),
            values.len(),
            "key and value columns must be index-aligned"
        );
        let length = keys.len().min(values.len());
        keys.truncate(length);
        values.truncate(length);
        match length {
            0 => Self::Empty,
            1 => match (keys.pop(), values.pop()) {
                (Some(key), Some(value)) => Self::Single(ReferenceCounter::new((key, value))),
                _ => Self::Empty,
            },
            _ => Self::Multi(ReferenceCounter::new(Columns {
                keys: keys.into_boxed_slice(),
                values: values.into_boxed_slice(),
            })),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Multi(columns) => columns.keys.len(),
        }
    }

    #[inline]
    pub(crate) const fn tier(&self) -> Tier {
        match self {
            Self::Empty => Tier::Empty,
            Self::Single(_) => Tier::Single,
            Self::Multi(_) => Tier::Multi,
        }
    }

    #[inline]
    pub(crate) fn keys(&self) -> &[K] {
        match self {
            Self::Empty => &[],
            Self::Single(entry) => std::slice::from_ref(&entry.0),
            Self::Multi(columns) => &columns.keys,
        }
    }

    #[inline]
    pub(crate) fn values(&self) -> &[V] {
        match self {
            Self::Empty => &[],
            Self::Single(entry) => std::slice::from_ref(&entry.1),
            Self::Multi(columns) => &columns.values,
        }
    }

    /// Returns `true` if both share the same storage cell or are both empty.
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Single(left), Self::Single(right)) => ReferenceCounter::ptr_eq(left, right),
            (Self::Multi(left), Self::Multi(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(0, Tier::Empty)]
    #[case::single(1, Tier::Single)]
    #[case::pair(2, Tier::Multi)]
    #[case::many(100, Tier::Multi)]
    fn test_condense_selects_minimal_tier(#[case] count: usize, #[case] expected: Tier) {
        let tiered = Tiered::condense((0..count).collect());
        assert_eq!(tiered.tier(), expected);
        assert_eq!(tiered.tier(), Tier::for_count(count));
        assert_eq!(tiered.len(), count);
        assert_eq!(tiered.as_slice(), (0..count).collect::<Vec<_>>().as_slice());
    }

    #[rstest]
    #[case::empty(0, Tier::Empty)]
    #[case::single(1, Tier::Single)]
    #[case::many(5, Tier::Multi)]
    fn test_condense_columns_selects_minimal_tier(#[case] count: usize, #[case] expected: Tier) {
        let keys: Vec<usize> = (0..count).collect();
        let values: Vec<String> = keys.iter().map(ToString::to_string).collect();
        let columns = TieredColumns::condense(keys.clone(), values.clone());
        assert_eq!(columns.tier(), expected);
        assert_eq!(columns.len(), count);
        assert_eq!(columns.keys(), keys.as_slice());
        assert_eq!(columns.values(), values.as_slice());
    }

    #[rstest]
    fn test_ptr_eq_tracks_shared_storage() {
        let first = Tiered::condense(vec![1, 2, 3]);
        let shared = first.clone();
        let rebuilt = Tiered::condense(vec![1, 2, 3]);
        assert!(first.ptr_eq(&shared));
        assert!(!first.ptr_eq(&rebuilt));
        assert!(Tiered::<i32>::Empty.ptr_eq(&Tiered::condense(Vec::new())));
    }

    #[rstest]
    fn test_single_tier_slice_views() {
        let columns = TieredColumns::condense(vec!["key"], vec![7]);
        assert_eq!(columns.keys(), &["key"]);
        assert_eq!(columns.values(), &[7]);
        let tiered = Tiered::condense(vec!["only"]);
        assert_eq!(tiered.as_slice(), &["only"]);
    }
}
