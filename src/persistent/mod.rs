//! Persistent (immutable) size-tiered collections.
//!
//! This module provides five immutable collection families that keep their
//! content in flat arrays and always use the smallest representation for
//! their size:
//!
//! - [`List`]: ordered sequence
//! - [`Set`]: duplicate-free, insertion-ordered set
//! - [`Map`]: parallel key and value columns, insertion-ordered
//! - [`SortedSet`]: set kept in strict order under a [`SortOrder`]
//! - [`SortedMap`]: map whose keys are kept in strict order
//!
//! # Tiers
//!
//! Every collection is in exactly one [`Tier`]. An empty collection owns no
//! storage, a single element lives in one cell, and anything larger lives in
//! one flat array. Every construction and mutation path chooses the tier
//! through the same condensing step, so the tier always matches the size.
//!
//! # Identity
//!
//! Collections are cheap handles. A mutation that would not change the
//! content returns the very same instance, which `ptr_eq` reports.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{Tier, empty_map, list_of, map_of};
//!
//! let list = list_of([1, 2, 3, 4, 5, 6]);
//! assert_eq!(list.without(&3), list_of([1, 2, 4, 5, 6]));
//! assert_eq!(list_of([1, 2]).without(&1).tier(), Tier::Single);
//!
//! let map = map_of([("a", 1), ("b", 2)]).without(&"a");
//! assert_eq!(map.tier(), Tier::Single);
//! assert!(map.without(&"b").ptr_eq(&empty_map()));
//! ```
//!
//! ## Sorted Collections
//!
//! ```rust
//! use condensed::persistent::{Comparator, SortOrder, sorted_set_of};
//!
//! let natural = sorted_set_of(SortOrder::natural(), [5, 3, 1, 4, 2]);
//! assert_eq!(natural.as_slice(), &[1, 2, 3, 4, 5]);
//!
//! let reverse = sorted_set_of(Comparator::reverse_natural().into(), [5, 3, 1, 4, 2]);
//! assert_eq!(reverse.as_slice(), &[5, 4, 3, 2, 1]);
//!
//! // Range views come back condensed
//! assert_eq!(natural.head_set(&3), sorted_set_of(SortOrder::natural(), [2, 1]));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

pub mod array_ops;
mod comparator;
mod factory;
mod list;
mod map;
#[cfg(feature = "serde")]
mod proxy;
mod set;
mod sorted_map;
mod sorted_set;
mod tier;
mod views;

pub use comparator::Comparator;
pub use comparator::NaturalOrder;
pub use comparator::SortOrder;
pub use factory::{
    ListSource, MapSource, SetSource, SortedMapSource, SortedSetSource, as_list, as_map, as_set,
    as_sorted_map, as_sorted_set, condense_list, condense_map, condense_set, condense_sorted_map,
    condense_sorted_set, empty_list, empty_map, empty_set, empty_sorted_map, empty_sorted_set,
    list_of, map_of, set_of, sorted_map_of, sorted_set_of,
};
pub use list::List;
pub use map::Map;
#[cfg(feature = "serde")]
pub use proxy::{ComparatorRegistry, SortedMapSeed, SortedSetSeed};
pub use set::Set;
pub use sorted_map::SortedMap;
pub use sorted_set::SortedSet;
pub use tier::Tier;
pub use views::{ColumnMap, EntrySet, KeySet, MapIter, Values};

// =============================================================================
// Thread Safety
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(List<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Set<String>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Map<String, i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(SortedSet<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(SortedMap<String, i32>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(List<i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Map<String, i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(SortedSet<i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
