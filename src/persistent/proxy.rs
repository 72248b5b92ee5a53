//! Serialization proxies for every collection family.
//!
//! Collections serialize as a flat sequence headed by their size:
//!
//! ```text
//! List, Set           [count, e1, e2, ...]
//! Map                 [count, k1, v1, k2, v2, ...]
//! SortedSet           [comparator, count, e1, e2, ...]
//! SortedMap           [comparator, count, k1, v1, ...]
//! ```
//!
//! The comparator slot holds `null` for natural ordering and the comparator's
//! name otherwise. Deserialization rebuilds through the same condensing path
//! as ordinary construction, so a zero count yields the canonical empty
//! instance and any other count yields the tier a fresh build would pick.
//!
//! Natural-order sorted collections implement [`serde::Deserialize`]
//! directly. Collections with an explicit comparator are deserialized through
//! a [`ComparatorRegistry`] that maps names back to comparators.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::{Comparator, ComparatorRegistry, sorted_set_of};
//! use serde::de::DeserializeSeed;
//!
//! let reverse = Comparator::<i32>::reverse_natural();
//! let set = sorted_set_of(reverse.clone().into(), [1, 3, 2]);
//! let json = serde_json::to_string(&set).unwrap();
//! assert_eq!(json, r#"["reverse",3,3,2,1]"#);
//!
//! let registry = ComparatorRegistry::new().register(reverse);
//! let mut deserializer = serde_json::Deserializer::from_str(&json);
//! let restored = registry.sorted_set_seed().deserialize(&mut deserializer).unwrap();
//! assert_eq!(restored, set);
//! ```

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;
use serde::de::{self, DeserializeSeed, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::array_ops;
use super::comparator::{Comparator, NaturalOrder, SortOrder};
use super::tier::{Tiered, TieredColumns};
use super::{List, Map, Set, SortedMap, SortedSet};
use crate::error::CollectionError;

/// Upper bound on capacity reserved up front from an untrusted count.
const MAX_PREALLOCATE: usize = 4096;

// =============================================================================
// Payload Helpers
// =============================================================================

fn next_required<'de, A, T>(seq: &mut A, argument: &'static str) -> Result<T, A::Error>
where
    A: SeqAccess<'de>,
    T: Deserialize<'de>,
{
    seq.next_element()?
        .ok_or_else(|| de::Error::custom(CollectionError::MissingArgument { argument }))
}

fn read_elements<'de, A, T>(seq: &mut A, count: usize) -> Result<Vec<T>, A::Error>
where
    A: SeqAccess<'de>,
    T: Deserialize<'de>,
{
    let mut elements = Vec::with_capacity(count.min(MAX_PREALLOCATE));
    for _ in 0..count {
        elements.push(next_required(seq, "element")?);
    }
    Ok(elements)
}

fn read_entries<'de, A, K, V>(seq: &mut A, count: usize) -> Result<(Vec<K>, Vec<V>), A::Error>
where
    A: SeqAccess<'de>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    let capacity = count.min(MAX_PREALLOCATE);
    let mut keys = Vec::with_capacity(capacity);
    let mut values = Vec::with_capacity(capacity);
    for _ in 0..count {
        keys.push(next_required(seq, "key")?);
        values.push(next_required(seq, "value")?);
    }
    Ok((keys, values))
}

/// Rejects any item past the `consumed` items already read.
fn expect_end<'de, A>(seq: &mut A, consumed: usize) -> Result<(), A::Error>
where
    A: SeqAccess<'de>,
{
    if seq.next_element::<IgnoredAny>()?.is_some() {
        return Err(de::Error::invalid_length(
            consumed + 1,
            &"no items past the declared count",
        ));
    }
    Ok(())
}

fn log_collapsed(family: &str, declared: usize, kept: usize) {
    if kept < declared {
        log::debug!(
            "{family} payload collapsed {} duplicate entries ({declared} declared, {kept} kept)",
            declared - kept
        );
    }
}

fn log_unsorted<T>(family: &str, order: &SortOrder<T>, elements: &[T]) {
    if !array_ops::is_strictly_sorted(elements, |left, right| order.compare(left, right)) {
        log::debug!("{family} payload is not in {order:?} order, re-sorting");
    }
}

// =============================================================================
// Serialize
// =============================================================================

impl<T: Serialize> Serialize for List<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len() + 1))?;
        seq.serialize_element(&self.len())?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<T: Serialize> Serialize for Set<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len() + 1))?;
        seq.serialize_element(&self.len())?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<K: Serialize, V: Serialize> Serialize for Map<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2 * self.len() + 1))?;
        seq.serialize_element(&self.len())?;
        for (key, value) in self {
            seq.serialize_element(key)?;
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<T: Serialize> Serialize for SortedSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len() + 2))?;
        seq.serialize_element(&self.comparator().name())?;
        seq.serialize_element(&self.len())?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<K: Serialize, V: Serialize> Serialize for SortedMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2 * self.len() + 2))?;
        seq.serialize_element(&self.comparator().name())?;
        seq.serialize_element(&self.len())?;
        for (key, value) in self {
            seq.serialize_element(key)?;
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

// =============================================================================
// Deserialize: Unsorted Families
// =============================================================================

struct ListVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for ListVisitor<T> {
    type Value = List<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence [count, elements...]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let count: usize = next_required(&mut seq, "count")?;
        let elements = read_elements(&mut seq, count)?;
        expect_end(&mut seq, count + 1)?;
        Ok(List::from_tiered(Tiered::condense(elements)))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for List<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ListVisitor {
            marker: PhantomData,
        })
    }
}

struct SetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for SetVisitor<T>
where
    T: Deserialize<'de> + Clone + Eq + Hash,
{
    type Value = Set<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence [count, elements...]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let count: usize = next_required(&mut seq, "count")?;
        let elements = array_ops::distinct(read_elements(&mut seq, count)?);
        expect_end(&mut seq, count + 1)?;
        log_collapsed("set", count, elements.len());
        Ok(Set::from_unique_vec(elements))
    }
}

impl<'de, T> Deserialize<'de> for Set<T>
where
    T: Deserialize<'de> + Clone + Eq + Hash,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SetVisitor {
            marker: PhantomData,
        })
    }
}

struct MapVisitor<K, V> {
    key_marker: PhantomData<K>,
    value_marker: PhantomData<V>,
}

impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
where
    K: Deserialize<'de> + Clone + Eq + Hash,
    V: Deserialize<'de> + Clone,
{
    type Value = Map<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence [count, key, value, ...]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let count: usize = next_required(&mut seq, "count")?;
        let (keys, values) = read_entries(&mut seq, count)?;
        expect_end(&mut seq, 2 * count + 1)?;
        let (keys, values) = array_ops::union_into_columns(&[], &[], &keys, &values);
        log_collapsed("map", count, keys.len());
        Ok(Map::from_columns(TieredColumns::condense(keys, values)))
    }
}

impl<'de, K, V> Deserialize<'de> for Map<K, V>
where
    K: Deserialize<'de> + Clone + Eq + Hash,
    V: Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(MapVisitor {
            key_marker: PhantomData,
            value_marker: PhantomData,
        })
    }
}

// =============================================================================
// Comparator Registry
// =============================================================================

/// Resolves serialized comparator names back to orderings.
///
/// A registry optionally accepts `null` as natural ordering, and accepts each
/// registered comparator by name. Anything else is a
/// [`CollectionError::TypeMismatch`].
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::{Comparator, ComparatorRegistry};
///
/// let registry = ComparatorRegistry::<i32>::with_natural()
///     .register(Comparator::reverse_natural());
/// assert!(registry.resolve(None).unwrap().is_natural());
/// assert_eq!(registry.resolve(Some("reverse")).unwrap().name(), Some("reverse"));
/// assert!(registry.resolve(Some("unknown")).is_err());
/// ```
pub struct ComparatorRegistry<T> {
    comparators: FxHashMap<&'static str, Comparator<T>>,
    natural: Option<NaturalOrder<T>>,
}

impl<T> ComparatorRegistry<T> {
    /// Creates a registry that knows no comparator and rejects `null`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            comparators: FxHashMap::default(),
            natural: None,
        }
    }

    /// Adds `comparator` under its own name.
    ///
    /// A comparator registered later under the same name replaces the earlier
    /// one.
    #[must_use]
    pub fn register(mut self, comparator: Comparator<T>) -> Self {
        self.comparators.insert(comparator.name(), comparator);
        self
    }

    /// Resolves a serialized comparator slot.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] for an unknown name, or for
    /// `None` when natural ordering is not accepted.
    pub fn resolve(&self, name: Option<&str>) -> Result<SortOrder<T>, CollectionError> {
        match name {
            None => self.natural.map(SortOrder::Natural).ok_or_else(|| {
                CollectionError::TypeMismatch {
                    expected: "registered comparator",
                    found: "natural ordering".to_string(),
                }
            }),
            Some(name) => {
                let comparator =
                    self.comparators
                        .get(name)
                        .ok_or_else(|| CollectionError::TypeMismatch {
                            expected: if self.natural.is_some() {
                                "natural ordering or registered comparator"
                            } else {
                                "registered comparator"
                            },
                            found: format!("comparator `{name}`"),
                        })?;
                log::trace!("resolved comparator `{name}`");
                Ok(SortOrder::by(comparator.clone()))
            }
        }
    }

    /// Returns a seed that deserializes a [`SortedSet`] through this registry.
    #[must_use]
    pub const fn sorted_set_seed(&self) -> SortedSetSeed<'_, T> {
        SortedSetSeed { registry: self }
    }

    /// Returns a seed that deserializes a [`SortedMap`] through this registry.
    #[must_use]
    pub const fn sorted_map_seed<V>(&self) -> SortedMapSeed<'_, T, V> {
        SortedMapSeed {
            registry: self,
            value_marker: PhantomData,
        }
    }
}

impl<T: Ord> ComparatorRegistry<T> {
    /// Creates a registry that accepts `null` as natural ordering.
    #[must_use]
    pub fn with_natural() -> Self {
        Self {
            comparators: FxHashMap::default(),
            natural: Some(NaturalOrder::new()),
        }
    }
}

impl<T> Default for ComparatorRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ComparatorRegistry<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.comparators.keys().copied().collect();
        names.sort_unstable();
        formatter
            .debug_struct("ComparatorRegistry")
            .field("natural", &self.natural.is_some())
            .field("comparators", &names)
            .finish()
    }
}

// =============================================================================
// Deserialize: Sorted Families
// =============================================================================

/// Deserializes a [`SortedSet`] whose comparator is resolved by a registry.
pub struct SortedSetSeed<'r, T> {
    registry: &'r ComparatorRegistry<T>,
}

impl<'de, T: Deserialize<'de>> DeserializeSeed<'de> for SortedSetSeed<'_, T> {
    type Value = SortedSet<T>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for SortedSetSeed<'_, T> {
    type Value = SortedSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence [comparator, count, elements...]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let name: Option<String> = next_required(&mut seq, "comparator")?;
        let order = self
            .registry
            .resolve(name.as_deref())
            .map_err(de::Error::custom)?;
        let count: usize = next_required(&mut seq, "count")?;
        let elements = read_elements(&mut seq, count)?;
        expect_end(&mut seq, count + 2)?;
        log_unsorted("sorted set", &order, &elements);
        let set = SortedSet::from_unsorted_vec(order, elements);
        log_collapsed("sorted set", count, set.len());
        Ok(set)
    }
}

/// Deserializes a [`SortedMap`] whose comparator is resolved by a registry.
pub struct SortedMapSeed<'r, K, V> {
    registry: &'r ComparatorRegistry<K>,
    value_marker: PhantomData<V>,
}

impl<'de, K, V> DeserializeSeed<'de> for SortedMapSeed<'_, K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = SortedMap<K, V>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, K, V> Visitor<'de> for SortedMapSeed<'_, K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = SortedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence [comparator, count, key, value, ...]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let name: Option<String> = next_required(&mut seq, "comparator")?;
        let order = self
            .registry
            .resolve(name.as_deref())
            .map_err(de::Error::custom)?;
        let count: usize = next_required(&mut seq, "count")?;
        let (keys, values) = read_entries(&mut seq, count)?;
        expect_end(&mut seq, 2 * count + 2)?;
        log_unsorted("sorted map", &order, &keys);
        let map = SortedMap::from_unsorted_columns(order, keys, values);
        log_collapsed("sorted map", count, map.len());
        Ok(map)
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for SortedSet<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ComparatorRegistry::with_natural()
            .sorted_set_seed()
            .deserialize(deserializer)
    }
}

impl<'de, K, V> Deserialize<'de> for SortedMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ComparatorRegistry::with_natural()
            .sorted_map_seed()
            .deserialize(deserializer)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::{Tier, empty_list, empty_map, empty_set, list_of, map_of, set_of};
    use rstest::rstest;

    #[rstest]
    fn test_zero_count_yields_canonical_empty() {
        let list: List<i32> = serde_json::from_str("[0]").unwrap();
        let set: Set<i32> = serde_json::from_str("[0]").unwrap();
        let map: Map<String, i32> = serde_json::from_str("[0]").unwrap();
        let sorted_set: SortedSet<i32> = serde_json::from_str("[null,0]").unwrap();
        let sorted_map: SortedMap<i32, i32> = serde_json::from_str("[null,0]").unwrap();
        assert!(list.ptr_eq(&empty_list()));
        assert!(set.ptr_eq(&empty_set()));
        assert!(map.ptr_eq(&empty_map()));
        assert!(sorted_set.ptr_eq(&SortedSet::new()));
        assert!(sorted_map.ptr_eq(&SortedMap::new()));
    }

    #[rstest]
    #[case::list("[3,1,2,3]")]
    #[case::single("[1,9]")]
    fn test_list_wire_shape(#[case] json: &str) {
        let list: List<i32> = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&list).unwrap(), json);
        assert_eq!(list.tier(), Tier::for_count(list.len()));
    }

    #[rstest]
    fn test_map_wire_shape() {
        let map = map_of([("a".to_string(), 1), ("b".to_string(), 2)]);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"[2,"a",1,"b",2]"#);
    }

    #[rstest]
    fn test_duplicates_collapse() {
        let set: Set<i32> = serde_json::from_str("[3,1,1,1]").unwrap();
        assert_eq!(set, set_of([1]));
        assert_eq!(set.tier(), Tier::Single);
    }

    #[rstest]
    #[case::no_count("[]")]
    #[case::short("[3,1,2]")]
    fn test_short_payload_is_missing_argument(#[case] json: &str) {
        let error = serde_json::from_str::<List<i32>>(json).unwrap_err();
        assert!(error.to_string().starts_with("missing argument"), "{error}");
    }

    #[rstest]
    fn test_trailing_items_rejected() {
        assert!(serde_json::from_str::<List<i32>>("[1,1,2]").is_err());
        assert_eq!(list_of([1]), serde_json::from_str::<List<i32>>("[1,1]").unwrap());
    }

    #[rstest]
    fn test_natural_rejects_named_comparator() {
        let error = serde_json::from_str::<SortedSet<i32>>(r#"["reverse",0]"#).unwrap_err();
        assert!(error.to_string().starts_with("type mismatch"), "{error}");
    }

    #[rstest]
    fn test_registry_without_natural_rejects_null() {
        let registry = ComparatorRegistry::<i32>::new();
        assert!(matches!(
            registry.resolve(None),
            Err(CollectionError::TypeMismatch { .. })
        ));
    }
}
