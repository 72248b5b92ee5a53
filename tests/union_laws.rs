//! Property-based tests for the merge helpers and the sorted families.
//!
//! These tests check union results against a straightforward model, pin the
//! tie-break rule for column unions, and verify that sorted collections stay
//! strictly ordered after every mutator.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use condensed::persistent::{
    Comparator, SortOrder, SortedMap, SortedSet, array_ops, as_sorted_map, as_sorted_set,
};
use proptest::prelude::*;

fn sorted_unique(elements: &[i32]) -> Vec<i32> {
    elements.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn assert_strictly_ordered<T>(order: &SortOrder<T>, elements: &[T]) -> Result<(), TestCaseError> {
    for window in elements.windows(2) {
        prop_assert_eq!(order.compare(&window[0], &window[1]), Ordering::Less);
    }
    Ok(())
}

// =============================================================================
// Unsorted Union Law
// Description: union_into keeps the destination as a prefix and appends each
// new source element once, in source order
// =============================================================================

proptest! {
    #[test]
    fn prop_union_into_matches_model(
        destination in prop::collection::vec(0i32..20, 0..10),
        source in prop::collection::vec(0i32..20, 0..10)
    ) {
        let destination = array_ops::distinct(destination);
        let union = array_ops::union_into(&destination, &source);

        let mut expected = destination.clone();
        for element in &source {
            if !expected.contains(element) {
                expected.push(*element);
            }
        }
        prop_assert_eq!(union, expected);
    }
}

// =============================================================================
// Column Tie-Break Law
// Description: For a repeated key the last source value wins, and the key
// keeps its first position
// =============================================================================

proptest! {
    #[test]
    fn prop_union_into_columns_last_source_value_wins(
        destination in prop::collection::vec((0u8..8, any::<i16>()), 0..8),
        source in prop::collection::vec((0u8..8, any::<i16>()), 0..8)
    ) {
        let (raw_keys, raw_values) = array_ops::copy_columns(destination);
        let (destination_keys, destination_values) =
            array_ops::union_into_columns(&[], &[], &raw_keys, &raw_values);
        let (source_keys, source_values) = array_ops::copy_columns(source.clone());
        let (keys, values) =
            array_ops::union_into_columns(&destination_keys, &destination_values, &source_keys, &source_values);

        let mut expected_keys = destination_keys.clone();
        let mut expected_values = destination_values.clone();
        for (key, value) in source {
            match expected_keys.iter().position(|existing| *existing == key) {
                Some(position) => expected_values[position] = value,
                None => {
                    expected_keys.push(key);
                    expected_values.push(value);
                }
            }
        }
        prop_assert_eq!(keys, expected_keys);
        prop_assert_eq!(values, expected_values);
    }
}

proptest! {
    #[test]
    fn prop_union_into_sorted_columns_source_wins(
        destination in prop::collection::btree_map(any::<i8>(), any::<i16>(), 0..8),
        source in prop::collection::vec((any::<i8>(), any::<i16>()), 0..8)
    ) {
        let (destination_keys, destination_values) = array_ops::copy_columns(destination.clone());
        let (source_keys, source_values) = array_ops::copy_columns(source.clone());
        let (source_keys, source_values) =
            array_ops::sort_unique_columns(source_keys, source_values, i8::cmp);
        let (keys, values) = array_ops::union_into_sorted_columns(
            &destination_keys,
            &destination_values,
            &source_keys,
            &source_values,
            i8::cmp,
        );

        let mut expected = destination;
        expected.extend(source);
        let (expected_keys, expected_values) = array_ops::copy_columns(expected);
        prop_assert_eq!(keys, expected_keys);
        prop_assert_eq!(values, expected_values);
    }
}

// =============================================================================
// Sorted Union Law
// Description: union_into_sorted yields the strictly ordered set union
// =============================================================================

proptest! {
    #[test]
    fn prop_union_into_sorted_is_set_union(
        destination in prop::collection::vec(any::<i32>(), 0..12),
        source in prop::collection::vec(any::<i32>(), 0..12)
    ) {
        let destination = sorted_unique(&destination);
        let source_sorted = sorted_unique(&source);
        let union = array_ops::union_into_sorted(&destination, &source_sorted, i32::cmp);

        let mut combined = destination;
        combined.extend(source);
        prop_assert_eq!(union, sorted_unique(&combined));
    }
}

proptest! {
    #[test]
    fn prop_difference_sorted_removes_exactly(
        source in prop::collection::vec(0i32..32, 0..12),
        removed in prop::collection::vec(0i32..32, 0..12)
    ) {
        let source = sorted_unique(&source);
        let removed_sorted = sorted_unique(&removed);
        let remaining = array_ops::difference_sorted(&source, &removed_sorted, i32::cmp);

        let expected: Vec<i32> = source
            .iter()
            .copied()
            .filter(|element| !removed_sorted.contains(element))
            .collect();
        prop_assert_eq!(remaining, expected);
    }
}

// =============================================================================
// Sort Invariant Law
// Description: Every mutator leaves a sorted collection strictly ordered
// under its own comparator
// =============================================================================

proptest! {
    #[test]
    fn prop_sorted_set_mutators_keep_order(
        initial in prop::collection::vec(any::<i32>(), 0..12),
        added in prop::collection::vec(any::<i32>(), 0..6),
        removed in prop::collection::vec(any::<i32>(), 0..6),
        single: i32
    ) {
        let order: SortOrder<i32> = Comparator::reverse_natural().into();
        let set = as_sorted_set(order.clone(), initial);
        assert_strictly_ordered(&order, set.as_slice())?;

        let set = set.with(single);
        assert_strictly_ordered(&order, set.as_slice())?;
        let set = set.with_all(added.clone());
        assert_strictly_ordered(&order, set.as_slice())?;
        let set = set.without_all(&removed);
        assert_strictly_ordered(&order, set.as_slice())?;
        let set = set.without(&single);
        assert_strictly_ordered(&order, set.as_slice())?;

        for element in &added {
            prop_assert_eq!(set.contains(element), !removed.contains(element) && *element != single);
        }
    }
}

proptest! {
    #[test]
    fn prop_sorted_map_mutators_keep_order(
        initial in prop::collection::vec((any::<i16>(), any::<u8>()), 0..12),
        added in prop::collection::vec((any::<i16>(), any::<u8>()), 0..6),
        removed in prop::collection::vec(any::<i16>(), 0..6)
    ) {
        let order: SortOrder<i16> = Comparator::reverse_natural().into();
        let map: SortedMap<i16, u8> = as_sorted_map(order.clone(), initial);
        assert_strictly_ordered(&order, map.key_column())?;

        let map = map.with_all(added.clone());
        assert_strictly_ordered(&order, map.key_column())?;
        prop_assert_eq!(map.key_column().len(), map.value_column().len());

        let latest: BTreeMap<i16, u8> = added.into_iter().collect();
        for (key, value) in &latest {
            prop_assert_eq!(map.get(key), Some(value));
        }

        let map = map.without_all(&removed);
        assert_strictly_ordered(&order, map.key_column())?;
        for key in &removed {
            prop_assert!(!map.contains_key(key));
        }
    }
}

proptest! {
    #[test]
    fn prop_sub_set_stays_within_bounds(
        elements in prop::collection::vec(any::<i32>(), 0..16),
        low: i32,
        high: i32
    ) {
        let set: SortedSet<i32> = elements.into_iter().collect();
        let range = set.sub_set(&low, &high);
        assert_strictly_ordered(&SortOrder::natural(), range.as_slice())?;
        for element in &range {
            prop_assert!(low <= *element && *element < high);
        }
        if low < high {
            let expected = set.iter().filter(|element| low <= **element && **element < high).count();
            prop_assert_eq!(range.len(), expected);
        } else {
            prop_assert!(range.is_empty());
        }
    }
}

// =============================================================================
// Comparator-Independent Equality Law
// Description: Sorted collections built under different comparator instances
// that agree on the order compare equal and hash equally
// =============================================================================

proptest! {
    #[test]
    fn prop_equality_ignores_comparator_instance(elements in prop::collection::vec(any::<i32>(), 0..12)) {
        let first = Comparator::new("ascending", |left: &i32, right: &i32| left.cmp(right));
        let second = Comparator::new("also-ascending", |left: &i32, right: &i32| right.cmp(left).reverse());

        let left = as_sorted_set(first.into(), elements.clone());
        let right = as_sorted_set(second.into(), elements.clone());
        let natural = as_sorted_set(SortOrder::natural(), elements);

        prop_assert_eq!(&left, &right);
        prop_assert_eq!(&left, &natural);
        prop_assert_eq!(hash_of(&left), hash_of(&right));
    }
}
