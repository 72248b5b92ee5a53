//! Integration tests for Set.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use condensed::error::CollectionError;
use condensed::persistent::{Set, Tier, empty_set, set_of};
use rstest::rstest;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
#[case::empty(vec![], Tier::Empty)]
#[case::one(vec!["a"], Tier::Single)]
#[case::duplicates(vec!["a", "a"], Tier::Single)]
#[case::two(vec!["a", "b"], Tier::Multi)]
fn test_collect_condenses(#[case] elements: Vec<&str>, #[case] expected: Tier) {
    let set: Set<&str> = elements.into_iter().collect();
    assert_eq!(set.tier(), expected);
}

#[rstest]
fn test_set_of_keeps_first_occurrence_order() {
    assert_eq!(set_of([3, 1, 3, 2, 1]).as_slice(), &[3, 1, 2]);
}

// =============================================================================
// Mutators
// =============================================================================

#[rstest]
fn test_with_all_appends_new_elements_in_source_order() {
    let set = set_of([1, 2]);
    let union = set.with_all([5, 2, 4, 5]);
    assert_eq!(union.as_slice(), &[1, 2, 5, 4]);
}

#[rstest]
fn test_without_and_without_all() {
    let set = set_of(["a", "b", "c"]);
    assert_eq!(set.without(&"b").as_slice(), &["a", "c"]);
    assert!(set.without_all(&["a", "b", "c"]).ptr_eq(&empty_set()));
}

#[rstest]
fn test_no_op_mutations_return_same_instance() {
    let set = set_of([1, 2, 3]);
    assert!(set.with(2).ptr_eq(&set));
    assert!(set.with_all([3, 1]).ptr_eq(&set));
    assert!(set.with_all(Vec::new()).ptr_eq(&set));
    assert!(set.without(&4).ptr_eq(&set));
    assert!(set.without_all(std::iter::empty()).ptr_eq(&set));
}

// =============================================================================
// Access
// =============================================================================

#[rstest]
fn test_positional_access_past_end_is_no_such_key() {
    let set = set_of([1, 2]);
    assert_eq!(set.get(1), Ok(&2));
    assert_eq!(
        set.get(2),
        Err(CollectionError::NoSuchKey { index: 2, length: 2 })
    );
    assert_eq!(set.index_of(&2), Some(1));
}

// =============================================================================
// Equality and Hashing
// =============================================================================

#[rstest]
fn test_equality_and_hash_ignore_insertion_order() {
    let left = set_of(["x", "y", "z"]);
    let right = set_of(["z", "x", "y"]);
    assert_eq!(left, right);
    assert_eq!(hash_of(&left), hash_of(&right));
}

#[rstest]
fn test_different_sizes_are_unequal() {
    assert_ne!(set_of([1, 2]), set_of([1, 2, 3]));
    assert_ne!(set_of([1, 2]), set_of([1, 3]));
}

#[rstest]
fn test_debug_format() {
    assert_eq!(format!("{:?}", set_of([1])), "{1}");
}
