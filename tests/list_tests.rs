//! Integration tests for List.
//!
//! These tests exercise the public List API: positional access, splicing,
//! removal, sub-lists and identity preservation.

use condensed::error::CollectionError;
use condensed::persistent::{List, Tier, empty_list, list_of};
use rstest::rstest;

// =============================================================================
// Construction and Access
// =============================================================================

#[rstest]
fn test_empty_list_with_one_element_is_single() {
    let list = empty_list().with(1);
    assert_eq!(list.tier(), Tier::Single);
    assert_eq!(list, list_of([1]));
}

#[rstest]
#[case::first(0, Ok(&'a'))]
#[case::last(2, Ok(&'c'))]
#[case::past_end(3, Err(CollectionError::OutOfRange { index: 3, length: 3 }))]
fn test_get(#[case] index: usize, #[case] expected: Result<&char, CollectionError>) {
    let list = list_of(['a', 'b', 'c']);
    assert_eq!(list.get(index), expected);
}

#[rstest]
fn test_first_last_and_index() {
    let list = list_of([10, 20, 30]);
    assert_eq!(list.first(), Some(&10));
    assert_eq!(list.last(), Some(&30));
    assert_eq!(list[1], 20);
    assert_eq!(list.index_of(&30), Some(2));
    assert!(list.contains(&20));
    assert!(!list.contains(&99));
}

#[rstest]
#[should_panic(expected = "index out of bounds")]
fn test_index_operator_panics_past_end() {
    let list = list_of([1]);
    let _ = list[1];
}

// =============================================================================
// Mutators
// =============================================================================

#[rstest]
fn test_without_middle_element_stays_multi() {
    let list = list_of([1, 2, 3, 4, 5, 6]);
    let removed = list.without(&3);
    assert_eq!(removed.tier(), Tier::Multi);
    assert_eq!(removed.as_slice(), &[1, 2, 4, 5, 6]);
    assert_eq!(list.len(), 6);
}

#[rstest]
fn test_without_from_pair_downgrades_to_single() {
    let list = list_of([1, 2]).without(&1);
    assert_eq!(list.tier(), Tier::Single);
    assert_eq!(list.as_slice(), &[2]);
}

#[rstest]
fn test_without_all_removes_every_occurrence() {
    let list = list_of([1, 2, 1, 3, 1]);
    assert_eq!(list.without_all(&[1]), list_of([2, 3]));
}

#[rstest]
#[case::front(0, vec![7, 8, 1, 2])]
#[case::middle(1, vec![1, 7, 8, 2])]
#[case::back(2, vec![1, 2, 7, 8])]
fn test_with_all_at(#[case] index: usize, #[case] expected: Vec<i32>) {
    let list = list_of([1, 2]);
    assert_eq!(list.with_all_at(index, [7, 8]).unwrap().as_slice(), expected.as_slice());
}

#[rstest]
fn test_with_all_at_checks_index_before_consuming() {
    let list = list_of([1, 2]);
    let mut consumed = false;
    let elements = std::iter::from_fn(|| {
        consumed = true;
        None::<i32>
    });
    assert!(list.with_all_at(5, elements).is_err());
    assert!(!consumed);
}

#[rstest]
fn test_replace_and_delete() {
    let list = list_of(["a", "b", "c"]);
    assert_eq!(list.replace(1, "B").unwrap().as_slice(), &["a", "B", "c"]);
    assert_eq!(list.delete(0).unwrap().as_slice(), &["b", "c"]);
    assert_eq!(
        list.delete(3),
        Err(CollectionError::OutOfRange { index: 3, length: 3 })
    );
}

// =============================================================================
// Sub-lists
// =============================================================================

#[rstest]
#[case::empty_range(1, 1, Tier::Empty)]
#[case::one(1, 2, Tier::Single)]
#[case::two(0, 2, Tier::Multi)]
fn test_sub_list_tier(#[case] from: usize, #[case] to: usize, #[case] expected: Tier) {
    let list = list_of([1, 2, 3]);
    assert_eq!(list.sub_list(from, to).unwrap().tier(), expected);
}

#[rstest]
fn test_sub_list_full_range_is_identity() {
    let list = list_of([1, 2, 3]);
    assert!(list.sub_list(0, 3).unwrap().ptr_eq(&list));
}

// =============================================================================
// Identity Preservation
// =============================================================================

#[rstest]
fn test_no_op_mutations_return_same_instance() {
    let list = list_of([1, 2, 3]);
    assert!(list.without(&9).ptr_eq(&list));
    assert!(list.without_all(&[9, 10]).ptr_eq(&list));
    assert!(list.without_all(std::iter::empty()).ptr_eq(&list));
    assert!(list.with_all(Vec::new()).ptr_eq(&list));
    assert!(list.replace(0, 1).unwrap().ptr_eq(&list));
}

#[rstest]
fn test_every_empty_list_is_the_same_instance() {
    let emptied = list_of([1]).without(&1);
    assert!(emptied.ptr_eq(&empty_list()));
    assert!(List::<i32>::default().ptr_eq(&List::new()));
}

// =============================================================================
// Formatting and Equality
// =============================================================================

#[rstest]
fn test_debug_and_display() {
    let list = list_of([1, 2]);
    assert_eq!(format!("{list:?}"), "[1, 2]");
    assert_eq!(format!("{list}"), "[1, 2]");
}

#[rstest]
fn test_equality_is_order_sensitive() {
    assert_ne!(list_of([1, 2]), list_of([2, 1]));
    assert_eq!(list_of([1, 2]), vec![1, 2].into_iter().collect::<List<_>>());
}
