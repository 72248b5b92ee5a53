#![cfg(feature = "serde")]

//! Integration tests for the serialized form of every collection family.
//!
//! These tests pin the wire shapes, check that deserialization rebuilds
//! through the condensing path, and exercise comparator resolution through
//! `ComparatorRegistry`.

use condensed::persistent::{
    Comparator, ComparatorRegistry, List, Map, Set, SortOrder, SortedMap, SortedSet, Tier,
    empty_list, empty_map, empty_set, empty_sorted_map, empty_sorted_set, list_of, map_of, set_of,
    sorted_map_of, sorted_set_of,
};
use rstest::rstest;
use serde::de::DeserializeSeed;

fn by_length() -> Comparator<String> {
    Comparator::new("by-length", |left: &String, right: &String| {
        left.len().cmp(&right.len())
    })
}

// =============================================================================
// Canonical Empty
// =============================================================================

#[rstest]
fn test_zero_count_yields_canonical_empty_for_every_family() {
    let list: List<u32> = serde_json::from_str("[0]").unwrap();
    let set: Set<u32> = serde_json::from_str("[0]").unwrap();
    let map: Map<u32, u32> = serde_json::from_str("[0]").unwrap();
    let sorted_set: SortedSet<u32> = serde_json::from_str("[null,0]").unwrap();
    let sorted_map: SortedMap<u32, u32> = serde_json::from_str("[null,0]").unwrap();

    assert!(list.ptr_eq(&empty_list()));
    assert!(set.ptr_eq(&empty_set()));
    assert!(map.ptr_eq(&empty_map()));
    assert!(sorted_set.ptr_eq(&empty_sorted_set(SortOrder::natural())));
    assert!(sorted_map.ptr_eq(&empty_sorted_map(SortOrder::natural())));
}

#[rstest]
fn test_zero_count_with_named_comparator_yields_its_empty() {
    let comparator = by_length();
    let registry = ComparatorRegistry::new().register(comparator.clone());

    let mut deserializer = serde_json::Deserializer::from_str(r#"["by-length",0]"#);
    let set = registry.sorted_set_seed().deserialize(&mut deserializer).unwrap();
    assert!(set.ptr_eq(&empty_sorted_set(comparator.clone().into())));

    let mut deserializer = serde_json::Deserializer::from_str(r#"["by-length",0]"#);
    let map: SortedMap<String, u8> = registry.sorted_map_seed().deserialize(&mut deserializer).unwrap();
    assert!(map.ptr_eq(&empty_sorted_map(comparator.into())));
}

// =============================================================================
// Wire Shapes
// =============================================================================

#[rstest]
fn test_wire_shapes() {
    assert_eq!(serde_json::to_string(&list_of([1, 2, 2])).unwrap(), "[3,1,2,2]");
    assert_eq!(serde_json::to_string(&set_of(["a"])).unwrap(), r#"[1,"a"]"#);
    assert_eq!(
        serde_json::to_string(&map_of([(1, true), (2, false)])).unwrap(),
        "[2,1,true,2,false]"
    );
    assert_eq!(
        serde_json::to_string(&sorted_set_of(SortOrder::natural(), [2, 1])).unwrap(),
        "[null,2,1,2]"
    );
    assert_eq!(
        serde_json::to_string(&sorted_map_of(Comparator::reverse_natural().into(), [(1, 'a'), (2, 'b')]))
            .unwrap(),
        r#"["reverse",2,2,"b",1,"a"]"#
    );
}

// =============================================================================
// Round Trips
// =============================================================================

#[rstest]
#[case::empty(vec![])]
#[case::single(vec![4])]
#[case::multi(vec![4, 8, 15, 16, 23, 42])]
fn test_round_trip_keeps_tier(#[case] elements: Vec<i64>) {
    let list: List<i64> = elements.iter().copied().collect();
    let set: Set<i64> = elements.iter().copied().collect();
    let map: Map<i64, i64> = elements.iter().map(|element| (*element, -element)).collect();
    let sorted_set: SortedSet<i64> = elements.iter().copied().collect();
    let sorted_map: SortedMap<i64, i64> = elements.iter().map(|element| (*element, -element)).collect();

    let restored_list: List<i64> = serde_json::from_str(&serde_json::to_string(&list).unwrap()).unwrap();
    let restored_set: Set<i64> = serde_json::from_str(&serde_json::to_string(&set).unwrap()).unwrap();
    let restored_map: Map<i64, i64> = serde_json::from_str(&serde_json::to_string(&map).unwrap()).unwrap();
    let restored_sorted_set: SortedSet<i64> =
        serde_json::from_str(&serde_json::to_string(&sorted_set).unwrap()).unwrap();
    let restored_sorted_map: SortedMap<i64, i64> =
        serde_json::from_str(&serde_json::to_string(&sorted_map).unwrap()).unwrap();

    assert_eq!(restored_list, list);
    assert_eq!(restored_list.tier(), list.tier());
    assert_eq!(restored_set, set);
    assert_eq!(restored_set.tier(), set.tier());
    assert_eq!(restored_map, map);
    assert_eq!(restored_map.tier(), map.tier());
    assert_eq!(restored_sorted_set, sorted_set);
    assert_eq!(restored_sorted_set.tier(), sorted_set.tier());
    assert_eq!(restored_sorted_map, sorted_map);
    assert_eq!(restored_sorted_map.tier(), sorted_map.tier());
}

#[rstest]
fn test_round_trip_through_registry_keeps_comparator() {
    let comparator = by_length();
    let registry = ComparatorRegistry::with_natural().register(comparator.clone());
    let set = sorted_set_of(comparator.into(), ["ccc".to_string(), "a".to_string()]);

    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"["by-length",2,"a","ccc"]"#);

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let restored = registry.sorted_set_seed().deserialize(&mut deserializer).unwrap();
    assert_eq!(restored, set);
    assert!(restored.comparator().same_order(set.comparator()));
    assert!(restored.with("bb".to_string()).contains(&"xx".to_string()));
}

#[rstest]
fn test_nested_collections() {
    let outer = list_of([set_of([1, 2]), set_of([3])]);
    let json = serde_json::to_string(&outer).unwrap();
    assert_eq!(json, "[2,[2,1,2],[1,3]]");
    let restored: List<Set<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, outer);
}

// =============================================================================
// Rebuilding
// =============================================================================

#[rstest]
fn test_unsorted_payload_is_resorted() {
    let set: SortedSet<i32> = serde_json::from_str("[null,4,3,1,4,2]").unwrap();
    assert_eq!(set.as_slice(), &[1, 2, 3, 4]);
}

#[rstest]
fn test_duplicate_map_keys_collapse() {
    let map: Map<String, i32> = serde_json::from_str(r#"[3,"a",1,"b",2,"a",3]"#).unwrap();
    assert_eq!(map, map_of([("a".to_string(), 3), ("b".to_string(), 2)]));

    let sorted: SortedMap<i32, i32> = serde_json::from_str("[null,2,7,1,7,2]").unwrap();
    assert_eq!(sorted.tier(), Tier::Single);
    assert_eq!(sorted.get(&7), Some(&2));
}

// =============================================================================
// Errors
// =============================================================================

#[rstest]
fn test_short_set_payload_is_missing_argument() {
    let error = serde_json::from_str::<Set<i32>>("[2,1]").unwrap_err();
    assert!(error.to_string().starts_with("missing argument"), "{error}");
}

#[rstest]
fn test_map_payload_without_value_is_missing_argument() {
    let error = serde_json::from_str::<Map<String, i32>>(r#"[1,"a"]"#).unwrap_err();
    assert!(error.to_string().starts_with("missing argument"), "{error}");
}

#[rstest]
fn test_sorted_short_payload_is_missing_argument() {
    let error = serde_json::from_str::<SortedSet<i32>>("[null]").unwrap_err();
    assert!(error.to_string().starts_with("missing argument"), "{error}");
}

#[rstest]
fn test_trailing_items_rejected() {
    assert!(serde_json::from_str::<List<i32>>("[1,1,2]").is_err());
    assert!(serde_json::from_str::<Map<i32, i32>>("[1,1,2,3]").is_err());
    assert!(serde_json::from_str::<SortedSet<i32>>("[null,1,1,2]").is_err());
}

#[rstest]
fn test_unknown_comparator_is_type_mismatch() {
    let registry = ComparatorRegistry::with_natural().register(by_length());
    let mut deserializer = serde_json::Deserializer::from_str(r#"["by-width",1,"a"]"#);
    let error = registry.sorted_set_seed().deserialize(&mut deserializer).unwrap_err();
    assert!(error.to_string().starts_with("type mismatch"), "{error}");
}

#[rstest]
fn test_registry_without_natural_rejects_null() {
    let registry = ComparatorRegistry::new().register(by_length());
    let mut deserializer = serde_json::Deserializer::from_str(r#"[null,1,"a",1]"#);
    let error = registry
        .sorted_map_seed::<u8>()
        .deserialize(&mut deserializer)
        .unwrap_err();
    assert!(error.to_string().starts_with("type mismatch"), "{error}");
}

#[rstest]
fn test_natural_deserialize_rejects_named_comparator() {
    let error = serde_json::from_str::<SortedMap<i32, i32>>(r#"["reverse",0]"#).unwrap_err();
    assert!(error.to_string().starts_with("type mismatch"), "{error}");
}
