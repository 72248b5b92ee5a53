//! Array transformation primitives.
//!
//! Every collection family in this crate builds its mutators on the pure
//! functions in this module. They operate on plain slices, know nothing about
//! container types, and always return freshly allocated vectors, so the
//! source slices stay untouched.
//!
//! # Sorted Merges
//!
//! [`union_into_sorted`] and [`union_into_sorted_columns`] combine two sorted
//! sequences with a two-pointer merge in O(n + m), dropping duplicates on the
//! way. When the two ranges do not overlap the comparison loop is skipped.
//!
//! # Examples
//!
//! ```rust
//! use condensed::persistent::array_ops;
//!
//! let merged = array_ops::union_into_sorted(&[1, 3, 5], &[2, 3, 4], i32::cmp);
//! assert_eq!(merged, vec![1, 2, 3, 4, 5]);
//!
//! let appended = array_ops::union_into(&[3, 1], &[1, 2, 2]);
//! assert_eq!(appended, vec![3, 1, 2]);
//! ```

use std::cmp::Ordering;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::error::CollectionError;

/// Membership tests against at most this many candidates use a linear scan.
const LINEAR_SCAN_THRESHOLD: usize = 8;

/// Upper bound for preallocation driven by an untrusted `size_hint`.
const MAX_PREALLOCATE: usize = 4096;

// =============================================================================
// Membership
// =============================================================================

/// A set of borrowed elements that starts as an inline buffer and spills into
/// a hash set once it outgrows [`LINEAR_SCAN_THRESHOLD`].
enum Membership<'a, T> {
    Scan(SmallVec<[&'a T; LINEAR_SCAN_THRESHOLD]>),
    Hashed(FxHashSet<&'a T>),
}

impl<'a, T: Eq + Hash> Membership<'a, T> {
    fn new() -> Self {
        Self::Scan(SmallVec::new())
    }

    fn collect<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        let mut membership = Self::new();
        for element in elements {
            membership.insert(element);
        }
        membership
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Scan(buffer) => buffer.is_empty(),
            Self::Hashed(set) => set.is_empty(),
        }
    }

    fn contains(&self, element: &T) -> bool {
        match self {
            Self::Scan(buffer) => buffer.iter().any(|candidate| *candidate == element),
            Self::Hashed(set) => set.contains(&element),
        }
    }

    /// Returns `true` if `element` was not yet a member.
    fn insert(&mut self, element: &'a T) -> bool {
        if self.contains(element) {
            return false;
        }
        let spilled: FxHashSet<&'a T> = match self {
            Self::Scan(buffer) if buffer.len() < LINEAR_SCAN_THRESHOLD => {
                buffer.push(element);
                return true;
            }
            Self::Scan(buffer) => buffer
                .drain(..)
                .chain(std::iter::once(element))
                .collect(),
            Self::Hashed(set) => {
                set.insert(element);
                return true;
            }
        };
        *self = Self::Hashed(spilled);
        true
    }
}

// =============================================================================
// Bounds Checks
// =============================================================================

/// Checks an insertion position, valid in `[0, length]`.
fn check_position(index: usize, length: usize) -> Result<(), CollectionError> {
    if index > length {
        Err(CollectionError::OutOfRange { index, length })
    } else {
        Ok(())
    }
}

/// Checks an element index, valid in `[0, length)`.
fn check_index(index: usize, length: usize) -> Result<(), CollectionError> {
    if index >= length {
        Err(CollectionError::OutOfRange { index, length })
    } else {
        Ok(())
    }
}

// =============================================================================
// Copy
// =============================================================================

/// Returns an owned copy of `source`.
#[must_use]
pub fn copy<T: Clone>(source: &[T]) -> Vec<T> {
    source.to_vec()
}

/// Returns a copy of `source` resized to `length`.
///
/// Longer targets are padded with `T::default()`, shorter ones truncate.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::array_ops;
///
/// assert_eq!(array_ops::copy_resized(&[1, 2], 4), vec![1, 2, 0, 0]);
/// assert_eq!(array_ops::copy_resized(&[1, 2, 3], 1), vec![1]);
/// ```
#[must_use]
pub fn copy_resized<T: Clone + Default>(source: &[T], length: usize) -> Vec<T> {
    let mut result = Vec::with_capacity(length);
    result.extend_from_slice(&source[..source.len().min(length)]);
    result.resize_with(length, T::default);
    result
}

/// Splits a sequence of pairs into parallel key and value columns.
///
/// The reported `size_hint` of the source is only used as a capped
/// preallocation hint. The returned columns are sized to what was actually
/// iterated, so a source that lies about its size is harmless.
#[must_use]
pub fn copy_columns<K, V, I>(source: I) -> (Vec<K>, Vec<V>)
where
    I: IntoIterator<Item = (K, V)>,
{
    let iterator = source.into_iter();
    let (lower, _) = iterator.size_hint();
    let capacity = lower.min(MAX_PREALLOCATE);
    let mut keys = Vec::with_capacity(capacity);
    let mut values = Vec::with_capacity(capacity);
    for (key, value) in iterator {
        keys.push(key);
        values.push(value);
    }
    (keys, values)
}

// =============================================================================
// Positional Edits
// =============================================================================

/// Returns a copy of `source` with `element` appended.
#[must_use]
pub fn append<T: Clone>(source: &[T], element: T) -> Vec<T> {
    let mut result = Vec::with_capacity(source.len() + 1);
    result.extend_from_slice(source);
    result.push(element);
    result
}

/// Returns a copy of `source` with `element` inserted at `index`.
///
/// # Errors
///
/// Returns [`CollectionError::OutOfRange`] unless `index <= source.len()`.
pub fn insert<T: Clone>(source: &[T], index: usize, element: T) -> Result<Vec<T>, CollectionError> {
    check_position(index, source.len())?;
    let mut result = Vec::with_capacity(source.len() + 1);
    result.extend_from_slice(&source[..index]);
    result.push(element);
    result.extend_from_slice(&source[index..]);
    Ok(result)
}

/// Returns a copy of `source` with `elements` spliced in at `index`.
///
/// The index is validated before `elements` is consumed.
///
/// # Errors
///
/// Returns [`CollectionError::OutOfRange`] unless `index <= source.len()`.
pub fn insert_all<T, I>(source: &[T], index: usize, elements: I) -> Result<Vec<T>, CollectionError>
where
    T: Clone,
    I: IntoIterator<Item = T>,
{
    check_position(index, source.len())?;
    let elements = elements.into_iter();
    let (lower, _) = elements.size_hint();
    let mut result = Vec::with_capacity(source.len() + lower.min(MAX_PREALLOCATE));
    result.extend_from_slice(&source[..index]);
    result.extend(elements);
    result.extend_from_slice(&source[index..]);
    Ok(result)
}

/// Returns a copy of `source` with the slot at `index` replaced.
///
/// # Errors
///
/// Returns [`CollectionError::OutOfRange`] unless `index < source.len()`.
pub fn replace<T: Clone>(source: &[T], index: usize, element: T) -> Result<Vec<T>, CollectionError> {
    check_index(index, source.len())?;
    let mut result = source.to_vec();
    result[index] = element;
    Ok(result)
}

/// Returns a copy of `source` without the element at `index`.
///
/// # Errors
///
/// Returns [`CollectionError::OutOfRange`] unless `index < source.len()`.
pub fn delete<T: Clone>(source: &[T], index: usize) -> Result<Vec<T>, CollectionError> {
    check_index(index, source.len())?;
    let mut result = Vec::with_capacity(source.len() - 1);
    result.extend_from_slice(&source[..index]);
    result.extend_from_slice(&source[index + 1..]);
    Ok(result)
}

/// Returns a copy of `source` without the positions flagged in `marks`.
///
/// Positions beyond the end of `marks` are kept.
#[must_use]
pub fn delete_marked<T: Clone>(source: &[T], marks: &[bool]) -> Vec<T> {
    source
        .iter()
        .enumerate()
        .filter(|(index, _)| !marks.get(*index).copied().unwrap_or(false))
        .map(|(_, element)| element.clone())
        .collect()
}

// =============================================================================
// Bulk Removal
// =============================================================================

/// Returns a copy of `source` without any element contained in `to_remove`.
///
/// Every occurrence is removed. Membership is a linear scan for a handful of
/// candidates and a hash lookup beyond that.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::array_ops;
///
/// let remaining = array_ops::delete_all(&[1, 2, 1, 3], &[1]);
/// assert_eq!(remaining, vec![2, 3]);
/// ```
#[must_use]
pub fn delete_all<'a, T, I>(source: &[T], to_remove: I) -> Vec<T>
where
    T: 'a + Clone + Eq + Hash,
    I: IntoIterator<Item = &'a T>,
{
    let removal = Membership::collect(to_remove);
    if removal.is_empty() {
        return source.to_vec();
    }
    source
        .iter()
        .filter(|element| !removal.contains(element))
        .cloned()
        .collect()
}

/// Removes every key contained in `to_remove` from both columns in lockstep.
#[must_use]
pub fn delete_all_columns<'a, K, V, I>(keys: &[K], values: &[V], to_remove: I) -> (Vec<K>, Vec<V>)
where
    K: 'a + Clone + Eq + Hash,
    V: Clone,
    I: IntoIterator<Item = &'a K>,
{
    let removal = Membership::collect(to_remove);
    if removal.is_empty() {
        return (keys.to_vec(), values.to_vec());
    }
    keys.iter()
        .zip(values)
        .filter(|(key, _)| !removal.contains(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .unzip()
}

/// Returns the elements of `source` with later duplicates removed.
#[must_use]
pub fn distinct<T: Clone + Eq + Hash>(source: Vec<T>) -> Vec<T> {
    let keep: Vec<bool> = {
        let mut seen = Membership::new();
        source.iter().map(|element| seen.insert(element)).collect()
    };
    if keep.iter().all(|kept| *kept) {
        return source;
    }
    source
        .into_iter()
        .zip(keep)
        .filter_map(|(element, kept)| kept.then_some(element))
        .collect()
}

// =============================================================================
// Unsorted Union
// =============================================================================

/// Unsorted set union.
///
/// Keeps the order of `destination` and appends the elements of `source` that
/// are not yet present, in `source` order. The first occurrence wins.
#[must_use]
pub fn union_into<T: Clone + Eq + Hash>(destination: &[T], source: &[T]) -> Vec<T> {
    let mut seen = Membership::collect(destination);
    let mut result = destination.to_vec();
    for element in source {
        if seen.insert(element) {
            result.push(element.clone());
        }
    }
    result
}

/// Unsorted union over parallel key/value columns.
///
/// Keys keep the position of their first occurrence. On a duplicate key the
/// value from `source` wins, and among repeated source keys the last one in
/// source order wins.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::array_ops;
///
/// let (keys, values) =
///     array_ops::union_into_columns(&["a", "b"], &[1, 2], &["b", "c", "b"], &[20, 30, 21]);
/// assert_eq!(keys, vec!["a", "b", "c"]);
/// assert_eq!(values, vec![1, 21, 30]);
/// ```
#[must_use]
pub fn union_into_columns<K, V>(
    destination_keys: &[K],
    destination_values: &[V],
    source_keys: &[K],
    source_values: &[V],
) -> (Vec<K>, Vec<V>)
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    let mut positions: FxHashMap<&K, usize> = FxHashMap::default();
    positions.reserve(destination_keys.len() + source_keys.len());
    for (index, key) in destination_keys.iter().enumerate() {
        positions.entry(key).or_insert(index);
    }

    let mut keys = destination_keys.to_vec();
    let mut values = destination_values.to_vec();
    for (key, value) in source_keys.iter().zip(source_values) {
        if let Some(&index) = positions.get(key) {
            values[index] = value.clone();
        } else {
            positions.insert(key, keys.len());
            keys.push(key.clone());
            values.push(value.clone());
        }
    }
    (keys, values)
}

// =============================================================================
// Sorted Union
// =============================================================================

/// Pushes `element` unless it ties with the last pushed element.
fn push_unique<T, F>(result: &mut Vec<T>, element: &T, compare: &F)
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    if result
        .last()
        .is_none_or(|last| compare(last, element) != Ordering::Equal)
    {
        result.push(element.clone());
    }
}

/// Sorted set union by two-pointer merge.
///
/// Both inputs must already be sorted under `compare`. The result is strictly
/// ordered: on a tie the element from `destination` is kept and the one from
/// `source` is dropped.
///
/// # Complexity
///
/// O(n + m). When the ranges do not overlap the inputs are concatenated
/// without per-element comparison.
#[must_use]
pub fn union_into_sorted<T, F>(destination: &[T], source: &[T], compare: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let mut result = Vec::with_capacity(destination.len() + source.len());

    match (destination.last(), source.first()) {
        (None, _) => {
            for element in source {
                push_unique(&mut result, element, &compare);
            }
            return result;
        }
        (_, None) => {
            result.extend_from_slice(destination);
            return result;
        }
        (Some(last), Some(first)) if compare(last, first) == Ordering::Less => {
            result.extend_from_slice(destination);
            for element in source {
                push_unique(&mut result, element, &compare);
            }
            return result;
        }
        _ => {}
    }

    let mut destination_index = 0;
    let mut source_index = 0;
    while destination_index < destination.len() && source_index < source.len() {
        let stored = &destination[destination_index];
        let incoming = &source[source_index];
        match compare(stored, incoming) {
            Ordering::Less => {
                push_unique(&mut result, stored, &compare);
                destination_index += 1;
            }
            Ordering::Greater => {
                push_unique(&mut result, incoming, &compare);
                source_index += 1;
            }
            Ordering::Equal => {
                push_unique(&mut result, stored, &compare);
                destination_index += 1;
                source_index += 1;
            }
        }
    }
    for element in &destination[destination_index..] {
        push_unique(&mut result, element, &compare);
    }
    for element in &source[source_index..] {
        push_unique(&mut result, element, &compare);
    }
    result
}

/// Pushes a pair, or overwrites the last value when the key ties with the
/// last pushed key.
fn push_entry<K, V, F>(keys: &mut Vec<K>, values: &mut Vec<V>, key: &K, value: &V, compare: &F)
where
    K: Clone,
    V: Clone,
    F: Fn(&K, &K) -> Ordering,
{
    match keys.last() {
        Some(last) if compare(last, key) == Ordering::Equal => {
            if let Some(slot) = values.last_mut() {
                *slot = value.clone();
            }
        }
        _ => {
            keys.push(key.clone());
            values.push(value.clone());
        }
    }
}

/// Sorted union over parallel key/value columns.
///
/// Both key columns must already be sorted under `compare`. On a tie the key
/// from `destination` is kept and the value from `source` wins. Repeated keys
/// inside `source` resolve to the last one in source order.
///
/// # Examples
///
/// ```rust
/// use condensed::persistent::array_ops;
///
/// let (keys, values) =
///     array_ops::union_into_sorted_columns(&[1, 3], &["a", "c"], &[2, 3], &["b", "C"], i32::cmp);
/// assert_eq!(keys, vec![1, 2, 3]);
/// assert_eq!(values, vec!["a", "b", "C"]);
/// ```
#[must_use]
pub fn union_into_sorted_columns<K, V, F>(
    destination_keys: &[K],
    destination_values: &[V],
    source_keys: &[K],
    source_values: &[V],
    compare: F,
) -> (Vec<K>, Vec<V>)
where
    K: Clone,
    V: Clone,
    F: Fn(&K, &K) -> Ordering,
{
    let capacity = destination_keys.len() + source_keys.len();
    let mut keys = Vec::with_capacity(capacity);
    let mut values = Vec::with_capacity(capacity);
    let destination_length = destination_keys.len().min(destination_values.len());
    let source_length = source_keys.len().min(source_values.len());

    let mut destination_index = 0;
    let mut source_index = 0;
    while destination_index < destination_length && source_index < source_length {
        let stored = &destination_keys[destination_index];
        let incoming = &source_keys[source_index];
        match compare(stored, incoming) {
            Ordering::Less => {
                push_entry(
                    &mut keys,
                    &mut values,
                    stored,
                    &destination_values[destination_index],
                    &compare,
                );
                destination_index += 1;
            }
            Ordering::Greater => {
                push_entry(
                    &mut keys,
                    &mut values,
                    incoming,
                    &source_values[source_index],
                    &compare,
                );
                source_index += 1;
            }
            Ordering::Equal => {
                push_entry(
                    &mut keys,
                    &mut values,
                    stored,
                    &source_values[source_index],
                    &compare,
                );
                destination_index += 1;
                source_index += 1;
            }
        }
    }
    for index in destination_index..destination_length {
        push_entry(
            &mut keys,
            &mut values,
            &destination_keys[index],
            &destination_values[index],
            &compare,
        );
    }
    for index in source_index..source_length {
        push_entry(
            &mut keys,
            &mut values,
            &source_keys[index],
            &source_values[index],
            &compare,
        );
    }
    (keys, values)
}

// =============================================================================
// Sorting Helpers
// =============================================================================

/// Sorts `elements` under `compare` and drops ties, keeping the first one in
/// input order.
#[must_use]
pub fn sort_unique<T, F>(mut elements: Vec<T>, compare: F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if is_strictly_sorted(&elements, &compare) {
        return elements;
    }
    elements.sort_by(|left, right| compare(left, right));
    elements.dedup_by(|later, earlier| compare(&*earlier, &*later) == Ordering::Equal);
    elements
}

/// Sorts parallel columns by key under `compare`.
///
/// For each run of tying keys the first key in input order is kept together
/// with the last value in input order.
#[must_use]
pub fn sort_unique_columns<K, V, F>(keys: Vec<K>, values: Vec<V>, compare: F) -> (Vec<K>, Vec<V>)
where
    F: Fn(&K, &K) -> Ordering,
{
    if keys.len() == values.len() && is_strictly_sorted(&keys, &compare) {
        return (keys, values);
    }
    let mut entries: Vec<(K, V)> = keys.into_iter().zip(values).collect();
    entries.sort_by(|left, right| compare(&left.0, &right.0));

    let mut sorted_keys: Vec<K> = Vec::with_capacity(entries.len());
    let mut sorted_values: Vec<V> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match sorted_keys.last() {
            Some(last) if compare(last, &key) == Ordering::Equal => {
                if let Some(slot) = sorted_values.last_mut() {
                    *slot = value;
                }
            }
            _ => {
                sorted_keys.push(key);
                sorted_values.push(value);
            }
        }
    }
    (sorted_keys, sorted_values)
}

/// Returns the elements of sorted `source` that do not tie with any element
/// of sorted `to_remove`.
#[must_use]
pub fn difference_sorted<T, F>(source: &[T], to_remove: &[T], compare: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let (Some(first), Some(last)) = (source.first(), source.last()) else {
        return Vec::new();
    };
    let (Some(remove_first), Some(remove_last)) = (to_remove.first(), to_remove.last()) else {
        return source.to_vec();
    };
    if compare(last, remove_first) == Ordering::Less || compare(remove_last, first) == Ordering::Less {
        return source.to_vec();
    }

    let mut result = Vec::with_capacity(source.len());
    let mut source_index = 0;
    let mut remove_index = 0;
    while source_index < source.len() && remove_index < to_remove.len() {
        match compare(&source[source_index], &to_remove[remove_index]) {
            Ordering::Less => {
                result.push(source[source_index].clone());
                source_index += 1;
            }
            Ordering::Greater => remove_index += 1,
            Ordering::Equal => source_index += 1,
        }
    }
    result.extend_from_slice(&source[source_index..]);
    result
}

/// Returns `true` if every adjacent pair of `elements` is strictly ordered.
pub fn is_strictly_sorted<T, F>(elements: &[T], compare: F) -> bool
where
    F: Fn(&T, &T) -> Ordering,
{
    elements
        .windows(2)
        .all(|window| compare(&window[0], &window[1]) == Ordering::Less)
}

// =============================================================================
// Tests
// =============================================================================
