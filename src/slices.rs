//! Slice and map helpers
//!
//! None of these modify their input except [`sort`].

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub fn contains<T: PartialEq>(items: &[T], value: &T) -> bool {
    items.iter().any(|item| item == value)
}

/// Like [`contains`], comparing with `matches(item, value)`
pub fn contains_with<T, F>(items: &[T], value: &T, matches: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    items.iter().any(|item| matches(item, value))
}

/// First item equal to `value`
pub fn find<T: PartialEq + Clone>(items: &[T], value: &T) -> Option<T> {
    items.iter().find(|item| *item == value).cloned()
}

/// First item matching `predicate`
pub fn find_with<T, F>(items: &[T], predicate: F) -> Option<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    items.iter().find(|item| predicate(item)).cloned()
}

pub fn filter<T, F>(items: &[T], predicate: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

pub fn map<T, R, F>(items: &[T], mapper: F) -> Vec<R>
where
    F: Fn(&T) -> R,
{
    items.iter().map(mapper).collect()
}

/// Fold `items` into a single value, starting from `initial`
///
/// ```
/// use corekit::slices::reduce;
///
/// let sum = reduce(&[1, 2, 3, 4], 0, |sum, n| sum + n);
/// assert_eq!(sum, 10);
/// ```
pub fn reduce<T, R, F>(items: &[T], initial: R, reducer: F) -> R
where
    F: Fn(R, &T) -> R,
{
    items.iter().fold(initial, reducer)
}

/// Sort in place with a strict "less than" predicate
pub fn sort<T, F>(items: &mut [T], less: F)
where
    F: Fn(&T, &T) -> bool,
{
    items.sort_by(|a, b| {
        if less(a, b) {
            Ordering::Less
        } else if less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
}

/// Same length, and every item of each slice is found in the other
///
/// Order is ignored, and so are duplicate counts.
pub fn equal_slices<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    equal_slices_with(a, b, |x, y| x == y)
}

pub fn equal_slices_with<T, F>(a: &[T], b: &[T], compare: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    a.len() == b.len()
        && a.iter().all(|item| contains_with(b, item, &compare))
        && b.iter().all(|item| contains_with(a, item, &compare))
}

pub fn join<T: Display>(items: &[T], separator: &str) -> String {
    join_with(items, separator, |item| item.to_string())
}

/// Join the `stringer` rendering of each item
pub fn join_with<T, F>(items: &[T], separator: &str, stringer: F) -> String
where
    F: Fn(&T) -> String,
{
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push_str(separator);
        }
        joined.push_str(&stringer(item));
    }
    joined
}

/// Merge maps into a new one; later maps win on duplicate keys
pub fn map_join<K, V>(maps: &[&HashMap<K, V>]) -> HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let mut joined = HashMap::new();
    for map in maps {
        joined.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    joined
}

/// Deserialize each value into `T`, skipping those that do not fit
pub fn convert_from_any<T: DeserializeOwned>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| T::deserialize(value).ok())
        .collect()
}

/// Serialize each item, skipping those that cannot be
pub fn convert_to_any<T: Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}
