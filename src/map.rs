//! Implementation of maps, backed by an AVL tree
#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use compact_str::CompactString;
use core::{cmp::Ordering, iter::FusedIterator};

use crate::util::{Leaves, Tree};

//-----------------------------------------------------------------------------------------------//

/// A simple map between keys and values, implemented using an AVL tree.
///
/// Inserting a key that is already present leaves the existing pair in place; use `get_mut` to
/// change the value held against a key.
#[derive(Clone)]
pub struct Map<K, V>
where
    K: Ord,
{
    tree: Tree,
    key_value: Vec<(K, V)>,
}

impl<K, V> Map<K, V>
where
    K: Ord,
{
    /// Constructor
    pub fn new() -> Map<K, V> {
        Map {
            tree: Tree::new(),
            key_value: Vec::new(),
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Map<K, V> {
        Map {
            tree: Tree::with_capacity(capacity),
            key_value: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of key/value pairs in the `Map`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any key/value pairs in the `Map`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the height of the underlying tree
    #[inline]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Remove all key/value pairs from the `Map`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.key_value.truncate(0);
    }

    /// Reserves capacity for at least `additional` more key/value pairs
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
        self.key_value.reserve(additional);
    }

    /// Check if a key is in the `Map`
    pub fn contains(&self, key: &K) -> bool {
        !self.tree.get_kv(key, &self.key_value) != 0
    }

    /// Get a value by key.
    ///
    /// If the key is not in the tree then `None` is returned.
    pub fn get(&self, key: &K) -> Option<&V> {
        let leaf = self.tree.get_kv(key, &self.key_value);
        if !leaf == 0 {
            return None;
        }

        Some(&self.key_value[leaf].1)
    }

    /// Get a mutable reference by key.
    ///
    /// If the key is not in the tree then `None` is returned - this function will not create a key
    /// if it does not exist. In this case use `insert` instead.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf = self.tree.get_kv(key, &self.key_value);
        if !leaf == 0 {
            return None;
        }

        Some(&mut self.key_value[leaf].1)
    }

    /// Insert a value by key.
    ///
    /// Returns `true` if the pair was added. If the key is already present the map is unchanged,
    /// `value` is dropped and `false` is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let leaf = self.tree.insert_kv(&key, &self.key_value);
        if leaf != self.key_value.len() {
            return false;
        }

        self.key_value.push((key, value));
        true
    }

    /// Get the first key in the map
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            let (k, v) = &self.key_value[leaf];
            Some((k, v))
        }
    }

    /// Get the last key in the map
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            let (k, v) = &self.key_value[leaf];
            Some((k, v))
        }
    }

    /// Iterate over the key/value pairs in the `Map`, in ascending key order
    pub fn iter(&self) -> MapIterator<'_, K, V> {
        MapIterator {
            leaves: self.tree.iter(),
            key_value: &self.key_value,
        }
    }
}

impl<K, V> Default for Map<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V>
where
    K: Ord,
{
    type Item = &'a (K, V);
    type IntoIter = MapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Map<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for Map<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `Map` or a `MapBy`
pub struct MapIterator<'a, K, V> {
    leaves: Leaves<'a>,
    key_value: &'a [(K, V)],
}

impl<'a, K, V> Iterator for MapIterator<'a, K, V> {
    type Item = &'a (K, V);

    fn next(&mut self) -> Option<&'a (K, V)> {
        let leaf = self.leaves.next()?;
        Some(&self.key_value[leaf])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.leaves.size_hint()
    }
}

impl<K, V> ExactSizeIterator for MapIterator<'_, K, V> {}

impl<K, V> FusedIterator for MapIterator<'_, K, V> {}

//-----------------------------------------------------------------------------------------------//

/// A simple map between strings and values, implemented using an AVL tree.
///
/// This is specialised version of `Map` that stores keys as a string.
#[derive(Clone)]
pub struct StringMap<V> {
    tree: Tree,
    key_value: Vec<(CompactString, V)>,
}

impl<V> StringMap<V> {
    /// Constructor
    pub fn new() -> StringMap<V> {
        StringMap {
            tree: Tree::new(),
            key_value: Vec::new(),
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> StringMap<V> {
        StringMap {
            tree: Tree::with_capacity(capacity),
            key_value: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of string/value pairs in the `StringMap`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any string/value pairs in the `StringMap`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the height of the underlying tree
    #[inline]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Remove all string/value pairs from the `StringMap`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.key_value.truncate(0);
    }

    /// Reserves capacity for at least `additional` more string/value pairs
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
        self.key_value.reserve(additional);
    }

    /// Check if a string is in the `StringMap`
    pub fn contains(&self, key: &str) -> bool {
        !self.leaf(key) != 0
    }

    /// Get a value by string.
    ///
    /// If the string is not in the tree then `None` is returned.
    pub fn get(&self, key: &str) -> Option<&V> {
        let leaf = self.leaf(key);
        if !leaf == 0 {
            return None;
        }

        Some(&self.key_value[leaf].1)
    }

    /// Get a mutable reference by string.
    ///
    /// If the string is not in the tree then `None` is returned.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let leaf = self.leaf(key);
        if !leaf == 0 {
            return None;
        }

        Some(&mut self.key_value[leaf].1)
    }

    /// Insert a value by string.
    ///
    /// Returns `true` if the pair was added. If the string is already present the map is
    /// unchanged, `value` is dropped and `false` is returned.
    pub fn insert(&mut self, key: &str, value: V) -> bool {
        let key_value = &self.key_value;
        let leaf = self.tree.insert_with(|x| key.cmp(key_value[x].0.as_str()));
        if leaf != self.key_value.len() {
            return false;
        }

        self.key_value.push((CompactString::new(key), value));
        true
    }

    /// Get the first string in the map
    pub fn first(&self) -> Option<(&str, &V)> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            let (k, v) = &self.key_value[leaf];
            Some((k.as_str(), v))
        }
    }

    /// Get the last string in the map
    pub fn last(&self) -> Option<(&str, &V)> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            let (k, v) = &self.key_value[leaf];
            Some((k.as_str(), v))
        }
    }

    /// Iterate over the string/value pairs in the `StringMap`, in ascending order
    pub fn iter(&self) -> StringMapIterator<'_, V> {
        StringMapIterator {
            leaves: self.tree.iter(),
            key_value: &self.key_value,
        }
    }

    // Find the leaf holding a string
    fn leaf(&self, key: &str) -> usize {
        self.tree.get_with(|x| key.cmp(self.key_value[x].0.as_str()))
    }
}

impl<V> Default for StringMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V> IntoIterator for &'a StringMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = StringMapIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> FromIterator<(&'a str, V)> for StringMap<V> {
    fn from_iter<I: IntoIterator<Item = (&'a str, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        map.extend(iter);
        map
    }
}

impl<'a, V> Extend<(&'a str, V)> for StringMap<V> {
    fn extend<I: IntoIterator<Item = (&'a str, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `StringMap`
pub struct StringMapIterator<'a, V> {
    leaves: Leaves<'a>,
    key_value: &'a [(CompactString, V)],
}

impl<'a, V> Iterator for StringMapIterator<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<(&'a str, &'a V)> {
        let leaf = self.leaves.next()?;
        let (k, v) = &self.key_value[leaf];
        Some((k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.leaves.size_hint()
    }
}

impl<V> ExactSizeIterator for StringMapIterator<'_, V> {}

impl<V> FusedIterator for StringMapIterator<'_, V> {}

//-----------------------------------------------------------------------------------------------//

/// A simple map between keys and values, implemented using an AVL tree.
///
/// This version allows a custom sorting function to be used.
#[derive(Clone)]
pub struct MapBy<K, V, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    tree: Tree,
    key_value: Vec<(K, V)>,
    compare: F,
}

impl<K, V, F> MapBy<K, V, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    /// Constructor
    pub fn new(compare: F) -> MapBy<K, V, F> {
        MapBy {
            tree: Tree::new(),
            key_value: Vec::new(),
            compare,
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize, compare: F) -> MapBy<K, V, F> {
        MapBy {
            tree: Tree::with_capacity(capacity),
            key_value: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Get the number of key/value pairs in the `MapBy`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any key/value pairs in the `MapBy`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the height of the underlying tree
    #[inline]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Remove all key/value pairs from the `MapBy`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.key_value.truncate(0);
    }

    /// Reserves capacity for at least `additional` more key/value pairs
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
        self.key_value.reserve(additional);
    }

    /// Check if a key is in the `MapBy`
    pub fn contains(&self, key: &K) -> bool {
        !self.leaf(key) != 0
    }

    /// Get a value by key.
    ///
    /// If the key is not in the tree then `None` is returned.
    pub fn get(&self, key: &K) -> Option<&V> {
        let leaf = self.leaf(key);
        if !leaf == 0 {
            return None;
        }

        Some(&self.key_value[leaf].1)
    }

    /// Get a mutable reference by key.
    ///
    /// If the key is not in the tree then `None` is returned.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf = self.leaf(key);
        if !leaf == 0 {
            return None;
        }

        Some(&mut self.key_value[leaf].1)
    }

    /// Insert a value by key.
    ///
    /// Returns `true` if the pair was added. If a key comparing equal is already present the map
    /// is unchanged, `value` is dropped and `false` is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let key_value = &self.key_value;
        let compare = &self.compare;
        let leaf = self.tree.insert_with(|x| compare(&key, &key_value[x].0));
        if leaf != self.key_value.len() {
            return false;
        }

        self.key_value.push((key, value));
        true
    }

    /// Get the first key in the map
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            let (k, v) = &self.key_value[leaf];
            Some((k, v))
        }
    }

    /// Get the last key in the map
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            let (k, v) = &self.key_value[leaf];
            Some((k, v))
        }
    }

    /// Iterate over the key/value pairs in the `MapBy`, in ascending key order
    pub fn iter(&self) -> MapIterator<'_, K, V> {
        MapIterator {
            leaves: self.tree.iter(),
            key_value: &self.key_value,
        }
    }

    // Find the leaf holding a key
    fn leaf(&self, key: &K) -> usize {
        self.tree.get_with(|x| (self.compare)(key, &self.key_value[x].0))
    }
}

impl<'a, K, V, F> IntoIterator for &'a MapBy<K, V, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    type Item = &'a (K, V);
    type IntoIter = MapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// A very simple test of a map
fn test_map_0() {
    use alloc::vec;

    let mut map = Map::new();

    assert!(map.insert(5, "Five"));
    assert!(map.insert(1, "One"));
    assert!(map.insert(9, "Nine"));

    assert_eq!(map.get(&5), Some(&"Five"));
    assert_eq!(map.get(&4), None);
    assert!(map.contains(&1));
    assert_eq!(map.first(), Some((&1, &"One")));
    assert_eq!(map.last(), Some((&9, &"Nine")));

    let v: Vec<(i32, &str)> = map.iter().cloned().collect();
    assert_eq!(v, vec![(1, "One"), (5, "Five"), (9, "Nine")]);
}

#[test]
// Inserting an existing key keeps the original value
fn test_map_1() {
    let mut map = Map::new();

    assert!(map.insert(7, 70));
    assert!(!map.insert(7, 700));
    assert_eq!(map.get(&7), Some(&70));
    assert_eq!(map.count(), 1);

    *map.get_mut(&7).unwrap() += 1;
    assert_eq!(map.get(&7), Some(&71));
    assert_eq!(map.get_mut(&8), None);

    let map: Map<u8, char> = [(2, 'b'), (1, 'a'), (2, 'x'), (3, 'c')].into_iter().collect();
    assert_eq!(map.count(), 3);
    assert_eq!(map.get(&2), Some(&'b'));
}

#[test]
// A stress test with inserting and getting
fn test_map_2() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut map = Map::new();
    for i in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        map.insert(key, i);
    }

    assert_eq!(map.count(), COUNT);
    assert!(map.height() <= 23);

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for i in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        assert_eq!(map.get(&key), Some(&i));
    }

    map.tree.check();
}

#[test]
// Maps with string keys
fn test_map_3() {
    use alloc::vec;

    let mut map: StringMap<u32> = [("one", 1), ("two", 2), ("three", 3)].into_iter().collect();

    assert!(map.contains("two"));
    assert_eq!(map.get("three"), Some(&3));
    assert_eq!(map.get("four"), None);
    assert!(!map.insert("one", 100));
    assert_eq!(map.get("one"), Some(&1));

    *map.get_mut("two").unwrap() *= 10;
    assert_eq!(map.first(), Some(("one", &1)));
    assert_eq!(map.last(), Some(("two", &20)));

    let v: Vec<(&str, u32)> = map.iter().map(|(k, v)| (k, *v)).collect();
    assert_eq!(v, vec![("one", 1), ("three", 3), ("two", 20)]);
}

#[test]
// A map with a custom ordering
fn test_map_4() {
    use alloc::vec;

    let mut map = MapBy::new(|a: &i64, b: &i64| a.abs().cmp(&b.abs()));

    assert!(map.insert(-3, 'a'));
    assert!(map.insert(1, 'b'));
    assert!(map.insert(-2, 'c'));
    assert!(!map.insert(3, 'd'));

    assert_eq!(map.get(&3), Some(&'a'));
    assert_eq!(map.first(), Some((&1, &'b')));
    assert_eq!(map.last(), Some((&-3, &'a')));

    let v: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(v, vec![1, -2, -3]);

    map.clear();
    assert!(map.is_empty());
    assert!(!map.contains(&1));
}
