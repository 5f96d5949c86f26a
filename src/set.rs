//! Implementation of sets, backed by an AVL tree
#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use compact_str::CompactString;
use core::{cmp::Ordering, iter::FusedIterator};

use crate::util::{Leaves, Tree};

//-----------------------------------------------------------------------------------------------//

/// A simple set of keys, implemented using an AVL tree.
#[derive(Clone)]
pub struct Set<K>
where
    K: Ord,
{
    tree: Tree,
    key_slice: Vec<K>,
}

impl<K> Set<K>
where
    K: Ord,
{
    /// Constructor
    pub fn new() -> Set<K> {
        Set {
            tree: Tree::new(),
            key_slice: Vec::new(),
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Set<K> {
        Set {
            tree: Tree::with_capacity(capacity),
            key_slice: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of keys in the `Set`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any keys in the `Set`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the height of the underlying tree
    #[inline]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Remove all keys from the `Set`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.key_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more keys
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
        self.key_slice.reserve(additional);
    }

    /// Check if a key is in the `Set`
    pub fn contains(&self, key: &K) -> bool {
        !self.tree.get_k(key, &self.key_slice) != 0
    }

    /// Get a key.
    ///
    /// If the key is not in the tree then `None` is returned.
    pub fn get(&self, key: &K) -> Option<&K> {
        let leaf = self.tree.get_k(key, &self.key_slice);
        if !leaf == 0 {
            return None;
        }

        Some(&self.key_slice[leaf])
    }

    /// Insert a key.
    ///
    /// Returns `true` if the key was added. If an equal key is already in the set, the set is left
    /// exactly as it was (the stored key is kept) and `false` is returned.
    pub fn insert(&mut self, key: K) -> bool {
        let leaf = self.tree.insert_k(&key, &self.key_slice);
        if leaf != self.key_slice.len() {
            return false;
        }

        self.key_slice.push(key);
        true
    }

    /// Get the first key in the set
    pub fn first(&self) -> Option<&K> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            Some(&self.key_slice[leaf])
        }
    }

    /// Get the last key in the set
    pub fn last(&self) -> Option<&K> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            Some(&self.key_slice[leaf])
        }
    }

    /// Iterate over the keys in the `Set`, in ascending order
    pub fn iter(&self) -> SetIterator<'_, K> {
        SetIterator {
            leaves: self.tree.iter(),
            key_slice: &self.key_slice,
        }
    }
}

impl<K> Default for Set<K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K> IntoIterator for &'a Set<K>
where
    K: Ord,
{
    type Item = &'a K;
    type IntoIter = SetIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> FromIterator<K> for Set<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl<K> Extend<K> for Set<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `Set` or a `SetBy`
pub struct SetIterator<'a, K> {
    leaves: Leaves<'a>,
    key_slice: &'a [K],
}

impl<'a, K> Iterator for SetIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let leaf = self.leaves.next()?;
        Some(&self.key_slice[leaf])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.leaves.size_hint()
    }
}

impl<K> ExactSizeIterator for SetIterator<'_, K> {}

impl<K> FusedIterator for SetIterator<'_, K> {}

//-----------------------------------------------------------------------------------------------//

/// A simple set of strings, implemented using an AVL tree.
///
/// This is specialised version of `Set` that stores keys as a string.
#[derive(Clone)]
pub struct StringSet {
    tree: Tree,
    key_slice: Vec<CompactString>,
}

impl StringSet {
    /// Constructor
    pub fn new() -> StringSet {
        StringSet {
            tree: Tree::new(),
            key_slice: Vec::new(),
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> StringSet {
        StringSet {
            tree: Tree::with_capacity(capacity),
            key_slice: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of strings in the `StringSet`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any strings in the `StringSet`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the height of the underlying tree
    #[inline]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Remove all strings from the `StringSet`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.key_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more strings
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
        self.key_slice.reserve(additional);
    }

    /// Check if a string is in the `StringSet`
    pub fn contains(&self, key: &str) -> bool {
        !self.leaf(key) != 0
    }

    /// Get a string.
    ///
    /// If the string is not in the tree then `None` is returned.
    pub fn get(&self, key: &str) -> Option<&str> {
        let leaf = self.leaf(key);
        if !leaf == 0 {
            return None;
        }

        Some(&self.key_slice[leaf])
    }

    /// Insert a string.
    ///
    /// Returns `true` if the string was added, or `false` if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        let key_slice = &self.key_slice;
        let leaf = self.tree.insert_with(|x| key.cmp(key_slice[x].as_str()));
        if leaf != self.key_slice.len() {
            return false;
        }

        self.key_slice.push(CompactString::new(key));
        true
    }

    /// Get the first string in the set
    pub fn first(&self) -> Option<&str> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            Some(&self.key_slice[leaf])
        }
    }

    /// Get the last string in the set
    pub fn last(&self) -> Option<&str> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            Some(&self.key_slice[leaf])
        }
    }

    /// Iterate over the strings in the `StringSet`, in ascending order
    pub fn iter(&self) -> StringSetIterator<'_> {
        StringSetIterator {
            leaves: self.tree.iter(),
            key_slice: &self.key_slice,
        }
    }

    // Find the leaf holding a string
    fn leaf(&self, key: &str) -> usize {
        self.tree.get_with(|x| key.cmp(self.key_slice[x].as_str()))
    }
}

impl Default for StringSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a str;
    type IntoIter = StringSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> FromIterator<&'a str> for StringSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl<'a> Extend<&'a str> for StringSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `StringSet`
pub struct StringSetIterator<'a> {
    leaves: Leaves<'a>,
    key_slice: &'a [CompactString],
}

impl<'a> Iterator for StringSetIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let leaf = self.leaves.next()?;
        Some(&self.key_slice[leaf])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.leaves.size_hint()
    }
}

impl ExactSizeIterator for StringSetIterator<'_> {}

impl FusedIterator for StringSetIterator<'_> {}

//-----------------------------------------------------------------------------------------------//

/// A simple set of keys, implemented using an AVL tree.
///
/// This version allows a custom sorting function to be used. The function must be a total order;
/// if it is not, lookups may miss keys that were inserted.
#[derive(Clone)]
pub struct SetBy<K, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    tree: Tree,
    key_slice: Vec<K>,
    compare: F,
}

impl<K, F> SetBy<K, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    /// Constructor
    pub fn new(compare: F) -> SetBy<K, F> {
        SetBy {
            tree: Tree::new(),
            key_slice: Vec::new(),
            compare,
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize, compare: F) -> SetBy<K, F> {
        SetBy {
            tree: Tree::with_capacity(capacity),
            key_slice: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Get the number of keys in the `SetBy`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any keys in the `SetBy`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the height of the underlying tree
    #[inline]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Remove all keys from the `SetBy`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.key_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more keys
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
        self.key_slice.reserve(additional);
    }

    /// Check if a key is in the `SetBy`
    pub fn contains(&self, key: &K) -> bool {
        !self.leaf(key) != 0
    }

    /// Get a key.
    ///
    /// If the key is not in the tree then `None` is returned.
    pub fn get(&self, key: &K) -> Option<&K> {
        let leaf = self.leaf(key);
        if !leaf == 0 {
            return None;
        }

        Some(&self.key_slice[leaf])
    }

    /// Insert a key.
    ///
    /// Returns `true` if the key was added, or `false` if a key comparing equal was already
    /// present (in which case the set is unchanged).
    pub fn insert(&mut self, key: K) -> bool {
        let key_slice = &self.key_slice;
        let compare = &self.compare;
        let leaf = self.tree.insert_with(|x| compare(&key, &key_slice[x]));
        if leaf != self.key_slice.len() {
            return false;
        }

        self.key_slice.push(key);
        true
    }

    /// Get the first key in the set
    pub fn first(&self) -> Option<&K> {
        let leaf = self.tree.first();
        if !leaf == 0 {
            None
        } else {
            Some(&self.key_slice[leaf])
        }
    }

    /// Get the last key in the set
    pub fn last(&self) -> Option<&K> {
        let leaf = self.tree.last();
        if !leaf == 0 {
            None
        } else {
            Some(&self.key_slice[leaf])
        }
    }

    /// Iterate over the keys in the `SetBy`, in ascending order
    pub fn iter(&self) -> SetIterator<'_, K> {
        SetIterator {
            leaves: self.tree.iter(),
            key_slice: &self.key_slice,
        }
    }

    // Find the leaf holding a key
    fn leaf(&self, key: &K) -> usize {
        self.tree.get_with(|x| (self.compare)(key, &self.key_slice[x]))
    }
}

impl<'a, K, F> IntoIterator for &'a SetBy<K, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    type Item = &'a K;
    type IntoIter = SetIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// A very simple test of a set
fn test_set_0() {
    use alloc::vec;

    let mut set = Set::new();

    assert!(!set.contains(&5));
    assert_eq!(set.first(), None);

    assert!(set.insert(5));
    assert!(set.insert(1));
    assert!(set.insert(9));

    assert_eq!(set.get(&5), Some(&5));
    assert_eq!(set.get(&4), None);
    assert!(set.contains(&9));
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&9));

    let v: Vec<i32> = set.iter().cloned().collect();
    assert_eq!(v, vec![1, 5, 9]);
}

#[test]
// Keys that are not `Copy`
fn test_set_1() {
    use alloc::{
        string::{String, ToString},
        vec,
    };

    let mut set = Set::new();

    set.insert("Five".to_string());
    set.insert("One".to_string());
    set.insert("Nine".to_string());

    assert_eq!(set.get(&"Five".to_string()), Some(&"Five".to_string()));
    assert_eq!(set.get(&"Seven".to_string()), None);

    let v: Vec<String> = set.iter().cloned().collect();
    assert_eq!(
        v,
        vec!["Five".to_string(), "Nine".to_string(), "One".to_string()]
    );
}

#[test]
// A stress test with inserting and getting
fn test_set_2() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut set = Set::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        set.insert(key);
    }

    assert_eq!(set.count(), COUNT);
    assert!(set.height() <= 23);

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        assert_eq!(set.get(&key), Some(&key));
    }

    assert_eq!(set.count(), COUNT);
    set.tree.check();
}

#[test]
// Duplicates are ignored, both directly and when collecting
fn test_set_3() {
    let mut set: Set<u32> = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5].into_iter().collect();
    assert_eq!(set.count(), 7);

    let before = set.tree.clone();
    assert!(!set.insert(4));
    assert!(set.tree == before);

    set.extend([7, 8, 9]);
    assert_eq!(set.count(), 9);
    assert!(set.iter().copied().eq(1..=9));
    assert_eq!(set.iter().len(), 9);

    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.height(), 0);
}

#[test]
// Sequential inserts stay shallow
fn test_set_4() {
    const COUNT: u32 = 65535;

    let mut set = Set::with_capacity(COUNT as usize);
    for key in 0..COUNT {
        set.insert(key);
    }

    assert_eq!(set.height(), 16);
    assert!((0..COUNT).all(|key| set.contains(&key)));
    assert!(!set.contains(&COUNT));
    set.tree.check();
}

#[test]
// Sets of strings
fn test_set_5() {
    use alloc::vec;

    let mut set: StringSet = ["pear", "apple", "fig", "banana", "apple"]
        .into_iter()
        .collect();

    assert_eq!(set.count(), 4);
    assert!(set.contains("fig"));
    assert!(!set.contains("grape"));
    assert_eq!(set.get("pear"), Some("pear"));
    assert_eq!(set.first(), Some("apple"));
    assert_eq!(set.last(), Some("pear"));
    assert!(!set.insert("banana"));
    assert!(set.insert("grape"));

    let v: Vec<&str> = set.iter().collect();
    assert_eq!(v, vec!["apple", "banana", "fig", "grape", "pear"]);
}

#[test]
// A set with a custom ordering
fn test_set_6() {
    use alloc::vec;

    let mut set = SetBy::new(|a: &i32, b: &i32| b.cmp(a));
    for key in [10, 30, 20, 50, 40] {
        assert!(set.insert(key));
    }
    assert!(!set.insert(30));

    assert_eq!(set.first(), Some(&50));
    assert_eq!(set.last(), Some(&10));
    assert!(set.contains(&40));
    assert_eq!(set.get(&35), None);

    let v: Vec<i32> = set.iter().copied().collect();
    assert_eq!(v, vec![50, 40, 30, 20, 10]);

    // Case insensitive keys: the first spelling wins
    let mut set = SetBy::new(|a: &&str, b: &&str| {
        a.bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
    });
    assert!(set.insert("Hello"));
    assert!(!set.insert("hELLO"));
    assert_eq!(set.get(&"HELLO"), Some(&"Hello"));
    set.tree.check();
}
