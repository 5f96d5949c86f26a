//! Utility types to support height balanced (AVL) binary trees

#![warn(missing_docs)]

extern crate alloc;
use alloc::vec::Vec;

use core::{cmp::Ordering, fmt::Display, iter::FusedIterator};

use log::trace;

//-----------------------------------------------------------------------------------------------//

// A leaf in an AVL tree
#[derive(Clone, PartialEq, Eq)]
struct Leaf {
    left: usize,
    right: usize,
    height: usize,
}

// The direction taken below a leaf while descending the tree
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

//-----------------------------------------------------------------------------------------------//

/// A tree of integer leaves
///
/// Each leaf is a `usize` index into an external slice of keys which the tree does not store
/// itself. A missing leaf is represented by `!0` (that is `usize::MAX`). Leaves are never removed,
/// so the leaf created by an insertion is always the next index in the ascending sequence, and the
/// caller is expected to push the matching key onto its slice.
#[derive(Clone, PartialEq, Eq)]
pub struct Tree {
    leaf: Vec<Leaf>,
    root: usize,
}

impl Tree {
    /// Construct an empty tree
    pub fn new() -> Tree {
        Tree {
            leaf: Vec::new(),
            root: !0,
        }
    }

    /// Construct an empty tree, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Tree {
        Tree {
            leaf: Vec::with_capacity(capacity),
            root: !0,
        }
    }

    /// Get the number of leaves in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.leaf.len()
    }

    /// Check if the tree has no leaves
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leaf.is_empty()
    }

    /// Remove all leaves from the tree
    pub fn clear(&mut self) {
        self.leaf.truncate(0);
        self.root = !0;
    }

    /// Reserves capacity for at least `additional` more leaves
    pub fn reserve(&mut self, additional: usize) {
        self.leaf.reserve(additional);
    }

    /// Get the root leaf, or `usize::MAX` if the tree is empty
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Get the left child of a leaf, or `usize::MAX` if there is none
    #[inline]
    pub fn left(&self, leaf: usize) -> usize {
        self.leaf[leaf].left
    }

    /// Get the right child of a leaf, or `usize::MAX` if there is none
    #[inline]
    pub fn right(&self, leaf: usize) -> usize {
        self.leaf[leaf].right
    }

    /// Get the height of the tree
    ///
    /// An empty tree has height 0 and a tree with a single leaf has height 1.
    #[inline]
    pub fn height(&self) -> usize {
        height(&self.leaf, self.root)
    }

    /// Get the cached height of the subtree below a leaf
    ///
    /// Passing `usize::MAX` is allowed, and returns a height of 0.
    #[inline]
    pub fn height_of(&self, leaf: usize) -> usize {
        height(&self.leaf, leaf)
    }

    /// Get the balance factor of a leaf, the height of the left subtree minus the height of the
    /// right subtree. For a valid tree this is always -1, 0 or 1.
    #[inline]
    pub fn balance_of(&self, leaf: usize) -> isize {
        balance_factor(&self.leaf, leaf)
    }

    /// Get a leaf by key
    ///
    /// If the key is not found, then `usize::MAX` is returned. If the slice of keys is not sorted
    /// properly according to the binary tree, then the results are undefined.
    pub fn get_k<K: Ord>(&self, key: &K, key_slice: &[K]) -> usize {
        get(&self.leaf, self.root, |x| key.cmp(&key_slice[x]))
    }

    /// Insert a leaf by key
    ///
    /// The leaf holding the key is returned. If the key was not already present this is a new
    /// leaf, equal to the `count` before the call, and the tree has been rebalanced around it. If
    /// the key was present the tree is left untouched.
    pub fn insert_k<K: Ord>(&mut self, key: &K, key_slice: &[K]) -> usize {
        self.insert_with(|x| key.cmp(&key_slice[x]))
    }

    /// Get a leaf by key/value pair
    ///
    /// If the key is not found, then `usize::MAX` is returned. If the slice of key/value pairs is
    /// not sorted properly according to the binary tree, then the results are undefined.
    pub fn get_kv<K: Ord, V>(&self, key: &K, key_value: &[(K, V)]) -> usize {
        get(&self.leaf, self.root, |x| key.cmp(&key_value[x].0))
    }

    /// Insert a leaf by key/value pair
    ///
    /// Behaves like `insert_k`, comparing against the key of each pair.
    pub fn insert_kv<K: Ord, V>(&mut self, key: &K, key_value: &[(K, V)]) -> usize {
        self.insert_with(|x| key.cmp(&key_value[x].0))
    }

    /// Get a leaf using a comparison function
    ///
    /// `compare(leaf)` must return the ordering of the sought key relative to the key held at
    /// `leaf`. If the key is not found, then `usize::MAX` is returned.
    pub fn get_with<F>(&self, compare: F) -> usize
    where
        F: Fn(usize) -> Ordering,
    {
        get(&self.leaf, self.root, compare)
    }

    /// Insert a leaf using a comparison function
    ///
    /// `compare(leaf)` must return the ordering of the new key relative to the key held at `leaf`.
    /// The comparison must be a total order consistent with previous insertions, otherwise the
    /// shape of the tree is unspecified (though still memory safe).
    pub fn insert_with<F>(&mut self, compare: F) -> usize
    where
        F: Fn(usize) -> Ordering,
    {
        let mut path = Vec::with_capacity(self.height());
        if let Some(leaf) = locate(&self.leaf, self.root, compare, &mut path) {
            return leaf;
        }

        let leaf = self.alloc();
        self.root = retrace(&mut self.leaf, &path, leaf);
        leaf
    }

    /// Get the first leaf in the tree
    #[inline]
    pub fn first(&self) -> usize {
        first(&self.leaf, self.root)
    }

    /// Get the last leaf in the tree
    #[inline]
    pub fn last(&self) -> usize {
        last(&self.leaf, self.root)
    }

    /// Iterate over the leaves in ascending key order
    pub fn iter(&self) -> Leaves<'_> {
        Leaves::new(&self.leaf, self.root)
    }

    // Allocate and initialise a new, unattached leaf
    fn alloc(&mut self) -> usize {
        let leaf = self.leaf.len();
        trace!("allocating leaf {leaf}");

        self.leaf.push(Leaf {
            left: !0,
            right: !0,
            height: 1,
        });

        leaf
    }

    // Test checks of height, balance and count
    #[cfg(test)]
    pub(crate) fn check(&self) {
        check_leaf(&self.leaf, self.root);
        assert_eq!(self.iter().count(), self.count());
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        for leaf in self.iter() {
            write!(f, "{leaf} ")?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = usize;
    type IntoIter = Leaves<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

/// In-order iterator over the leaves of a `Tree`
///
/// There are no parent links in the tree, so the iterator keeps the unvisited ancestors of the
/// current leaf on a stack. The stack never grows beyond the height of the tree.
pub struct Leaves<'a> {
    leaf: &'a [Leaf],
    stack: Vec<usize>,
    count: usize,
}

impl<'a> Leaves<'a> {
    fn new(leaf: &'a [Leaf], root: usize) -> Leaves<'a> {
        let mut leaves = Leaves {
            leaf,
            stack: Vec::with_capacity(height(leaf, root)),
            count: leaf.len(),
        };
        leaves.descend(root);
        leaves
    }

    // Push `x` and its chain of left children
    fn descend(&mut self, mut x: usize) {
        while !x != 0 {
            self.stack.push(x);
            x = self.leaf[x].left;
        }
    }
}

impl Iterator for Leaves<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let x = self.stack.pop()?;
        self.descend(self.leaf[x].right);
        self.count -= 1;
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl ExactSizeIterator for Leaves<'_> {}

impl FusedIterator for Leaves<'_> {}

//-----------------------------------------------------------------------------------------------//

// IMPLEMENTATION NOTE
//
// The functions below are low level. They are not 'unsafe' in the Rust sense, but they implement
// very low level operations. None of them follow parent links (there are none): a function that
// restructures a subtree returns the new subtree root, and the caller reattaches it.

// Height of a subtree, with an absent subtree having height 0
#[inline]
fn height(leaf: &[Leaf], x: usize) -> usize {
    if !x == 0 {
        0
    } else {
        leaf[x].height
    }
}

// Balance factor of a subtree, with an absent subtree being balanced
#[inline]
fn balance_factor(leaf: &[Leaf], x: usize) -> isize {
    if !x == 0 {
        return 0;
    }

    height(leaf, leaf[x].left) as isize - height(leaf, leaf[x].right) as isize
}

// Recompute the cached height of a leaf from its children
#[inline]
fn update(leaf: &mut [Leaf], x: usize) {
    let h = height(leaf, leaf[x].left).max(height(leaf, leaf[x].right));
    leaf[x].height = h + 1;
}

// Replace one child of a leaf
#[inline]
fn attach(leaf: &mut [Leaf], x: usize, side: Side, y: usize) {
    match side {
        Side::Left => leaf[x].left = y,
        Side::Right => leaf[x].right = y,
    }
}

// Get a leaf in a tree
fn get<F>(leaf: &[Leaf], mut x: usize, compare: F) -> usize
where
    F: Fn(usize) -> Ordering,
{
    loop {
        if !x == 0 {
            return !0;
        }

        match compare(x) {
            Ordering::Equal => return x,
            Ordering::Less => x = leaf[x].left,
            Ordering::Greater => x = leaf[x].right,
        }
    }
}

// Locate a leaf in a tree, or if not found record the path down to where it should be inserted
//
// Each entry of the path is an ancestor of the insertion point, paired with the side the search
// took below it. The path runs from the root downwards, so the last entry is the new parent.
fn locate<F>(
    leaf: &[Leaf],
    mut x: usize,
    compare: F,
    path: &mut Vec<(usize, Side)>,
) -> Option<usize>
where
    F: Fn(usize) -> Ordering,
{
    while !x != 0 {
        let side = match compare(x) {
            Ordering::Equal => return Some(x),
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };
        path.push((x, side));
        x = match side {
            Side::Left => leaf[x].left,
            Side::Right => leaf[x].right,
        };
    }

    None
}

// Hang a new leaf from the end of a path and walk back up to the root
//
// At each ancestor the (possibly rotated) subtree below is reattached, the height of the ancestor
// is recomputed, and if it has become unbalanced it is rotated. The new root of the whole tree is
// returned.
fn retrace(leaf: &mut [Leaf], path: &[(usize, Side)], mut x: usize) -> usize {
    for (i, &(z, side)) in path.iter().enumerate().rev() {
        attach(leaf, z, side, x);
        update(leaf, z);

        // The side taken below the child of `z` tells which of the four cases applies
        let below = path.get(i + 1).map(|&(_, s)| s);
        x = rebalance(leaf, z, below);
    }

    x
}

// Restore balance at a leaf whose subtree heights may differ by 2
//
// `below` is the side the insertion took at the child of `z`. Only the subtree that grew can be
// too tall, and a child that is too tall has height at least 2, so it is always known when a
// rotation is needed.
fn rebalance(leaf: &mut [Leaf], z: usize, below: Option<Side>) -> usize {
    let balance = balance_factor(leaf, z);

    if balance > 1 {
        debug_assert!(below.is_some());
        match below {
            Some(Side::Right) => rotate_left_right(leaf, z),
            _ => rotate_right(leaf, z),
        }
    } else if balance < -1 {
        debug_assert!(below.is_some());
        match below {
            Some(Side::Left) => rotate_right_left(leaf, z),
            _ => rotate_left(leaf, z),
        }
    } else {
        z
    }
}

// Rotate a subtree to the right, promoting the left child of `z`
//
//        z          y
//       / \        / \
//      y   c  =>  a   z
//     / \            / \
//    a   b          b   c
//
// The height of `z` must be recomputed before that of `y`, which now sits above it.
fn rotate_right(leaf: &mut [Leaf], z: usize) -> usize {
    let y = leaf[z].left;
    debug_assert!(!y != 0);
    trace!("rotating right around leaf {z}");

    leaf[z].left = leaf[y].right;
    leaf[y].right = z;

    update(leaf, z);
    update(leaf, y);
    y
}

// Rotate a subtree to the left, promoting the right child of `z` (mirror of `rotate_right`)
fn rotate_left(leaf: &mut [Leaf], z: usize) -> usize {
    let y = leaf[z].right;
    debug_assert!(!y != 0);
    trace!("rotating left around leaf {z}");

    leaf[z].right = leaf[y].left;
    leaf[y].left = z;

    update(leaf, z);
    update(leaf, y);
    y
}

// Double rotation for a subtree that is too tall on the inside of its left child
fn rotate_left_right(leaf: &mut [Leaf], z: usize) -> usize {
    let y = leaf[z].left;
    leaf[z].left = rotate_left(leaf, y);
    rotate_right(leaf, z)
}

// Double rotation for a subtree that is too tall on the inside of its right child
fn rotate_right_left(leaf: &mut [Leaf], z: usize) -> usize {
    let y = leaf[z].right;
    leaf[z].right = rotate_right(leaf, y);
    rotate_left(leaf, z)
}

// Get the first leaf (the left-most)
fn first(leaf: &[Leaf], mut x: usize) -> usize {
    if !x == 0 {
        return !0;
    }

    loop {
        let y = leaf[x].left;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the last leaf (the right-most)
fn last(leaf: &[Leaf], mut x: usize) -> usize {
    if !x == 0 {
        return !0;
    }

    loop {
        let y = leaf[x].right;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

//-----------------------------------------------------------------------------------------------//

// TEST : Check cached heights and balance factors, returning the height of the subtree
#[cfg(test)]
fn check_leaf(leaf: &[Leaf], x: usize) -> usize {
    if !x == 0 {
        return 0;
    }

    let l = check_leaf(leaf, leaf[x].left);
    let r = check_leaf(leaf, leaf[x].right);

    assert_eq!(leaf[x].height, l.max(r) + 1, "stale height at leaf {x}");
    assert!(l.abs_diff(r) <= 1, "leaf {x} is unbalanced");

    leaf[x].height
}

// TEST : Check the key order is strictly ascending
#[cfg(test)]
fn check_k<K: Ord>(tree: &Tree, key_slice: &[K]) {
    let leaves: Vec<usize> = tree.iter().collect();
    for pair in leaves.windows(2) {
        assert!(key_slice[pair[0]] < key_slice[pair[1]]);
    }
}

// TEST : Insert keys one at a time, checking the tree after every insertion
#[cfg(test)]
fn insert_all(tree: &mut Tree, key_slice: &mut Vec<i32>, keys: &[i32]) {
    for &key in keys {
        let leaf = tree.insert_k(&key, key_slice);
        if leaf == key_slice.len() {
            key_slice.push(key);
        }
        tree.check();
        check_k(tree, key_slice);
    }
}

#[test]
// Searching an empty tree finds nothing
fn test_tree_0() {
    let tree = Tree::new();
    let key_slice: Vec<i32> = Vec::new();

    assert_eq!(tree.get_k(&0, &key_slice), !0);
    assert_eq!(tree.get_k(&i32::MIN, &key_slice), !0);
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.height_of(!0), 0);
    assert_eq!(tree.first(), !0);
    assert_eq!(tree.last(), !0);
    assert_eq!(tree.iter().next(), None);
}

#[test]
// A single insertion creates a root leaf of height 1
fn test_tree_1() {
    let mut tree = Tree::new();
    let mut key_slice = Vec::new();
    insert_all(&mut tree, &mut key_slice, &[10]);

    let root = tree.root();
    assert_eq!(key_slice[root], 10);
    assert_eq!(tree.left(root), !0);
    assert_eq!(tree.right(root), !0);
    assert_eq!(tree.height(), 1);

    insert_all(&mut tree, &mut key_slice, &[5, 15]);
    assert_eq!(key_slice[tree.root()], 10);
    assert_eq!(key_slice[tree.left(tree.root())], 5);
    assert_eq!(key_slice[tree.right(tree.root())], 15);
    assert_eq!(tree.height(), 2);
}

#[test]
// Each of the four imbalance shapes ends with 20 at the root, 10 on the left and 30 on the right
fn test_tree_2() {
    let cases: [[i32; 3]; 4] = [
        [30, 20, 10], // left-left
        [10, 20, 30], // right-right
        [30, 10, 20], // left-right
        [10, 30, 20], // right-left
    ];

    for keys in cases {
        let mut tree = Tree::new();
        let mut key_slice = Vec::new();
        insert_all(&mut tree, &mut key_slice, &keys);

        let root = tree.root();
        assert_eq!(key_slice[root], 20, "{keys:?}");
        assert_eq!(key_slice[tree.left(root)], 10, "{keys:?}");
        assert_eq!(key_slice[tree.right(root)], 30, "{keys:?}");
        assert_eq!(tree.height_of(root), 2);
        assert_eq!(tree.height_of(tree.left(root)), 1);
        assert_eq!(tree.height_of(tree.right(root)), 1);
    }
}

#[test]
// Inserting a duplicate key leaves the tree exactly as it was
fn test_tree_3() {
    let mut tree = Tree::new();
    let mut key_slice = Vec::new();
    insert_all(&mut tree, &mut key_slice, &[50, 25, 75, 10, 30, 60, 80, 5]);

    let before = tree.clone();
    for key in [50, 5, 80, 30] {
        let leaf = tree.get_k(&key, &key_slice);
        assert_eq!(tree.insert_k(&key, &key_slice), leaf);
        assert!(tree == before);
    }
    assert_eq!(tree.count(), 8);
}

#[test]
// Ascending and descending runs of 2^k - 1 keys build perfect trees
fn test_tree_4() {
    let ascending: Vec<i32> = (1..=15).collect();
    let descending: Vec<i32> = (1..=15).rev().collect();

    for keys in [ascending, descending] {
        let mut tree = Tree::new();
        let mut key_slice = Vec::new();
        insert_all(&mut tree, &mut key_slice, &keys);

        assert_eq!(tree.height(), 4);
        assert_eq!(key_slice[tree.root()], 8);
        for key in 1..=15 {
            assert_ne!(tree.get_k(&key, &key_slice), !0);
        }
        assert_eq!(tree.get_k(&0, &key_slice), !0);
        assert_eq!(tree.get_k(&16, &key_slice), !0);
    }
}

#[test]
// Mixed sequences, including negative keys, stay balanced and searchable
fn test_tree_5() {
    let mut tree = Tree::new();
    let mut key_slice = Vec::new();
    insert_all(&mut tree, &mut key_slice, &[0, -10, 10, -5, 5, -15, 15]);
    assert_eq!(key_slice[tree.root()], 0);
    assert_ne!(tree.get_k(&-15, &key_slice), !0);
    assert_ne!(tree.get_k(&15, &key_slice), !0);

    let mut tree = Tree::new();
    let mut key_slice = Vec::new();
    let keys = [15, 10, 20, 8, 12, 16, 25, 6, 11, 13, 27];
    insert_all(&mut tree, &mut key_slice, &keys);
    for key in keys {
        assert_eq!(key_slice[tree.get_k(&key, &key_slice)], key);
    }

    // Heights propagate correctly past a rotation
    let mut tree = Tree::new();
    let mut key_slice = Vec::new();
    insert_all(&mut tree, &mut key_slice, &[10, 20, 30, 40, 50]);
    assert_eq!(key_slice[tree.root()], 20);
    assert_eq!(key_slice[tree.right(tree.root())], 40);
    assert_eq!(tree.height(), 3);
}

#[test]
// First, last and in-order iteration
fn test_tree_6() {
    use alloc::string::ToString;

    let mut tree = Tree::new();
    let mut key_slice = Vec::new();
    insert_all(&mut tree, &mut key_slice, &[4, 2, 6, 1, 3, 5, 7]);

    assert_eq!(key_slice[tree.first()], 1);
    assert_eq!(key_slice[tree.last()], 7);

    let keys: Vec<i32> = tree.iter().map(|x| key_slice[x]).collect();
    assert_eq!(keys, [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(tree.iter().len(), 7);
    assert_eq!(tree.to_string(), "[ 3 1 4 0 5 2 6 ]");
}

#[test]
// A stress test with random keys
fn test_tree_7() {
    use rand::prelude::*;

    const COUNT: usize = 10000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut tree = Tree::new();
    let mut key_slice = Vec::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        if tree.insert_k(&key, &key_slice) == key_slice.len() {
            key_slice.push(key);
        }
    }

    tree.check();
    check_k(&tree, &key_slice);
    assert_eq!(tree.count(), key_slice.len());

    // 1.44 * log2(10002) - 0.328 is a little under 19
    assert!(tree.height() <= 18);

    for (leaf, key) in key_slice.iter().enumerate() {
        assert_eq!(tree.get_k(key, &key_slice), leaf);
        assert!(tree.balance_of(leaf).abs() <= 1);
    }
}
