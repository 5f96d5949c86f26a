use espalier::{util::Tree, Set};
use proptest::prelude::*;

// Walk a subtree, checking cached heights, balance factors and key bounds
fn check_subtree(
    tree: &Tree,
    keys: &[i32],
    x: usize,
    low: Option<i32>,
    high: Option<i32>,
) -> usize {
    if !x == 0 {
        return 0;
    }

    let key = keys[x];
    assert!(low.map_or(true, |low| low < key), "key {key} out of order");
    assert!(high.map_or(true, |high| key < high), "key {key} out of order");

    let l = check_subtree(tree, keys, tree.left(x), low, Some(key));
    let r = check_subtree(tree, keys, tree.right(x), Some(key), high);

    assert_eq!(tree.height_of(x), l.max(r) + 1, "stale height below {key}");
    assert!(tree.balance_of(x).abs() <= 1, "unbalanced below {key}");
    assert_eq!(tree.balance_of(x), l as isize - r as isize);

    tree.height_of(x)
}

// Insert into a bare tree, keeping the key slice in step
fn insert(tree: &mut Tree, keys: &mut Vec<i32>, key: i32) -> bool {
    let leaf = tree.insert_k(&key, keys);
    if leaf != keys.len() {
        return false;
    }
    keys.push(key);
    true
}

// The worst case AVL height for `count` keys, using the golden ratio constants to four places
fn height_bound(count: usize) -> f64 {
    1.4405 * ((count + 2) as f64).log2() - 0.3277
}

proptest! {
    #[test]
    fn every_insertion_keeps_the_tree_valid(
        input in proptest::collection::vec(-1000i32..1000, 0..300),
    ) {
        let mut tree = Tree::new();
        let mut keys = Vec::new();

        for key in input {
            insert(&mut tree, &mut keys, key);
            let height = check_subtree(&tree, &keys, tree.root(), None, None);
            prop_assert_eq!(height, tree.height());
            prop_assert!(tree.height() as f64 <= height_bound(tree.count()));
        }
    }

    #[test]
    fn inserted_keys_stay_contained(
        input in proptest::collection::vec(any::<i64>(), 0..200),
        absent in any::<i64>(),
    ) {
        let mut set = Set::new();
        let mut seen = std::collections::BTreeSet::new();

        for key in &input {
            prop_assert_eq!(set.insert(*key), seen.insert(*key));
            prop_assert!(set.contains(key));
        }

        for key in &input {
            prop_assert!(set.contains(key));
        }
        prop_assert_eq!(set.contains(&absent), seen.contains(&absent));
        prop_assert_eq!(set.count(), seen.len());
        prop_assert!(set.iter().eq(seen.iter()));
    }

    #[test]
    fn duplicate_insertion_is_a_no_op(
        input in proptest::collection::vec(0u16..500, 1..200),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree = Tree::new();
        let mut keys = Vec::new();
        for key in &input {
            insert(&mut tree, &mut keys, i32::from(*key));
        }

        let before = tree.clone();
        let key = keys[pick.index(keys.len())];
        let leaf = tree.get_k(&key, &keys);

        prop_assert!(!insert(&mut tree, &mut keys, key));
        prop_assert_eq!(tree.get_k(&key, &keys), leaf);
        prop_assert!(tree == before);
    }
}

#[test]
fn empty_tree_contains_nothing() {
    let set: Set<i32> = Set::new();
    for key in [i32::MIN, -1, 0, 1, i32::MAX] {
        assert!(!set.contains(&key));
    }
    assert_eq!(set.height(), 0);
}

#[test]
fn ascending_and_descending_runs_stay_within_bound() {
    for count in [1usize, 2, 3, 15, 16, 100, 1023, 1024, 5000] {
        let ascending: Set<usize> = (0..count).collect();
        let descending: Set<usize> = (0..count).rev().collect();

        for set in [ascending, descending] {
            assert_eq!(set.count(), count);
            assert!(set.height() as f64 <= height_bound(count));
            assert!(set.iter().copied().eq(0..count));
        }
    }
}

#[test]
fn zig_zag_inserts_use_double_rotations() {
    // Closing in from both ends keeps hitting the left-right and right-left cases
    let mut tree = Tree::new();
    let mut keys = Vec::new();

    let (mut low, mut high) = (0, 1000);
    while low < high {
        insert(&mut tree, &mut keys, low);
        insert(&mut tree, &mut keys, high);
        check_subtree(&tree, &keys, tree.root(), None, None);
        low += 1;
        high -= 1;
    }

    assert!(tree.height() as f64 <= height_bound(tree.count()));
}
