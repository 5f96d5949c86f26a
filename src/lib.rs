//! ## Introduction
//!
//! This crate implements a variety of collections based on height balanced binary trees, better
//! known as AVL trees. After every insertion the tree restores the rule that, at every leaf, the
//! heights of the left and right subtrees differ by at most one. This bounds the height of a tree
//! holding `n` keys by roughly `1.44 * log2(n)`, so lookups and insertions take logarithmic time in
//! the worst case, whatever order the keys arrive in.
//!
//! ## Benefits
//!
//! The crate complements the standard `std::collection` routines, but provides the following
//! benefits:
//!
//! - Keys stored in the collections do not need to be hashable.
//! - Keys are sorted into an 'ascending' order within the collection by comparing keys pairwise.
//! - Keys in the collection do not need to implement `Clone` or `Copy`. Keys that support `Ord` can
//!   use `Map` or `Set`, etc, but if not a custom function can be supplied to compare keys using
//!   `MapBy` or `SetBy`.
//! - Lookups never restructure the tree, so they only need a shared reference.
//! - The crate is small and `#![no_std]`.
//! - Keys (and values) are stored in a single array, in insertion order. They are moved when
//!   inserted and when the array is expanded, but never as the tree rebalances around them.
//!
//! Inserting a key that is already present is a no-op: the collection, including the shape of the
//! tree, is left exactly as it was. There is no removal of individual keys, only `clear`.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type          | Stores       | Sorts By  | Iterator              |
//! |:--------------|:-------------|:----------|-----------------------|
//! | `Map`         | Key/Value    | Ord       | `MapIterator`         |
//! | `Set`         | Key          | Ord       | `SetIterator`         |
//! | `StringMap`   | String/Value | Ord       | `StringMapIterator`   |
//! | `StringSet`   | String       | Ord       | `StringSetIterator`   |
//! | `MapBy`       | Key/Value    | Function  | `MapIterator`         |
//! | `SetBy`       | Key          | Function  | `SetIterator`         |
//!
//! </center>
//!
//! The crate exposes an additional type `util::Tree` that provides the foundation of the other
//! types. This can be thought of as a utility that manages a set of `usize` indices into an
//! external vector of data, without storing the vector itself. It is provided to support
//! development of additional collection types, and to allow the shape of a tree to be inspected.
//!
//! ## Logging
//!
//! Rotations and leaf allocations are reported at `trace` level through the `log` crate. No
//! logger is installed by this crate.

#![no_std]
#![warn(missing_docs)]

mod map;
mod set;
pub mod util;

pub use map::*;
pub use set::*;
