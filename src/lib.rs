//! An AVL tree of unique values, supporting logarithmic joins.
//!
//! [`AvlTree`] is a self-balancing binary search tree. Every mutation restores
//! the AVL invariant (the heights of the two subtrees of any node differ by at
//! most one) by rebalancing bottom-up from the point of change, so the height
//! of a tree holding `n` values is always `O(log n)`.
//!
//! Alongside the tree structure, each tree maintains a hash index from value to
//! node, making membership tests O(1) and letting a deletion start at the
//! target node without descending from the root.
//!
//! Two trees whose values do not overlap can be combined with
//! [`AvlTree::join()`], which reuses the taller tree and links the shorter one
//! in at a point of comparable height, rather than rebuilding the result:
//!
//! ```
//! use joinavl::{AvlNode, AvlTree};
//!
//! let mut left = AvlTree::new();
//! for v in [1, 2, 3] {
//!     left.insert(v).unwrap();
//! }
//!
//! let mut right = AvlTree::new();
//! for v in [4, 5, 6, 7] {
//!     right.insert(v).unwrap();
//! }
//!
//! let t = AvlTree::join(left, right).unwrap();
//!
//! let root = t.root().unwrap();
//! assert_eq!(*root.value(), 3);
//! assert_eq!(*root.left().unwrap().value(), 2);
//! assert_eq!(*root.right().unwrap().value(), 5);
//! ```
//!
//! The structure of a tree can be inspected through the read-only [`AvlNode`]
//! view, and rendered as a text diagram with [`render()`] (or the [`Display`]
//! implementation of [`AvlTree`]).
//!
//! [`Display`]: std::fmt::Display

#![deny(rustdoc::broken_intra_doc_links, rust_2018_idioms)]
#![warn(missing_docs, clippy::todo, clippy::dbg_macro)]

mod compare;
mod error;
mod node;
mod render;
mod tree;
mod view;

#[cfg(test)]
mod test_utils;

pub use compare::*;
pub use error::*;
pub use render::render;
pub use tree::*;
pub use view::*;
