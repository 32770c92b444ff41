use std::{cmp::Ordering, collections::HashSet, fmt::Debug, hash::Hash};

use crate::{
    compare::Compare,
    view::{AvlNode, NodeRef},
    AvlTree,
};

/// An in-order iterator over the nodes of a subtree.
#[derive(Debug)]
pub(crate) struct InOrder<'a, T> {
    stack: Vec<NodeRef<'a, T>>,
}

impl<'a, T> InOrder<'a, T> {
    pub(crate) fn new(root: Option<NodeRef<'a, T>>) -> Self {
        let mut this = Self { stack: vec![] };

        // Descend down the left side of the tree.
        if let Some(root) = root {
            this.push_subtree(root);
        }

        this
    }

    fn push_subtree(&mut self, subtree_root: NodeRef<'a, T>) {
        let mut ptr = Some(subtree_root);

        while let Some(v) = ptr {
            self.stack.push(v);
            ptr = v.left();
        }
    }
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.stack.pop()?;

        // Descend down the left side of the right hand child of this node, if
        // any.
        if let Some(right) = v.right() {
            self.push_subtree(right);
        }

        Some(v)
    }
}

/// The values of `t` in comparator order.
pub(crate) fn in_order<T, C>(t: &AvlTree<T, C>) -> Vec<T>
where
    T: Clone,
{
    InOrder::new(t.root()).map(|n| n.get().clone()).collect()
}

/// A pre-order listing of `(value, left value, right value)` tuples
/// describing the structure of `t`.
pub(crate) fn shape<T, C>(t: &AvlTree<T, C>) -> Vec<(T, Option<T>, Option<T>)>
where
    T: Clone,
{
    let mut out = Vec::with_capacity(t.len());
    let mut stack = t.root().into_iter().collect::<Vec<_>>();
    while let Some(n) = stack.pop() {
        out.push((
            n.get().clone(),
            n.left().map(|v| v.get().clone()),
            n.right().map(|v| v.get().clone()),
        ));
        stack.extend(n.right().into_iter().chain(n.left()));
    }
    out
}

/// Assert the BST, AVL, linkage and index properties of `t`, ensuring the
/// tree is well-formed.
pub(crate) fn validate_tree_structure<T, C>(t: &AvlTree<T, C>)
where
    T: Hash + Eq + Clone + Debug,
    C: Compare<T>,
{
    let root = match t.root() {
        Some(v) => v,
        None => {
            assert_eq!(t.len(), 0);
            assert_eq!(t.height(), None);
            return;
        }
    };

    // Invariant 1: the root has no parent.
    assert_eq!(root.parent(), None);

    let cmp = t.comparator();
    let mut seen = HashSet::with_capacity(t.len());

    // Perform a pre-order traversal of the tree.
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        // Prepare to visit the children
        stack.extend(n.left().into_iter().chain(n.right()));

        // Invariant 2: the left child always contains a value strictly less
        // than this node, and links back to it.
        if let Some(l) = n.left() {
            assert_eq!(cmp.compare(l.get(), n.get()), Ordering::Less);
            assert_eq!(l.parent(), Some(n), "left child of {n:?} not linked back");
        }

        // Invariant 3: the right child always contains a value strictly
        // greater than this node, and links back to it.
        if let Some(r) = n.right() {
            assert_eq!(cmp.compare(r.get(), n.get()), Ordering::Greater);
            assert_eq!(r.parent(), Some(n), "right child of {n:?} not linked back");
        }

        // Invariant 4: the height of this node is always +1 of the maximum
        // child height, where an absent child has a height of -1.
        let left_height = n.left().map(|v| v.height() as i64).unwrap_or(-1);
        let right_height = n.right().map(|v| v.height() as i64).unwrap_or(-1);
        let want_height = left_height.max(right_height) + 1;
        assert_eq!(
            n.height() as i64,
            want_height,
            "expect node {:?} to have height {}, has {}",
            n,
            want_height,
            n.height(),
        );

        // Invariant 5: the absolute height difference between the left
        // subtree and right subtree (the "balance factor") cannot exceed 1.
        let balance = right_height - left_height;
        assert_eq!(n.balance_factor() as i64, balance);
        assert!(balance.abs() <= 1, "balance={balance}, node={n:?}");

        // Invariant 6: the index maps this node's value to this node.
        assert_eq!(t.get(n.get()), Some(n), "node {n:?} not indexed");
        assert!(seen.insert(n.get().clone()), "duplicate value {n:?}");
    }

    // Invariant 7: the index contains no values absent from the tree.
    assert_eq!(seen.len(), t.len());

    // Invariant 8: an in-order traversal yields strictly increasing values.
    let values = InOrder::new(t.root()).collect::<Vec<_>>();
    for window in values.windows(2) {
        assert_eq!(
            cmp.compare(window[0].get(), window[1].get()),
            Ordering::Less,
            "out of order: {:?} then {:?}",
            window[0],
            window[1],
        );
    }

    assert_eq!(t.height(), Some(root.height()));
}
