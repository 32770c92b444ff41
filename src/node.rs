use std::collections::HashMap;

use slab::Slab;
use tracing::trace;

/// A handle to a [`Node`] stored in an [`Arena`].
///
/// A [`NodeId`] is only meaningful for the arena that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    value: T,

    /// The node's AVL height.
    ///
    /// A leaf has a height of 0, and an absent child is considered to have a
    /// height of -1.
    ///
    /// A u8 holds a maximum value of 255, meaning it can represent the height
    /// of a balanced tree of up to 5.78*10⁷⁶ entries.
    height: u8,

    /// Child links, owned by this node.
    left: Option<NodeId>,
    right: Option<NodeId>,

    /// Back-link to the node owning this node, or [`None`] for the root.
    parent: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            height: 0,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub(crate) fn value(&self) -> &T {
        &self.value
    }

    pub(crate) fn height(&self) -> u8 {
        self.height
    }

    pub(crate) fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub(crate) fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Slab-backed storage for the nodes of a single tree, and the link to its
/// root.
///
/// Nodes refer to each other by [`NodeId`], so the parent back-links do not
/// form ownership cycles, and a rotation only rewrites ids.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    nodes: Slab<Node<T>>,
    root: Option<NodeId>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        if let Some(id) = root {
            self.node_mut(id).parent = None;
        }
        self.root = root;
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    /// Allocate an unlinked node holding `value`.
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        NodeId(self.nodes.insert(Node::new(value)))
    }

    /// Free the node `id`, returning the value it held.
    ///
    /// The caller is responsible for unlinking the node from the tree first.
    pub(crate) fn free(&mut self, id: NodeId) -> T {
        self.nodes.remove(id.0).value
    }

    /// The height of the (optional) subtree rooted at `id`, or -1 when absent.
    pub(crate) fn height(&self, id: Option<NodeId>) -> i16 {
        id.map(|v| self.node(v).height as i16).unwrap_or(-1)
    }

    /// Compute the "balance factor" of the subtree rooted at `id`.
    ///
    /// Returns the subtree height skew, which is a positive number when right
    /// heavy, and a negative number when left heavy.
    pub(crate) fn balance(&self, id: NodeId) -> i16 {
        let n = self.node(id);
        self.height(n.right) - self.height(n.left)
    }

    fn update_height(&mut self, id: NodeId) {
        let n = self.node(id);
        let h = self.height(n.left).max(self.height(n.right)) + 1;

        // Correctness: the max of two child heights (each >= -1) plus one is
        // never negative.
        self.node_mut(id).height = h as u8;
    }

    /// Link `child` as the left child of `id`.
    pub(crate) fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        self.node_mut(id).left = child;
        if let Some(c) = child {
            self.node_mut(c).parent = Some(id);
        }
    }

    /// Link `child` as the right child of `id`.
    pub(crate) fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        self.node_mut(id).right = child;
        if let Some(c) = child {
            self.node_mut(c).parent = Some(id);
        }
    }

    /// Replace the link from `parent` to `old` with a link to `new`, or
    /// replace the root if `parent` is [`None`].
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            Some(p) if self.node(p).left == Some(old) => self.node_mut(p).left = new,
            Some(p) => {
                debug_assert_eq!(self.node(p).right, Some(old));
                self.node_mut(p).right = new;
            }
            None => self.root = new,
        }

        if let Some(n) = new {
            self.node_mut(n).parent = parent;
        }
    }

    /// Descend the left edge of the subtree rooted at `id`.
    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.node(id).left {
            id = l;
        }
        id
    }

    /// Descend the right edge of the subtree rooted at `id`.
    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.node(id).right {
            id = r;
        }
        id
    }

    /// Left rotate the subtree rooted at `x` around the pivot point `P`,
    /// returning `P`, the new root of the subtree.
    ///
    /// ```text
    ///
    ///      x
    ///     / \                               P
    ///    1   P         Rotate Left        /   \
    ///       / \      --------------->    x     y
    ///      2   y                        / \   / \
    ///         / \                      1   2 3   4
    ///        3   4
    /// ```
    ///
    /// The heights of `x`, `P` and the parent of `x` (if any) are recomputed.
    ///
    /// # Panics
    ///
    /// Panics if `x` has no right child (cannot be rotated).
    pub(crate) fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(p) = self.node(x).right else {
            unreachable!("rotate left of node without right child");
        };
        trace!(node = x.0, pivot = p.0, "rotate left");

        let parent = self.node(x).parent;
        let inner = self.node(p).left;

        self.set_right(x, inner);
        self.set_left(p, Some(x));
        self.replace_child(parent, x, Some(p));

        self.update_height(x);
        self.update_height(p);
        if let Some(parent) = parent {
            self.update_height(parent);
        }

        p
    }

    /// Right rotate the subtree rooted at `y` around the pivot point `P`,
    /// returning `P`, the new root of the subtree.
    ///
    /// ```text
    ///          y
    ///         / \                           P
    ///        P   4     Rotate Right       /   \
    ///       / \      --------------->    x     y
    ///      x   3                        / \   / \
    ///     / \                          1   2 3   4
    ///    1   2
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `y` has no left child (cannot be rotated).
    pub(crate) fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let Some(p) = self.node(y).left else {
            unreachable!("rotate right of node without left child");
        };
        trace!(node = y.0, pivot = p.0, "rotate right");

        let parent = self.node(y).parent;
        let inner = self.node(p).right;

        self.set_left(y, inner);
        self.set_right(p, Some(y));
        self.replace_child(parent, y, Some(p));

        self.update_height(y);
        self.update_height(p);
        if let Some(parent) = parent {
            self.update_height(parent);
        }

        p
    }

    /// Restore the AVL invariants on the path from `id` up to the root.
    ///
    /// Each node on the path has its height recomputed, and is rotated if the
    /// absolute difference in height between its branches exceeds 1.
    pub(crate) fn rebalance(&mut self, mut id: NodeId) {
        loop {
            self.update_height(id);

            match self.balance(id) {
                // Left-heavy
                ..=-2 => {
                    let Some(l) = self.node(id).left else {
                        unreachable!("left-heavy node has no left child");
                    };
                    // The left child is right-heavy: left-right case.
                    if self.balance(l) > 0 {
                        self.rotate_left(l);
                    }
                    id = self.rotate_right(id);
                }
                // Right-heavy
                2.. => {
                    let Some(r) = self.node(id).right else {
                        unreachable!("right-heavy node has no right child");
                    };
                    // The right child is left-heavy: right-left case.
                    if self.balance(r) < 0 {
                        self.rotate_right(r);
                    }
                    id = self.rotate_left(id);
                }
                -1..=1 => { /* balanced */ }
            }

            // Invariant: the absolute difference between subtree heights
            // ("balance factor") cannot exceed 1 after rebalancing.
            debug_assert!(self.balance(id).abs() <= 1);

            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
    }

    /// Move every node of `other` into this arena.
    ///
    /// Returns the new ids of the moved nodes keyed by their id in `other`,
    /// and the new id of the `other` root (if any). The root of `self` is not
    /// modified; the moved nodes form a detached subtree until linked.
    pub(crate) fn absorb(
        &mut self,
        other: Arena<T>,
    ) -> (HashMap<NodeId, NodeId>, Option<NodeId>) {
        let mut remap = HashMap::with_capacity(other.nodes.len());

        for (old, node) in other.nodes {
            let new = NodeId(self.nodes.insert(node));
            remap.insert(NodeId(old), new);
        }

        for &new in remap.values() {
            let n = self.node_mut(new);
            n.left = n.left.map(|v| remap[&v]);
            n.right = n.right.map(|v| remap[&v]);
            n.parent = n.parent.map(|v| remap[&v]);
        }

        let root = other.root.map(|v| remap[&v]);
        (remap, root)
    }
}
