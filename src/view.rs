use std::fmt::Debug;

use crate::node::{Arena, NodeId};

/// Read-only access to a node of a tree.
///
/// This is the only capability exposed to consumers of the tree structure
/// (such as [`render()`](crate::render())); no mutation is reachable through it.
pub trait AvlNode: Sized + Clone + PartialEq {
    /// The type of value held by the node.
    type Value;

    /// The value held by this node.
    fn value(&self) -> &Self::Value;

    /// The left child of this node, if any.
    fn left(&self) -> Option<Self>;

    /// The right child of this node, if any.
    fn right(&self) -> Option<Self>;

    /// The parent of this node, or [`None`] for the root.
    fn parent(&self) -> Option<Self>;

    /// Returns true if this node has no children.
    fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    /// Returns true if this node is the left child of its parent.
    fn is_left_child(&self) -> bool {
        self.parent()
            .and_then(|p| p.left())
            .is_some_and(|l| l == *self)
    }

    /// Returns true if this node is the right child of its parent.
    fn is_right_child(&self) -> bool {
        self.parent()
            .and_then(|p| p.right())
            .is_some_and(|r| r == *self)
    }

    /// The node holding the minimum value of the subtree rooted at this node.
    fn leftmost(&self) -> Self {
        let mut n = self.clone();
        while let Some(l) = n.left() {
            n = l;
        }
        n
    }

    /// The node holding the maximum value of the subtree rooted at this node.
    fn rightmost(&self) -> Self {
        let mut n = self.clone();
        while let Some(r) = n.right() {
            n = r;
        }
        n
    }
}

/// A borrowed, read-only view of a node in an [`AvlTree`](crate::AvlTree).
pub struct NodeRef<'a, T> {
    arena: &'a Arena<T>,
    id: NodeId,
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>, id: NodeId) -> Self {
        Self { arena, id }
    }

    fn with_id(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.arena, id))
    }

    /// The value held by this node, borrowed for the lifetime of the tree.
    pub fn get(&self) -> &'a T {
        self.arena.node(self.id).value()
    }

    /// The AVL height of the subtree rooted at this node.
    ///
    /// A leaf has a height of 0.
    pub fn height(&self) -> usize {
        self.arena.node(self.id).height() as usize
    }

    /// The height of the right subtree minus the height of the left subtree,
    /// where an absent subtree has a height of -1.
    pub fn balance_factor(&self) -> i16 {
        self.arena.balance(self.id)
    }
}

impl<T> AvlNode for NodeRef<'_, T> {
    type Value = T;

    fn value(&self) -> &T {
        self.get()
    }

    fn left(&self) -> Option<Self> {
        self.with_id(self.arena.node(self.id).left())
    }

    fn right(&self) -> Option<Self> {
        self.with_id(self.arena.node(self.id).right())
    }

    fn parent(&self) -> Option<Self> {
        self.with_id(self.arena.node(self.id).parent())
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.id == other.id
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<T> Debug for NodeRef<'_, T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.get())
            .field("height", &self.height())
            .finish()
    }
}
