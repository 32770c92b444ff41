use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt::Display,
    hash::Hash,
};

use tracing::{debug, trace};

use crate::{
    compare::{Compare, Natural},
    error::{Error, JoinError},
    node::{Arena, Node, NodeId},
    render::render,
    view::NodeRef,
};

/// A self-balancing (AVL) ordered search tree of unique values.
///
/// Values are positioned by the comparator `C`, and indexed by hash so that
/// membership tests and the start of a deletion are O(1).
///
/// Two trees whose values do not overlap can be combined with
/// [`AvlTree::join()`] in logarithmic time.
#[derive(Debug, Clone)]
pub struct AvlTree<T, C = Natural> {
    arena: Arena<T>,

    /// Maps each value in the tree to the node holding it.
    index: HashMap<T, NodeId>,

    comparator: C,
}

impl<T, C> Default for AvlTree<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T> AvlTree<T, Natural> {
    /// Construct an empty tree ordering values by their [`Ord`]
    /// implementation.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Construct an empty tree with space preallocated for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T, C> AvlTree<T, C> {
    /// Construct an empty tree ordering values with `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Arena::default(),
            index: HashMap::new(),
            comparator,
        }
    }

    /// Construct an empty tree ordering values with `comparator`, with space
    /// preallocated for `capacity` values.
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            comparator,
        }
    }

    /// The comparator used to order values in this tree.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The root node of the tree, or [`None`] if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.arena.root().map(|id| self.node_ref(id))
    }

    /// Returns true if the tree contains no values.
    pub fn is_empty(&self) -> bool {
        self.arena.root().is_none()
    }

    /// The number of values in the tree.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Remove all values from the tree.
    pub fn clear(&mut self) {
        self.index.clear();
        self.arena.clear();
    }

    /// The maintained height of the tree, or [`None`] if it is empty.
    ///
    /// A tree with a single value has a height of 0.
    pub fn height(&self) -> Option<usize> {
        self.root().map(|v| v.height())
    }

    /// The height of a perfectly balanced tree holding the same number of
    /// values, computed as ⌈log2(n+1)⌉.
    ///
    /// Unlike [`AvlTree::height()`] this counts levels (an empty tree is 0, a
    /// single value is 1) and may understate the height of this tree.
    pub fn ideal_height(&self) -> usize {
        (usize::BITS - self.len().leading_zeros()) as usize
    }

    /// The node holding the minimum value, if any.
    pub fn leftmost(&self) -> Option<NodeRef<'_, T>> {
        self.arena
            .root()
            .map(|id| self.node_ref(self.arena.leftmost(id)))
    }

    /// The node holding the maximum value, if any.
    pub fn rightmost(&self) -> Option<NodeRef<'_, T>> {
        self.arena
            .root()
            .map(|id| self.node_ref(self.arena.rightmost(id)))
    }

    fn node_ref(&self, id: NodeId) -> NodeRef<'_, T> {
        NodeRef::new(&self.arena, id)
    }

    fn root_height(&self) -> i16 {
        self.arena.height(self.arena.root())
    }
}

impl<T, C> AvlTree<T, C>
where
    T: Hash + Eq + Clone,
    C: Compare<T>,
{
    /// Returns true if `value` is present in the tree.
    pub fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    /// The node holding `value`, if present.
    pub fn get(&self, value: &T) -> Option<NodeRef<'_, T>> {
        self.index.get(value).map(|&id| self.node_ref(id))
    }

    /// Insert `value` into the tree, returning a view of the node holding it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateValue`] if `value` is already present.
    pub fn insert(&mut self, value: T) -> Result<NodeRef<'_, T>, Error> {
        if self.index.contains_key(&value) {
            return Err(Error::DuplicateValue);
        }

        // Descend to the empty child slot the value belongs in. Ties go left,
        // though the check above guarantees there are none.
        let mut parent = None;
        let mut go_right = false;
        let mut ptr = self.arena.root();
        while let Some(id) = ptr {
            parent = Some(id);
            let node = self.arena.node(id);
            go_right = self.comparator.compare(node.value(), &value) == Ordering::Less;
            ptr = if go_right { node.right() } else { node.left() };
        }

        let id = self.arena.alloc(value.clone());
        match parent {
            None => self.arena.set_root(Some(id)),
            Some(p) if go_right => self.arena.set_right(p, Some(id)),
            Some(p) => self.arena.set_left(p, Some(id)),
        }
        self.index.insert(value, id);

        self.arena.rebalance(id);
        debug_assert_eq!(self.arena.len(), self.index.len());

        trace!(len = self.len(), height = self.root_height(), "inserted value");

        Ok(self.node_ref(id))
    }

    /// Remove `value` from the tree, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `value` is not present.
    pub fn delete(&mut self, value: &T) -> Result<T, Error> {
        let id = *self.index.get(value).ok_or(Error::NotFound)?;

        let v = self.unlink(id);
        self.index.remove(value);
        debug_assert_eq!(self.arena.len(), self.index.len());

        trace!(len = self.len(), height = self.root_height(), "deleted value");

        Ok(v)
    }

    /// Remove the node `id` from the tree structure, rebalance, and free it.
    ///
    /// The index is left for the caller to update.
    fn unlink(&mut self, id: NodeId) -> T {
        let node = self.arena.node(id);
        let (parent, left, right) = (node.parent(), node.left(), node.right());

        match (left, right) {
            (None, None) => {
                // A leaf is detached from its parent.
                self.arena.replace_child(parent, id, None);
                if let Some(p) = parent {
                    self.arena.rebalance(p);
                }
            }
            (Some(child), None) | (None, Some(child)) => {
                // A single child is spliced into the position of the removed
                // node.
                self.arena.replace_child(parent, id, Some(child));
                self.arena.rebalance(parent.unwrap_or(child));
            }
            (Some(left), Some(right)) => {
                // The in-order successor (the minimum of the right subtree)
                // replaces the removed node.
                //
                //                  id                    succ
                //                 /  \                   /  \
                //                L    R                 L    R
                //                    /        --->          /
                //                  ...                    ...
                //                  /                      /
                //               succ                   sp
                //               /   \                 /
                //             nil    sr              sr
                //
                // The successor has no left child, and its right subtree (if
                // any) is linked to the successor's old parent ("sp").
                let succ = self.arena.leftmost(right);
                let succ_parent = self.arena.node(succ).parent();

                let rebalance_from = if succ_parent == Some(id) {
                    // The successor is the right child of the removed node,
                    // and keeps its right subtree.
                    succ
                } else {
                    let Some(sp) = succ_parent else {
                        unreachable!("successor below removed node has no parent");
                    };
                    let succ_right = self.arena.node(succ).right();
                    self.arena.set_left(sp, succ_right);
                    self.arena.set_right(succ, Some(right));
                    sp
                };

                self.arena.set_left(succ, Some(left));
                self.arena.replace_child(parent, id, Some(succ));
                self.arena.rebalance(rebalance_from);
            }
        }

        self.arena.free(id)
    }

    /// Join two trees into one, given every value in `left` is less than
    /// every value in `right`.
    ///
    /// Both operands are consumed; the nodes of the smaller operand are moved
    /// into the larger, and the two are merged in time logarithmic to the
    /// size of the larger tree.
    ///
    /// If either tree is empty, the other is returned unchanged.
    ///
    /// # Errors
    ///
    /// The operands are returned within the [`JoinError`] if:
    ///
    ///   * the trees use comparators that are not equal
    ///     ([`Error::InvalidArgument`]).
    ///   * the maximum value of `left` is greater than the minimum value of
    ///     `right` ([`Error::InvalidArgument`]).
    ///   * the maximum value of `left` is equal to the minimum value of
    ///     `right` ([`Error::DuplicateValue`]).
    pub fn join(mut left: Self, right: Self) -> Result<Self, JoinError<T, C>>
    where
        C: PartialEq,
    {
        if left.comparator != right.comparator {
            return Err(JoinError::new(
                Error::InvalidArgument("trees have different comparators"),
                left,
                right,
            ));
        }

        let (Some(max), Some(min)) = (left.rightmost(), right.leftmost()) else {
            return Ok(if left.is_empty() { right } else { left });
        };

        match left.comparator.compare(max.get(), min.get()) {
            Ordering::Less => {}
            Ordering::Equal => {
                return Err(JoinError::new(Error::DuplicateValue, left, right));
            }
            Ordering::Greater => {
                return Err(JoinError::new(
                    Error::InvalidArgument("left tree values overlap or follow right tree values"),
                    left,
                    right,
                ));
            }
        }

        // Detach the maximum value of the left tree to use as the node joining
        // the two trees.
        let Some(pivot) = left.index.get(max.get()).copied() else {
            unreachable!("rightmost node is not indexed");
        };
        let pivot = left.unlink(pivot);
        left.index.remove(&pivot);

        Ok(Self::join3(left, pivot, right))
    }

    /// Join `left`, `pivot` and `right` into a single balanced tree, given
    /// `left < pivot < right`.
    fn join3(left: Self, pivot: T, right: Self) -> Self {
        let (l_height, r_height) = (left.root_height(), right.root_height());

        debug!(
            left_len = left.len(),
            left_height = l_height,
            right_len = right.len(),
            right_height = r_height,
            "joining trees"
        );

        // Move the nodes of the smaller tree into the larger.
        let (mut tree, l_root, r_root) = if left.len() >= right.len() {
            let mut tree = left;
            let r_root = tree.absorb(right);
            let l_root = tree.arena.root();
            (tree, l_root, r_root)
        } else {
            let mut tree = right;
            let l_root = tree.absorb(left);
            let r_root = tree.arena.root();
            (tree, l_root, r_root)
        };

        let k = tree.arena.alloc(pivot.clone());
        tree.index.insert(pivot, k);

        if l_height > r_height + 1 {
            // The left tree is taller: descend its right spine to the first
            // subtree within one level of the right tree, and replace it with
            // "k", linking the subtree and the right tree as the children of
            // "k".
            let (attach, sub) = tree.descend(l_root, r_height, |n| n.right());
            tree.arena.set_left(k, sub);
            tree.arena.set_right(k, r_root);
            tree.arena.set_right(attach, Some(k));
            tree.arena.set_root(l_root);
        } else if r_height > l_height + 1 {
            // Mirror of the above, descending the left spine of the right
            // tree.
            let (attach, sub) = tree.descend(r_root, l_height, |n| n.left());
            tree.arena.set_left(k, l_root);
            tree.arena.set_right(k, sub);
            tree.arena.set_left(attach, Some(k));
            tree.arena.set_root(r_root);
        } else {
            // The heights are within one of each other, so "k" can link both
            // trees directly.
            tree.arena.set_left(k, l_root);
            tree.arena.set_right(k, r_root);
            tree.arena.set_root(Some(k));
        }

        // Recompute heights from the join point upwards, rotating where the
        // spine was left unbalanced.
        tree.arena.rebalance(k);

        tree
    }

    /// Walk down the spine of the subtree rooted at `from` (following `next`)
    /// until reaching a subtree with a height no greater than `height + 1`.
    ///
    /// Returns the last node visited above that subtree, and the subtree root
    /// (which may be absent).
    ///
    /// # Panics
    ///
    /// Panics if the height of `from` is not greater than `height + 1`.
    fn descend<F>(&self, from: Option<NodeId>, height: i16, next: F) -> (NodeId, Option<NodeId>)
    where
        F: Fn(&Node<T>) -> Option<NodeId>,
    {
        let mut attach = None;
        let mut ptr = from;
        while self.arena.height(ptr) > height + 1 {
            let Some(id) = ptr else {
                unreachable!("absent subtree is taller than joined tree");
            };
            attach = Some(id);
            ptr = next(self.arena.node(id));
        }

        match attach {
            Some(v) => (v, ptr),
            None => unreachable!("spine descent did not leave the root"),
        }
    }

    /// Move the nodes and index entries of `other` into this tree, returning
    /// the new id of the `other` root.
    fn absorb(&mut self, other: Self) -> Option<NodeId> {
        let (remap, root) = self.arena.absorb(other.arena);

        self.index.extend(
            other
                .index
                .into_iter()
                .map(|(value, old)| (value, remap[&old])),
        );

        root
    }
}

impl<T, C> Display for AvlTree<T, C>
where
    T: Display,
{
    /// Render the tree as a text diagram, one row per level.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root() {
            Some(root) => f.write_str(&render(&root)),
            None => Ok(()),
        }
    }
}
