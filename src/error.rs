use std::fmt::{Debug, Display};

use crate::AvlTree;

/// Errors returned by [`AvlTree`] operations.
///
/// A call that returns an error leaves the tree unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The arguments cannot be used for the requested operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The value is already present in the tree.
    #[error("value already present in tree")]
    DuplicateValue,

    /// The value is not present in the tree.
    #[error("value not present in tree")]
    NotFound,
}

/// A rejected [`AvlTree::join()`] call.
///
/// Joining consumes both operands, so a rejected join hands them back
/// unmodified alongside the reason for the rejection.
#[derive(Debug)]
pub struct JoinError<T, C> {
    kind: Error,
    left: AvlTree<T, C>,
    right: AvlTree<T, C>,
}

impl<T, C> JoinError<T, C> {
    pub(crate) fn new(kind: Error, left: AvlTree<T, C>, right: AvlTree<T, C>) -> Self {
        Self { kind, left, right }
    }

    /// The reason the join was rejected.
    pub fn kind(&self) -> Error {
        self.kind
    }

    /// Take back ownership of the `(left, right)` operands.
    pub fn into_trees(self) -> (AvlTree<T, C>, AvlTree<T, C>) {
        (self.left, self.right)
    }
}

impl<T, C> Display for JoinError<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot join trees: {}", self.kind)
    }
}

impl<T, C> std::error::Error for JoinError<T, C>
where
    T: Debug,
    C: Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
