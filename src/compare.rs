use std::cmp::Ordering;

/// A total order over `T`, used by an [`AvlTree`] to position values.
///
/// Implementations must be consistent with the [`Eq`] implementation of `T`:
/// two values compare [`Ordering::Equal`] if, and only if, they are equal.
///
/// Two trees can only be joined when their comparators are equal, so stateful
/// comparators should implement [`PartialEq`] over the state that influences
/// the ordering.
///
/// [`AvlTree`]: crate::AvlTree
pub trait Compare<T: ?Sized> {
    /// Compare `a` against `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T> Compare<T> for Natural
where
    T: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Orders values by the inverse of their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reverse;

impl<T> Compare<T> for Reverse
where
    T: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}
