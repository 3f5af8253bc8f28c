use crate::element::LaneElement;
use crate::lane::{next_of, prev_of, Lane, NodePtr};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;

/// An iterator over the elements of a `Lane`, in ascending order.
///
/// It uses a pair of nodes `start..end` of the threaded list to represent
/// the elements not yet yielded, where `start` is inclusive and `end` is
/// not. The tree is never touched.
///
/// Though the `Iter` does not hold a reference from the lane,
/// it actually *borrows* (immutably) from the lane, so a phantom
/// marker of `&'a Lane<T>` is added to protect the lane from being
/// written.
///
/// # Examples
///
/// ```compile_fail
/// use lane_tree::Lane;
///
/// let mut lane = Lane::from([1, 2, 3]);
/// let mut iter = lane.iter();
///
/// // Won't compile, because lane is already borrowed immutably.
/// lane.push_back(4);
/// println!("{:?}", iter.next());
/// ```
pub struct Iter<'a, T: 'a> {
    start: NodePtr<T>,
    end: NodePtr<T>,
    len: usize,
    _marker: PhantomData<&'a Lane<T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(lane: &'a Lane<T>) -> Self {
        let start = lane.front_node();
        let end = lane.ghost_node();
        let len = lane.len();
        let _marker = PhantomData;
        Self {
            start,
            end,
            len,
            _marker,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of the lane,
        // and it is not empty here, so `start` is not the ghost.
        let current = unsafe { self.start.as_ref() };
        self.start = current.next;
        self.len -= 1;
        Some(&current.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: `start..end` is not empty, so `end.prev` is a real node.
        self.end = unsafe { prev_of(self.end) };
        let current = unsafe { self.end.as_ref() };
        self.len -= 1;
        Some(&current.element)
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// A mutable iterator over the elements of a `Lane`, in ascending order.
///
/// Elements can be changed in place, including the position they compare
/// to. Moving an element past one of its neighbours breaks the order of
/// the lane; see [`Lane::is_still_sorted`].
///
/// # Examples
///
/// `Lane` is not readable after an `IterMut` is created.
/// ```compile_fail
/// use lane_tree::Lane;
///
/// let mut lane = Lane::from([1, 2, 3]);
/// let mut iter = lane.iter_mut();
/// println!("{:?}", lane.back());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a, T: 'a> {
    start: NodePtr<T>,
    end: NodePtr<T>,
    len: usize,
    _marker: PhantomData<&'a mut Lane<T>>,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new(lane: &'a mut Lane<T>) -> Self {
        let start = lane.front_node();
        let end = lane.ghost_node();
        let len = lane.len();
        let _marker = PhantomData;
        Self {
            start,
            end,
            len,
            _marker,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_tuple("IterMut");
        let mut ptr = self.start;
        for _ in 0..self.len {
            // SAFETY: the next `len` nodes from `start` are real nodes.
            let current = unsafe { ptr.as_ref() };
            f.field(&current.element);
            ptr = current.next;
        }
        f.finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of the lane,
        // and it is not empty here, so `start` is not the ghost.
        let current = unsafe { &mut *self.start.as_ptr() };
        // SAFETY: `start` may be followed by the ghost, so only its `next`
        // field is read.
        self.start = unsafe { next_of(self.start) };
        self.len -= 1;
        Some(&mut current.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: `start..end` is not empty, so `end.prev` is a real node
        // which has not been yielded yet.
        self.end = unsafe { prev_of(self.end) };
        let current = unsafe { &mut *self.end.as_ptr() };
        self.len -= 1;
        Some(&mut current.element)
    }
}

impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

/// An owning iterator over the elements of a `Lane`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`Lane`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
///
/// [`into_iter`]: Lane::into_iter
pub struct IntoIter<T> {
    lane: Lane<T>,
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("lane", &self.lane)
            .finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.lane.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.lane.len;
        (len, Some(len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.lane.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for Lane<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { lane: self }
    }
}

impl<'a, T> IntoIterator for &'a Lane<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Lane<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: LaneElement> FromIterator<T> for Lane<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut lane = Lane::new();
        lane.extend(iter);
        lane
    }
}

impl<T: LaneElement> Extend<T> for Lane<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|element| self.push_back(element));
    }
}

impl<'a, T: 'a + LaneElement + Copy> Extend<&'a T> for Lane<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T: LaneElement, const N: usize> From<[T; N]> for Lane<T> {
    fn from(elements: [T; N]) -> Self {
        Lane::from_iter(elements)
    }
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}

unsafe impl<T: Sync> Sync for Iter<'_, T> {}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}
