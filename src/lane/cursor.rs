use crate::lane::{next_of, prev_of, Lane, Link, NodePtr};
use std::fmt;
use std::fmt::Formatter;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// A cursor over a `Lane`.
///
/// A `Cursor` points either at an element, or at the end of the lane (past
/// the greatest element). It can freely step back-and-forth in *O*(1) time,
/// following the threaded list rather than the tree.
///
/// Cursors are cheap to copy, and copies move independently. The default
/// cursor points at the end of no lane in particular, and compares equal to
/// every end cursor.
///
/// # Examples
///
/// ```
/// use lane_tree::Lane;
/// use lane_tree::lane::cursor::Cursor;
///
/// let lane = Lane::from([20, 40, 10, 30]);
///
/// let mut cursor = lane.cursor_start();
/// assert_eq!(cursor.current(), Some(&10));
/// assert!(cursor.move_prev().is_err());
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.current(), Some(&20));
///
/// let mut end = lane.cursor_end();
/// assert_eq!(end, Cursor::default());
/// assert!(end.move_next().is_err());
/// assert!(end.move_prev().is_ok());
/// assert_eq!(end.current(), Some(&40));
/// ```
pub struct Cursor<'a, T: 'a> {
    pub(crate) current: Link<T>,
    ghost: Link<T>,
    _marker: PhantomData<&'a T>,
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> Default for Cursor<'_, T> {
    fn default() -> Self {
        Self {
            current: None,
            ghost: None,
            _marker: PhantomData,
        }
    }
}

/// Compare cursors by the node they point at.
///
/// Two end cursors are always equal.
impl<'a, T: 'a> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<'a, T: 'a> Eq for Cursor<'a, T> {}

/// A cursor over a `Lane` with editing operations.
///
/// The lane stays mutably borrowed while the cursor lives, so no other
/// cursor can observe it half-way through an edit. [`CursorMut::view`]
/// temporarily borrows the lane back.
pub struct CursorMut<'a, T: 'a> {
    pub(crate) current: Link<T>,
    pub(crate) lane: &'a mut Lane<T>,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        // Private methods
        impl<'a, T: 'a> $CURSOR<'a, T> {
            /// Map the ghost node to the end position.
            fn normalize(&self, node: NodePtr<T>) -> Link<T> {
                if Some(node) == self.ghost_link() {
                    None
                } else {
                    Some(node)
                }
            }
            pub(crate) fn next_link(&self) -> Link<T> {
                let node = self.current?;
                // SAFETY: `current.next` is always valid since the list is cyclic.
                self.normalize(unsafe { next_of(node) })
            }
            pub(crate) fn prev_link(&self) -> Link<T> {
                let node = self.current.or(self.ghost_link())?;
                // SAFETY: `node.prev` is always valid since the list is cyclic.
                self.normalize(unsafe { prev_of(node) })
            }
        }

        impl<'a, T: 'a> $CURSOR<'a, T> {
            /// Returns `true` if the cursor points at the end of the lane.
            #[inline]
            pub fn is_end(&self) -> bool {
                self.current.is_none()
            }

            /// Move the cursor to the next element, or to the end when it is at
            /// the greatest element.
            ///
            /// Returns an error and stays put when the cursor is already at the
            /// end.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_next(&mut self) -> Result<(), &'static str> {
                if self.is_end() {
                    return Err("`move_next` past the end of the lane");
                }
                self.current = self.next_link();
                Ok(())
            }

            /// Move the cursor to the previous element. From the end, that is the
            /// greatest element.
            ///
            /// Returns an error and stays put when there is no previous element.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_prev(&mut self) -> Result<(), &'static str> {
                match self.prev_link() {
                    Some(prev) => {
                        self.current = Some(prev);
                        Ok(())
                    }
                    None => Err("`move_prev` before the start of the lane"),
                }
            }
        }

        impl<'a, T: fmt::Debug + 'a> fmt::Debug for $CURSOR<'a, T> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($CURSOR))
                    .field("current", &self.current())
                    .finish()
            }
        }
    };
}

impl_cursor!(CursorMut);
impl_cursor!(Cursor);

impl<'a, T: 'a> Cursor<'a, T> {
    pub(crate) fn new(lane: &'a Lane<T>, current: Link<T>) -> Self {
        Self {
            current,
            ghost: Some(lane.ghost_node()),
            _marker: PhantomData,
        }
    }

    fn ghost_link(&self) -> Link<T> {
        self.ghost
    }

    fn element(node: Link<T>) -> Option<&'a T> {
        // SAFETY: a normalized link is never the ghost, and the lane outlives `'a`.
        node.map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// Returns the element under the cursor, or `None` at the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let lane = Lane::from([1, 2, 3]);
    /// assert_eq!(lane.cursor_start().current(), Some(&1));
    /// assert_eq!(lane.cursor_end().current(), None);
    /// ```
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        Self::element(self.current)
    }

    /// Returns the element after the cursor, or `None` at the greatest
    /// element and at the end.
    #[inline]
    pub fn peek_next(&self) -> Option<&'a T> {
        Self::element(self.next_link())
    }

    /// Returns the element before the cursor, or `None` at the least
    /// element. From the end, that is the greatest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let lane = Lane::from([1, 2, 3]);
    /// assert_eq!(lane.cursor_start().peek_prev(), None);
    /// assert_eq!(lane.cursor_end().peek_prev(), Some(&3));
    /// ```
    #[inline]
    pub fn peek_prev(&self) -> Option<&'a T> {
        Self::element(self.prev_link())
    }
}

impl<'a, T: 'a> CursorMut<'a, T> {
    pub(crate) fn new(lane: &'a mut Lane<T>, current: Link<T>) -> Self {
        Self { current, lane }
    }

    fn ghost_link(&self) -> Link<T> {
        Some(self.lane.ghost_node())
    }

    /// Returns the element under the cursor, or `None` at the end.
    pub fn current(&self) -> Option<&T> {
        // SAFETY: a normalized link is never the ghost.
        self.current.map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// Returns the element after the cursor.
    pub fn peek_next(&self) -> Option<&T> {
        // SAFETY: a normalized link is never the ghost.
        self.next_link()
            .map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// Returns the element before the cursor. From the end, that is the
    /// greatest element.
    pub fn peek_prev(&self) -> Option<&T> {
        // SAFETY: a normalized link is never the ghost.
        self.prev_link()
            .map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// Returns a mutable reference to the element under the cursor, or `None`
    /// at the end.
    ///
    /// The element may be changed in a way that moves it relative to its
    /// neighbours; see [`Lane::is_still_sorted`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from([1, 2, 3]);
    /// let mut cursor = lane.find_mut(2.0);
    /// *cursor.current_mut().unwrap() = 10;
    /// assert!(!lane.is_still_sorted());
    /// ```
    pub fn current_mut(&mut self) -> Option<&mut T> {
        // SAFETY: a normalized link is never the ghost, and the lane is borrowed
        // mutably through `self`.
        self.current
            .map(|node| unsafe { &mut (*node.as_ptr()).element })
    }

    /// Re-borrow the mutable cursor as a short-lived immutable one.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.lane, self.current)
    }

    /// Convert the mutable cursor to an immutable one.
    pub fn into_cursor(self) -> Cursor<'a, T> {
        Cursor::new(self.lane, self.current)
    }

    /// Temporarily view the lane via an immutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from([1, 2, 3]);
    /// let cursor = lane.insert(4);
    /// assert_eq!(cursor.view().len(), 4);
    /// ```
    pub fn view(&self) -> &Lane<T> {
        self.lane
    }

    /// Remove the element under the cursor and return it, or return `None`
    /// at the end. After removal, the cursor points at the next element.
    ///
    /// This operation should compute in *O*(log *n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from_iter(0..10);
    /// let mut cursor = lane.find_mut(5.0);
    ///
    /// assert_eq!(cursor.remove(), Some(5));
    /// assert_eq!(cursor.current(), Some(&6));
    /// assert_eq!(cursor.peek_prev(), Some(&4));
    ///
    /// let mut cursor = lane.cursor_end_mut();
    /// assert_eq!(cursor.remove(), None);
    /// ```
    pub fn remove(&mut self) -> Option<T> {
        let node = self.current?;
        let next = self.next_link();
        // SAFETY: `node` is a non-ghost node of the lane, and `next` is a
        // different node which survives the removal.
        let element = unsafe { self.lane.remove_node(node) };
        self.current = next;
        Some(element)
    }
}

/// `CursorIter` turns a cursor into a forward iterator which yields the
/// element under the cursor first, and stops at the end.
///
/// # Examples
///
/// ```
/// use lane_tree::Lane;
///
/// let lane = Lane::from([1.0, 2.0, 2.5, 3.0]);
/// let ahead: Vec<_> = lane.lower_bound(2.2).into_iter().copied().collect();
/// assert_eq!(ahead, vec![2.5, 3.0]);
/// ```
pub struct CursorIter<'a, T: 'a> {
    pub(crate) cursor: Cursor<'a, T>,
}

impl<'a, T: 'a> CursorIter<'a, T> {
    pub fn into_cursor(self) -> Cursor<'a, T> {
        self.cursor
    }
    pub fn peek(&self) -> Option<&'a T> {
        self.cursor.current()
    }
}

impl<'a, T: 'a> Iterator for CursorIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.cursor.current()?;
        self.cursor.current = self.cursor.next_link();
        Some(element)
    }
}

impl<'a, T: 'a> FusedIterator for CursorIter<'a, T> {}

impl<'a, T: 'a> IntoIterator for Cursor<'a, T> {
    type Item = &'a T;
    type IntoIter = CursorIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        CursorIter { cursor: self }
    }
}

impl<'a, T: 'a> From<CursorIter<'a, T>> for Cursor<'a, T> {
    fn from(cursor_iter: CursorIter<'a, T>) -> Self {
        cursor_iter.into_cursor()
    }
}

impl<'a, T: 'a> From<CursorMut<'a, T>> for Cursor<'a, T> {
    fn from(cursor: CursorMut<'a, T>) -> Self {
        cursor.into_cursor()
    }
}

unsafe impl<T: Sync> Send for Cursor<'_, T> {}

unsafe impl<T: Sync> Sync for Cursor<'_, T> {}

unsafe impl<T: Send> Send for CursorMut<'_, T> {}

unsafe impl<T: Sync> Sync for CursorMut<'_, T> {}

unsafe impl<T: Sync> Send for CursorIter<'_, T> {}

unsafe impl<T: Sync> Sync for CursorIter<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::lane::cursor::Cursor;
    use crate::Lane;

    #[test]
    fn cursor_walks_both_ways() {
        let lane = Lane::from([30, 10, 20]);
        let mut cursor = lane.cursor_start();
        let mut forward = Vec::new();
        while let Some(&element) = cursor.current() {
            forward.push(element);
            assert!(cursor.move_next().is_ok());
        }
        assert_eq!(forward, vec![10, 20, 30]);
        assert!(cursor.is_end());
        assert!(cursor.move_next().is_err());

        let mut backward = Vec::new();
        while cursor.move_prev().is_ok() {
            backward.push(*cursor.current().unwrap());
        }
        assert_eq!(backward, vec![30, 20, 10]);
        assert_eq!(cursor, lane.cursor_start());
    }

    #[test]
    fn cursor_copies_are_independent() {
        let lane = Lane::from_iter(0..5);
        let first = lane.find(2.0);
        let mut second = first;
        assert_eq!(first, second);
        second.move_next().unwrap();
        assert_ne!(first, second);
        assert_eq!(first.current(), Some(&2));
        assert_eq!(second.current(), Some(&3));
        assert_eq!(first.peek_next(), second.current());
        assert_eq!(second.peek_prev(), first.current());
    }

    #[test]
    fn cursor_end_sentinel() {
        let empty = Lane::<i32>::new();
        let lane = Lane::from([1]);
        assert_eq!(empty.cursor_start(), empty.cursor_end());
        assert_eq!(empty.cursor_end(), Cursor::default());
        assert_eq!(lane.cursor_end(), Cursor::default());
        assert_eq!(lane.find(7.0), Cursor::default());
        assert_eq!(lane.lower_bound(1.0).peek_next(), None);

        let mut cursor = empty.cursor_end();
        assert!(cursor.move_prev().is_err());
        assert!(cursor.move_next().is_err());
        assert_eq!(cursor.peek_prev(), None);

        let mut cursor = Cursor::<i32>::default();
        assert!(cursor.move_prev().is_err());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn cursor_mut_edits() {
        let mut lane = Lane::from_iter(0..6);
        let mut cursor = lane.cursor_start_mut();
        while let Some(&element) = cursor.current() {
            if element % 2 == 0 {
                assert_eq!(cursor.remove(), Some(element));
            } else {
                *cursor.current_mut().unwrap() *= 10;
                cursor.move_next().unwrap();
            }
        }
        assert_eq!(cursor.peek_prev(), Some(&50));
        assert_eq!(cursor.as_cursor().peek_prev(), Some(&50));
        assert!(cursor.remove().is_none());
        assert_eq!(Vec::from_iter(lane.iter().copied()), vec![10, 30, 50]);
        assert!(lane.validate().is_ok());
    }

    #[test]
    fn cursor_survives_unrelated_inserts() {
        let mut lane = Lane::from([10, 20, 30]);
        lane.insert(25);
        lane.insert(5);
        let cursor = lane.find(20.0);
        assert_eq!(cursor.peek_next(), Some(&25));
        assert_eq!(cursor.peek_prev(), Some(&10));

        let mut cursor = lane.insert(15).into_cursor();
        assert_eq!(cursor.current(), Some(&15));
        cursor.move_prev().unwrap();
        assert_eq!(cursor.current(), Some(&10));
    }

    #[test]
    fn cursor_iter() {
        let lane = Lane::from_iter(0..5);
        let mut iter = lane.find(3.0).into_iter();
        assert_eq!(iter.peek(), Some(&3));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next(), Some(&4));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
        assert!(iter.into_cursor().is_end());
    }
}
