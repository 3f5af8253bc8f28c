use crate::lane::cursor::CursorMut;
use crate::Lane;
use std::fmt;

/// A draining iterator over a `Lane`, created by [`Lane::drain`].
pub struct Drain<'a, T: 'a> {
    lane: &'a mut Lane<T>,
}

impl<'a, T: 'a> Drain<'a, T> {
    pub(crate) fn new(lane: &'a mut Lane<T>) -> Self {
        Self { lane }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.lane.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.lane.len, Some(self.lane.len))
    }
}

impl<T> DoubleEndedIterator for Drain<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.lane.pop_back()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        self.lane.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for Drain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Drain").field(self.lane).finish()
    }
}

/// An iterator removing the elements of a `Lane` which match a filter,
/// created by [`Lane::drain_filter`].
pub struct DrainFilter<'a, T: 'a, F: 'a>
where
    F: FnMut(&T) -> bool,
{
    cursor: CursorMut<'a, T>,
    filter: F,
}

impl<'a, T, F> DrainFilter<'a, T, F>
where
    F: FnMut(&T) -> bool,
{
    pub(crate) fn new(lane: &'a mut Lane<T>, filter: F) -> Self {
        let cursor = lane.cursor_start_mut();
        Self { cursor, filter }
    }
}

impl<T, F> Iterator for DrainFilter<'_, T, F>
where
    F: FnMut(&T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if (self.filter)(self.cursor.current()?) {
                return self.cursor.remove();
            }
            self.cursor.move_next().ok()?;
        }
    }
}

impl<T, F> Drop for DrainFilter<'_, T, F>
where
    F: FnMut(&T) -> bool,
{
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

impl<T: fmt::Debug, F> fmt::Debug for DrainFilter<'_, T, F>
where
    F: FnMut(&T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DrainFilter").field(self.cursor.view()).finish()
    }
}
