use crate::lane::{Lane, Node};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

mod drain;

pub use drain::{Drain, DrainFilter};

impl<T: PartialEq> PartialEq for Lane<T> {
    /// Two lanes are equal when they hold equal elements in the same order,
    /// whatever the shape of their trees.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other)
    }
}

impl<T: Eq> Eq for Lane<T> {}

impl<T: PartialOrd> PartialOrd for Lane<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord> Ord for Lane<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Clone> Clone for Lane<T> {
    /// Copy the lane node by node, so the copy has exactly the same tree
    /// shape as the original.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    fn clone(&self) -> Self {
        let mut lane = Lane::new();
        lane.clone_from(self);
        lane
    }

    /// Replace the contents with a copy of `other`, reusing the ghost node.
    fn clone_from(&mut self, other: &Self) {
        self.clear();
        if let Some(root) = other.root_node() {
            // SAFETY: `root` belongs to `other`, and the copied tree is owned by
            // `self` only, whose list is empty after `clear`.
            unsafe {
                self.root = Some(Node::clone_subtree(root, None));
                self.thread_in_order();
            }
        }
    }
}

impl<T: Hash> Hash for Lane<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for element in self {
            element.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl<T> Lane<T> {
    /// Returns `true` if both lanes hold equal elements *and* their trees
    /// have the same shape.
    ///
    /// The least and greatest elements are not compared on their own: equal
    /// shapes holding equal elements already have equal extremes.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let ascending = Lane::from([1, 2, 3, 4]);
    /// let scattered = Lane::from([3, 2, 4, 1]);
    /// assert_eq!(ascending, scattered);
    /// assert!(!ascending.strict_eq(&scattered));
    /// assert!(scattered.strict_eq(&scattered.clone()));
    /// ```
    pub fn strict_eq(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        // SAFETY: both roots belong to live lanes which are borrowed here.
        self.len == other.len
            && unsafe { Node::is_same_subtree(self.root_node(), other.root_node()) }
    }

    /// Removes all elements, yielding them in ascending order.
    ///
    /// Elements not consumed are dropped with the iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from([2, 3, 1]);
    /// let mut drain = lane.drain();
    /// assert_eq!(drain.next(), Some(1));
    /// drop(drain);
    /// assert!(lane.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(self)
    }

    /// Removes the elements matching `filter`, yielding them in ascending
    /// order.
    ///
    /// Matching elements not consumed are removed when the iterator is
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from_iter(0..8);
    /// let odd = Vec::from_iter(lane.drain_filter(|x| x % 2 == 1));
    /// assert_eq!(odd, vec![1, 3, 5, 7]);
    /// assert_eq!(Vec::from_iter(lane), vec![0, 2, 4, 6]);
    /// ```
    pub fn drain_filter<F>(&mut self, filter: F) -> DrainFilter<'_, T, F>
    where
        F: FnMut(&T) -> bool,
    {
        DrainFilter::new(self, filter)
    }

    /// Keeps only the elements matching `keep`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* + *k* log *n*) time, where *k*
    /// is the number of elements removed.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.drain_filter(|element| !keep(element)).for_each(drop);
    }
}

/// Swaps the contents of two lanes.
///
/// See [`Lane::swap`].
#[inline]
pub fn swap<T>(this: &mut Lane<T>, that: &mut Lane<T>) {
    this.swap(that);
}
