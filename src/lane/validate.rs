use std::cmp;

use crate::element::LaneElement;
use crate::error::InvariantError;
use crate::lane::{next_of, prev_of, Lane, Node};

impl<T> Lane<T> {
    /// Check everything but the order of the elements: parent links, cached
    /// heights and balances, the AVL bound, the thread and the length.
    pub(crate) fn check_structure(&self) -> Result<(), InvariantError> {
        let mut in_order = Vec::with_capacity(self.len);
        // SAFETY: the closure only records the visited nodes.
        unsafe { Node::for_each_in_order(self.root_node(), &mut |node| in_order.push(node)) };
        if in_order.len() != self.len {
            return Err(InvariantError::LengthMismatch {
                cached: self.len,
                actual: in_order.len(),
            });
        }

        for (rank, &node) in in_order.iter().enumerate() {
            // SAFETY: every node reached from the root is live.
            let node_ref = unsafe { node.as_ref() };
            let is_root = self.root_node() == Some(node);
            if is_root == node_ref.parent.is_some() {
                return Err(InvariantError::ParentMismatch { rank });
            }
            for child in [node_ref.left, node_ref.right].into_iter().flatten() {
                // SAFETY: as above.
                if unsafe { child.as_ref().parent } != Some(node) {
                    return Err(InvariantError::ParentMismatch { rank });
                }
            }
            let left = Node::height_of(node_ref.left);
            let right = Node::height_of(node_ref.right);
            let height = cmp::max(left, right) + 1;
            if node_ref.height != height {
                return Err(InvariantError::HeightMismatch {
                    rank,
                    cached: node_ref.height,
                    actual: height,
                });
            }
            let balance = right as isize - left as isize;
            if node_ref.balance != balance {
                return Err(InvariantError::BalanceMismatch {
                    rank,
                    cached: node_ref.balance,
                    actual: balance,
                });
            }
            if balance.abs() > 1 {
                return Err(InvariantError::Unbalanced { rank, balance });
            }
        }

        let ghost = self.ghost_node();
        let mut prev = ghost;
        for (rank, &node) in in_order.iter().enumerate() {
            // SAFETY: `prev` is either the ghost or a node checked above.
            let (next, back) = unsafe { (next_of(prev), prev_of(node)) };
            if next != node || back != prev {
                return Err(InvariantError::ThreadMismatch { rank });
            }
            prev = node;
        }
        // SAFETY: as above.
        if unsafe { next_of(prev) != ghost || prev_of(ghost) != prev } {
            return Err(InvariantError::ThreadMismatch { rank: in_order.len() });
        }
        Ok(())
    }

    #[cfg(feature = "check-invariants")]
    pub(crate) fn assert_invariants(&self) {
        if let Err(err) = self.check_structure() {
            panic!("lane invariant broken: {}", err);
        }
    }
}

impl<T: LaneElement> Lane<T> {
    /// Returns `true` if no element orders before its predecessor.
    ///
    /// This is the check to run after changing elements in place through
    /// [`Lane::iter_mut`] or [`CursorMut::current_mut`]. Neighbours that
    /// compare equal are fine.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from([1.0, 2.0, 3.0]);
    /// assert!(lane.is_still_sorted());
    ///
    /// // Overtake the element in front.
    /// *lane.iter_mut().next().unwrap() = 2.5;
    /// assert!(!lane.is_still_sorted());
    /// ```
    ///
    /// [`CursorMut::current_mut`]: crate::lane::cursor::CursorMut::current_mut
    pub fn is_still_sorted(&self) -> bool {
        match self.first_inversion() {
            Some(rank) => {
                log::debug!("lane: element at rank {} overtook its predecessor", rank);
                false
            }
            None => true,
        }
    }

    /// Check every invariant of the lane: the order of the elements, the
    /// AVL balance and the cached heights, the parent links, and the
    /// agreement between the tree and the threaded list.
    ///
    /// # Errors
    ///
    /// Returns the first broken invariant found.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::{InvariantError, Lane};
    ///
    /// let mut lane = Lane::from_iter(0..10);
    /// assert_eq!(lane.validate(), Ok(()));
    ///
    /// lane.iter_mut().for_each(|x| *x = 9 - *x);
    /// assert_eq!(lane.validate(), Err(InvariantError::Unsorted { rank: 1 }));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.check_structure()?;
        match self.first_inversion() {
            Some(rank) => Err(InvariantError::Unsorted { rank }),
            None => Ok(()),
        }
    }

    fn first_inversion(&self) -> Option<usize> {
        self.iter()
            .zip(self.iter().skip(1))
            .position(|(prev, next)| next.less_than(prev))
            .map(|rank| rank + 1)
    }
}
