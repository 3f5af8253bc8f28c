//! Height bookkeeping and rotations.
//!
//! Every function here works on tree links only. Rotations change which
//! node is the parent of which, but not the in-order sequence of a subtree,
//! so the threaded list stays valid without being touched.

use std::cmp;

use crate::lane::{Link, Node, NodePtr};

impl<T> Node<T> {
    #[inline]
    pub(crate) fn height_of(link: Link<T>) -> usize {
        // SAFETY: tree links always point to live nodes of the same lane.
        link.map_or(0, |node| unsafe { node.as_ref().height })
    }

    /// Recompute `height` and `balance` of `node` from its children.
    pub(crate) unsafe fn update(mut node: NodePtr<T>) {
        let left = Self::height_of(node.as_ref().left);
        let right = Self::height_of(node.as_ref().right);
        let node = node.as_mut();
        node.height = cmp::max(left, right) + 1;
        node.balance = right as isize - left as isize;
    }

    /// Rotate `node` down to the left, lifting its right child into its
    /// place, and return the new root of the subtree.
    ///
    /// ```text
    ///     node              pivot
    ///    /    \            /     \
    ///   a    pivot  =>   node     c
    ///       /     \     /    \
    ///      b       c   a      b
    /// ```
    ///
    /// The pivot takes over the parent of `node`, but the parent's child link
    /// is left to the caller.
    pub(crate) unsafe fn rotate_left(mut node: NodePtr<T>) -> NodePtr<T> {
        let Some(mut pivot) = node.as_ref().right else {
            return node;
        };
        let inner = pivot.as_ref().left;
        node.as_mut().right = inner;
        if let Some(mut inner) = inner {
            inner.as_mut().parent = Some(node);
        }
        pivot.as_mut().parent = node.as_ref().parent;
        pivot.as_mut().left = Some(node);
        node.as_mut().parent = Some(pivot);
        Self::update(node);
        Self::update(pivot);
        log::trace!("lane: rotate left, pivot height {}", pivot.as_ref().height);
        #[cfg(feature = "check-invariants")]
        Self::assert_threaded(pivot);
        pivot
    }

    /// Mirror of [`Node::rotate_left`].
    pub(crate) unsafe fn rotate_right(mut node: NodePtr<T>) -> NodePtr<T> {
        let Some(mut pivot) = node.as_ref().left else {
            return node;
        };
        let inner = pivot.as_ref().right;
        node.as_mut().left = inner;
        if let Some(mut inner) = inner {
            inner.as_mut().parent = Some(node);
        }
        pivot.as_mut().parent = node.as_ref().parent;
        pivot.as_mut().right = Some(node);
        node.as_mut().parent = Some(pivot);
        Self::update(node);
        Self::update(pivot);
        log::trace!("lane: rotate right, pivot height {}", pivot.as_ref().height);
        #[cfg(feature = "check-invariants")]
        Self::assert_threaded(pivot);
        pivot
    }

    /// Rotate the left child left, then `node` right.
    pub(crate) unsafe fn rotate_left_right(mut node: NodePtr<T>) -> NodePtr<T> {
        if let Some(left) = node.as_ref().left {
            node.as_mut().left = Some(Self::rotate_left(left));
        }
        Self::rotate_right(node)
    }

    /// Rotate the right child right, then `node` left.
    pub(crate) unsafe fn rotate_right_left(mut node: NodePtr<T>) -> NodePtr<T> {
        if let Some(right) = node.as_ref().right {
            node.as_mut().right = Some(Self::rotate_right(right));
        }
        Self::rotate_left(node)
    }

    /// Refresh `node` and, if it leans by more than one level, rotate it
    /// back into balance. Returns the root of the subtree afterwards.
    pub(crate) unsafe fn rebalance(node: NodePtr<T>) -> NodePtr<T> {
        Self::update(node);
        let balance = node.as_ref().balance;
        if balance < -1 {
            match node.as_ref().left {
                Some(left) if left.as_ref().balance > 0 => Self::rotate_left_right(node),
                _ => Self::rotate_right(node),
            }
        } else if balance > 1 {
            match node.as_ref().right {
                Some(right) if right.as_ref().balance < 0 => Self::rotate_right_left(node),
                _ => Self::rotate_left(node),
            }
        } else {
            node
        }
    }

    /// Visit the subtree under `link` in order.
    ///
    /// `f` may relink `next`/`prev` of the visited node, but must leave the
    /// tree links alone.
    pub(crate) unsafe fn for_each_in_order<F: FnMut(NodePtr<T>)>(link: Link<T>, f: &mut F) {
        if let Some(node) = link {
            Self::for_each_in_order(node.as_ref().left, f);
            f(node);
            Self::for_each_in_order(node.as_ref().right, f);
        }
    }

    /// Panic unless the in-order walk of the subtree matches the thread.
    #[cfg(feature = "check-invariants")]
    pub(crate) unsafe fn assert_threaded(root: NodePtr<T>) {
        let mut in_order = Vec::new();
        Self::for_each_in_order(Some(root), &mut |node| in_order.push(node));
        for pair in in_order.windows(2) {
            assert!(
                pair[0].as_ref().next == pair[1] && pair[1].as_ref().prev == pair[0],
                "rotation broke the thread"
            );
        }
    }
}

impl<T: Clone> Node<T> {
    /// Deep-copy the subtree under `node`, keeping its shape and cached
    /// heights. The copies are not threaded.
    pub(crate) unsafe fn clone_subtree(node: NodePtr<T>, parent: Link<T>) -> NodePtr<T> {
        let source = node.as_ref();
        let mut copy = Self::new_detached(source.element.clone());
        copy.as_mut().parent = parent;
        copy.as_mut().height = source.height;
        copy.as_mut().balance = source.balance;
        if let Some(left) = source.left {
            copy.as_mut().left = Some(Self::clone_subtree(left, Some(copy)));
        }
        if let Some(right) = source.right {
            copy.as_mut().right = Some(Self::clone_subtree(right, Some(copy)));
        }
        copy
    }
}

impl<T: PartialEq> Node<T> {
    /// Returns `true` if both subtrees have the same shape and equal
    /// elements at the same places.
    pub(crate) unsafe fn is_same_subtree(this: Link<T>, that: Link<T>) -> bool {
        match (this, that) {
            (None, None) => true,
            (Some(this), Some(that)) => {
                let (this, that) = (this.as_ref(), that.as_ref());
                this.element == that.element
                    && Self::is_same_subtree(this.left, that.left)
                    && Self::is_same_subtree(this.right, that.right)
            }
            _ => false,
        }
    }
}
