use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::NonNull;

use crate::element::{LaneElement, Probe};
use crate::lane::cursor::{Cursor, CursorMut};
use crate::{Iter, IterMut};

pub mod cursor;
pub mod iterator;

mod algorithms;
mod dump;
mod node;
mod validate;

pub use algorithms::{swap, Drain, DrainFilter};
pub use dump::TreeDump;

/// The `Lane` is an ordered container, implemented as an AVL tree whose nodes
/// are also threaded into a doubly-linked list in ascending order.
///
/// Inserting, erasing and searching take *O*(log *n*) time. Once an element
/// has been found, stepping to its predecessor or successor takes *O*(1)
/// time, since the step follows the list instead of the tree.
///
/// Iteration always yields the elements in ascending order, no matter the
/// order they were inserted in. Elements that compare equal are all kept,
/// each new one placed after those already stored.
///
/// The `Lane` contains:
/// - a pointer `ghost` to the ghost node of the threaded list. The list is
///   cyclic through the ghost node, so `ghost.next` is the least element and
///   `ghost.prev` is the greatest one;
/// - a pointer `root` to the root of the tree, which owns every node through
///   its `left` and `right` links;
/// - a length field `len`.
///
/// Tree rotations move nodes around the tree but never change their rank,
/// so the threaded list is only touched when a node is linked or unlinked.
///
/// # Examples
///
/// ```
/// use lane_tree::Lane;
///
/// let mut lane = Lane::from([3.0, 1.0, 2.5]);
/// lane.push_back(2.0);
/// assert_eq!(Vec::from_iter(lane.iter().copied()), vec![1.0, 2.0, 2.5, 3.0]);
///
/// let cursor = lane.lower_bound(2.2);
/// assert_eq!(cursor.current(), Some(&2.5));
/// assert_eq!(cursor.peek_prev(), Some(&2.0));
/// ```
pub struct Lane<T> {
    ghost: NodePtr<T>,
    root: Link<T>,
    /// the number of elements in the lane
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

pub(crate) type NodePtr<T> = NonNull<Node<T>>;
pub(crate) type Link<T> = Option<NodePtr<T>>;

/// A node of the tree, threaded into the list.
///
/// `left` and `right` own their subtrees. `parent`, `next` and `prev` are
/// plain back-references. `height` is 1 for a leaf, and `balance` is the
/// height of the right subtree minus the height of the left one.
///
/// The ghost node shares this layout with an uninitialized `element`, so
/// only the fields in front of `element` may be read through a pointer
/// that can be the ghost.
#[repr(C)]
pub(crate) struct Node<T> {
    pub(crate) next: NodePtr<T>,
    pub(crate) prev: NodePtr<T>,
    pub(crate) parent: Link<T>,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: usize,
    pub(crate) balance: isize,
    pub(crate) element: T,
}

// private methods
impl<T> Lane<T> {
    pub(crate) fn ghost_node(&self) -> NodePtr<T> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NodePtr<T> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the least
        // element in the lane).
        unsafe { next_of(self.ghost) }
    }
    pub(crate) fn back_node(&self) -> NodePtr<T> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the greatest
        // element in the lane).
        unsafe { prev_of(self.ghost) }
    }
    pub(crate) fn root_node(&self) -> Link<T> {
        self.root
    }
    fn front_link(&self) -> Link<T> {
        self.root.map(|_| self.front_node())
    }

    /// Attach a single node `node` to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the lane, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    unsafe fn attach_node(&mut self, prev: NodePtr<T>, next: NodePtr<T>, node: NodePtr<T>) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
        self.len += 1;
    }

    /// Detach a single node `node` from the list, and return it as a box.
    ///
    /// The node must already be unlinked from the tree.
    unsafe fn detach_node(&mut self, node: NodePtr<T>) -> Box<Node<T>> {
        self.len -= 1;
        let node = Box::from_raw(node.as_ptr());
        connect(node.prev, node.next);
        node
    }

    /// Point the link that `parent` (or the lane, for the root) holds on `old`
    /// at `new` instead.
    unsafe fn replace_child(&mut self, parent: Link<T>, old: NodePtr<T>, new: Link<T>) {
        match parent {
            None => self.root = new,
            Some(mut parent) => {
                if parent.as_ref().left == Some(old) {
                    parent.as_mut().left = new;
                } else {
                    parent.as_mut().right = new;
                }
            }
        }
    }

    /// Walk from `start` up to the root, restoring heights and balance.
    unsafe fn rebalance_from(&mut self, start: Link<T>) {
        let mut current = start;
        while let Some(node) = current {
            let parent = node.as_ref().parent;
            let subtree = Node::rebalance(node);
            if subtree != node {
                self.replace_child(parent, node, Some(subtree));
            }
            current = parent;
        }
    }

    /// Thread every node of the tree into the list, in order.
    ///
    /// The list must be empty before the call.
    unsafe fn thread_in_order(&mut self) {
        let ghost = self.ghost;
        let mut back = ghost;
        let mut len = 0;
        Node::for_each_in_order(self.root, &mut |node| {
            connect(back, node);
            back = node;
            len += 1;
        });
        connect(back, ghost);
        self.len = len;
    }

    /// Unlink `node` from the tree and the list, and return its element.
    ///
    /// A node with two children is replaced by its in-order successor, which
    /// is its `next` in the list and never has a left child.
    pub(crate) unsafe fn remove_node(&mut self, node: NodePtr<T>) -> T {
        let (parent, left, right, next) = {
            let node = node.as_ref();
            (node.parent, node.left, node.right, node.next)
        };
        let rebalance_start = match (left, right) {
            (Some(mut left), Some(mut right)) => {
                let mut successor = next;
                let successor_parent = successor.as_ref().parent;
                let start = if successor == right {
                    Some(successor)
                } else {
                    let orphan = successor.as_ref().right;
                    if let Some(mut successor_parent) = successor_parent {
                        successor_parent.as_mut().left = orphan;
                    }
                    if let Some(mut orphan) = orphan {
                        orphan.as_mut().parent = successor_parent;
                    }
                    successor.as_mut().right = Some(right);
                    right.as_mut().parent = Some(successor);
                    successor_parent
                };
                successor.as_mut().left = Some(left);
                left.as_mut().parent = Some(successor);
                successor.as_mut().parent = parent;
                self.replace_child(parent, node, Some(successor));
                start
            }
            (child, None) | (None, child) => {
                if let Some(mut child) = child {
                    child.as_mut().parent = parent;
                }
                self.replace_child(parent, node, child);
                parent
            }
        };
        log::trace!(
            "lane: unlinked node with {} children",
            left.is_some() as u8 + right.is_some() as u8
        );
        let node = self.detach_node(node);
        self.rebalance_from(rebalance_start);
        #[cfg(feature = "check-invariants")]
        self.assert_invariants();
        node.into_element()
    }
}

impl<T> Lane<T> {
    /// Create an empty `Lane`
    ///
    /// # Examples
    /// ```
    /// use lane_tree::Lane;
    /// let lane: Lane<u32> = Lane::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        let ghost = new_ghost();
        let _marker = PhantomData;
        Self {
            ghost,
            root: None,
            len: 0,
            _marker,
        }
    }

    /// Returns `true` if the `Lane` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the `Lane`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::new();
    /// lane.push_back(2);
    /// lane.push_back(1);
    /// assert_eq!(lane.len(), 2);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The largest number of elements a `Lane` of this element type could
    /// ever hold.
    #[inline]
    pub fn max_size(&self) -> usize {
        isize::MAX as usize / mem::size_of::<Node<T>>()
    }

    /// Returns the height of the underlying tree, `0` for an empty lane.
    ///
    /// An AVL tree with *n* nodes is never higher than about
    /// 1.44 log<sub>2</sub>(*n* + 2).
    #[inline]
    pub fn height(&self) -> usize {
        Node::height_of(self.root)
    }

    /// Removes all elements from the `Lane`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        log::debug!("lane: clearing {} elements", self.len);
        let ghost = self.ghost;
        let mut current = self.front_node();
        // Reset first; a panicking destructor leaks the remaining nodes.
        self.root = None;
        self.len = 0;
        // SAFETY: the ghost node is always valid.
        unsafe { connect(ghost, ghost) };
        while current != ghost {
            // SAFETY: every node between the old front and the ghost is owned by
            // this lane and is visited once.
            let node = unsafe { Box::from_raw(current.as_ptr()) };
            current = node.next;
            drop(node);
        }
    }

    /// Provides a reference to the least element, or `None` if the lane is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::new();
    /// assert_eq!(lane.front(), None);
    ///
    /// lane.push_back(2);
    /// lane.push_back(1);
    /// assert_eq!(lane.front(), Some(&1));
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.cursor_start().current()
    }

    /// Provides a reference to the greatest element, or `None` if the lane is
    /// empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.cursor_end().peek_prev()
    }

    /// Removes the least element and returns it, or `None` if the lane is
    /// empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(log *n*) time.
    pub fn pop_front(&mut self) -> Option<T> {
        self.cursor_start_mut().remove()
    }

    /// Removes the greatest element and returns it, or `None` if the lane is
    /// empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(log *n*) time.
    pub fn pop_back(&mut self) -> Option<T> {
        let mut cursor = self.cursor_end_mut();
        cursor.move_prev().ok()?;
        cursor.remove()
    }

    /// Provides a cursor at the least element, or at the end if the lane is
    /// empty.
    #[inline]
    pub fn cursor_start(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.front_link())
    }

    /// Provides a cursor at the end of the lane, past the greatest element.
    #[inline]
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self, None)
    }

    /// Provides a cursor with editing operations at the least element.
    #[inline]
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_, T> {
        let current = self.front_link();
        CursorMut::new(self, current)
    }

    /// Provides a cursor with editing operations at the end of the lane.
    #[inline]
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, None)
    }

    /// Provides a forward iterator, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let lane = Lane::from([2, 0, 1]);
    /// let mut iter = lane.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Provides a forward iterator with mutable references, in ascending
    /// order.
    ///
    /// Changing the position an element compares to is allowed, but breaks
    /// the lane until the order is restored. See [`Lane::is_still_sorted`].
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Swaps the contents of two lanes.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T: LaneElement> Lane<T> {
    /// Inserts an element at the position its order dictates, and returns a
    /// cursor pointing at it.
    ///
    /// An element comparing equal to elements already in the lane is placed
    /// after them.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(log *n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from([1, 3]);
    /// let cursor = lane.insert(2);
    /// assert_eq!(cursor.peek_prev(), Some(&1));
    /// assert_eq!(cursor.peek_next(), Some(&3));
    /// ```
    pub fn insert(&mut self, element: T) -> CursorMut<'_, T> {
        let node = Node::new_detached(element);
        // SAFETY: `node` is a fresh node owned by nobody yet.
        unsafe { self.link_node(node) };
        CursorMut::new(self, Some(node))
    }

    /// Inserts an element at the position its order dictates.
    ///
    /// Despite the name, the element is not necessarily placed at the back.
    /// See [`Lane::insert`].
    #[inline]
    pub fn push_back(&mut self, element: T) {
        self.insert(element);
    }

    /// Removes the first element equal to `key` and returns it, or `None` if
    /// there is no such element.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(log *n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let mut lane = Lane::from([1, 2, 3, 4, 5]);
    /// assert_eq!(lane.erase(3.0), Some(3));
    /// assert_eq!(lane.erase(&3), None);
    /// assert_eq!(Vec::from_iter(lane), vec![1, 2, 4, 5]);
    /// ```
    pub fn erase<K: Probe<T>>(&mut self, key: K) -> Option<T> {
        let node = self.find_node(&key)?;
        // SAFETY: `node` was found in this lane.
        Some(unsafe { self.remove_node(node) })
    }

    /// Provides a cursor at the first element equal to `key`, or at the end
    /// if there is none.
    #[inline]
    pub fn find<K: Probe<T>>(&self, key: K) -> Cursor<'_, T> {
        Cursor::new(self, self.find_node(&key))
    }

    /// Like [`Lane::find`], with editing operations.
    #[inline]
    pub fn find_mut<K: Probe<T>>(&mut self, key: K) -> CursorMut<'_, T> {
        let node = self.find_node(&key);
        CursorMut::new(self, node)
    }

    /// Provides a cursor at the first element not less than `key`, or at the
    /// end if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let lane = Lane::from([1.0, 2.0, 2.5, 3.0]);
    /// assert_eq!(lane.lower_bound(2.2).current(), Some(&2.5));
    /// assert_eq!(lane.lower_bound(2.5).current(), Some(&2.5));
    /// assert!(lane.lower_bound(3.5).is_end());
    /// ```
    #[inline]
    pub fn lower_bound<K: Probe<T>>(&self, key: K) -> Cursor<'_, T> {
        Cursor::new(self, self.lower_bound_node(&key))
    }

    /// Like [`Lane::lower_bound`], with editing operations.
    #[inline]
    pub fn lower_bound_mut<K: Probe<T>>(&mut self, key: K) -> CursorMut<'_, T> {
        let node = self.lower_bound_node(&key);
        CursorMut::new(self, node)
    }

    /// Provides a cursor at the first element greater than `key`, or at the
    /// end if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let lane = Lane::from([1.0, 2.0, 2.5, 3.0]);
    /// assert_eq!(lane.upper_bound(2.5).current(), Some(&3.0));
    /// assert!(lane.upper_bound(3.0).is_end());
    /// ```
    #[inline]
    pub fn upper_bound<K: Probe<T>>(&self, key: K) -> Cursor<'_, T> {
        Cursor::new(self, self.upper_bound_node(&key))
    }

    /// Like [`Lane::upper_bound`], with editing operations.
    #[inline]
    pub fn upper_bound_mut<K: Probe<T>>(&mut self, key: K) -> CursorMut<'_, T> {
        let node = self.upper_bound_node(&key);
        CursorMut::new(self, node)
    }

    /// Returns the number of elements equal to `key`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(log *n* + *k*) time, where *k* is
    /// the result.
    pub fn count<K: Probe<T>>(&self, key: K) -> usize {
        Cursor::new(self, self.lower_bound_node(&key))
            .into_iter()
            .take_while(|element| key.order_of(element) == Ordering::Equal)
            .count()
    }

    /// Returns `true` if the lane holds an element equal to `key`.
    #[inline]
    pub fn contains<K: Probe<T>>(&self, key: K) -> bool {
        self.find_node(&key).is_some()
    }

    /// Link a detached node into the tree and the list, then rebalance.
    unsafe fn link_node(&mut self, mut node: NodePtr<T>) {
        let Some(mut current) = self.root else {
            self.root = Some(node);
            self.attach_node(self.ghost, self.ghost, node);
            log::trace!("lane: linked node as root");
            return;
        };
        let mut depth = 1;
        loop {
            depth += 1;
            // Equal elements go right, behind the ones already stored.
            if node.as_ref().element.less_than(&current.as_ref().element) {
                match current.as_ref().left {
                    Some(left) => current = left,
                    None => {
                        current.as_mut().left = Some(node);
                        node.as_mut().parent = Some(current);
                        self.attach_node(current.as_ref().prev, current, node);
                        break;
                    }
                }
            } else {
                match current.as_ref().right {
                    Some(right) => current = right,
                    None => {
                        current.as_mut().right = Some(node);
                        node.as_mut().parent = Some(current);
                        self.attach_node(current, current.as_ref().next, node);
                        break;
                    }
                }
            }
        }
        log::trace!("lane: linked node at depth {}", depth);
        self.rebalance_from(Some(current));
        #[cfg(feature = "check-invariants")]
        self.assert_invariants();
    }

    fn lower_bound_node<K: Probe<T>>(&self, key: &K) -> Link<T> {
        let mut current = self.root;
        let mut bound = None;
        while let Some(node) = current {
            // SAFETY: tree links always point to nodes owned by this lane.
            let node_ref = unsafe { node.as_ref() };
            if key.order_of(&node_ref.element) == Ordering::Less {
                current = node_ref.right;
            } else {
                bound = Some(node);
                current = node_ref.left;
            }
        }
        bound
    }

    fn upper_bound_node<K: Probe<T>>(&self, key: &K) -> Link<T> {
        let mut current = self.root;
        let mut bound = None;
        while let Some(node) = current {
            // SAFETY: tree links always point to nodes owned by this lane.
            let node_ref = unsafe { node.as_ref() };
            if key.order_of(&node_ref.element) == Ordering::Greater {
                bound = Some(node);
                current = node_ref.left;
            } else {
                current = node_ref.right;
            }
        }
        bound
    }

    fn find_node<K: Probe<T>>(&self, key: &K) -> Link<T> {
        let node = self.lower_bound_node(key)?;
        // SAFETY: `node` was found in this lane.
        let element = unsafe { &node.as_ref().element };
        match key.order_of(element) {
            Ordering::Equal => Some(node),
            _ => None,
        }
    }
}

impl<T: Debug> Debug for Lane<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for Lane<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Node<T> {
    pub(crate) fn new_detached(element: T) -> NodePtr<T> {
        let node = Box::new(Node {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
            parent: None,
            left: None,
            right: None,
            height: 1,
            balance: 0,
            element,
        });
        NonNull::from(Box::leak(node))
    }

    pub(crate) fn into_element(self: Box<Self>) -> T {
        self.element
    }
}

/// Create a ghost node whose `next` and `prev` point to itself.
///
/// The ghost is allocated as a `Node<MaybeUninit<T>>`, which has the same
/// layout as `Node<T>`; its `element` is never read.
fn new_ghost<T>() -> NodePtr<T> {
    let ghost: Box<Node<MaybeUninit<T>>> = Box::new(Node {
        next: NonNull::dangling(),
        prev: NonNull::dangling(),
        parent: None,
        left: None,
        right: None,
        height: 0,
        balance: 0,
        element: MaybeUninit::uninit(),
    });
    let ghost = NonNull::from(Box::leak(ghost)).cast::<Node<T>>();
    // SAFETY: `ghost` was just allocated.
    unsafe { connect(ghost, ghost) };
    ghost
}

/// Free a ghost node created by [`new_ghost`].
unsafe fn free_ghost<T>(ghost: NodePtr<T>) {
    drop(Box::from_raw(ghost.cast::<Node<MaybeUninit<T>>>().as_ptr()));
}

/// Read `node.next`, where `node` may be the ghost.
#[inline]
pub(crate) unsafe fn next_of<T>(node: NodePtr<T>) -> NodePtr<T> {
    (*node.as_ptr()).next
}

/// Read `node.prev`, where `node` may be the ghost.
#[inline]
pub(crate) unsafe fn prev_of<T>(node: NodePtr<T>) -> NodePtr<T> {
    (*node.as_ptr()).prev
}

#[inline]
pub(crate) unsafe fn connect<T>(prev: NodePtr<T>, next: NodePtr<T>) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

#[cfg(debug_assertions)]
fn assert_adjacent<T>(prev: NodePtr<T>, next: NodePtr<T>) {
    unsafe {
        assert_eq!(next_of(prev), next);
        assert_eq!(prev_of(next), prev);
    }
}

impl<T> Drop for Lane<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost was created by `new_ghost` and is freed once.
        unsafe { free_ghost(self.ghost) };
    }
}

unsafe impl<T: Send> Send for Lane<T> {}

unsafe impl<T: Sync> Sync for Lane<T> {}

// Ensure that `Lane` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: Lane<&'static str>) -> Lane<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'i, 'a>(x: Cursor<'i, &'static str>) -> Cursor<'i, &'a str> {
        x
    }
}

#[cfg(test)]
mod tests {
    use crate::lane::Lane;
    use crate::LaneElement;
    use std::cell::RefCell;
    use std::cmp::Ordering;

    #[test]
    fn lane_create() {
        let mut lane = Lane::<i32>::new();
        assert!(lane.is_empty());
        assert_eq!(lane.len(), 0);
        assert_eq!(lane.height(), 0);
        lane.push_back(1);
        assert!(!lane.is_empty());
        assert_eq!(lane.len(), 1);
        assert_eq!(lane.height(), 1);
        assert_eq!(lane.pop_back(), Some(1));
        assert!(lane.is_empty());
        assert!(lane.max_size() > 0);
    }

    #[test]
    fn lane_drop() {
        #[derive(Debug)]
        struct DropChecker<'a> {
            value: i32,
            dropped: &'a RefCell<Vec<i32>>,
        }
        impl<'a> DropChecker<'a> {
            fn new(value: i32, dropped: &'a RefCell<Vec<i32>>) -> Self {
                Self { value, dropped }
            }
        }
        impl LaneElement for DropChecker<'_> {
            fn cmp_element(&self, other: &Self) -> Ordering {
                self.value.cmp(&other.value)
            }
            fn cmp_position(&self, position: f64) -> Ordering {
                self.value.cmp_position(position)
            }
        }
        impl Drop for DropChecker<'_> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut lane = Lane::new();
        lane.push_back(DropChecker::new(3, &dropped));
        lane.push_back(DropChecker::new(1, &dropped));
        lane.push_back(DropChecker::new(4, &dropped));
        lane.push_back(DropChecker::new(2, &dropped));
        drop(lane.erase(4.0));
        assert_eq!(dropped.borrow().as_slice(), &[4]);
        drop(lane);
        assert_eq!(dropped.borrow().as_slice(), &[4, 1, 2, 3]);
    }

    #[test]
    fn lane_insert_keeps_order() {
        let lane = Lane::from([5, 1, 4, 2, 3]);
        assert_eq!(Vec::from_iter(lane.iter().copied()), vec![1, 2, 3, 4, 5]);
        assert_eq!(lane.front(), Some(&1));
        assert_eq!(lane.back(), Some(&5));
        assert_eq!(lane.len(), 5);
        assert!(lane.validate().is_ok());
    }

    #[test]
    fn lane_equal_elements_go_after() {
        #[derive(Debug, Clone, Copy, PartialEq)]
        struct Tagged(i32, char);
        impl LaneElement for Tagged {
            fn cmp_element(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
            fn cmp_position(&self, position: f64) -> Ordering {
                self.0.cmp_position(position)
            }
        }
        let lane = Lane::from([
            Tagged(1, 'a'),
            Tagged(1, 'b'),
            Tagged(0, 'c'),
            Tagged(1, 'd'),
            Tagged(2, 'e'),
        ]);
        let tags: String = lane.iter().map(|tagged| tagged.1).collect();
        assert_eq!(tags, "cabde");
        assert_eq!(lane.count(1.0), 3);
        assert_eq!(lane.find(1.0).current(), Some(&Tagged(1, 'a')));
        assert_eq!(lane.upper_bound(1.0).current(), Some(&Tagged(2, 'e')));
        assert!(lane.validate().is_ok());
    }

    #[test]
    fn lane_push_and_pop() {
        let mut lane = Lane::new();
        assert_eq!(lane.front(), None);
        assert_eq!(lane.back(), None);
        assert_eq!(lane.pop_front(), None);
        assert_eq!(lane.pop_back(), None);

        lane.extend([4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(lane.pop_front(), Some(1));
        assert_eq!(lane.pop_back(), Some(7));
        assert_eq!(lane.pop_front(), Some(2));
        assert_eq!(lane.pop_back(), Some(6));
        assert!(lane.validate().is_ok());
        assert_eq!(Vec::from_iter(lane.iter().copied()), vec![3, 4, 5]);

        lane.clear();
        assert!(lane.is_empty());
        assert_eq!(lane.len(), 0);
        assert_eq!(lane.front(), None);
        lane.push_back(9);
        assert_eq!(lane.front(), Some(&9));
        assert_eq!(lane.back(), Some(&9));
    }

    #[test]
    fn lane_search() {
        let lane = Lane::from([1.0, 2.0, 2.5, 3.0]);
        assert_eq!(lane.lower_bound(2.2).current(), Some(&2.5));
        assert_eq!(lane.upper_bound(2.5).current(), Some(&3.0));
        assert_eq!(lane.lower_bound(0.0).current(), Some(&1.0));
        assert!(lane.upper_bound(3.0).is_end());

        let found = lane.find(2.5);
        assert_eq!(found.current(), Some(&2.5));
        assert_eq!(found.peek_prev(), Some(&2.0));
        assert_eq!(found, lane.lower_bound(&2.5));
        assert!(lane.find(2.2).is_end());

        assert_eq!(lane.count(2.0), 1);
        assert_eq!(lane.count(2.2), 0);
        assert!(lane.contains(&3.0));
        assert!(!lane.contains(4.0));
    }

    #[test]
    fn lane_erase_rethreads() {
        let mut lane = Lane::from([1, 2, 3, 4, 5]);
        assert_eq!(lane.erase(3.0), Some(3));
        assert_eq!(lane.len(), 4);
        assert_eq!(Vec::from_iter(lane.iter().copied()), vec![1, 2, 4, 5]);
        assert_eq!(lane.find(4.0).peek_prev(), Some(&2));
        assert_eq!(lane.find(2.0).peek_next(), Some(&4));
        assert!(lane.validate().is_ok());

        assert_eq!(lane.erase(1.0), Some(1));
        assert_eq!(lane.erase(5.0), Some(5));
        assert_eq!(lane.front(), Some(&2));
        assert_eq!(lane.back(), Some(&4));
        assert_eq!(lane.erase(2.0), Some(2));
        assert_eq!(lane.erase(4.0), Some(4));
        assert!(lane.is_empty());
        assert_eq!(lane.erase(4.0), None);
    }

    #[test]
    fn lane_height_is_logarithmic() {
        let lane = Lane::from_iter(0..1000);
        assert_eq!(lane.len(), 1000);
        assert!(lane.height() <= 14, "height {}", lane.height());
        assert!(lane.validate().is_ok());
    }

    #[test]
    fn lane_swap() {
        let mut this = Lane::from([1, 0, 2, 3, 4, 5, 6, 7]);
        let mut that = Lane::from([1, 0, 2]);
        this.swap(&mut that);
        assert_eq!(this.len(), 3);
        assert_eq!(that.len(), 8);
        assert_eq!(this.back(), Some(&2));
        assert_eq!(that.back(), Some(&7));
        this.push_back(9);
        that.push_back(-1);
        assert!(this.validate().is_ok());
        assert!(that.validate().is_ok());
    }

    #[test]
    fn lane_move_leaves_default() {
        let mut lane = Lane::from([3, 1, 2]);
        let moved = std::mem::take(&mut lane);
        assert!(lane.is_empty());
        assert_eq!(lane, Lane::new());
        assert_eq!(moved.len(), 3);
        assert_eq!(moved.front(), Some(&1));
    }
}
