//! This crate provides an ordered container, the [`Lane`], implemented as an
//! AVL tree whose nodes are threaded into a cyclic doubly-linked list.
//!
//! The tree keeps inserting, erasing and searching at *O*(log *n*). The list
//! makes stepping from an element to its neighbours *O*(1), and yields the
//! least and greatest elements for free. It is meant for things such as
//! vehicles on a road lane, where the typical question is "who is right in
//! front of me, and who is right behind?".
//!
//! Elements implement [`LaneElement`], which orders them both against each
//! other and against a bare `f64` position. Every search accepts either kind
//! of key (see [`Probe`]).
//!
//! ```
//! use lane_tree::Lane;
//!
//! let mut lane = Lane::from([1.0, 3.0, 2.0]);
//! lane.insert(2.5);
//!
//! let cursor = lane.lower_bound(2.2); // the first element not less than 2.2
//! assert_eq!(cursor.current(), Some(&2.5));
//! assert_eq!(cursor.peek_prev(), Some(&2.0));
//! assert_eq!(cursor.peek_next(), Some(&3.0));
//!
//! assert_eq!(lane.erase(2.0), Some(2.0));
//! assert_eq!(lane.find(2.5).peek_prev(), Some(&1.0));
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of a lane holding `1, 2, 3` is like the following graph.
//! The `Lane` points at the root of the tree, which owns every node through
//! the `left`/`right` links:
//! ```text
//! ╔═══════════╗
//! ║   root    ║ ──→ ╔═══╗
//! ╟───────────╢     ║ 2 ║
//! ║   ghost   ║ ┐   ╚═══╝
//! ╟───────────╢ │  ↙     ↘
//! ║    len    ║ │ ╔═══╗ ╔═══╗
//! ╚═══════════╝ │ ║ 1 ║ ║ 3 ║
//!     Lane      │ ╚═══╝ ╚═══╝
//!               │
//! ```
//! and at the ghost node, through which the same nodes are threaded into a
//! cyclic list in ascending order:
//! ```text
//!   ┌──────────────────────────────────────────────────┐
//!   ↓                                                  │
//! ┌─────────┐ next ╔═══╗ next ╔═══╗ next ╔═══╗ next    │
//! │ (Ghost) │ ───→ ║ 1 ║ ───→ ║ 2 ║ ───→ ║ 3 ║ ────────┘
//! │  Node   │ ←─── ║   ║ ←─── ║   ║ ←─── ║   ║
//! └─────────┘ prev ╚═══╝ prev ╚═══╝ prev ╚═══╝
//! ```
//! so `ghost.next` is the least element and `ghost.prev` the greatest one.
//! In an empty lane, both point at the ghost itself.
//!
//! Each node is allocated on heap, and holds:
//! - `left` and `right`, the children which it owns, and `parent`;
//! - `next` and `prev`, its neighbours in ascending order (or the ghost node
//!   at either end);
//! - the `height` of its subtree and its `balance`, which is the height of the
//!   right subtree minus the height of the left one, and stays within -1..=1;
//! - the element `T`, except in the ghost node.
//!
//! Rotations only touch the tree links, because they never change the order of
//! the nodes they move.
//!
//! # Cargo features
//!
//! - `check-invariants` (off by default): re-check the whole structure after
//!   every insertion and erasure, and the thread after every rotation, and
//!   panic on the first inconsistency.
//!
//! [`Lane`]: crate::Lane
//! [`LaneElement`]: crate::LaneElement
//! [`Probe`]: crate::Probe

#[doc(inline)]
pub use element::{LaneElement, Probe};
#[doc(inline)]
pub use error::InvariantError;
#[doc(inline)]
pub use lane::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use lane::{swap, Lane};

pub mod lane;

mod element;
mod error;
