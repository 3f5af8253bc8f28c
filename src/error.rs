use thiserror::Error;

/// A broken invariant found by [`Lane::validate`].
///
/// `rank` is the zero-based position, in ascending order, of the first
/// element where the problem shows up.
///
/// [`Lane::validate`]: crate::Lane::validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("element at rank {rank} orders before its predecessor")]
    Unsorted { rank: usize },
    #[error("node at rank {rank} leans by {balance} levels")]
    Unbalanced { rank: usize, balance: isize },
    #[error("node at rank {rank} caches height {cached}, but its subtree is {actual} high")]
    HeightMismatch {
        rank: usize,
        cached: usize,
        actual: usize,
    },
    #[error("node at rank {rank} caches balance {cached}, but its subtree leans by {actual}")]
    BalanceMismatch {
        rank: usize,
        cached: isize,
        actual: isize,
    },
    #[error("node at rank {rank} is not linked back from its parent")]
    ParentMismatch { rank: usize },
    #[error("threaded list diverges from the tree at rank {rank}")]
    ThreadMismatch { rank: usize },
    #[error("lane caches length {cached}, but the tree holds {actual} nodes")]
    LengthMismatch { cached: usize, actual: usize },
}
