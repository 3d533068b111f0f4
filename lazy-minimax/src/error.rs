use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while searching
///
/// The comparison behind the score type is trusted to be a total order. A score type whose `Ord`
/// is inconsistent won't be reported here, it just produces meaningless results.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The requested depth was negative. Nothing was built or evaluated.
    #[error("search depth must not be negative, got {0}")]
    InvalidDepth(i64),
    /// Evaluation walked further than [crate::SearchOptions::max_evaluation_depth] plies from the
    /// root. This is what evaluating an unpruned, unbounded tree looks like.
    #[error("evaluation went deeper than the ceiling of {limit} plies, was the tree pruned?")]
    DepthExceeded {
        /// The configured ceiling
        limit: usize,
    },
    /// The time limit ran out before a single move from the root was fully evaluated
    #[error("ran out of time after {limit:?} without evaluating a single move")]
    TimedOut {
        /// The configured time limit
        limit: Duration,
    },
}
