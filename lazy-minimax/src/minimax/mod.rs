//! Reducing a scored tree to a single value.
//!
//! The root of every tree is a maximizing node, its children are minimizing nodes, their children
//! maximize again, and so on. Leaves (terminal positions, or nodes cut off by
//! [prune](crate::prune)) contribute their own score.
//!
//! When several children share the extremal value, the first of them in child order is the one
//! that gets picked. This holds for sequential and parallel evaluation alike.
//!
//! Evaluation forces every node it visits, so it must only be run on pruned trees. An unpruned
//! infinite tree is caught by [SearchOptions::max_evaluation_depth] and reported as
//! [SearchError::DepthExceeded](crate::SearchError::DepthExceeded).

mod eval;
pub use eval::{maximize, minimize, Choice, Evaluator, SearchOptions};

mod minimax_return;
pub use minimax_return::MinMaxReturn;
