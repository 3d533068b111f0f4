#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! This crate implements plain minimax over a lazily expanded game tree. You provide a
//! 'successors' function that lists the positions reachable from a board, and a 'scoring'
//! function that turns a given board into anything that implements the `Ord` trait.
//!
//! The search is built from small pieces that can also be used on their own:
//!
//! 1. [generate] builds a [LazyTree] of boards. Children are only produced when something asks
//!    for them, so the tree may be infinite.
//! 2. [prune] bounds that tree to a number of plies without forcing anything below the bound.
//! 3. [map_values] swaps every board for its score, keeping the shape and the laziness.
//! 4. [maximize] / [minimize] reduce the scored tree to a single value. The root is always the
//!    maximizing side.
//!
//! [best_move] and [MinimaxSearch] glue these together and also remember which child of the root
//! produced the chosen value.
//!
//! ```rust
//! use lazy_minimax::best_move;
//!
//! // A pile of stones, each player takes one or two. Whoever takes the last stone wins.
//! #[derive(Debug, Clone, PartialEq)]
//! struct Pile {
//!     stones: u32,
//!     our_turn: bool,
//! }
//!
//! fn successors(pile: &Pile) -> Vec<Pile> {
//!     (1..=2)
//!         .filter(|take| *take <= pile.stones)
//!         .map(|take| Pile { stones: pile.stones - take, our_turn: !pile.our_turn })
//!         .collect()
//! }
//!
//! // Only finished piles carry information, everything else is a draw for now
//! fn score(pile: &Pile) -> i32 {
//!     match (pile.stones, pile.our_turn) {
//!         (0, true) => -1,
//!         (0, false) => 1,
//!         _ => 0,
//!     }
//! }
//!
//! let start = Pile { stones: 4, our_turn: true };
//! let chosen = best_move(start, 4, successors, score).unwrap();
//!
//! // Taking one stone leaves three, which is lost for whoever has to move
//! assert_eq!(chosen.board, Some(Pile { stones: 3, our_turn: false }));
//! assert_eq!(chosen.value, 1);
//! ```

mod error;
pub use error::SearchError;

pub mod tree;
pub use tree::{generate, map_values, prune, LazyTree, Scorable, Successors};

pub mod minimax;
pub use minimax::{maximize, minimize, Choice, Evaluator, MinMaxReturn, SearchOptions};

mod search;
pub use search::{best_move, BestMove, MinimaxSearch};
