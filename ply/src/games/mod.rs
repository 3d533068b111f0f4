use std::fmt::{Debug, Display};

use clap::ValueEnum;
use color_eyre::eyre::Result;
use serde::Serialize;

pub mod counter;
pub mod nim;
pub mod tic_tac_toe;

pub use counter::Counter;
pub use nim::Nim;
pub use tic_tac_toe::TicTacToe;

/// The value of a position that is won outright, bigger than any heuristic score
pub const WIN: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    Nim,
    TicTacToe,
    /// Never ends. Only usable because the search tree is pruned before it is walked
    Counter,
}

/// The rules of a two player game, as much as the search needs to know about them
pub trait Game: Clone + Debug + Display + Send + Sync + 'static {
    /// Position the game starts from when none is given
    fn start() -> Self;

    /// Read a position from the command line
    fn parse(position: &str) -> Result<Self>;

    fn to_move(&self) -> Side;

    /// Every position reachable with one move, empty once the game is over
    fn successors(&self) -> Vec<Self>;

    /// How good this position is for `perspective`. Finished games score `WIN` or `-WIN`
    fn evaluate(&self, perspective: Side) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_side() {
        assert_eq!(Side::First.other(), Side::Second);
        assert_eq!(Side::Second.other().other(), Side::Second);
    }
}
