use std::fmt;

use color_eyre::eyre::{eyre, Result, WrapErr};
use itertools::Itertools;

use super::{Game, Side, WIN};

/// Most stones a single move may take from a heap
const MAX_TAKE: u8 = 3;

/// Heaps of stones. A move takes one to three stones from a single heap and whoever takes the
/// last stone wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nim {
    heaps: Vec<u8>,
    to_move: Side,
}

impl Nim {
    pub fn new(heaps: Vec<u8>, to_move: Side) -> Self {
        Self { heaps, to_move }
    }

    fn is_over(&self) -> bool {
        self.heaps.iter().all(|&h| h == 0)
    }

    /// Non zero means the side to move can force a win
    fn nim_sum(&self) -> u8 {
        self.heaps
            .iter()
            .fold(0, |sum, &h| sum ^ (h % (MAX_TAKE + 1)))
    }
}

impl Game for Nim {
    fn start() -> Self {
        Self::new(vec![3, 4, 5], Side::First)
    }

    fn parse(position: &str) -> Result<Self> {
        let heaps = position
            .split(',')
            .map(|heap| {
                heap.trim()
                    .parse::<u8>()
                    .wrap_err_with(|| format!("'{heap}' is not a heap size"))
            })
            .collect::<Result<Vec<_>>>()?;

        if heaps.is_empty() {
            return Err(eyre!("Nim needs at least one heap"));
        }

        Ok(Self::new(heaps, Side::First))
    }

    fn to_move(&self) -> Side {
        self.to_move
    }

    fn successors(&self) -> Vec<Self> {
        let mut next = vec![];

        for (heap, &stones) in self.heaps.iter().enumerate() {
            for take in 1..=stones.min(MAX_TAKE) {
                let mut heaps = self.heaps.clone();
                heaps[heap] -= take;
                next.push(Self::new(heaps, self.to_move.other()));
            }
        }

        next
    }

    fn evaluate(&self, perspective: Side) -> i32 {
        if self.is_over() {
            // Whoever has to move now just watched the other side take the last stone
            return if self.to_move == perspective { -WIN } else { WIN };
        }

        let mover_wins = self.nim_sum() != 0;
        if mover_wins == (self.to_move == perspective) {
            1
        } else {
            -1
        }
    }
}

impl fmt::Display for Nim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.heaps.iter().join(" "))
    }
}
