use std::fmt;

use color_eyre::eyre::{eyre, Result};
use itertools::Itertools;

use super::{Game, Side, WIN};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Noughts and crosses. `First` plays x, `Second` plays o.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [Option<Side>; 9],
    to_move: Side,
}

impl TicTacToe {
    fn winner(&self) -> Option<Side> {
        LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|i| self.cells[i]);
            match (a, b, c) {
                (Some(a), Some(b), Some(c)) if a == b && b == c => Some(a),
                _ => None,
            }
        })
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Lines still open only to `side`
    fn open_lines(&self, side: Side) -> i32 {
        LINES
            .iter()
            .filter(|line| {
                line.iter()
                    .all(|&i| self.cells[i].map_or(true, |owner| owner == side))
            })
            .count() as i32
    }
}

impl Game for TicTacToe {
    fn start() -> Self {
        Self {
            cells: [None; 9],
            to_move: Side::First,
        }
    }

    /// Nine characters, row by row: `x`, `o` or `.` for an empty cell. Slashes between rows are
    /// allowed and ignored
    fn parse(position: &str) -> Result<Self> {
        let symbols = position.chars().filter(|c| *c != '/').collect_vec();
        if symbols.len() != 9 {
            return Err(eyre!(
                "A board has 9 cells, '{}' describes {}",
                position,
                symbols.len()
            ));
        }

        let mut cells = [None; 9];
        for (cell, symbol) in cells.iter_mut().zip(symbols) {
            *cell = match symbol.to_ascii_lowercase() {
                'x' => Some(Side::First),
                'o' => Some(Side::Second),
                '.' => None,
                other => return Err(eyre!("Unknown cell '{}'", other)),
            };
        }

        let xs = cells.iter().filter(|c| **c == Some(Side::First)).count();
        let os = cells.iter().filter(|c| **c == Some(Side::Second)).count();
        let to_move = match xs.checked_sub(os) {
            Some(0) => Side::First,
            Some(1) => Side::Second,
            _ => return Err(eyre!("x moves first, so {xs} x and {os} o can't happen")),
        };

        Ok(Self { cells, to_move })
    }

    fn to_move(&self) -> Side {
        self.to_move
    }

    fn successors(&self) -> Vec<Self> {
        if self.winner().is_some() {
            return vec![];
        }

        (0..9)
            .filter(|&i| self.cells[i].is_none())
            .map(|i| {
                let mut next = *self;
                next.cells[i] = Some(self.to_move);
                next.to_move = self.to_move.other();
                next
            })
            .collect()
    }

    fn evaluate(&self, perspective: Side) -> i32 {
        match self.winner() {
            Some(side) if side == perspective => WIN,
            Some(_) => -WIN,
            None if self.is_full() => 0,
            None => self.open_lines(perspective) - self.open_lines(perspective.other()),
        }
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.cells.chunks(3).map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Some(Side::First) => 'x',
                    Some(Side::Second) => 'o',
                    None => '.',
                })
                .collect::<String>()
        });

        write!(f, "{}", rows.format("/"))
    }
}
