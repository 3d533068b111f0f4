use std::fmt;

use color_eyre::eyre::{Result, WrapErr};

use super::{Game, Side};

/// A single number both sides push around forever. `First` wants it high, `Second` wants it low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    value: i64,
    to_move: Side,
}

impl Counter {
    pub fn new(value: i64, to_move: Side) -> Self {
        Self { value, to_move }
    }
}

impl Game for Counter {
    fn start() -> Self {
        Self::new(0, Side::First)
    }

    fn parse(position: &str) -> Result<Self> {
        let value = position
            .trim()
            .parse()
            .wrap_err_with(|| format!("'{position}' is not a counter value"))?;

        Ok(Self::new(value, Side::First))
    }

    fn to_move(&self) -> Side {
        self.to_move
    }

    fn successors(&self) -> Vec<Self> {
        let next = self.to_move.other();

        [1, 2, -1]
            .into_iter()
            .map(|step| Self::new(self.value.saturating_add(step), next))
            .collect()
    }

    fn evaluate(&self, perspective: Side) -> i32 {
        let clamped = self.value.clamp(i32::MIN as i64 + 1, i32::MAX as i64) as i32;

        match perspective {
            Side::First => clamped,
            Side::Second => -clamped,
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
