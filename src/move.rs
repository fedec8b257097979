use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::square::Square;

/// A piece relocation from one square to another. Captures are implicit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// Build from raw `(row, col)` pairs, `None` if either is off the board.
    pub fn from_coords(from: (u8, u8), to: (u8, u8)) -> Option<Self> {
        Some(Move {
            from: Square::new(from.0, from.1)?,
            to: Square::new(to.0, to.1)?,
        })
    }
}

/// Coordinate notation, e.g. `e2e4`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return Err(ParseError::InvalidMove(s.to_string()));
        }
        let from = s[..2]
            .parse()
            .map_err(|_| ParseError::InvalidMove(s.to_string()))?;
        let to = s[2..]
            .parse()
            .map_err(|_| ParseError::InvalidMove(s.to_string()))?;
        Ok(Move { from, to })
    }
}
