use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

pub const BOARD_SIZE: u8 = 8;
pub const NUM_SQUARES: usize = 64;

/// A square on the 8×8 board. Row 0 is black's back rank, row 7 white's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Checked constructor; `None` when either coordinate is outside `0..8`.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Unchecked-by-type constructor for coordinates known to be in range.
    ///
    /// Panics on out-of-range coordinates.
    pub const fn at(row: u8, col: u8) -> Self {
        assert!(row < BOARD_SIZE && col < BOARD_SIZE, "square out of range");
        Square { row, col }
    }

    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < NUM_SQUARES);
        Square {
            row: (index / BOARD_SIZE as usize) as u8,
            col: (index % BOARD_SIZE as usize) as u8,
        }
    }

    #[inline]
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    #[inline]
    pub fn row(&self) -> u8 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> u8 {
        self.col
    }

    /// The square `(row + dr, col + dc)`, or `None` if that falls off the board.
    #[inline]
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// The `"row,col"` key used by clients that index visibility by string.
    pub fn key(&self) -> String {
        format!("{},{}", self.row, self.col)
    }

    /// File letter as shown on the board edge (`a` for column 0).
    pub fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }

    /// Rank digit as shown on the board edge (`8` for row 0).
    pub fn rank_char(&self) -> char {
        (b'0' + (BOARD_SIZE - self.row)) as char
    }

    /// All 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }

        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }

        Ok(Square {
            row: BOARD_SIZE - (rank - b'0'),
            col: file - b'a',
        })
    }
}
