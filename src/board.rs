use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::ParseError;
use crate::piece::{Piece, PieceKind};
use crate::square::{Square, BOARD_SIZE, NUM_SQUARES};

/// Placement string of the standard starting position, row 0 first.
pub const STANDARD_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8×8 grid of optional pieces. Pure data: no piece-count rules are enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; NUM_SQUARES],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Board {
            squares: [None; NUM_SQUARES],
        }
    }

    /// The standard starting position: black on rows 0–1, white on rows 6–7.
    pub fn standard() -> Self {
        let mut board = Board::new();
        for color in Color::ALL {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                let back = Square::at(color.back_row(), col as u8);
                let pawn = Square::at(color.pawn_row(), col as u8);
                board.set_piece(back, Some(Piece::new(*kind, color)));
                board.set_piece(pawn, Some(Piece::new(PieceKind::Pawn, color)));
            }
        }
        board
    }

    #[inline]
    pub fn get_piece(&self, square: Square) -> Option<Piece> {
        self.squares[square.to_index()]
    }

    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.to_index()] = piece;
    }

    pub fn clear(&mut self) {
        self.squares = [None; NUM_SQUARES];
    }

    /// Move whatever stands on `from` to `to`, clearing `from`.
    /// Returns the piece that was on `to`, if any. No rules are checked here.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.squares[from.to_index()].take();
        std::mem::replace(&mut self.squares[to.to_index()], moving)
    }

    /// Every occupied square with its piece, in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|piece| (Square::from_index(i), piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.pieces_of(color).map(|(sq, _)| sq).collect()
    }

    pub fn occupied(&self) -> Bitboard {
        self.pieces().map(|(sq, _)| sq).collect()
    }

    pub fn find(&self, piece: Piece) -> Option<Square> {
        self.pieces().find(|(_, p)| *p == piece).map(|(sq, _)| sq)
    }

    /// Piece placement string: rows 0..8 joined by `/`, digits for runs of empties.
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in 0..BOARD_SIZE {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0u8;
            for col in 0..BOARD_SIZE {
                match self.get_piece(Square::at(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ranks: Vec<&str> = s.trim().split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(ParseError::RankCount(ranks.len()));
        }

        let mut board = Board::new();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    col += run as usize;
                    continue;
                }
                let piece = Piece::from_char(c)?;
                if col >= BOARD_SIZE as usize {
                    return Err(ParseError::FileCount {
                        rank: row,
                        files: col + 1,
                    });
                }
                board.set_piece(Square::at(row as u8, col as u8), Some(piece));
                col += 1;
            }
            if col != BOARD_SIZE as usize {
                return Err(ParseError::FileCount {
                    rank: row,
                    files: col,
                });
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            write!(f, "{} |", BOARD_SIZE - row)?;

            for col in 0..BOARD_SIZE {
                let c = match self.get_piece(Square::at(row, col)) {
                    Some(piece) => piece.to_char(),
                    None => '.',
                };

                write!(f, "{}", c)?;
                write!(f, "|")?;
            }

            writeln!(f)?;
        }

        // File letters
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{} ", (b'a' + col) as char)?;
        }
        writeln!(f)?;

        Ok(())
    }
}
