//! The board as one side sees it: pieces are shown only on visible squares.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::color::Color;
use crate::piece::Piece;
use crate::square::{Square, BOARD_SIZE, NUM_SQUARES};
use crate::visibility::compute_visibility;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObservedSquare {
    Fogged,
    Visible(Option<Piece>),
}

impl ObservedSquare {
    pub fn is_fogged(&self) -> bool {
        matches!(self, ObservedSquare::Fogged)
    }

    /// The piece seen here, `None` for empty or fogged squares.
    pub fn piece(&self) -> Option<Piece> {
        match self {
            ObservedSquare::Visible(piece) => *piece,
            ObservedSquare::Fogged => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    viewer: Color,
    visible: Bitboard,
    squares: [ObservedSquare; NUM_SQUARES],
}

impl Observation {
    pub fn new(board: &Board, viewer: Color) -> Self {
        let visible = compute_visibility(board, viewer);
        let mut squares = [ObservedSquare::Fogged; NUM_SQUARES];
        for square in visible.squares() {
            squares[square.to_index()] = ObservedSquare::Visible(board.get_piece(square));
        }
        Observation {
            viewer,
            visible,
            squares,
        }
    }

    pub fn viewer(&self) -> Color {
        self.viewer
    }

    pub fn visible(&self) -> Bitboard {
        self.visible
    }

    pub fn get(&self, square: Square) -> ObservedSquare {
        self.squares[square.to_index()]
    }

    pub fn is_visible(&self, square: Square) -> bool {
        self.visible.contains(square)
    }

    /// Every piece the viewer can see, own and enemy.
    pub fn visible_pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.visible
            .squares()
            .filter_map(|sq| self.get(sq).piece().map(|p| (sq, p)))
    }

    /// A board holding only what the viewer sees; fogged squares read as empty.
    pub fn to_board(&self) -> Board {
        let mut board = Board::new();
        for (square, piece) in self.visible_pieces() {
            board.set_piece(square, Some(piece));
        }
        board
    }
}

/// Same grid as [`Board`]'s `Display`, with `?` on fogged squares.
impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            write!(f, "{} |", BOARD_SIZE - row)?;
            for col in 0..BOARD_SIZE {
                let c = match self.get(Square::at(row, col)) {
                    ObservedSquare::Fogged => '?',
                    ObservedSquare::Visible(Some(piece)) => piece.to_char(),
                    ObservedSquare::Visible(None) => '.',
                };
                write!(f, "{}|", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{} ", (b'a' + col) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn test_opening_observation_hides_enemy() {
        let board = Board::standard();
        let obs = Observation::new(&board, Color::White);

        assert_eq!(obs.viewer(), Color::White);
        assert_eq!(obs.visible_pieces().count(), 16);
        assert!(obs.get(Square::at(0, 4)).is_fogged());
        assert_eq!(obs.get(Square::at(4, 4)), ObservedSquare::Visible(None));
        assert_eq!(
            obs.get(Square::at(7, 4)).piece(),
            Some(Piece::new(PieceKind::King, Color::White))
        );
    }

    #[test]
    fn test_to_board_keeps_only_seen_pieces() {
        let board: Board = "4k3/8/8/3R2p1/8/8/8/4K3".parse().expect("valid placement");
        let obs = Observation::new(&board, Color::White);
        let seen = obs.to_board();

        assert_eq!(
            seen.get_piece(Square::at(3, 6)),
            Some(Piece::new(PieceKind::Pawn, Color::Black))
        );
        // Rook on d5 reaches d8 but the king sits on e8
        assert_eq!(seen.get_piece(Square::at(0, 4)), None);
        assert_eq!(seen.occupied_by(Color::White), board.occupied_by(Color::White));
    }

    #[test]
    fn test_display_fog_marks() {
        let obs = Observation::new(&Board::standard(), Color::Black);
        let rendered = obs.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "8 |r|n|b|q|k|b|n|r|");
        assert_eq!(lines[2], "6 |.|.|.|.|.|.|.|.|");
        assert_eq!(lines[4], "4 |?|?|?|?|?|?|?|?|");
        assert_eq!(lines[7], "1 |?|?|?|?|?|?|?|?|");
    }
}
