//! Pseudo-legal move generation.
//!
//! Moves respect piece geometry and board occupancy only: nothing here knows
//! about check, castling, en passant or promotion.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// How a piece kind moves, as (row, col) vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Forward push, double push from the start row, capture-only diagonals.
    Pawn,
    /// One application of each offset.
    Step(&'static [(i8, i8)]),
    /// Repeat each direction until the edge or the first occupied square.
    Slide(&'static [(i8, i8)]),
}

impl Movement {
    pub const fn of(kind: PieceKind) -> Movement {
        match kind {
            PieceKind::Pawn => Movement::Pawn,
            PieceKind::Knight => Movement::Step(&KNIGHT_OFFSETS),
            PieceKind::Bishop => Movement::Slide(&DIAGONAL),
            PieceKind::Rook => Movement::Slide(&ORTHOGONAL),
            PieceKind::Queen => Movement::Slide(&ALL_DIRECTIONS),
            PieceKind::King => Movement::Step(&KING_OFFSETS),
        }
    }
}

/// Every square the piece on `from` could move to, ignoring check.
///
/// An empty `from` yields an empty vector. The result never holds duplicates;
/// its order follows the movement table and carries no meaning.
#[hotpath::measure]
pub fn generate_moves(board: &Board, from: Square) -> Vec<Square> {
    let mut moves = Vec::new();
    if let Some(piece) = board.get_piece(from) {
        for_each_destination(board, from, piece, |to| moves.push(to));
    }
    moves
}

/// Same destinations as [`generate_moves`], collected into a bitboard.
pub fn reachable(board: &Board, from: Square) -> Bitboard {
    let mut targets = Bitboard::empty();
    if let Some(piece) = board.get_piece(from) {
        for_each_destination(board, from, piece, |to| targets.insert(to));
    }
    targets
}

fn for_each_destination<F: FnMut(Square)>(board: &Board, from: Square, piece: Piece, mut emit: F) {
    match Movement::of(piece.kind) {
        Movement::Pawn => pawn_destinations(board, from, piece, &mut emit),
        Movement::Step(offsets) => {
            for &(dr, dc) in offsets {
                if let Some(to) = from.offset(dr, dc) {
                    if !is_friendly(board, to, piece) {
                        emit(to);
                    }
                }
            }
        }
        Movement::Slide(directions) => {
            for &(dr, dc) in directions {
                let mut cursor = from.offset(dr, dc);
                while let Some(to) = cursor {
                    match board.get_piece(to) {
                        None => emit(to),
                        Some(other) => {
                            if !other.is_friend_of(&piece) {
                                emit(to);
                            }
                            break;
                        }
                    }
                    cursor = to.offset(dr, dc);
                }
            }
        }
    }
}

fn pawn_destinations<F: FnMut(Square)>(board: &Board, from: Square, piece: Piece, emit: &mut F) {
    let dir = piece.color.forward();

    if let Some(one) = from.offset(dir, 0) {
        if board.get_piece(one).is_none() {
            emit(one);
            // Double step only from the start row, and only through an empty square
            if from.row() == piece.color.pawn_row() {
                if let Some(two) = one.offset(dir, 0) {
                    if board.get_piece(two).is_none() {
                        emit(two);
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            if let Some(target) = board.get_piece(to) {
                if !target.is_friend_of(&piece) {
                    emit(to);
                }
            }
        }
    }
}

#[inline]
fn is_friendly(board: &Board, square: Square, piece: Piece) -> bool {
    board
        .get_piece(square)
        .is_some_and(|other| other.is_friend_of(&piece))
}
