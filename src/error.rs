use thiserror::Error;

use crate::color::Color;
use crate::r#move::Move;
use crate::square::Square;

/// Errors from parsing the text notations (squares, pieces, moves, board placement).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid piece character: {0:?}")]
    InvalidPiece(char),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("invalid move: {0:?}")]
    InvalidMove(String),

    #[error("board placement must have 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} of board placement covers {files} files, expected 8")]
    FileCount { rank: usize, files: usize },
}

/// Reasons a [`Game`](crate::game::Game) refuses a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("piece on {square} belongs to {owner}, but it is {turn}'s turn")]
    WrongColor {
        square: Square,
        owner: Color,
        turn: Color,
    },

    #[error("{0} is not a reachable destination")]
    Unreachable(Move),
}
