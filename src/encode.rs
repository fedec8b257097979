use crate::color::Color;
use crate::game::Game;
use crate::observation::Observation;
use crate::piece::PieceKind;
use crate::r#move::Move;
use crate::square::{Square, BOARD_SIZE, NUM_SQUARES};

/// Number of piece planes per side (one per piece kind)
const PIECE_PLANES: usize = 6;

/// Plane holding 1.0 on every square the viewer can see
const VISIBILITY_PLANE: usize = 2 * PIECE_PLANES;

/// Plane filled with 1.0 when the viewer is white
const COLOR_PLANE: usize = VISIBILITY_PLANE + 1;

/// Total number of input planes for the neural network
pub const TOTAL_INPUT_PLANES: usize = COLOR_PLANE + 1;

/// Encode what `viewer` can see into a flat f32 array, row-major.
/// Returns (flat_data, num_planes, height, width).
///
/// Planes 0-5 hold the viewer's own pieces by kind, planes 6-11 the enemy
/// pieces inside the fog-free area, then the visibility mask and the color plane.
pub fn encode_observation_planes(observation: &Observation) -> (Vec<f32>, usize, usize, usize) {
    let viewer = observation.viewer();
    let size = BOARD_SIZE as usize;
    let mut data = vec![0.0f32; TOTAL_INPUT_PLANES * NUM_SQUARES];

    for (square, piece) in observation.visible_pieces() {
        let side_offset = if piece.color == viewer {
            0
        } else {
            PIECE_PLANES
        };
        let plane = side_offset + piece.kind.index();
        data[plane * NUM_SQUARES + square.to_index()] = 1.0;
    }

    for square in observation.visible().squares() {
        data[VISIBILITY_PLANE * NUM_SQUARES + square.to_index()] = 1.0;
    }

    if viewer == Color::White {
        let start = COLOR_PLANE * NUM_SQUARES;
        data[start..start + NUM_SQUARES].fill(1.0);
    }

    (data, TOTAL_INPUT_PLANES, size, size)
}

/// Encode the position from the perspective of the side to move.
pub fn encode_game_planes(game: &Game) -> (Vec<f32>, usize, usize, usize) {
    encode_observation_planes(&game.observation(game.turn()))
}

/// Encode a move as an action index for the policy head: `from * 64 + to`
pub fn encode_move(move_: &Move) -> usize {
    move_.from.to_index() * NUM_SQUARES + move_.to.to_index()
}

pub fn decode_move(action: usize) -> Option<Move> {
    if action >= total_actions() {
        return None;
    }
    let from = Square::from_index(action / NUM_SQUARES);
    let to = Square::from_index(action % NUM_SQUARES);
    Some(Move::new(from, to))
}

pub fn total_actions() -> usize {
    NUM_SQUARES * NUM_SQUARES
}

/// Plane index of a piece kind for the given side relative to the viewer.
pub fn piece_plane(kind: PieceKind, own: bool) -> usize {
    if own {
        kind.index()
    } else {
        PIECE_PLANES + kind.index()
    }
}
