pub mod bitboard;
pub mod board;
pub mod color;
pub mod encode;
pub mod error;
pub mod game;
pub mod movegen;
pub mod r#move;
pub mod observation;
pub mod outcome;
pub mod piece;
pub mod square;
pub mod visibility;

#[cfg(feature = "serde")]
pub mod serde_support;

pub use bitboard::Bitboard;
pub use board::Board;
pub use color::Color;
pub use movegen::generate_moves;
pub use piece::{Piece, PieceKind};
pub use square::Square;
pub use visibility::compute_visibility;

#[cfg(feature = "python")]
extern crate pyo3;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule(gil_used = false)]
fn fog_chess(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python_bindings::PyBoard>()?;
    m.add_class::<python_bindings::PyGame>()?;
    m.add_class::<python_bindings::PyMove>()?;
    m.add_class::<python_bindings::PyGameOutcome>()?;
    m.add_function(wrap_pyfunction!(python_bindings::py_generate_moves, m)?)?;
    m.add_function(wrap_pyfunction!(python_bindings::py_compute_visibility, m)?)?;
    m.add("WHITE", "w")?;
    m.add("BLACK", "b")?;
    m.add("TOTAL_INPUT_PLANES", encode::TOTAL_INPUT_PLANES)?;
    Ok(())
}

#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use crate::encode;
    use crate::game::{Game, DEFAULT_MAX_MOVES};
    use crate::outcome::GameOutcome;
    use crate::r#move::Move;
    use pyo3::exceptions::PyValueError;

    fn value_error(msg: impl std::fmt::Display) -> PyErr {
        PyErr::new::<PyValueError, _>(msg.to_string())
    }

    fn square_at(row: usize, col: usize) -> PyResult<Square> {
        if row > u8::MAX as usize || col > u8::MAX as usize {
            return Err(value_error("Square coordinates must be between 0 and 7"));
        }
        Square::new(row as u8, col as u8)
            .ok_or_else(|| value_error("Square coordinates must be between 0 and 7"))
    }

    fn to_color(color: &str) -> PyResult<Color> {
        color.parse().map_err(value_error)
    }

    fn to_coords(squares: impl IntoIterator<Item = Square>) -> Vec<(usize, usize)> {
        squares
            .into_iter()
            .map(|sq| (sq.row() as usize, sq.col() as usize))
            .collect()
    }

    #[pyfunction(name = "generate_moves")]
    pub fn py_generate_moves(board: &PyBoard, row: usize, col: usize) -> PyResult<Vec<(usize, usize)>> {
        let from = square_at(row, col)?;
        Ok(to_coords(generate_moves(&board.board, from)))
    }

    #[pyfunction(name = "compute_visibility")]
    pub fn py_compute_visibility(board: &PyBoard, color: &str) -> PyResult<Vec<(usize, usize)>> {
        let color = to_color(color)?;
        Ok(to_coords(compute_visibility(&board.board, color)))
    }

    #[pyclass(name = "Board")]
    #[derive(Clone)]
    pub struct PyBoard {
        board: Board,
    }

    #[pymethods]
    impl PyBoard {
        #[new]
        pub fn new() -> Self {
            PyBoard {
                board: Board::new(),
            }
        }

        #[staticmethod]
        pub fn standard() -> Self {
            PyBoard {
                board: Board::standard(),
            }
        }

        #[staticmethod]
        pub fn from_placement(placement: &str) -> PyResult<Self> {
            let board = placement.parse().map_err(value_error)?;
            Ok(PyBoard { board })
        }

        pub fn placement(&self) -> String {
            self.board.to_placement()
        }

        pub fn get_piece(&self, row: usize, col: usize) -> PyResult<Option<char>> {
            let sq = square_at(row, col)?;
            Ok(self.board.get_piece(sq).map(|p| p.to_char()))
        }

        pub fn set_piece(&mut self, row: usize, col: usize, piece: Option<char>) -> PyResult<()> {
            let sq = square_at(row, col)?;
            let piece = piece
                .map(Piece::from_char)
                .transpose()
                .map_err(value_error)?;
            self.board.set_piece(sq, piece);
            Ok(())
        }

        pub fn clear(&mut self) {
            self.board.clear()
        }

        pub fn generate_moves(&self, row: usize, col: usize) -> PyResult<Vec<(usize, usize)>> {
            py_generate_moves(self, row, col)
        }

        pub fn compute_visibility(&self, color: &str) -> PyResult<Vec<(usize, usize)>> {
            py_compute_visibility(self, color)
        }

        pub fn __str__(&self) -> String {
            self.board.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!("Board({:?})", self.board.to_placement())
        }

        pub fn __eq__(&self, other: &PyBoard) -> bool {
            self.board == other.board
        }
    }

    #[pyclass(name = "Game")]
    pub struct PyGame {
        game: Game,
    }

    #[pymethods]
    impl PyGame {
        #[new]
        pub fn new() -> Self {
            PyGame { game: Game::new() }
        }

        #[staticmethod]
        #[pyo3(signature = (board, first_player="w", max_moves=DEFAULT_MAX_MOVES))]
        pub fn with_options(board: &PyBoard, first_player: &str, max_moves: usize) -> PyResult<Self> {
            let first_player = to_color(first_player)?;
            Ok(PyGame {
                game: Game::with_options(board.board, first_player, max_moves),
            })
        }

        pub fn max_moves(&self) -> usize {
            self.game.max_moves()
        }

        pub fn move_count(&self) -> usize {
            self.game.move_count()
        }

        pub fn turn(&self) -> char {
            self.game.turn().to_char()
        }

        pub fn is_over(&self) -> bool {
            self.game.is_over()
        }

        pub fn get_piece(&self, row: usize, col: usize) -> PyResult<Option<char>> {
            let sq = square_at(row, col)?;
            Ok(self.game.get_piece(sq).map(|p| p.to_char()))
        }

        pub fn board(&self) -> PyBoard {
            PyBoard {
                board: *self.game.board(),
            }
        }

        pub fn visibility(&self, color: &str) -> PyResult<Vec<(usize, usize)>> {
            let color = to_color(color)?;
            Ok(to_coords(self.game.visibility(color)))
        }

        /// Fogged rendering of the board as `color` sees it.
        pub fn observation(&self, color: &str) -> PyResult<String> {
            let color = to_color(color)?;
            Ok(self.game.observation(color).to_string())
        }

        // ---------------------------------------------------------------------
        // Unified Game Protocol Methods
        // ---------------------------------------------------------------------

        pub fn legal_action_indices(&self) -> Vec<usize> {
            self.game
                .legal_moves()
                .iter()
                .map(encode::encode_move)
                .collect()
        }

        pub fn apply_action(&mut self, action: usize) -> bool {
            match encode::decode_move(action) {
                Some(move_) => self.game.make_move(&move_).is_ok(),
                None => false,
            }
        }

        pub fn action_size(&self) -> usize {
            encode::total_actions()
        }

        pub fn board_shape(&self) -> (usize, usize) {
            (8, 8)
        }

        pub fn input_plane_count(&self) -> usize {
            encode::TOTAL_INPUT_PLANES
        }

        pub fn reward_absolute(&self) -> f32 {
            self.game
                .outcome()
                .map(|o| o.encode_winner_absolute())
                .unwrap_or(0.0)
        }

        pub fn reward_from_perspective(&self, perspective: &str) -> PyResult<f32> {
            let perspective = to_color(perspective)?;
            Ok(self
                .game
                .outcome()
                .map(|o| o.encode_winner_from_perspective(perspective))
                .unwrap_or(0.0))
        }

        pub fn name(&self) -> String {
            "fog_chess".to_string()
        }

        pub fn outcome(&self) -> Option<PyGameOutcome> {
            self.game.outcome().map(|o| PyGameOutcome { outcome: o })
        }

        pub fn legal_moves(&self) -> Vec<PyMove> {
            self.game
                .legal_moves()
                .into_iter()
                .map(|m| PyMove { move_: m })
                .collect()
        }

        pub fn is_legal_move(&self, move_: &PyMove) -> bool {
            self.game.is_legal_move(&move_.move_)
        }

        /// Returns the captured piece letter, raising ValueError on a refused move.
        pub fn make_move(&mut self, move_: &PyMove) -> PyResult<Option<char>> {
            self.game
                .make_move(&move_.move_)
                .map(|captured| captured.map(|p| p.to_char()))
                .map_err(value_error)
        }

        pub fn unmake_move(&mut self) -> bool {
            self.game.unmake_move()
        }

        pub fn clone(&self) -> PyGame {
            PyGame {
                game: self.game.clone(),
            }
        }

        pub fn __hash__(&self) -> u64 {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();

            self.game.board().hash(&mut hasher);
            (self.game.turn() as i8).hash(&mut hasher);

            hasher.finish()
        }

        pub fn encode_game_planes(&self) -> (Vec<f32>, usize, usize, usize) {
            encode::encode_game_planes(&self.game)
        }

        pub fn decode_action(&self, action: usize) -> Option<PyMove> {
            encode::decode_move(action).map(|move_| PyMove { move_ })
        }

        pub fn __str__(&self) -> String {
            self.game.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!(
                "Game(turn={:?}, moves={}, over={})",
                self.game.turn(),
                self.game.move_count(),
                self.game.is_over()
            )
        }
    }

    #[pyclass(name = "Move")]
    #[derive(Clone, Debug)]
    pub struct PyMove {
        move_: Move,
    }

    #[pymethods]
    impl PyMove {
        #[new]
        pub fn new(from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> PyResult<Self> {
            Ok(PyMove {
                move_: Move::new(square_at(from_row, from_col)?, square_at(to_row, to_col)?),
            })
        }

        #[staticmethod]
        pub fn parse(text: &str) -> PyResult<Self> {
            let move_ = text.parse().map_err(value_error)?;
            Ok(PyMove { move_ })
        }

        pub fn from_square(&self) -> (usize, usize) {
            (self.move_.from.row() as usize, self.move_.from.col() as usize)
        }

        pub fn to_square(&self) -> (usize, usize) {
            (self.move_.to.row() as usize, self.move_.to.col() as usize)
        }

        pub fn encode(&self) -> usize {
            encode::encode_move(&self.move_)
        }

        #[staticmethod]
        pub fn decode(action: usize) -> PyResult<Self> {
            match encode::decode_move(action) {
                Some(mv) => Ok(PyMove { move_: mv }),
                _ => Err(value_error("invalid action")),
            }
        }

        pub fn __str__(&self) -> String {
            self.move_.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!("Move.parse({:?})", self.move_.to_string())
        }

        pub fn __eq__(&self, other: &PyMove) -> bool {
            self.move_ == other.move_
        }

        pub fn __hash__(&self) -> u64 {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.move_.hash(&mut hasher);
            hasher.finish()
        }
    }

    #[pyclass(name = "GameOutcome")]
    #[derive(Clone, Copy, Debug)]
    pub struct PyGameOutcome {
        outcome: GameOutcome,
    }

    #[pymethods]
    impl PyGameOutcome {
        pub fn winner(&self) -> Option<char> {
            self.outcome.winner().map(|color| color.to_char())
        }

        pub fn encode_winner_absolute(&self) -> f32 {
            self.outcome.encode_winner_absolute()
        }

        pub fn encode_winner_from_perspective(&self, perspective: &str) -> PyResult<f32> {
            Ok(self
                .outcome
                .encode_winner_from_perspective(to_color(perspective)?))
        }

        pub fn is_draw(&self) -> bool {
            self.outcome.is_draw()
        }

        pub fn name(&self) -> String {
            self.outcome.to_string()
        }

        pub fn __str__(&self) -> String {
            self.outcome.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!("GameOutcome({})", self.outcome)
        }

        pub fn __eq__(&self, other: &PyGameOutcome) -> bool {
            self.outcome == other.outcome
        }
    }
}
