use log::{debug, trace};

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::color::Color;
use crate::error::MoveError;
use crate::movegen::{generate_moves, reachable};
use crate::observation::Observation;
use crate::outcome::GameOutcome;
use crate::piece::{Piece, PieceKind};
use crate::r#move::Move;
use crate::square::Square;
use crate::visibility::compute_visibility;

/// Ply cap after which an undecided game is scored as a draw.
pub const DEFAULT_MAX_MOVES: usize = 500;

#[derive(Clone, Debug)]
struct MoveHistoryEntry {
    move_: Move,
    captured: Option<Piece>,
}

/// A match in progress: the board, whose turn it is, and how the game ended.
///
/// Moves are validated against [`generate_moves`] only, so kings may walk into
/// attack. Capturing the enemy king ends the game.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    current_player: Color,
    move_history: Vec<MoveHistoryEntry>,
    outcome: Option<GameOutcome>,
    max_moves: usize,
}

impl Game {
    pub fn new() -> Self {
        Self::with_options(Board::standard(), Color::White, DEFAULT_MAX_MOVES)
    }

    pub fn with_options(board: Board, first_player: Color, max_moves: usize) -> Self {
        Game {
            board,
            current_player: first_player,
            move_history: Vec::new(),
            outcome: None,
            max_moves,
        }
    }

    /// Standard starting position, white to move.
    pub fn standard() -> Self {
        Self::new()
    }

    pub fn max_moves(&self) -> usize {
        self.max_moves
    }

    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get_piece(&self, square: Square) -> Option<Piece> {
        self.board.get_piece(square)
    }

    /// Edit the board directly. The edited board becomes the new starting
    /// position: move history is cleared and can no longer be unmade.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        if !self.move_history.is_empty() {
            debug!(
                "board edited at {}, dropping {} moves of history",
                square,
                self.move_history.len()
            );
            self.move_history.clear();
        }
        self.board.set_piece(square, piece)
    }

    pub fn turn(&self) -> Color {
        self.current_player
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn move_history(&self) -> Vec<Move> {
        self.move_history.iter().map(|e| e.move_).collect()
    }

    /// Pieces taken so far, oldest first.
    pub fn captured_pieces(&self) -> Vec<Piece> {
        self.move_history.iter().filter_map(|e| e.captured).collect()
    }

    /// Destinations for the piece on `square`, whoever owns it.
    pub fn moves_from(&self, square: Square) -> Vec<Square> {
        generate_moves(&self.board, square)
    }

    pub fn visibility(&self, color: Color) -> Bitboard {
        compute_visibility(&self.board, color)
    }

    pub fn observation(&self, color: Color) -> Observation {
        Observation::new(&self.board, color)
    }

    /// Every pseudo-legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }

        let mut moves = Vec::new();
        for (from, _) in self.board.pieces_of(self.current_player) {
            for to in generate_moves(&self.board, from) {
                moves.push(Move::new(from, to));
            }
        }
        moves
    }

    pub fn check_move(&self, move_: &Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        let piece = self
            .board
            .get_piece(move_.from)
            .ok_or(MoveError::EmptySquare(move_.from))?;

        if piece.color != self.current_player {
            return Err(MoveError::WrongColor {
                square: move_.from,
                owner: piece.color,
                turn: self.current_player,
            });
        }

        if !reachable(&self.board, move_.from).contains(move_.to) {
            return Err(MoveError::Unreachable(*move_));
        }

        Ok(())
    }

    pub fn is_legal_move(&self, move_: &Move) -> bool {
        self.check_move(move_).is_ok()
    }

    /// Apply `move_` by replacement and pass the turn. Returns the captured piece.
    pub fn make_move(&mut self, move_: &Move) -> Result<Option<Piece>, MoveError> {
        if let Err(err) = self.check_move(move_) {
            trace!("rejected {}: {}", move_, err);
            return Err(err);
        }

        let mover = self.current_player;
        let captured = self.board.move_piece(move_.from, move_.to);
        debug!(
            "{} plays {}{}",
            mover,
            move_,
            captured
                .map(|p| format!(" capturing {}", p.kind))
                .unwrap_or_default()
        );

        self.move_history.push(MoveHistoryEntry {
            move_: *move_,
            captured,
        });
        self.current_player = mover.opposite();

        if captured.is_some_and(|p| p.kind == PieceKind::King) {
            self.outcome = Some(GameOutcome::win_for(mover));
        } else if self.move_history.len() >= self.max_moves {
            self.outcome = Some(GameOutcome::Draw);
        }

        if let Some(outcome) = self.outcome {
            debug!("game over after {} moves: {}", self.move_history.len(), outcome);
        }

        Ok(captured)
    }

    pub fn unmake_move(&mut self) -> bool {
        if let Some(entry) = self.move_history.pop() {
            self.current_player = self.current_player.opposite();
            self.board.move_piece(entry.move_.to, entry.move_.from);
            self.board.set_piece(entry.move_.to, entry.captured);
            self.outcome = None;
            debug!("undid {}", entry.move_);
            true
        } else {
            false
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Game(turn: {}, is_over: {}, outcome: {:?})\n{}",
            self.current_player,
            self.is_over(),
            self.outcome,
            self.board
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::IndexedRandom;
    use rand::SeedableRng;

    fn mv(s: &str) -> Move {
        s.parse().expect("valid move")
    }

    #[test]
    fn test_new_game() {
        let game = Game::standard();
        assert_eq!(game.turn(), Color::White);
        assert!(!game.is_over());
        assert!(game.outcome().is_none());
        assert_eq!(game.max_moves(), DEFAULT_MAX_MOVES);
        assert_eq!(game.board(), &Board::standard());
    }

    #[test]
    fn test_legal_moves_initial() {
        let game = Game::standard();
        // 16 pawn moves + 4 knight moves
        assert_eq!(game.legal_moves().len(), 20);
        assert!(game.legal_moves().contains(&mv("e2e4")));
        assert!(!game.legal_moves().contains(&mv("e7e5")));
    }

    #[test]
    fn test_make_move() {
        let mut game = Game::standard();
        assert_eq!(game.make_move(&mv("e2e4")), Ok(None));
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.get_piece(Square::at(6, 4)), None);
        assert_eq!(
            game.get_piece(Square::at(4, 4)),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn test_make_move_errors() {
        let mut game = Game::standard();

        assert_eq!(
            game.make_move(&mv("e4e5")),
            Err(MoveError::EmptySquare(Square::at(4, 4)))
        );
        assert_eq!(
            game.make_move(&mv("e7e5")),
            Err(MoveError::WrongColor {
                square: Square::at(1, 4),
                owner: Color::Black,
                turn: Color::White,
            })
        );
        assert_eq!(
            game.make_move(&mv("e2e5")),
            Err(MoveError::Unreachable(mv("e2e5")))
        );
        assert_eq!(
            game.make_move(&mv("a1a2")),
            Err(MoveError::Unreachable(mv("a1a2")))
        );

        // Rejected moves leave everything as it was
        assert_eq!(game.board(), &Board::standard());
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_capture_and_unmake_restores() {
        let mut game = Game::standard();
        for m in ["e2e4", "d7d5", "e4d5"] {
            assert!(game.make_move(&mv(m)).is_ok());
        }
        assert_eq!(
            game.captured_pieces(),
            vec![Piece::new(PieceKind::Pawn, Color::Black)]
        );

        assert!(game.unmake_move());
        assert_eq!(
            game.get_piece(Square::at(3, 3)),
            Some(Piece::new(PieceKind::Pawn, Color::Black))
        );
        assert_eq!(
            game.get_piece(Square::at(4, 4)),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(game.turn(), Color::White);
        assert!(game.captured_pieces().is_empty());
    }

    #[test]
    fn test_set_piece_starts_new_history() {
        let mut game = Game::standard();
        game.make_move(&mv("e2e4")).unwrap();
        let e4 = Square::at(4, 4);
        game.set_piece(e4, None);

        assert_eq!(game.move_count(), 0);
        assert!(!game.unmake_move());
        assert_eq!(game.get_piece(e4), None);
        assert_eq!(game.get_piece(Square::at(6, 4)), None);
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn test_unmake_when_empty() {
        let mut game = Game::standard();
        assert!(!game.unmake_move());
    }

    #[test]
    fn test_king_capture_ends_game() {
        let board: Board = "4k3/8/8/8/8/8/8/4R2K".parse().expect("valid placement");
        let mut game = Game::with_options(board, Color::White, DEFAULT_MAX_MOVES);

        let captured = game.make_move(&mv("e1e8"));
        assert_eq!(captured, Ok(Some(Piece::new(PieceKind::King, Color::Black))));
        assert!(game.is_over());
        assert_eq!(game.outcome(), Some(GameOutcome::WhiteWin));
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.make_move(&mv("h1h2")), Err(MoveError::GameOver));

        assert!(game.unmake_move());
        assert!(!game.is_over());
    }

    #[test]
    fn test_max_moves_ends_game_in_draw() {
        let mut game = Game::with_options(Board::standard(), Color::White, 4);
        for m in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            assert!(game.make_move(&mv(m)).is_ok());
        }
        assert_eq!(game.outcome(), Some(GameOutcome::Draw));
        assert!(game.outcome().is_some_and(|o| o.is_draw()));
    }

    #[test]
    fn test_black_may_move_first() {
        let game = Game::with_options(Board::standard(), Color::Black, DEFAULT_MAX_MOVES);
        assert!(game.legal_moves().iter().all(|m| m.from.row() <= 1));
    }

    #[test]
    fn test_observation_follows_turns() {
        let mut game = Game::standard();
        assert!(game.make_move(&mv("e2e4")).is_ok());
        assert!(game.make_move(&mv("d7d5")).is_ok());

        // The e4 pawn can capture on d5, so white now sees that pawn
        let obs = game.observation(Color::White);
        assert_eq!(
            obs.get(Square::at(3, 3)).piece(),
            Some(Piece::new(PieceKind::Pawn, Color::Black))
        );
        assert!(game.visibility(Color::White).contains(Square::at(3, 3)));
        assert!(game.moves_from(Square::at(4, 4)).contains(&Square::at(3, 3)));
    }

    #[test]
    fn test_clone() {
        let mut game = Game::standard();
        assert!(game.make_move(&mv("b1c3")).is_ok());
        let cloned = game.clone();
        assert_eq!(cloned.board(), game.board());
        assert_eq!(cloned.move_history(), game.move_history());
        assert_eq!(cloned.turn(), game.turn());
    }

    #[test]
    fn test_random_playouts_hold_invariants() {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::sync::Arc;
        use std::thread;

        let num_games = 400;
        let num_threads = num_cpus::get().max(1);
        let games_per_thread = num_games / num_threads + 1;
        let total_moves_played = Arc::new(AtomicU64::new(0));

        let mut handles = vec![];

        for thread_id in 0..num_threads {
            let moves_played = Arc::clone(&total_moves_played);

            let handle = thread::spawn(move || {
                let mut rng = rand::rngs::StdRng::seed_from_u64(thread_id as u64);
                let mut thread_moves_played = 0u64;

                for _ in 0..games_per_thread {
                    let mut game = Game::with_options(Board::standard(), Color::White, 200);

                    while !game.is_over() {
                        let before = *game.board();
                        for color in Color::ALL {
                            let visible = game.visibility(color);
                            let mut expected = game.board().occupied_by(color);
                            for (sq, _) in game.board().pieces_of(color) {
                                expected.extend(game.moves_from(sq));
                            }
                            assert_eq!(visible, expected);
                        }
                        assert_eq!(game.board(), &before);

                        let legal_moves = game.legal_moves();
                        let Some(chosen) = legal_moves.choose(&mut rng) else {
                            break;
                        };
                        assert!(game.is_legal_move(chosen));
                        assert!(game.make_move(chosen).is_ok(), "failed {}", chosen);
                        thread_moves_played += 1;
                    }
                }

                moves_played.fetch_add(thread_moves_played, Ordering::Relaxed);
            });

            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(total_moves_played.load(Ordering::Relaxed) > 0);
    }
}
