use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::color::Color;
use crate::movegen::reachable;

/// Squares `color` can see under fog of war.
///
/// That is every square holding one of its pieces, plus every square one of
/// those pieces could move to (captures included). Reachability is exactly
/// [`generate_moves`](crate::movegen::generate_moves): a pawn's empty
/// diagonal is not seen.
#[hotpath::measure]
pub fn compute_visibility(board: &Board, color: Color) -> Bitboard {
    let mut visible = Bitboard::empty();
    for (square, _) in board.pieces_of(color) {
        visible.insert(square);
        visible |= reachable(board, square);
    }
    visible
}

/// Opponent pieces that `color` can currently see.
pub fn visible_enemies(board: &Board, color: Color) -> Bitboard {
    compute_visibility(board, color) & board.occupied_by(color.opposite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::generate_moves;
    use crate::piece::{Piece, PieceKind};
    use crate::square::Square;
    use rand::prelude::IndexedRandom;
    use rand::SeedableRng;

    fn random_board(seed: u64) -> Board {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut choices: Vec<Option<Piece>> = vec![None; 30];
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                choices.push(Some(Piece::new(kind, color)));
            }
        }
        let mut board = Board::new();
        for sq in Square::all() {
            board.set_piece(sq, choices.choose(&mut rng).copied().flatten());
        }
        board
    }

    // The rule written out the slow way: own squares plus every generated move.
    fn union_of_moves(board: &Board, color: Color) -> Bitboard {
        let mut expected = Bitboard::empty();
        for sq in Square::all() {
            if let Some(piece) = board.get_piece(sq) {
                if piece.color == color {
                    expected.insert(sq);
                    expected.extend(generate_moves(board, sq));
                }
            }
        }
        expected
    }

    #[test]
    fn test_opening_visibility_white() {
        let board = Board::standard();
        let visible = compute_visibility(&board, Color::White);

        // 16 own squares and 16 pawn advances; knight targets overlap the advances
        assert_eq!(visible.count(), 32);
        assert!(visible.is_superset(board.occupied_by(Color::White)));
        for col in 0..8 {
            assert!(visible.contains(Square::at(5, col)));
            assert!(visible.contains(Square::at(4, col)));
            assert!(!visible.contains(Square::at(3, col)));
        }
        assert!((visible & board.occupied_by(Color::Black)).is_empty());
        assert!(visible_enemies(&board, Color::White).is_empty());
    }

    #[test]
    fn test_opening_visibility_black_mirrors_white() {
        let board = Board::standard();
        let visible = compute_visibility(&board, Color::Black);
        assert_eq!(visible.count(), 32);
        for col in 0..8 {
            assert!(visible.contains(Square::at(2, col)));
            assert!(visible.contains(Square::at(3, col)));
            assert!(!visible.contains(Square::at(4, col)));
        }
    }

    #[test]
    fn test_empty_board_sees_nothing() {
        let board = Board::new();
        assert!(compute_visibility(&board, Color::White).is_empty());
        assert!(compute_visibility(&board, Color::Black).is_empty());
    }

    #[test]
    fn test_enemy_visible_only_when_reachable() {
        let mut board = Board::new();
        board.set_piece(
            Square::at(3, 3),
            Some(Piece::new(PieceKind::Rook, Color::White)),
        );
        board.set_piece(
            Square::at(3, 6),
            Some(Piece::new(PieceKind::Pawn, Color::Black)),
        );
        board.set_piece(
            Square::at(3, 7),
            Some(Piece::new(PieceKind::King, Color::Black)),
        );

        let visible = compute_visibility(&board, Color::White);
        assert!(visible.contains(Square::at(3, 6)));
        // Behind the pawn: hidden even though it lies on the same line
        assert!(!visible.contains(Square::at(3, 7)));
        assert_eq!(
            visible_enemies(&board, Color::White),
            Bitboard::single(Square::at(3, 6))
        );
    }

    #[test]
    fn test_pawn_empty_diagonal_is_not_visible() {
        let mut board = Board::new();
        board.set_piece(
            Square::at(4, 4),
            Some(Piece::new(PieceKind::Pawn, Color::White)),
        );
        let visible = compute_visibility(&board, Color::White);
        assert_eq!(
            visible,
            [Square::at(4, 4), Square::at(3, 4)]
                .into_iter()
                .collect::<Bitboard>()
        );
    }

    #[test]
    fn test_boxed_in_piece_still_sees_itself() {
        let mut board = Board::new();
        let king = Square::at(0, 0);
        board.set_piece(king, Some(Piece::new(PieceKind::King, Color::Black)));
        for sq in [Square::at(0, 1), Square::at(1, 0), Square::at(1, 1)] {
            board.set_piece(sq, Some(Piece::new(PieceKind::Rook, Color::Black)));
        }
        assert!(generate_moves(&board, king).is_empty());
        assert!(compute_visibility(&board, Color::Black).contains(king));
    }

    #[test]
    fn test_visibility_equals_union_on_random_boards() {
        for seed in 0..100 {
            let board = random_board(seed);
            for color in Color::ALL {
                let visible = compute_visibility(&board, color);
                assert_eq!(visible, union_of_moves(&board, color), "\n{}", board);
                assert!(visible.is_superset(board.occupied_by(color)));
            }
        }
    }

    #[test]
    fn test_visibility_is_idempotent_and_pure() {
        for seed in 500..520 {
            let board = random_board(seed);
            let before = board;
            for color in Color::ALL {
                let first = compute_visibility(&board, color);
                let second = compute_visibility(&board, color);
                assert_eq!(first, second);
            }
            assert_eq!(board, before);
        }
    }
}
