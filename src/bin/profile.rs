//! Random self-play under fog, for profiling with `--features hotpath`.
//!
//! Usage: `profile [games] [seed]`

use fog_chess::game::Game;
use fog_chess::outcome::GameOutcome;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[hotpath::measure]
fn play_one(rng: &mut StdRng) -> (Option<GameOutcome>, usize) {
    let mut game = Game::new();
    while !game.is_over() {
        // Both sides look at the board every ply, as a client would
        let _white = game.observation(fog_chess::Color::White);
        let _black = game.observation(fog_chess::Color::Black);

        let moves = game.legal_moves();
        let Some(mv) = moves.choose(rng) else {
            break;
        };
        if game.make_move(mv).is_err() {
            break;
        }
    }
    (game.outcome(), game.move_count())
}

#[hotpath::main]
fn main() {
    let mut args = std::env::args().skip(1);
    let games: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(1_000);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut white, mut black, mut draws, mut plies) = (0usize, 0usize, 0usize, 0usize);

    for _ in 0..games {
        let (outcome, moves) = play_one(&mut rng);
        plies += moves;
        match outcome {
            Some(GameOutcome::WhiteWin) => white += 1,
            Some(GameOutcome::BlackWin) => black += 1,
            _ => draws += 1,
        }
    }

    println!(
        "games: {}  white: {}  black: {}  draws/unfinished: {}  avg plies: {:.1}",
        games,
        white,
        black,
        draws,
        plies as f64 / games.max(1) as f64
    );
}
