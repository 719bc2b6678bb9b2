//! Self-play game source.
//!
//! Generates a fixed count of games from the starting position, each move
//! drawn uniformly at random from the legal moves. A game ends at a
//! terminal position, when the halfmove clock reaches a rule-based draw,
//! or at the ply cap, whichever comes first. Useful for exercising the
//! evaluation pipeline without any recorded games.
//!
//! Self-play records carry no declared result: they feed the loss
//! pipeline only and are excluded from the win/draw/loss tally.

use analysis_core::{DecodeError, GameRecord, GameSource};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shakmaty::san::SanPlus;
use shakmaty::{Chess, Position};
use tracing::debug;

/// Default number of generated games.
pub const DEFAULT_GAMES: u32 = 50;
/// Default cap on half-moves per game.
pub const DEFAULT_MAX_PLIES: u32 = 120;

/// Generates random self-play games.
#[derive(Debug)]
pub struct SelfPlaySource {
    remaining: u32,
    max_plies: u32,
    game_index: u32,
    rng: StdRng,
}

impl SelfPlaySource {
    /// Source yielding `games` games capped at `max_plies` half-moves each.
    pub fn new(games: u32, max_plies: u32) -> Self {
        Self {
            remaining: games,
            max_plies,
            game_index: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(games: u32, max_plies: u32, seed: u64) -> Self {
        Self {
            remaining: games,
            max_plies,
            game_index: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn generate(&mut self) -> GameRecord {
        let mut pos = Chess::default();
        let mut moves: Vec<SanPlus> = Vec::new();

        while (moves.len() as u32) < self.max_plies {
            // Rule-based stop: terminal position or a stale halfmove clock.
            if pos.is_game_over() || pos.halfmoves() >= 100 {
                break;
            }
            let legal = pos.legal_moves();
            let mv = match legal.choose(&mut self.rng) {
                Some(mv) => mv.clone(),
                None => break,
            };
            moves.push(SanPlus::from_move_and_play_unchecked(&mut pos, &mv));
        }

        self.game_index += 1;
        debug!("generated self-play game {} ({} plies)", self.game_index, moves.len());

        GameRecord {
            tags: vec![
                ("Event".to_string(), "Self-play".to_string()),
                ("Round".to_string(), self.game_index.to_string()),
            ],
            moves,
            result: None,
        }
    }
}

impl Default for SelfPlaySource {
    fn default() -> Self {
        Self::new(DEFAULT_GAMES, DEFAULT_MAX_PLIES)
    }
}

impl GameSource for SelfPlaySource {
    fn next_game(&mut self) -> Option<Result<GameRecord, DecodeError>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(Ok(self.generate()))
    }
}
