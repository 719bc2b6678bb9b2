//! Win/draw/loss tally over declared game results.

use crate::game::DeclaredResult;

/// Counts of declared results across a batch of recorded games.
///
/// Classification uses only the header-declared outcome. Every encoding
/// other than `1-0` and `0-1` is counted as a draw, including `*`
/// (unterminated) games. The draw bucket therefore overcounts; this is
/// the documented fallback policy, not something to silently fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultTally {
    pub white_wins: u32,
    pub black_wins: u32,
    pub draws: u32,
}

impl ResultTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one declared result into exactly one bucket.
    pub fn record(&mut self, result: DeclaredResult) {
        match result {
            DeclaredResult::WhiteWins => self.white_wins += 1,
            DeclaredResult::BlackWins => self.black_wins += 1,
            DeclaredResult::Other => self.draws += 1,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.white_wins + self.black_wins + self.draws
    }
}

#[cfg(test)]
#[path = "tally_tests.rs"]
mod tally_tests;
