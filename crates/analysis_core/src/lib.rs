//! Core of the centipawn-loss batch analyzer.
//!
//! This crate provides:
//! - The `Evaluator` trait (external engine oracle) and `GameSource` trait
//! - Evaluation limits shared by all evaluator implementations
//! - The loss aggregation pipeline (clip, per-move deltas, batch reduction)
//! - The win/draw/loss tally over declared results
//! - The sequential batch driver tying the above together
//!
//! No I/O happens here; engine processes and game files live in the
//! `evaluators/*` and `sources/*` crates.

pub mod batch;
pub mod error;
pub mod game;
pub mod limits;
pub mod loss;
pub mod tally;

pub use batch::*;
pub use error::*;
pub use game::*;
pub use limits::*;
pub use loss::*;
pub use tally::*;

use shakmaty::Chess;

// =============================================================================
// Evaluator trait — implemented by all position oracles (UCI process, stubs)
// =============================================================================

/// A blocking position oracle.
///
/// One evaluation must complete before the next position is submitted;
/// implementations are queried strictly sequentially by the batch driver.
pub trait Evaluator {
    /// Score the position in centipawns from White's perspective.
    ///
    /// Forced mate for either side must be saturated to `±MATE_SCORE`
    /// before being returned, so callers never see unbounded values.
    ///
    /// # Arguments
    /// * `pos` - The position to evaluate
    /// * `limits` - Search effort bounds (depth and/or time)
    fn evaluate(&mut self, pos: &Chess, limits: &EvalLimits) -> Result<i32, EvalError>;
}

/// An ordered supply of games.
///
/// A decode failure is yielded as an `Err` item rather than ending the
/// stream: one malformed record never aborts the batch.
pub trait GameSource {
    /// Yield the next game, or `None` when the source is exhausted.
    fn next_game(&mut self) -> Option<Result<GameRecord, DecodeError>>;
}
