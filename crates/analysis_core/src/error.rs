//! Error taxonomy for the analysis pipeline.
//!
//! The split mirrors how failures are handled:
//! - `DecodeError` / `GameError` affect one game (log and skip)
//! - `EvalError::EngineDead` and `BatchError` end the whole batch

use thiserror::Error;

/// Failure reported by an evaluator.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// The engine could not produce a score for this position.
    /// Skips the current game; the batch continues.
    #[error("position cannot be analyzed: {0}")]
    Unanalyzable(String),

    /// The engine process is gone or its streams are broken.
    /// No further progress is possible; the batch must abort.
    #[error("engine process is unusable: {0}")]
    EngineDead(String),
}

impl EvalError {
    /// Whether this failure ends the batch rather than one game.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EvalError::EngineDead(_))
    }
}

/// A single recorded game failed to decode (bad tags, unparsable movetext).
#[derive(Debug, Clone, Error)]
#[error("malformed game record: {0}")]
pub struct DecodeError(pub String);

/// Failure while replaying or evaluating one game.
#[derive(Debug, Clone, Error)]
pub enum GameError {
    /// A recorded move could not be resolved or applied on the running board.
    #[error("illegal or unresolvable move `{san}` at ply {ply}")]
    IllegalMove { ply: usize, san: String },

    /// The evaluator failed on a position of this game.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl GameError {
    /// Whether this failure ends the batch rather than one game.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Eval(err) if err.is_fatal())
    }
}

/// Batch-level failure.
#[derive(Debug, Clone, Error)]
pub enum BatchError {
    /// The batch finished with zero loss samples; no mean can be reported.
    #[error("no loss samples were collected")]
    NoData,

    /// The evaluator process died mid-batch.
    #[error(transparent)]
    Engine(EvalError),
}
