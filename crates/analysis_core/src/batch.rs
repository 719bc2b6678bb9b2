//! Sequential batch driver.
//!
//! One game at a time, one position at a time, one blocking evaluator
//! call at a time. The per-game unit is `analyze_game`, a function with
//! an explicit `Result`; the driver owns the accumulator and decides what
//! to do with skipped games, so the partial-loss policy is a visible
//! choice here rather than an accident of error timing.

use shakmaty::{Chess, Position};
use tracing::{info, warn};

use crate::error::{BatchError, EvalError, GameError};
use crate::game::GameRecord;
use crate::limits::EvalLimits;
use crate::loss::{clip_evaluations, derive_losses, GameLosses, LossAccumulator, LossSummary};
use crate::tally::ResultTally;
use crate::{Evaluator, GameSource};

/// Policy knobs for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Keep the losses already derived from a game that fails mid-replay.
    /// `true` matches the historical behavior of this pipeline; `false`
    /// rolls the failed game back entirely.
    pub keep_partial_losses: bool,
    /// Count declared results into a win/draw/loss tally. Sources without
    /// declared results (self-play) contribute nothing either way.
    pub tally_declared_results: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            keep_partial_losses: true,
            tally_declared_results: true,
        }
    }
}

/// Successful analysis of one game.
#[derive(Debug, Clone)]
pub struct GameAnalysis {
    /// Signed per-move losses, one entry per ply.
    pub losses: GameLosses,
    /// Number of plies replayed.
    pub plies: usize,
}

/// A game that had to be skipped, with whatever losses its replayed
/// prefix produced. The driver merges or drops `partial` per policy.
#[derive(Debug, Clone)]
pub struct GameFailure {
    pub error: GameError,
    pub partial: GameLosses,
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Reduced per-side loss statistics.
    pub summary: LossSummary,
    /// Win/draw/loss counts, when tallying was enabled.
    pub tally: Option<ResultTally>,
    pub games_processed: u32,
    pub games_skipped: u32,
}

/// Replay one game from the starting position, evaluating every position
/// along the way, and derive its per-move losses.
///
/// The evaluation sequence has one entry per position: index 0 is the
/// start position, index i the position after move i. The sequence is
/// clipped to `±MATE_SCORE` before deltas are derived.
///
/// Any failure aborts this game only and reports the losses derived from
/// the prefix evaluated so far.
pub fn analyze_game(
    record: &GameRecord,
    evaluator: &mut dyn Evaluator,
    limits: &EvalLimits,
) -> Result<GameAnalysis, GameFailure> {
    let mut pos = Chess::default();
    let mut evals = Vec::with_capacity(record.moves.len() + 1);

    match evaluator.evaluate(&pos, limits) {
        Ok(score) => evals.push(score),
        Err(err) => return Err(partial_failure(err.into(), evals)),
    }

    for (index, san) in record.moves.iter().enumerate() {
        let ply = index + 1;
        let mv = match san.san.to_move(&pos) {
            Ok(mv) => mv,
            Err(_) => {
                return Err(partial_failure(
                    GameError::IllegalMove {
                        ply,
                        san: san.to_string(),
                    },
                    evals,
                ))
            }
        };
        pos = match pos.play(&mv) {
            Ok(next) => next,
            Err(_) => {
                return Err(partial_failure(
                    GameError::IllegalMove {
                        ply,
                        san: san.to_string(),
                    },
                    evals,
                ))
            }
        };
        match evaluator.evaluate(&pos, limits) {
            Ok(score) => evals.push(score),
            Err(err) => return Err(partial_failure(err.into(), evals)),
        }
    }

    clip_evaluations(&mut evals);
    Ok(GameAnalysis {
        losses: derive_losses(&evals),
        plies: record.moves.len(),
    })
}

fn partial_failure(error: GameError, mut evals: Vec<i32>) -> GameFailure {
    clip_evaluations(&mut evals);
    GameFailure {
        error,
        partial: derive_losses(&evals),
    }
}

/// Run a whole batch: walk the source, analyze each game, accumulate.
///
/// Per-game failures are logged and skipped. A dead engine aborts the
/// batch with `BatchError::Engine`. A batch that ends with zero loss
/// samples is `BatchError::NoData`, never a division by zero.
pub fn run_batch(
    source: &mut dyn GameSource,
    evaluator: &mut dyn Evaluator,
    limits: &EvalLimits,
    options: &BatchOptions,
) -> Result<BatchOutcome, BatchError> {
    let mut accumulator = LossAccumulator::new();
    let mut tally = options.tally_declared_results.then(ResultTally::new);
    let mut games_processed = 0u32;
    let mut games_skipped = 0u32;

    while let Some(next) = source.next_game() {
        let record = match next {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping record: {err}");
                games_skipped += 1;
                continue;
            }
        };

        info!("analyzing {}", record.summary());

        // Declared results count as soon as a game decodes; the tally is
        // independent of whether the replay succeeds.
        if let (Some(tally), Some(result)) = (tally.as_mut(), record.result) {
            tally.record(result);
        }

        match analyze_game(&record, evaluator, limits) {
            Ok(analysis) => {
                accumulator.merge(analysis.losses);
                games_processed += 1;
            }
            Err(failure) => {
                if let GameError::Eval(err @ EvalError::EngineDead(_)) = &failure.error {
                    return Err(BatchError::Engine(err.clone()));
                }
                warn!("skipping game: {}", failure.error);
                if options.keep_partial_losses {
                    accumulator.merge(failure.partial);
                }
                games_skipped += 1;
            }
        }
    }

    let summary = accumulator.summary();
    if !summary.has_data() {
        return Err(BatchError::NoData);
    }

    Ok(BatchOutcome {
        summary,
        tally,
        games_processed,
        games_skipped,
    })
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod batch_tests;
