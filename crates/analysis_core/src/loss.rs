//! Centipawn-loss derivation and accumulation.
//!
//! The pipeline per game: clip the evaluation sequence to `±MATE_SCORE`,
//! derive one signed delta per move by parity, and append the raw deltas
//! to the batch-wide per-side lists. Flooring at zero happens exactly
//! once, in the final reduction (never per game), so transient negative
//! "losses" (engine-noise gains) stay in the lists until the end and only
//! then stop counting as negative loss.

/// Saturation value for forced-mate evaluations, and the symmetric bound
/// evaluation sequences are clipped to. Mate scores arrive already
/// saturated to this value, which makes clipping them a no-op.
pub const MATE_SCORE: i32 = 1000;

/// Clip a single evaluation to the closed range `[-MATE_SCORE, MATE_SCORE]`.
pub fn clip_score(score: i32) -> i32 {
    score.clamp(-MATE_SCORE, MATE_SCORE)
}

/// Clip a whole evaluation sequence in place. Idempotent.
pub fn clip_evaluations(evals: &mut [i32]) {
    for eval in evals.iter_mut() {
        *eval = clip_score(*eval);
    }
}

/// Floor a loss value at zero: a move can show no loss, never a negative one.
pub fn floor_at_zero(loss: i32) -> i32 {
    loss.max(0)
}

/// Per-move signed losses derived from one game's evaluation sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameLosses {
    pub white: Vec<i32>,
    pub black: Vec<i32>,
}

impl GameLosses {
    pub fn total_moves(&self) -> usize {
        self.white.len() + self.black.len()
    }
}

/// Derive per-move signed losses from a clipped evaluation sequence.
///
/// Index 0 is the starting position with White to move, so odd indices
/// are positions just after a White move and even indices (> 0) just
/// after a Black move:
/// - White's move at index i: loss = eval[i-1] - eval[i]
/// - Black's move at index i: loss = eval[i] - eval[i-1]
///
/// A game of N plies yields exactly N losses, ceil(N/2) for White and
/// floor(N/2) for Black. Deltas are kept signed here; flooring happens
/// in the batch reduction.
pub fn derive_losses(evals: &[i32]) -> GameLosses {
    let mut losses = GameLosses::default();
    for i in 1..evals.len() {
        let previous = evals[i - 1];
        let current = evals[i];
        if i % 2 == 1 {
            losses.white.push(previous - current);
        } else {
            losses.black.push(current - previous);
        }
    }
    losses
}

/// Batch-wide per-side loss lists.
///
/// Append-only across the whole batch; entries are never mutated after
/// being merged in, and are read once by `summary()` at the end. Owned
/// by the batch driver and passed explicitly, never global state.
#[derive(Debug, Clone, Default)]
pub struct LossAccumulator {
    white: Vec<i32>,
    black: Vec<i32>,
}

impl LossAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one game's losses (full or partial) to the batch lists.
    pub fn merge(&mut self, losses: GameLosses) {
        self.white.extend(losses.white);
        self.black.extend(losses.black);
    }

    pub fn white_samples(&self) -> usize {
        self.white.len()
    }

    pub fn black_samples(&self) -> usize {
        self.black.len()
    }

    pub fn is_empty(&self) -> bool {
        self.white.is_empty() && self.black.is_empty()
    }

    /// Final reduction: floor every entry at zero, then take the
    /// arithmetic mean of each list. A side with no samples gets `None`
    /// rather than a division by zero.
    pub fn summary(&self) -> LossSummary {
        LossSummary {
            white_mean: mean_floored(&self.white),
            black_mean: mean_floored(&self.black),
            white_samples: self.white.len(),
            black_samples: self.black.len(),
        }
    }
}

fn mean_floored(losses: &[i32]) -> Option<f64> {
    if losses.is_empty() {
        return None;
    }
    let sum: i64 = losses.iter().map(|&loss| floor_at_zero(loss) as i64).sum();
    Some(sum as f64 / losses.len() as f64)
}

/// Reduced per-side statistics for a whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LossSummary {
    /// Mean floored loss for White, `None` if White has no samples
    pub white_mean: Option<f64>,
    /// Mean floored loss for Black, `None` if Black has no samples
    pub black_mean: Option<f64>,
    pub white_samples: usize,
    pub black_samples: usize,
}

impl LossSummary {
    /// Whether any loss samples exist at all.
    pub fn has_data(&self) -> bool {
        self.white_samples > 0 || self.black_samples > 0
    }
}

#[cfg(test)]
#[path = "loss_tests.rs"]
mod loss_tests;
