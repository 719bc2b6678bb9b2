//! Evaluation limits shared by all evaluator implementations.

use std::time::Duration;

/// Bounds on search effort for a single evaluation.
///
/// Evaluators should respect both bounds, stopping at whichever is
/// reached first. UCI engines get both on the `go` line and apply their
/// own engine-defined precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalLimits {
    /// Maximum search depth in plies (None = engine default)
    pub depth: Option<u8>,
    /// Maximum time per evaluation (None = no time bound)
    pub movetime: Option<Duration>,
}

impl EvalLimits {
    /// Limits with only a depth constraint.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: Some(depth),
            movetime: None,
        }
    }

    /// Limits with only a time constraint.
    pub fn time(movetime: Duration) -> Self {
        Self {
            depth: None,
            movetime: Some(movetime),
        }
    }

    /// Limits with both depth and time constraints.
    pub fn depth_and_time(depth: u8, movetime: Duration) -> Self {
        Self {
            depth: Some(depth),
            movetime: Some(movetime),
        }
    }
}

impl Default for EvalLimits {
    /// Depth 20 with a 999 second ceiling per evaluation.
    fn default() -> Self {
        Self::depth_and_time(20, Duration::from_secs(999))
    }
}
