//! Console report for a finished batch.

use std::time::Duration;

use analysis_core::BatchOutcome;

/// Human-readable summary of one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn new(outcome: BatchOutcome, elapsed: Duration) -> Self {
        Self { outcome, elapsed }
    }

    /// Generate the report text.
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Centipawn Loss Report ===\n");
        report.push_str(&format!(
            "Games processed: {} ({} skipped)\n",
            self.outcome.games_processed, self.outcome.games_skipped
        ));
        report.push_str(&side_line(
            "White",
            self.outcome.summary.white_mean,
            self.outcome.summary.white_samples,
        ));
        report.push_str(&side_line(
            "Black",
            self.outcome.summary.black_mean,
            self.outcome.summary.black_samples,
        ));

        if let Some(tally) = &self.outcome.tally {
            report.push_str(&format!(
                "Draws: {}  White wins: {}  Black wins: {}\n",
                tally.draws, tally.white_wins, tally.black_wins
            ));
        }

        report.push_str(&format!("Elapsed: {:.2?}\n", self.elapsed));
        report
    }

    /// Print the report to stdout.
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

fn side_line(side: &str, mean: Option<f64>, samples: usize) -> String {
    match mean {
        Some(mean) => format!(
            "{} average centipawn loss: {} ({} moves)\n",
            side,
            mean.round() as i64,
            samples
        ),
        None => format!("{} average centipawn loss: n/a (0 moves)\n", side),
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
