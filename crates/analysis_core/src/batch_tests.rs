use super::*;
use crate::error::DecodeError;
use crate::game::DeclaredResult;
use crate::loss::MATE_SCORE;
use shakmaty::san::SanPlus;
use std::collections::VecDeque;

/// Evaluator that replays a fixed script of responses, one per call.
struct ScriptedEvaluator {
    responses: VecDeque<Result<i32, EvalError>>,
}

impl ScriptedEvaluator {
    fn new(responses: Vec<Result<i32, EvalError>>) -> Self {
        Self {
            responses: responses.into(),
        }
    }

    fn scores(scores: &[i32]) -> Self {
        Self::new(scores.iter().map(|&s| Ok(s)).collect())
    }
}

impl Evaluator for ScriptedEvaluator {
    fn evaluate(&mut self, _pos: &Chess, _limits: &EvalLimits) -> Result<i32, EvalError> {
        self.responses
            .pop_front()
            .unwrap_or(Err(EvalError::Unanalyzable("script exhausted".into())))
    }
}

struct VecSource {
    games: VecDeque<Result<GameRecord, DecodeError>>,
}

impl VecSource {
    fn new(games: Vec<Result<GameRecord, DecodeError>>) -> Self {
        Self {
            games: games.into(),
        }
    }
}

impl GameSource for VecSource {
    fn next_game(&mut self) -> Option<Result<GameRecord, DecodeError>> {
        self.games.pop_front()
    }
}

fn record(moves: &[&str], result: Option<DeclaredResult>) -> GameRecord {
    GameRecord {
        tags: Vec::new(),
        moves: moves
            .iter()
            .map(|san| san.parse::<SanPlus>().unwrap())
            .collect(),
        result,
    }
}

#[test]
fn analyze_game_produces_one_loss_per_ply() {
    let game = record(&["e4", "e5", "Nf3"], None);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 50, 20, 80]);

    let analysis = analyze_game(&game, &mut evaluator, &EvalLimits::depth(1)).unwrap();
    assert_eq!(analysis.plies, 3);
    assert_eq!(analysis.losses.white, vec![-50, -60]);
    assert_eq!(analysis.losses.black, vec![-30]);
}

#[test]
fn analyze_game_clips_before_deriving() {
    // Mate sentinel and an out-of-range score both saturate to 1000, so
    // the White delta between them is zero.
    let game = record(&["e4"], None);
    let mut evaluator = ScriptedEvaluator::scores(&[4500, MATE_SCORE]);

    let analysis = analyze_game(&game, &mut evaluator, &EvalLimits::depth(1)).unwrap();
    assert_eq!(analysis.losses.white, vec![0]);
}

#[test]
fn illegal_move_skips_game_and_reports_partial() {
    // Ke7 is unresolvable for Black after 1. e4.
    let game = record(&["e4", "Ke7"], None);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 100]);

    let failure = analyze_game(&game, &mut evaluator, &EvalLimits::depth(1)).unwrap_err();
    assert!(matches!(
        failure.error,
        GameError::IllegalMove { ply: 2, .. }
    ));
    // The prefix [0, 100] still derives White's first-move delta.
    assert_eq!(failure.partial.white, vec![-100]);
    assert!(failure.partial.black.is_empty());
}

#[test]
fn run_batch_keeps_partials_by_default() {
    let mut source = VecSource::new(vec![
        Ok(record(&["e4", "Ke7"], None)),
        Ok(record(&["d4"], None)),
    ]);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 100, 0, 30]);

    let outcome = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.games_processed, 1);
    assert_eq!(outcome.games_skipped, 1);
    // One partial White sample from the failed game plus one from d4.
    assert_eq!(outcome.summary.white_samples, 2);
    assert_eq!(outcome.summary.black_samples, 0);
}

#[test]
fn run_batch_can_roll_back_failed_games() {
    let mut source = VecSource::new(vec![Ok(record(&["e4", "Ke7"], None))]);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 100]);
    let options = BatchOptions {
        keep_partial_losses: false,
        ..Default::default()
    };

    let result = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &options,
    );
    // The only game rolled back, so the batch has no samples at all.
    assert!(matches!(result, Err(BatchError::NoData)));
}

#[test]
fn unanalyzable_position_skips_only_that_game() {
    let mut source = VecSource::new(vec![
        Ok(record(&["e4"], None)),
        Ok(record(&["d4"], None)),
    ]);
    let mut evaluator = ScriptedEvaluator::new(vec![
        Err(EvalError::Unanalyzable("no score".into())),
        Ok(0),
        Ok(25),
    ]);

    let outcome = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.games_processed, 1);
    assert_eq!(outcome.games_skipped, 1);
    assert_eq!(outcome.summary.white_samples, 1);
}

#[test]
fn dead_engine_aborts_the_batch() {
    let mut source = VecSource::new(vec![
        Ok(record(&["e4"], None)),
        Ok(record(&["d4"], None)),
    ]);
    let mut evaluator = ScriptedEvaluator::new(vec![
        Ok(0),
        Err(EvalError::EngineDead("broken pipe".into())),
    ]);

    let result = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &BatchOptions::default(),
    );
    assert!(matches!(result, Err(BatchError::Engine(_))));
}

#[test]
fn malformed_records_are_skipped_softly() {
    let mut source = VecSource::new(vec![
        Err(DecodeError("bad tag section".into())),
        Ok(record(&["e4"], None)),
    ]);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 40]);

    let outcome = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.games_processed, 1);
    assert_eq!(outcome.games_skipped, 1);
}

#[test]
fn tally_counts_declared_results_only() {
    let mut source = VecSource::new(vec![
        Ok(record(&["e4"], Some(DeclaredResult::WhiteWins))),
        Ok(record(&[], Some(DeclaredResult::BlackWins))),
        Ok(record(&[], Some(DeclaredResult::WhiteWins))),
        Ok(record(&[], Some(DeclaredResult::Other))),
        // Self-play style record: no declared result, not tallied.
        Ok(record(&[], None)),
    ]);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 40, 0, 0, 0, 0]);

    let outcome = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &BatchOptions::default(),
    )
    .unwrap();

    let tally = outcome.tally.unwrap();
    assert_eq!(tally.white_wins, 2);
    assert_eq!(tally.black_wins, 1);
    assert_eq!(tally.draws, 1);
    assert_eq!(tally.total_games(), 4);
}

#[test]
fn tally_counts_games_that_fail_replay() {
    // The first game is declared 1-0 but dies at ply 2. Its result still
    // counts; only the loss samples are affected by the failure.
    let mut source = VecSource::new(vec![
        Ok(record(&["e4", "Ke7"], Some(DeclaredResult::WhiteWins))),
        Ok(record(&["d4"], Some(DeclaredResult::BlackWins))),
    ]);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 100, 0, 30]);

    let outcome = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.games_processed, 1);
    assert_eq!(outcome.games_skipped, 1);
    let tally = outcome.tally.unwrap();
    assert_eq!(tally.white_wins, 1);
    assert_eq!(tally.black_wins, 1);
    assert_eq!(tally.total_games(), 2);
}

#[test]
fn tally_can_be_disabled() {
    let mut source = VecSource::new(vec![Ok(record(&["e4"], Some(DeclaredResult::WhiteWins)))]);
    let mut evaluator = ScriptedEvaluator::scores(&[0, 40]);
    let options = BatchOptions {
        tally_declared_results: false,
        ..Default::default()
    };

    let outcome = run_batch(
        &mut source,
        &mut evaluator,
        &EvalLimits::depth(1),
        &options,
    )
    .unwrap();
    assert!(outcome.tally.is_none());
}
