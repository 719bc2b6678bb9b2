//! Centipawn-loss analyzer CLI.
//!
//! Analyze a PGN file of recorded games, or a batch of random self-play
//! games, with an external UCI engine as the evaluation oracle.
//!
//! ```bash
//! # Recorded games (win/draw/loss tally included)
//! analyzer pgn results.pgn --engine /usr/bin/stockfish --depth 20
//!
//! # Random self-play, loss pipeline only
//! analyzer selfplay --games 50 --max-plies 120
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use analysis_core::{run_batch, BatchError, GameSource};
use analyzer::{AnalyzerConfig, BatchReport};
use anyhow::Context;
use pgn_source::PgnSource;
use selfplay_source::SelfPlaySource;
use tracing_subscriber::EnvFilter;
use uci_evaluator::UciEvaluator;

fn print_usage() {
    println!("Centipawn-Loss Batch Analyzer");
    println!();
    println!("Usage:");
    println!("  analyzer pgn [FILE] [options]");
    println!("  analyzer selfplay [options]");
    println!();
    println!("Options:");
    println!("  --config FILE     TOML configuration file");
    println!("  --engine PATH     UCI engine binary (default: stockfish)");
    println!("  --depth D         search depth per evaluation (default: 20)");
    println!("  --movetime MS     time per evaluation in ms (default: 999000)");
    println!("  --games N         self-play game count (default: 50)");
    println!("  --max-plies N     self-play half-move cap (default: 120)");
    println!("  --drop-partial    roll back losses of games that fail mid-replay");
    println!();
    println!("Exit codes: 0 success, 1 fatal error, 2 no data collected.");
}

#[derive(Debug, Default)]
struct CliArgs {
    file: Option<PathBuf>,
    config_path: Option<PathBuf>,
    engine: Option<PathBuf>,
    depth: Option<u8>,
    movetime_ms: Option<u64>,
    games: Option<u32>,
    max_plies: Option<u32>,
    drop_partial: bool,
}

impl CliArgs {
    fn parse(args: &[String]) -> Self {
        let mut cli = Self::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => cli.config_path = next_value(args, &mut i).map(PathBuf::from),
                "--engine" | "-e" => cli.engine = next_value(args, &mut i).map(PathBuf::from),
                "--depth" | "-d" => {
                    cli.depth = next_value(args, &mut i).and_then(|v| parse_or_warn(&v, "--depth"))
                }
                "--movetime" | "-t" => {
                    cli.movetime_ms =
                        next_value(args, &mut i).and_then(|v| parse_or_warn(&v, "--movetime"))
                }
                "--games" | "-g" => {
                    cli.games = next_value(args, &mut i).and_then(|v| parse_or_warn(&v, "--games"))
                }
                "--max-plies" | "-m" => {
                    cli.max_plies =
                        next_value(args, &mut i).and_then(|v| parse_or_warn(&v, "--max-plies"))
                }
                "--drop-partial" => cli.drop_partial = true,
                other => {
                    if !other.starts_with('-') && cli.file.is_none() {
                        cli.file = Some(PathBuf::from(other));
                    } else {
                        eprintln!("Warning: ignoring unknown option {other}");
                    }
                }
            }
            i += 1;
        }
        cli
    }

    fn apply(&self, config: &mut AnalyzerConfig) {
        if let Some(engine) = &self.engine {
            config.engine.path = engine.clone();
        }
        if let Some(depth) = self.depth {
            config.engine.depth = depth;
        }
        if let Some(movetime) = self.movetime_ms {
            config.engine.movetime_ms = movetime;
        }
        if let Some(games) = self.games {
            config.selfplay.games = games;
        }
        if let Some(max_plies) = self.max_plies {
            config.selfplay.max_plies = max_plies;
        }
        if self.drop_partial {
            config.keep_partial_losses = false;
        }
    }
}

fn next_value(args: &[String], i: &mut usize) -> Option<String> {
    if *i + 1 < args.len() {
        *i += 1;
        Some(args[*i].clone())
    } else {
        None
    }
}

fn parse_or_warn<T: FromStr>(value: &str, flag: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("Warning: invalid value for {flag}: {value}");
            None
        }
    }
}

enum Mode {
    Pgn,
    SelfPlay,
}

fn try_run(mode: Mode, args: &[String]) -> anyhow::Result<()> {
    let cli = CliArgs::parse(args);
    let mut config = match &cli.config_path {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    cli.apply(&mut config);

    let (mut source, tally): (Box<dyn GameSource>, bool) = match mode {
        Mode::Pgn => {
            let path = cli.file.clone().unwrap_or_else(|| config.pgn.path.clone());
            println!("=== Centipawn loss analysis: {} ===", path.display());
            let source = PgnSource::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            (Box::new(source), true)
        }
        Mode::SelfPlay => {
            println!(
                "=== Centipawn loss analysis: {} random self-play games ===",
                config.selfplay.games
            );
            let source = SelfPlaySource::new(config.selfplay.games, config.selfplay.max_plies);
            (Box::new(source), false)
        }
    };
    println!(
        "Engine: {} (depth {}, movetime {} ms)",
        config.engine.path.display(),
        config.engine.depth,
        config.engine.movetime_ms
    );
    println!();

    let start = Instant::now();
    let mut evaluator =
        UciEvaluator::spawn_with_options(&config.engine.path, &config.engine.option_pairs())?;

    let result = run_batch(
        source.as_mut(),
        &mut evaluator,
        &config.limits(),
        &config.batch_options(tally),
    );

    // Release the engine on both paths; `Drop` backstops early returns.
    evaluator.shutdown();

    let outcome = result?;
    BatchReport::new(outcome, start.elapsed()).print_report();
    Ok(())
}

fn run(mode: Mode, args: &[String]) -> i32 {
    match try_run(mode, args) {
        Ok(()) => 0,
        Err(err) => match err.downcast_ref::<BatchError>() {
            Some(BatchError::NoData) => {
                eprintln!("{err}");
                2
            }
            _ => {
                eprintln!("Error: {err:#}");
                1
            }
        },
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let code = match args[1].as_str() {
        "pgn" => run(Mode::Pgn, &args[2..]),
        "selfplay" => run(Mode::SelfPlay, &args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            1
        }
    };
    std::process::exit(code);
}
