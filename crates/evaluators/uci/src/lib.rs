//! Position evaluator backed by an external UCI engine process.
//!
//! The engine is spawned once, lives for the whole batch, and is queried
//! strictly sequentially: `position fen …` + `go …`, then read `info`
//! lines until `bestmove`. The last score seen wins. Shutdown sends
//! `quit` and reaps the child; `Drop` guarantees this even when the
//! batch aborts, so the process never leaks across runs.
//!
//! UCI scores are relative to the side to move; they are negated for
//! Black-to-move positions so callers always get White's perspective.
//! Forced mates saturate to `±MATE_SCORE` (by mate sign, before the
//! perspective flip), so downstream clipping needs no mate special case.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use analysis_core::{EvalError, EvalLimits, Evaluator, MATE_SCORE};
use shakmaty::fen::Fen;
use shakmaty::{Chess, Color, EnPassantMode, Position};
use tracing::{debug, trace};

/// Score token from an `info` line, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawScore {
    /// Centipawns.
    Cp(i32),
    /// Moves until mate; non-positive means the mover is getting mated.
    Mate(i32),
}

/// Extract the score from a UCI `info` line, if it carries one.
pub fn parse_info_score(line: &str) -> Option<RawScore> {
    if !line.starts_with("info") {
        return None;
    }
    let mut words = line.split_whitespace();
    while let Some(word) = words.next() {
        if word == "score" {
            return match (words.next()?, words.next()?) {
                ("cp", value) => value.parse().ok().map(RawScore::Cp),
                ("mate", value) => value.parse().ok().map(RawScore::Mate),
                _ => None,
            };
        }
    }
    None
}

/// Convert a side-to-move relative score into White's-perspective
/// centipawns, saturating mates to `±MATE_SCORE`.
pub fn to_white_score(raw: RawScore, turn: Color) -> i32 {
    let mover = match raw {
        RawScore::Cp(cp) => cp,
        RawScore::Mate(n) => {
            if n > 0 {
                MATE_SCORE
            } else {
                // Includes `mate 0`: the side to move is checkmated.
                -MATE_SCORE
            }
        }
    };
    if turn == Color::White {
        mover
    } else {
        -mover
    }
}

/// Build the `go` line for the given limits. Sends both bounds; the
/// engine stops at whichever fires first. Never emits a bare `go`
/// (that would search forever).
fn go_command(limits: &EvalLimits) -> String {
    let limits = if limits.depth.is_none() && limits.movetime.is_none() {
        EvalLimits::default()
    } else {
        *limits
    };
    let mut command = String::from("go");
    if let Some(depth) = limits.depth {
        command.push_str(&format!(" depth {depth}"));
    }
    if let Some(movetime) = limits.movetime {
        command.push_str(&format!(" movetime {}", movetime.as_millis()));
    }
    command
}

/// A long-lived UCI engine process implementing `Evaluator`.
pub struct UciEvaluator {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    shut_down: bool,
}

impl UciEvaluator {
    /// Spawn the engine binary and complete the UCI handshake.
    pub fn spawn(path: &Path) -> Result<Self, EvalError> {
        Self::spawn_with_options(path, &[])
    }

    /// Spawn with `setoption` pairs applied before the first query
    /// (e.g. `Threads`, `Hash`).
    pub fn spawn_with_options(
        path: &Path,
        options: &[(String, String)],
    ) -> Result<Self, EvalError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                EvalError::EngineDead(format!("failed to start {}: {err}", path.display()))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EvalError::EngineDead("no stdin handle".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EvalError::EngineDead("no stdout handle".into()))?;

        let mut evaluator = Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
            shut_down: false,
        };

        evaluator.send("uci")?;
        evaluator.wait_for("uciok")?;
        for (name, value) in options {
            evaluator.send(&format!("setoption name {name} value {value}"))?;
        }
        evaluator.send("isready")?;
        evaluator.wait_for("readyok")?;

        debug!("engine ready: {}", path.display());
        Ok(evaluator)
    }

    /// Send `quit` and reap the child. Safe to call more than once;
    /// also run by `Drop` so the process cannot leak past the batch.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if self.send("quit").is_err() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }

    fn send(&mut self, command: &str) -> Result<(), EvalError> {
        trace!("-> {command}");
        writeln!(self.stdin, "{command}")
            .and_then(|_| self.stdin.flush())
            .map_err(|err| EvalError::EngineDead(format!("write to engine failed: {err}")))
    }

    fn read_line(&mut self) -> Result<String, EvalError> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .map_err(|err| EvalError::EngineDead(format!("read from engine failed: {err}")))?;
        if read == 0 {
            return Err(EvalError::EngineDead(
                "engine closed its output stream".into(),
            ));
        }
        trace!("<- {}", line.trim_end());
        Ok(line)
    }

    fn wait_for(&mut self, token: &str) -> Result<(), EvalError> {
        loop {
            if self.read_line()?.trim() == token {
                return Ok(());
            }
        }
    }
}

impl Evaluator for UciEvaluator {
    fn evaluate(&mut self, pos: &Chess, limits: &EvalLimits) -> Result<i32, EvalError> {
        let fen = Fen::from_position(pos.clone(), EnPassantMode::Legal);
        self.send(&format!("position fen {fen}"))?;
        self.send(&go_command(limits))?;

        let mut last_score = None;
        loop {
            let line = self.read_line()?;
            let line = line.trim();
            if let Some(raw) = parse_info_score(line) {
                last_score = Some(raw);
            } else if line.starts_with("bestmove") {
                return match last_score {
                    Some(raw) => Ok(to_white_score(raw, pos.turn())),
                    None => Err(EvalError::Unanalyzable(format!(
                        "engine returned `{line}` without a score"
                    ))),
                };
            }
        }
    }
}

impl Drop for UciEvaluator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
