//! Analyzer configuration.
//!
//! Everything the original workflow hardcoded is a setting here: engine
//! path, per-evaluation limits, the PGN path, self-play parameters, and
//! the partial-loss policy. Values come from an optional TOML file with
//! CLI flags layered on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use analysis_core::{BatchOptions, EvalLimits};
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub engine: EngineConfig,
    pub pgn: PgnConfig,
    pub selfplay: SelfPlayConfig,
    /// Keep losses already derived from a game that fails mid-replay
    /// (the historical behavior). `false` rolls failed games back.
    pub keep_partial_losses: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// UCI engine binary; a bare name resolves through PATH.
    pub path: PathBuf,
    /// Maximum search depth per evaluation.
    pub depth: u8,
    /// Time ceiling per evaluation, in milliseconds.
    pub movetime_ms: u64,
    /// `setoption` pairs applied at startup, e.g. `Threads = "1"`.
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PgnConfig {
    /// Recorded-game file for `analyzer pgn`.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelfPlayConfig {
    /// Number of random games for `analyzer selfplay`.
    pub games: u32,
    /// Half-move cap per self-play game.
    pub max_plies: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            pgn: PgnConfig::default(),
            selfplay: SelfPlayConfig::default(),
            keep_partial_losses: true,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            depth: 20,
            movetime_ms: 999_000,
            options: BTreeMap::new(),
        }
    }
}

impl Default for PgnConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("results.pgn"),
        }
    }
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            games: 50,
            max_plies: 120,
        }
    }
}

impl AnalyzerConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Per-evaluation limits from the engine settings.
    pub fn limits(&self) -> EvalLimits {
        EvalLimits::depth_and_time(
            self.engine.depth,
            Duration::from_millis(self.engine.movetime_ms),
        )
    }

    /// Batch policy; `tally` is enabled for recorded-game runs only.
    pub fn batch_options(&self, tally: bool) -> BatchOptions {
        BatchOptions {
            keep_partial_losses: self.keep_partial_losses,
            tally_declared_results: tally,
        }
    }
}

impl EngineConfig {
    /// Options as `setoption` pairs in stable order.
    pub fn option_pairs(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
