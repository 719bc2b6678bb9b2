//! Batch centipawn-loss analyzer.
//!
//! Ties the pieces together: a game source (PGN file or random
//! self-play), a UCI engine as the position oracle, and the loss
//! aggregation pipeline from `analysis_core`. Produces a console report
//! only; nothing is persisted.

pub mod config;
pub mod report;

pub use config::*;
pub use report::*;
