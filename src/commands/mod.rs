//! Command implementations for nucprot.

pub mod score;

pub use score::{ChromosomeSummary, ScoreCommand, ScoreStats};
