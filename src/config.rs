//! Scoring parameters.
//!
//! All parameters are passed explicitly to the accumulator; nothing here is
//! process-wide state.

use crate::error::{Result, ScoreError};

/// Default minimum fragment length (inclusive).
pub const DEFAULT_FMIN: i64 = 100;

/// Default maximum fragment length (inclusive).
pub const DEFAULT_FMAX: i64 = 500;

/// Default protection half window. The full window is `2 * hw + 1` = 121 bp.
pub const DEFAULT_HALF_WINDOW: i64 = 60;

/// Fragment-length bounds and protection window used for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreConfig {
    /// Minimum fragment length contributing to the signal arrays.
    pub fmin: i64,
    /// Maximum fragment length contributing to the signal arrays.
    pub fmax: i64,
    /// Half width of the protection window around each fragment end.
    pub half_window: i64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            fmin: DEFAULT_FMIN,
            fmax: DEFAULT_FMAX,
            half_window: DEFAULT_HALF_WINDOW,
        }
    }
}

impl ScoreConfig {
    pub fn new(fmin: i64, fmax: i64, half_window: i64) -> Self {
        Self {
            fmin,
            fmax,
            half_window,
        }
    }

    /// Full protection window, `2 * half_window + 1`.
    #[inline]
    pub fn window(&self) -> i64 {
        2 * self.half_window + 1
    }

    /// Whether a fragment length passes the inclusive `[fmin, fmax]` filter.
    #[inline]
    pub fn accepts_length(&self, length: i64) -> bool {
        self.fmin <= length && length <= self.fmax
    }

    /// Reject parameter combinations that cannot produce a meaningful profile.
    pub fn validate(&self) -> Result<()> {
        if self.fmin < 0 {
            return Err(ScoreError::InvalidConfig(format!(
                "fmin must be non-negative, got {}",
                self.fmin
            )));
        }
        if self.fmin > self.fmax {
            return Err(ScoreError::InvalidConfig(format!(
                "fmin ({}) > fmax ({})",
                self.fmin, self.fmax
            )));
        }
        if self.half_window < 0 {
            return Err(ScoreError::InvalidConfig(format!(
                "half window must be non-negative, got {}",
                self.half_window
            )));
        }
        Ok(())
    }
}
