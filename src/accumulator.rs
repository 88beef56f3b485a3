//! Per-chromosome signal accumulation.
//!
//! Every qualifying fragment adds to four families of per-base counts:
//!
//! - **depth**: +1 over `[l, r)`
//! - **susceptibility**: +1 at each fragment end `l` and `r`
//! - **protection plus**: +1 over the protected core `[l + hw, r - hw)`
//! - **protection minus**: +1 over the end zones `[l - hw, l + hw)` and
//!   `[r - hw, r + hw)`, or over the whole padded footprint
//!   `[l - hw, r + hw)` when the fragment is shorter than the window
//!
//! Each family is kept twice, once for all fragments and once excluding
//! duplicates. Spans are clipped to the chromosome and empty spans are no-ops.

use crate::config::ScoreConfig;
use crate::error::Result;
use crate::fragment::{Fragment, FragmentSource};
use log::{debug, info};
use std::fmt;

/// Depth, susceptibility and protection counts for one duplicate policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalFamily {
    pub depth: Vec<u32>,
    pub suscp: Vec<u32>,
    pub protection_plus: Vec<u32>,
    pub protection_minus: Vec<u32>,
}

impl SignalFamily {
    fn new(size: usize) -> Self {
        Self {
            depth: vec![0; size],
            suscp: vec![0; size],
            protection_plus: vec![0; size],
            protection_minus: vec![0; size],
        }
    }

    /// Fold one fragment `[l, r)` into the family. Callers guarantee
    /// `0 <= l` and `r < size`.
    fn add(&mut self, l: i64, r: i64, hw: i64, window: i64) {
        let size = self.depth.len() as i64;

        increment(&mut self.depth, l, r);
        self.suscp[l as usize] += 1;
        self.suscp[r as usize] += 1;

        if r - l < window {
            increment(&mut self.protection_minus, (l - hw).max(0), (r + hw).min(size));
        } else {
            increment(&mut self.protection_plus, l + hw, r - hw);
            increment(&mut self.protection_minus, (l - hw).max(0), l + hw);
            increment(&mut self.protection_minus, r - hw, (r + hw).min(size));
        }
    }
}

/// Add one to every element of `values[start..end)`, ignoring empty spans.
#[inline]
fn increment(values: &mut [u32], start: i64, end: i64) {
    let start = start.max(0) as usize;
    let end = (end.max(0) as usize).min(values.len());
    if start >= end {
        return;
    }
    for v in &mut values[start..end] {
        *v += 1;
    }
}

/// Per-base signal arrays of one chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalArrays {
    /// Every fragment passing the length filter.
    pub all: SignalFamily,
    /// Fragments passing the length filter that are not duplicates.
    pub nodup: SignalFamily,
}

impl SignalArrays {
    /// Zeroed arrays for a chromosome of `size` bases.
    pub fn new(size: usize) -> Self {
        Self {
            all: SignalFamily::new(size),
            nodup: SignalFamily::new(size),
        }
    }

    /// Chromosome length the arrays cover.
    #[inline]
    pub fn len(&self) -> usize {
        self.all.depth.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all.depth.is_empty()
    }

    /// The eight signal values at one position, in output column order.
    #[inline]
    pub fn values_at(&self, pos: usize) -> SignalValues {
        SignalValues {
            frag_depth_all: self.all.depth[pos],
            frag_suscp_all: self.all.suscp[pos],
            frag_depth_nodup: self.nodup.depth[pos],
            frag_suscp_nodup: self.nodup.suscp[pos],
            protection_score_plus: self.all.protection_plus[pos],
            protection_score_minus: self.all.protection_minus[pos],
            protection_score_plus_nodup: self.nodup.protection_plus[pos],
            protection_score_minus_nodup: self.nodup.protection_minus[pos],
        }
    }
}

/// Signal values at a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalValues {
    pub frag_depth_all: u32,
    pub frag_suscp_all: u32,
    pub frag_depth_nodup: u32,
    pub frag_suscp_nodup: u32,
    pub protection_score_plus: u32,
    pub protection_score_minus: u32,
    pub protection_score_plus_nodup: u32,
    pub protection_score_minus_nodup: u32,
}

impl SignalValues {
    /// Values in output column order.
    pub fn as_array(&self) -> [u32; 8] {
        [
            self.frag_depth_all,
            self.frag_suscp_all,
            self.frag_depth_nodup,
            self.frag_suscp_nodup,
            self.protection_score_plus,
            self.protection_score_minus,
            self.protection_score_plus_nodup,
            self.protection_score_minus_nodup,
        ]
    }
}

/// Fragment tallies of one chromosome, used for QC.
///
/// `nodup` and `nodup_crit` count the duplicates that were seen, not the
/// fragments left after removing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FragmentCounts {
    /// In-bounds fragments of any length.
    pub allfrag: u64,
    /// In-bounds fragments passing the length filter.
    pub allfrag_crit: u64,
    /// Duplicates among `allfrag`.
    pub nodup: u64,
    /// Duplicates among `allfrag_crit`.
    pub nodup_crit: u64,
}

impl fmt::Display for FragmentCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allfrag={}, allfrag-crit={}, nodup={}, nodup-crit={}",
            self.allfrag, self.allfrag_crit, self.nodup, self.nodup_crit
        )
    }
}

/// Incremental accumulator for one chromosome.
pub struct ChromosomeAccumulator {
    config: ScoreConfig,
    size: i64,
    arrays: SignalArrays,
    counts: FragmentCounts,
}

impl ChromosomeAccumulator {
    /// Start accumulating a chromosome of `size` bases.
    pub fn new(size: u64, config: ScoreConfig) -> Self {
        Self {
            config,
            size: size as i64,
            arrays: SignalArrays::new(size as usize),
            counts: FragmentCounts::default(),
        }
    }

    /// Fold one fragment record into the arrays and counts.
    pub fn add(&mut self, fragment: &Fragment) {
        if !fragment.is_countable() {
            return;
        }

        let l = fragment.start;
        let r = fragment.end();
        if l < 0 || r < l || r >= self.size {
            return;
        }

        self.counts.allfrag += 1;
        if fragment.is_duplicate {
            self.counts.nodup += 1;
        }

        if !self.config.accepts_length(fragment.length) {
            return;
        }

        self.counts.allfrag_crit += 1;
        if fragment.is_duplicate {
            self.counts.nodup_crit += 1;
        }

        let hw = self.config.half_window;
        let window = self.config.window();
        self.arrays.all.add(l, r, hw, window);
        if !fragment.is_duplicate {
            self.arrays.nodup.add(l, r, hw, window);
        }
    }

    /// Finish the chromosome and hand over the arrays and counts.
    pub fn finish(self) -> (SignalArrays, FragmentCounts) {
        (self.arrays, self.counts)
    }
}

/// Accumulate all fragments of `chrom` from `source`.
pub fn accumulate<S: FragmentSource>(
    source: &mut S,
    chrom: &str,
    size: u64,
    config: &ScoreConfig,
) -> Result<(SignalArrays, FragmentCounts)> {
    info!("Processing {} ({} bp)", chrom, size);
    let mut accumulator = ChromosomeAccumulator::new(size, *config);

    debug!("Reading fragments on {}", chrom);
    source.visit_fragments(chrom, |fragment| accumulator.add(fragment))?;

    let (arrays, counts) = accumulator.finish();
    debug!("{}: {}", chrom, counts);
    Ok((arrays, counts))
}
