//! Catalog regions of interest.

use std::fmt;

/// Canonical chromosome prefix.
const CHROM_PREFIX: &str = "chr";

/// Normalize a chromosome name to the lowercase `chr` prefix.
///
/// Any case variant of the prefix (`Chr1`, `CHR1`) is rewritten; names
/// without the prefix are returned unchanged.
pub fn normalize_chrom(name: &str) -> String {
    match name.get(..CHROM_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(CHROM_PREFIX) => {
            format!("{}{}", CHROM_PREFIX, &name[CHROM_PREFIX.len()..])
        }
        _ => name.to_string(),
    }
}

/// A named region of interest.
///
/// Both bounds are inclusive: the region covers every position `p` with
/// `start <= p <= end`. A region with `start > end` is kept but covers nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub gene: String,
    pub category: String,
    /// `chrom:start:end:gene:category`, computed once at construction.
    pub region_id: String,
}

impl Region {
    /// Create a region, normalizing the chromosome name and deriving its id.
    pub fn new(
        chrom: &str,
        start: u64,
        end: u64,
        gene: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let chrom = normalize_chrom(chrom);
        let gene = gene.into();
        let category = category.into();
        let region_id = format!("{}:{}:{}:{}:{}", chrom, start, end, gene, category);
        Self {
            chrom,
            start,
            end,
            gene,
            category,
            region_id,
        }
    }

    /// Positions of this region that fall on a chromosome of length `chrom_len`,
    /// as a half-open range. Empty when the region is degenerate or lies past
    /// the chromosome end.
    #[inline]
    pub fn clipped_positions(&self, chrom_len: u64) -> std::ops::Range<u64> {
        let end_exclusive = self.end.saturating_add(1).min(chrom_len);
        if self.start >= end_exclusive {
            return 0..0;
        }
        self.start..end_exclusive
    }

    /// Number of positions the region spans before clipping.
    #[inline]
    pub fn len(&self) -> u64 {
        if self.start > self.end {
            0
        } else {
            self.end - self.start + 1
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom, self.start, self.end, self.gene, self.category, self.region_id
        )
    }
}
