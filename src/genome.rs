//! Chromosome lengths exposed by a fragment source.

use crate::error::{Result, ScoreError};
use rust_htslib::bam::HeaderView;
use rustc_hash::FxHashMap;

/// Genome information containing chromosome sizes.
/// Preserves chromosome order from the source.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    /// Map of chromosome name to size
    sizes: FxHashMap<String, u64>,
    /// Chromosome order (preserves source order)
    order: Vec<String>,
}

impl Genome {
    /// Create an empty genome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the genome from the reference sequences of a BAM header.
    pub fn from_header(header: &HeaderView) -> Self {
        let mut genome = Self::new();
        for (tid, name) in header.target_names().into_iter().enumerate() {
            let size = header.target_len(tid as u32).unwrap_or(0);
            genome.insert(String::from_utf8_lossy(name).into_owned(), size);
        }
        genome
    }

    /// Get the size of a chromosome.
    #[inline]
    pub fn chrom_size(&self, chrom: &str) -> Option<u64> {
        self.sizes.get(chrom).copied()
    }

    /// Get the size of a chromosome that must be present.
    pub fn require(&self, chrom: &str) -> Result<u64> {
        self.chrom_size(chrom)
            .ok_or_else(|| ScoreError::MissingChromosome(chrom.to_string()))
    }

    /// Get all chromosome names in order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Get number of chromosomes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Insert a chromosome size (appends to order if new).
    pub fn insert(&mut self, chrom: String, size: u64) {
        if !self.sizes.contains_key(&chrom) {
            self.order.push(chrom.clone());
        }
        self.sizes.insert(chrom, size);
    }
}
