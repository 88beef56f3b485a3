//! Paired-end fragments and the sources that produce them.

use crate::error::Result;
use crate::genome::Genome;
use rustc_hash::FxHashMap;

/// One paired-end fragment as seen from one of its mates.
///
/// `start` is the 0-based leftmost mapped position and `length` the
/// template length, so the fragment spans `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fragment {
    pub start: i64,
    pub length: i64,
    pub is_duplicate: bool,
    pub is_secondary: bool,
    pub is_supplementary: bool,
    pub is_reverse: bool,
    pub is_proper_pair: bool,
}

impl Fragment {
    /// A forward-strand, properly paired, primary fragment.
    pub fn new(start: i64, length: i64) -> Self {
        Self {
            start,
            length,
            is_proper_pair: true,
            ..Self::default()
        }
    }

    /// Builder-style duplicate flag.
    pub fn duplicate(mut self, is_duplicate: bool) -> Self {
        self.is_duplicate = is_duplicate;
        self
    }

    /// Exclusive end of the fragment.
    #[inline]
    pub fn end(&self) -> i64 {
        self.start + self.length
    }

    /// Whether this record represents the fragment exactly once.
    ///
    /// Reverse mates, improper pairs and secondary or supplementary
    /// alignments would double-count or misplace a fragment already seen
    /// through its forward mate.
    #[inline]
    pub fn is_countable(&self) -> bool {
        !self.is_reverse && self.is_proper_pair && !self.is_secondary && !self.is_supplementary
    }
}

/// Anything that can stream the fragments of one chromosome.
///
/// Each call to [`FragmentSource::visit_fragments`] is a single forward pass
/// over the chromosome; it may be called again for another chromosome.
pub trait FragmentSource {
    /// Chromosome lengths known to the source.
    fn genome(&self) -> &Genome;

    /// Feed every fragment record on `chrom` to `visit`, in source order.
    fn visit_fragments<F>(&mut self, chrom: &str, visit: F) -> Result<()>
    where
        F: FnMut(&Fragment);
}

/// Fragment source backed by in-memory vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryFragmentSource {
    genome: Genome,
    fragments: FxHashMap<String, Vec<Fragment>>,
}

impl MemoryFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a chromosome and its length.
    pub fn add_chromosome(&mut self, chrom: impl Into<String>, size: u64) -> &mut Self {
        self.genome.insert(chrom.into(), size);
        self
    }

    /// Append a fragment to a chromosome.
    pub fn push(&mut self, chrom: &str, fragment: Fragment) -> &mut Self {
        self.fragments
            .entry(chrom.to_string())
            .or_default()
            .push(fragment);
        self
    }
}

impl FragmentSource for MemoryFragmentSource {
    fn genome(&self) -> &Genome {
        &self.genome
    }

    fn visit_fragments<F>(&mut self, chrom: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&Fragment),
    {
        if let Some(fragments) = self.fragments.get(chrom) {
            for fragment in fragments {
                visit(fragment);
            }
        }
        Ok(())
    }
}
