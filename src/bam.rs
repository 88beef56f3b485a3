//! Indexed BAM fragment source.

use crate::error::{Result, ScoreError};
use crate::fragment::{Fragment, FragmentSource};
use crate::genome::Genome;
use log::debug;
use rust_htslib::bam::{self, Read};
use std::path::{Path, PathBuf};

impl From<&bam::Record> for Fragment {
    /// Fragment seen through one alignment record: the record's leftmost
    /// position and its signed template length.
    fn from(record: &bam::Record) -> Self {
        Self {
            start: record.pos(),
            length: record.insert_size(),
            is_duplicate: record.is_duplicate(),
            is_secondary: record.is_secondary(),
            is_supplementary: record.is_supplementary(),
            is_reverse: record.is_reverse(),
            is_proper_pair: record.is_proper_pair(),
        }
    }
}

/// Fragment source reading a coordinate-sorted, indexed BAM file.
pub struct BamFragmentSource {
    path: PathBuf,
    reader: bam::IndexedReader,
    genome: Genome,
}

impl BamFragmentSource {
    /// Open a BAM file and its index.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = bam::IndexedReader::from_path(&path)?;
        let genome = Genome::from_header(reader.header());
        debug!(
            "Opened {} with {} reference sequences",
            path.display(),
            genome.len()
        );
        Ok(Self {
            path,
            reader,
            genome,
        })
    }
}

impl FragmentSource for BamFragmentSource {
    fn genome(&self) -> &Genome {
        &self.genome
    }

    fn visit_fragments<F>(&mut self, chrom: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&Fragment),
    {
        let tid = self
            .reader
            .header()
            .tid(chrom.as_bytes())
            .ok_or_else(|| ScoreError::MissingChromosome(chrom.to_string()))?;
        debug!("Fetching {} from {}", chrom, self.path.display());
        self.reader.fetch(tid)?;

        let mut record = bam::Record::new();
        while let Some(result) = self.reader.read(&mut record) {
            result?;
            visit(&Fragment::from(&record));
        }
        Ok(())
    }
}
