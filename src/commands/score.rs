//! Score command implementation.
//!
//! For every requested chromosome that has catalog regions, accumulates the
//! per-base signal arrays from the fragment source and writes one profile row
//! per `(region, position)` pair. Chromosomes are emitted in request order.

use crate::accumulator::{accumulate, FragmentCounts};
use crate::catalog::RegionCatalog;
use crate::config::ScoreConfig;
use crate::error::Result;
use crate::fragment::FragmentSource;
use crate::genome::Genome;
use crate::join;
use crate::output::{CountsWriter, ProfileWriter};
use crate::parallel::map_chromosomes;
use log::{info, warn};
use std::fmt;
use std::io::Write;

/// Outcome of scoring one chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeSummary {
    pub chromosome: String,
    pub counts: FragmentCounts,
    /// Profile rows written for this chromosome.
    pub rows: u64,
}

/// Statistics from a score run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreStats {
    /// Processed chromosomes, in output order.
    pub chromosomes: Vec<ChromosomeSummary>,
    /// Requested chromosomes with no catalog region.
    pub skipped: Vec<String>,
}

impl ScoreStats {
    /// Total profile rows written.
    pub fn rows(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.rows).sum()
    }

    /// Write the per-chromosome QC counts table.
    pub fn write_counts<W: Write>(&self, sample: &str, output: W) -> Result<()> {
        let mut writer = CountsWriter::new(output);
        writer.write_header()?;
        for summary in &self.chromosomes {
            writer.write_counts(sample, &summary.chromosome, &summary.counts)?;
        }
        writer.flush()
    }
}

impl fmt::Display for ScoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fragments: u64 = self.chromosomes.iter().map(|c| c.counts.allfrag).sum();
        let scored: u64 = self.chromosomes.iter().map(|c| c.counts.allfrag_crit).sum();
        write!(
            f,
            "chromosomes={}, skipped={}, fragments={}, scored={}, rows={}",
            self.chromosomes.len(),
            self.skipped.len(),
            fragments,
            scored,
            self.rows()
        )
    }
}

/// Score command configuration.
#[derive(Debug, Clone)]
pub struct ScoreCommand {
    /// Sample identifier written in the first output column
    pub sample: String,
    /// Fragment-length bounds and protection window
    pub config: ScoreConfig,
    /// Chromosomes to process; defaults to the catalog's chromosomes
    pub chroms: Option<Vec<String>>,
    /// Worker threads; 1 processes chromosomes sequentially
    pub threads: usize,
}

impl ScoreCommand {
    pub fn new(sample: impl Into<String>) -> Self {
        Self {
            sample: sample.into(),
            config: ScoreConfig::default(),
            chroms: None,
            threads: 1,
        }
    }

    /// Chromosomes to process, in order, paired with their lengths.
    ///
    /// Requested chromosomes without catalog regions are skipped with a
    /// warning. A chromosome the fragment source does not know is fatal.
    fn plan(&self, catalog: &RegionCatalog, genome: &Genome) -> Result<(Vec<String>, Vec<String>)> {
        let requested: Vec<String> = match &self.chroms {
            Some(chroms) => chroms.clone(),
            None => catalog.chromosomes().map(str::to_string).collect(),
        };

        let mut planned = Vec::with_capacity(requested.len());
        let mut skipped = Vec::new();
        for chrom in requested {
            if !catalog.contains(&chrom) {
                warn!("Ignoring {}, since it does not appear in the region catalog", chrom);
                skipped.push(chrom);
                continue;
            }
            genome.require(&chrom)?;
            planned.push(chrom);
        }
        Ok((planned, skipped))
    }

    /// Score chromosomes one at a time from a single fragment source.
    pub fn run<S: FragmentSource, W: Write>(
        &self,
        source: &mut S,
        catalog: &RegionCatalog,
        output: &mut ProfileWriter<W>,
    ) -> Result<ScoreStats> {
        self.config.validate()?;
        let (planned, skipped) = self.plan(catalog, source.genome())?;

        output.write_header()?;
        let mut stats = ScoreStats {
            chromosomes: Vec::with_capacity(planned.len()),
            skipped,
        };

        for chrom in planned {
            let size = source.genome().require(&chrom)?;
            let (arrays, counts) = accumulate(source, &chrom, size, &self.config)?;

            let before = output.rows_written();
            for row in join::rows(&chrom, &arrays, catalog.regions_for(&chrom)) {
                output.write_row(&row)?;
            }
            let rows = output.rows_written() - before;

            info!("{}: {} rows ({})", chrom, rows, counts);
            stats.chromosomes.push(ChromosomeSummary {
                chromosome: chrom,
                counts,
                rows,
            });
        }

        output.flush()?;
        Ok(stats)
    }

    /// Score chromosomes on `self.threads` workers.
    ///
    /// `open` is called once to read the chromosome lengths and once per
    /// chromosome, so every worker reads from its own source. Output is
    /// identical to [`ScoreCommand::run`].
    pub fn run_parallel<S, F, W>(
        &self,
        open: F,
        catalog: &RegionCatalog,
        output: &mut ProfileWriter<W>,
    ) -> Result<ScoreStats>
    where
        S: FragmentSource,
        F: Fn() -> Result<S> + Sync + Send,
        W: Write,
    {
        self.config.validate()?;
        let genome = open()?.genome().clone();
        let (planned, skipped) = self.plan(catalog, &genome)?;

        let rendered = map_chromosomes(&planned, self.threads.max(1), |chrom| {
            let mut source = open()?;
            let size = genome.require(chrom)?;
            let (arrays, counts) = accumulate(&mut source, chrom, size, &self.config)?;

            let mut chunk = ProfileWriter::with_capacity(
                64 * 1024,
                Vec::with_capacity(64 * 1024),
                self.sample.as_str(),
            );
            for row in join::rows(chrom, &arrays, catalog.regions_for(chrom)) {
                chunk.write_row(&row)?;
            }
            let rows = chunk.rows_written();
            info!("{}: {} rows ({})", chrom, rows, counts);
            Ok((chunk.into_inner()?, counts, rows))
        })?;

        output.write_header()?;
        let mut stats = ScoreStats {
            chromosomes: Vec::with_capacity(planned.len()),
            skipped,
        };
        for (chrom, (bytes, counts, rows)) in planned.into_iter().zip(rendered) {
            output.write_bytes(&bytes, rows)?;
            stats.chromosomes.push(ChromosomeSummary {
                chromosome: chrom,
                counts,
                rows,
            });
        }

        output.flush()?;
        Ok(stats)
    }
}
