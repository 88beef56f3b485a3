// Clippy allows
#![allow(clippy::too_many_arguments)]

//! nucprot: nucleoprotein protection profiles
//!
//! Usage: nucprot <COMMAND> [OPTIONS]

use clap::{ArgAction, Parser, Subcommand};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use nucprot::chroms::parse_chrom_list;
use nucprot::config::{DEFAULT_FMAX, DEFAULT_FMIN, DEFAULT_HALF_WINDOW};
use nucprot::{BamFragmentSource, ProfileWriter, RegionCatalog, ScoreCommand, ScoreConfig, ScoreError};

#[derive(Parser)]
#[command(name = "nucprot")]
#[command(version)]
#[command(about = "Per-base nucleoprotein protection profiles from paired-end fragments", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-base profiles of a sample over the catalog regions
    Score {
        /// Sample identifier; the BAM is read from <input>/<sample>/<sample>_dup.bam
        sample: String,

        /// Region catalog (tab-separated: chr, start, end, gene, category)
        #[arg(short = 'r', long)]
        regions: PathBuf,

        /// Minimum fragment length
        #[arg(long, default_value_t = DEFAULT_FMIN)]
        fmin: i64,

        /// Maximum fragment length
        #[arg(long, default_value_t = DEFAULT_FMAX)]
        fmax: i64,

        /// Half width of the protection window (window = 2 * hw + 1)
        #[arg(long = "half-window", default_value_t = DEFAULT_HALF_WINDOW)]
        half_window: i64,

        /// Directory holding one sub-directory of BAM files per sample
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Directory receiving one sub-directory of results per sample
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Read this BAM file instead of the one under --input
        #[arg(long)]
        bam: Option<PathBuf>,

        /// Chromosomes to process, e.g. "1-22,X" (default: all catalog chromosomes)
        #[arg(long)]
        chroms: Option<String>,

        /// Number of chromosomes processed in parallel
        #[arg(long, short = 't', default_value_t = 1)]
        threads: usize,
    },

    /// Print the normalized region catalog with region identifiers
    Regions {
        /// Region catalog (tab-separated: chr, start, end, gene, category)
        catalog: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Score {
            sample,
            regions,
            fmin,
            fmax,
            half_window,
            input,
            output,
            bam,
            chroms,
            threads,
        } => run_score(
            sample,
            regions,
            ScoreConfig::new(fmin, fmax, half_window),
            input,
            output,
            bam,
            chroms,
            threads,
        ),

        Commands::Regions { catalog } => run_regions(catalog),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_score(
    sample: String,
    regions: PathBuf,
    config: ScoreConfig,
    input: PathBuf,
    output: PathBuf,
    bam: Option<PathBuf>,
    chroms: Option<String>,
    threads: usize,
) -> Result<(), ScoreError> {
    config.validate()?;
    let chroms = chroms.map(|list| parse_chrom_list(&list)).transpose()?;

    // The catalog must load cleanly before any chromosome is touched
    let catalog = RegionCatalog::load(&regions)?;
    info!(
        "Loaded {} regions on {} chromosomes from {}",
        catalog.len(),
        catalog.chromosomes().count(),
        regions.display()
    );

    let bam_path =
        bam.unwrap_or_else(|| input.join(&sample).join(format!("{}_dup.bam", sample)));
    info!("Reading fragments from {}", bam_path.display());
    let source = BamFragmentSource::open(&bam_path)?;

    let sample_dir = output.join(&sample);
    fs::create_dir_all(&sample_dir)?;
    let profile_path = sample_dir.join(format!("{}_profiles_updated.csv.gz", sample));
    let counts_path = sample_dir.join(format!("{}_counts.tsv", sample));

    let mut command = ScoreCommand::new(sample.as_str());
    command.config = config;
    command.chroms = chroms;
    command.threads = threads;

    let stats = write_atomically(&profile_path, |file| {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut writer = ProfileWriter::new(encoder, sample.as_str());
        let stats = if threads > 1 {
            // Workers open their own readers
            drop(source);
            command.run_parallel(|| BamFragmentSource::open(&bam_path), &catalog, &mut writer)?
        } else {
            let mut source = source;
            command.run(&mut source, &catalog, &mut writer)?
        };
        writer.into_inner()?.finish()?;
        Ok(stats)
    })?;

    write_atomically(&counts_path, |file| stats.write_counts(&sample, file))?;

    info!("Score stats: {}", stats);
    info!("Profiles written to {}", profile_path.display());
    info!("Counts written to {}", counts_path.display());
    Ok(())
}

/// Write `path` through a sibling `.partial` file that is renamed into place
/// only when `write` succeeds. On failure the partial file is removed.
fn write_atomically<T, F>(path: &Path, write: F) -> Result<T, ScoreError>
where
    F: FnOnce(File) -> Result<T, ScoreError>,
{
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    match write(File::create(&partial)?) {
        Ok(value) => {
            fs::rename(&partial, path)?;
            Ok(value)
        }
        Err(e) => {
            let _ = fs::remove_file(&partial);
            Err(e)
        }
    }
}

fn run_regions(catalog: PathBuf) -> Result<(), ScoreError> {
    let catalog = RegionCatalog::load(&catalog)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for region in catalog.iter() {
        writeln!(out, "{}", region)?;
    }
    out.flush()?;
    Ok(())
}
