//! nucprot: nucleoprotein protection profiles from paired-end fragments.
//!
//! This library turns the fragments of an indexed BAM into per-base signal
//! arrays (fragment depth, fragment-end susceptibility and windowed
//! protection scores, each with and without duplicates) and reports them for
//! every position of a catalog of regions of interest.
//!
//! # Example
//!
//! ```rust,no_run
//! use nucprot::{BamFragmentSource, ProfileWriter, RegionCatalog, ScoreCommand};
//!
//! let catalog = RegionCatalog::load("regions.tsv").unwrap();
//! let mut source = BamFragmentSource::open("S1/S1_dup.bam").unwrap();
//!
//! let stdout = std::io::stdout();
//! let mut writer = ProfileWriter::new(stdout.lock(), "S1");
//! let stats = ScoreCommand::new("S1")
//!     .run(&mut source, &catalog, &mut writer)
//!     .unwrap();
//! eprintln!("{}", stats);
//! ```

pub mod accumulator;
pub mod bam;
pub mod catalog;
pub mod chroms;
pub mod commands;
pub mod config;
pub mod error;
pub mod fragment;
pub mod genome;
pub mod join;
pub mod output;
pub mod parallel;
pub mod parsing;
pub mod region;

// Re-export commonly used types
pub use accumulator::{accumulate, ChromosomeAccumulator, FragmentCounts, SignalArrays};
pub use bam::BamFragmentSource;
pub use catalog::RegionCatalog;
pub use commands::ScoreCommand;
pub use config::ScoreConfig;
pub use error::{Result, ScoreError};
pub use fragment::{Fragment, FragmentSource, MemoryFragmentSource};
pub use output::ProfileWriter;
pub use region::Region;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accumulator::{accumulate, FragmentCounts, SignalArrays};
    pub use crate::catalog::RegionCatalog;
    pub use crate::commands::{ScoreCommand, ScoreStats};
    pub use crate::config::ScoreConfig;
    pub use crate::fragment::{Fragment, FragmentSource};
    pub use crate::join::SignalRow;
    pub use crate::region::Region;
}
