//! Error type shared by the catalog reader, fragment sources and the score command.

use std::io;
use thiserror::Error;

/// Errors that can abort a scoring run.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Region catalog format error at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("Chromosome '{0}' not found in the fragment source")]
    MissingChromosome(String),

    #[error("BAM error: {0}")]
    Bam(#[from] rust_htslib::errors::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
