//! Parallel processing utilities using Rayon.

use crate::error::{Result, ScoreError};
use rayon::prelude::*;

/// Run `f` on every chromosome on a dedicated pool of `threads` workers.
///
/// Results come back in the order of `chroms`. The first error aborts the
/// whole map.
pub fn map_chromosomes<F, T>(chroms: &[String], threads: usize, f: F) -> Result<Vec<T>>
where
    F: Fn(&str) -> Result<T> + Sync + Send,
    T: Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| ScoreError::InvalidConfig(format!("cannot start thread pool: {}", e)))?;

    pool.install(|| chroms.par_iter().map(|chrom| f(chrom)).collect())
}
