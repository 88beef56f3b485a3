//! Chromosome list parsing.
//!
//! A list is comma-separated; each item is either a single chromosome
//! (`X`, `7`) or an inclusive numeric range (`1-22`). Every name gets the
//! `chr` prefix: `1-3,X` expands to `chr1, chr2, chr3, chrX`.

use crate::error::{Result, ScoreError};

/// Expand a chromosome list into prefixed chromosome names, keeping order.
pub fn parse_chrom_list(list: &str) -> Result<Vec<String>> {
    let mut chroms = Vec::new();
    for item in list.split(',').map(str::trim) {
        if item.is_empty() {
            return Err(ScoreError::InvalidArgument(format!(
                "Empty item in chromosome list '{}'",
                list
            )));
        }
        match item.split_once('-') {
            Some((from, to)) => {
                let (from, to) = (parse_bound(from, item)?, parse_bound(to, item)?);
                if from > to {
                    return Err(ScoreError::InvalidArgument(format!(
                        "Descending chromosome range '{}'",
                        item
                    )));
                }
                chroms.extend((from..=to).map(|n| format!("chr{}", n)));
            }
            None => chroms.push(format!("chr{}", item)),
        }
    }
    Ok(chroms)
}

fn parse_bound(bound: &str, item: &str) -> Result<u32> {
    bound.trim().parse().map_err(|_| {
        ScoreError::InvalidArgument(format!("Invalid chromosome range '{}'", item))
    })
}
