//! Region catalog reader.
//!
//! The catalog is a headerless tab-separated table with five columns:
//! `chr, start, end, gene, category`. Additional columns are ignored.

use crate::error::{Result, ScoreError};
use crate::parsing::{parse_u64_fast, should_skip_line, split_fields, trim_line_end};
use crate::region::Region;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Number of columns every catalog line must provide.
const CATALOG_COLUMNS: usize = 5;

/// Regions of interest grouped by chromosome.
///
/// Region order within a chromosome and chromosome first-seen order are both
/// preserved from the input.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    by_chrom: FxHashMap<String, Vec<Region>>,
    order: Vec<String>,
}

impl RegionCatalog {
    /// Load a catalog from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a catalog from any readable source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let mut catalog = Self::default();
        let mut buffer = Vec::with_capacity(1024);
        let mut line_number = 0;

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;

            let line = trim_line_end(&buffer);
            if should_skip_line(line) {
                continue;
            }
            catalog.push(parse_region_line(line, line_number)?);
        }

        Ok(catalog)
    }

    /// Append a region, keeping chromosome first-seen order.
    pub fn push(&mut self, region: Region) {
        if !self.by_chrom.contains_key(&region.chrom) {
            self.order.push(region.chrom.clone());
        }
        self.by_chrom
            .entry(region.chrom.clone())
            .or_default()
            .push(region);
    }

    /// Regions on a chromosome, in input order. Empty for unknown chromosomes.
    pub fn regions_for(&self, chrom: &str) -> &[Region] {
        self.by_chrom.get(chrom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Chromosomes with at least one region, in first-seen order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Check if a chromosome has any region.
    #[inline]
    pub fn contains(&self, chrom: &str) -> bool {
        self.by_chrom.contains_key(chrom)
    }

    /// All regions, chromosome-major in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.order
            .iter()
            .flat_map(move |chrom| self.by_chrom[chrom].iter())
    }

    /// Total number of regions.
    pub fn len(&self) -> usize {
        self.by_chrom.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chrom.is_empty()
    }
}

/// Parse a catalog from a string (useful for testing).
pub fn parse_catalog(content: &str) -> Result<RegionCatalog> {
    RegionCatalog::from_reader(content.as_bytes())
}

/// Parse one non-comment catalog line.
fn parse_region_line(line: &[u8], line_number: usize) -> Result<Region> {
    let fields = split_fields::<CATALOG_COLUMNS>(line).map_err(|found| ScoreError::Format {
        line: line_number,
        message: format!(
            "Expected {} tab-separated columns (chr, start, end, gene, category), got {}",
            CATALOG_COLUMNS, found
        ),
    })?;

    let text = |field: &[u8], name: &str| -> Result<String> {
        std::str::from_utf8(field)
            .map(str::to_string)
            .map_err(|_| ScoreError::Format {
                line: line_number,
                message: format!("Column '{}' is not valid UTF-8", name),
            })
    };
    let position = |field: &[u8], name: &str| -> Result<u64> {
        parse_u64_fast(field).ok_or_else(|| ScoreError::Format {
            line: line_number,
            message: format!(
                "Invalid {} position: '{}'",
                name,
                String::from_utf8_lossy(field)
            ),
        })
    };

    let chrom = text(fields[0], "chr")?;
    if chrom.is_empty() {
        return Err(ScoreError::Format {
            line: line_number,
            message: "Empty chromosome name".to_string(),
        });
    }
    let start = position(fields[1], "start")?;
    let end = position(fields[2], "end")?;
    let gene = text(fields[3], "gene")?;
    let category = text(fields[4], "category")?;

    Ok(Region::new(&chrom, start, end, gene, category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let content = "chr1\t100\t200\tTP53\tpromoter\nchr2\t50\t60\tMYC\tenhancer\n";
        let catalog = parse_catalog(content).unwrap();

        assert_eq!(catalog.len(), 2);
        let regions = catalog.regions_for("chr1");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].start, 100);
        assert_eq!(regions[0].end, 200);
        assert_eq!(regions[0].region_id, "chr1:100:200:TP53:promoter");
    }

    #[test]
    fn test_mixed_case_chromosome() {
        let catalog = parse_catalog("Chr1\t10\t20\tg\tc\n").unwrap();
        assert!(catalog.contains("chr1"));
        assert!(!catalog.contains("Chr1"));
        assert_eq!(catalog.regions_for("chr1")[0].region_id, "chr1:10:20:g:c");
    }

    #[test]
    fn test_order_preserved() {
        let content = "chr2\t1\t2\ta\tx\nchr1\t5\t6\tb\tx\nchr2\t0\t1\tc\tx\n";
        let catalog = parse_catalog(content).unwrap();

        let chroms: Vec<&str> = catalog.chromosomes().collect();
        assert_eq!(chroms, vec!["chr2", "chr1"]);

        let genes: Vec<&str> = catalog
            .regions_for("chr2")
            .iter()
            .map(|r| r.gene.as_str())
            .collect();
        assert_eq!(genes, vec!["a", "c"]);

        let all: Vec<&str> = catalog.iter().map(|r| r.gene.as_str()).collect();
        assert_eq!(all, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_skip_comments_and_crlf() {
        let content = "# header comment\ntrack name=x\nchr1\t1\t2\tg\tc\r\n\n";
        let catalog = parse_catalog(content).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.regions_for("chr1")[0].category, "c");
    }

    #[test]
    fn test_missing_columns() {
        let result = parse_catalog("chr1\t100\t200\tTP53\n");
        match result {
            Err(ScoreError::Format { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_position() {
        let result = parse_catalog("chr1\t1\t2\tg\tc\nchr1\tstart\t200\tg\tc\n");
        match result {
            Err(ScoreError::Format { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("start"));
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_region_accepted() {
        let catalog = parse_catalog("chr1\t300\t200\tg\tc\n").unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.regions_for("chr1")[0].is_empty());
    }

    #[test]
    fn test_unknown_chromosome() {
        let catalog = parse_catalog("chr1\t1\t2\tg\tc\n").unwrap();
        assert!(catalog.regions_for("chr9").is_empty());
    }
}
