//! Join per-base signal arrays against catalog regions.

use crate::accumulator::{SignalArrays, SignalValues};
use crate::region::Region;

/// One output row: the signal at `position` reported for `region_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalRow<'a> {
    pub chromosome: &'a str,
    pub position: u64,
    pub values: SignalValues,
    pub region_id: &'a str,
}

/// Rows for every `(region, position)` pair on one chromosome.
///
/// Regions are visited in the order given and positions ascend within each
/// region. Region bounds are inclusive; positions past the chromosome end are
/// dropped, so degenerate or out-of-range regions produce no rows.
/// Overlapping regions each report the shared positions.
pub fn rows<'a>(
    chromosome: &'a str,
    arrays: &'a SignalArrays,
    regions: &'a [Region],
) -> impl Iterator<Item = SignalRow<'a>> + 'a {
    let chrom_len = arrays.len() as u64;
    regions.iter().flat_map(move |region| {
        region
            .clipped_positions(chrom_len)
            .map(move |position| SignalRow {
                chromosome,
                position,
                values: arrays.values_at(position as usize),
                region_id: &region.region_id,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::ChromosomeAccumulator;
    use crate::config::ScoreConfig;
    use crate::fragment::Fragment;

    fn arrays() -> SignalArrays {
        let mut acc = ChromosomeAccumulator::new(1000, ScoreConfig::default());
        acc.add(&Fragment::new(100, 300));
        acc.finish().0
    }

    #[test]
    fn test_closed_interval() {
        let arrays = arrays();
        let regions = vec![Region::new("chr1", 398, 401, "g", "c")];
        let rows: Vec<_> = rows("chr1", &arrays, &regions).collect();

        let positions: Vec<u64> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![398, 399, 400, 401]);
        assert_eq!(rows[1].values.frag_depth_all, 1);
        assert_eq!(rows[2].values.frag_depth_all, 0);
        assert_eq!(rows[2].values.frag_suscp_all, 1);
        assert!(rows.iter().all(|r| r.region_id == "chr1:398:401:g:c"));
    }

    #[test]
    fn test_overlapping_regions_duplicate_positions() {
        let arrays = arrays();
        let regions = vec![
            Region::new("chr1", 150, 160, "a", "x"),
            Region::new("chr1", 155, 170, "b", "x"),
        ];
        let rows: Vec<_> = rows("chr1", &arrays, &regions).collect();
        assert_eq!(rows.len(), 11 + 16);

        let at_158: Vec<_> = rows.iter().filter(|r| r.position == 158).collect();
        assert_eq!(at_158.len(), 2);
        assert_ne!(at_158[0].region_id, at_158[1].region_id);
        assert_eq!(at_158[0].values, at_158[1].values);

        // Catalog order, then ascending positions
        assert_eq!(rows[0].position, 150);
        assert_eq!(rows[10].position, 160);
        assert_eq!(rows[11].position, 155);
    }

    #[test]
    fn test_empty_matches_dropped() {
        let arrays = arrays();
        let regions = vec![
            Region::new("chr1", 300, 200, "degenerate", "x"),
            Region::new("chr1", 5000, 6000, "outside", "x"),
            Region::new("chr1", 995, 1200, "clipped", "x"),
        ];
        let rows: Vec<_> = rows("chr1", &arrays, &regions).collect();

        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.region_id.contains("clipped")));
        assert_eq!(rows.last().map(|r| r.position), Some(999));
    }

    #[test]
    fn test_no_regions() {
        let arrays = arrays();
        assert_eq!(rows("chr1", &arrays, &[]).count(), 0);
    }
}
