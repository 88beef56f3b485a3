//! End-to-end scoring through the public API: catalog file on disk,
//! in-memory fragments, gzip-compressed profile table read back.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use nucprot::output::PROFILE_COLUMNS;
use nucprot::{
    Fragment, MemoryFragmentSource, ProfileWriter, RegionCatalog, ScoreCommand, ScoreConfig,
    ScoreError,
};
use std::fs::File;
use std::io::{Read, Write};
use tempfile::{NamedTempFile, TempDir};

fn catalog_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn fragments() -> MemoryFragmentSource {
    let mut source = MemoryFragmentSource::new();
    source
        .add_chromosome("chr1", 1000)
        .add_chromosome("chr2", 2000)
        .add_chromosome("chrM", 100)
        .push("chr1", Fragment::new(100, 300))
        .push("chr1", Fragment::new(100, 300).duplicate(true))
        .push("chr1", Fragment::new(900, 150)) // past the chromosome end
        .push("chr1", Fragment::new(500, 60)) // too short for the length filter
        .push("chr2", Fragment::new(1000, 121));
    source
}

/// Score into a gzip file and return its decompressed lines.
fn score_to_gz(command: &ScoreCommand, catalog: &RegionCatalog) -> (nucprot::commands::ScoreStats, Vec<String>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profiles.csv.gz");

    let encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    let mut writer = ProfileWriter::new(encoder, command.sample.as_str());
    let stats = command.run(&mut fragments(), catalog, &mut writer).unwrap();
    writer.into_inner().unwrap().finish().unwrap();

    let mut text = String::new();
    GzDecoder::new(File::open(&path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    (stats, text.lines().map(str::to_string).collect())
}

fn column(line: &str, name: &str) -> String {
    let idx = PROFILE_COLUMNS.iter().position(|c| *c == name).unwrap();
    line.split(',').nth(idx).unwrap().to_string()
}

#[test]
fn test_profiles_match_windowing_rules() {
    let file = catalog_file("Chr1\t150\t170\tGENE1\tpromoter\nchr1\t395\t405\tGENE2\tbody\n");
    let catalog = RegionCatalog::load(file.path()).unwrap();
    let (stats, lines) = score_to_gz(&ScoreCommand::new("S1"), &catalog);

    assert_eq!(lines[0], PROFILE_COLUMNS.join(","));
    assert_eq!(lines.len(), 1 + 21 + 11);

    // Position 159 is the last base of the left end zone; 160 starts the core
    let at_159 = &lines[1 + 9];
    assert_eq!(column(at_159, "position"), "159");
    assert_eq!(column(at_159, "frag_depth_all"), "2");
    assert_eq!(column(at_159, "frag_depth_nodup"), "1");
    assert_eq!(column(at_159, "protection_score_minus"), "2");
    assert_eq!(column(at_159, "protection_score_minus_nodup"), "1");
    assert_eq!(column(at_159, "protection_score_plus"), "0");

    let at_160 = &lines[1 + 10];
    assert_eq!(column(at_160, "protection_score_plus"), "2");
    assert_eq!(column(at_160, "protection_score_plus_nodup"), "1");
    assert_eq!(column(at_160, "protection_score_minus"), "0");
    assert_eq!(column(at_160, "region_id"), "chr1:150:170:GENE1:promoter");

    // Fragment end at 400 shows up as susceptibility in the second region
    let at_400 = lines
        .iter()
        .find(|l| column(l, "position") == "400")
        .unwrap();
    assert_eq!(column(at_400, "frag_suscp_all"), "2");
    assert_eq!(column(at_400, "frag_suscp_nodup"), "1");
    assert_eq!(column(at_400, "frag_depth_all"), "0");

    let chr1 = &stats.chromosomes[0];
    assert_eq!(chr1.chromosome, "chr1");
    assert_eq!(chr1.counts.allfrag, 3);
    assert_eq!(chr1.counts.allfrag_crit, 2);
    assert_eq!(chr1.counts.nodup, 1);
    assert_eq!(chr1.counts.nodup_crit, 1);
}

#[test]
fn test_overlapping_regions_reported_twice() {
    let file = catalog_file("chr2\t1000\t1010\tA\tx\nchr2\t1005\t1020\tB\tx\n");
    let catalog = RegionCatalog::load(file.path()).unwrap();
    let (_, lines) = score_to_gz(&ScoreCommand::new("S2"), &catalog);

    let at_1007: Vec<&String> = lines
        .iter()
        .filter(|l| column(l, "position") == "1007")
        .collect();
    assert_eq!(at_1007.len(), 2);
    assert_eq!(column(at_1007[0], "region_id"), "chr2:1000:1010:A:x");
    assert_eq!(column(at_1007[1], "region_id"), "chr2:1005:1020:B:x");
    assert_eq!(
        at_1007[0].rsplit_once(',').unwrap().0,
        at_1007[1].rsplit_once(',').unwrap().0
    );
}

#[test]
fn test_regions_outside_chromosome_yield_nothing() {
    let file = catalog_file("chrM\t500\t600\tMT\tx\nchrM\t20\t10\tREV\tx\n");
    let catalog = RegionCatalog::load(file.path()).unwrap();
    let (stats, lines) = score_to_gz(&ScoreCommand::new("S3"), &catalog);

    assert_eq!(lines.len(), 1);
    assert_eq!(stats.rows(), 0);
    assert_eq!(stats.chromosomes.len(), 1);
}

#[test]
fn test_custom_window_and_bounds() {
    let file = catalog_file("chr2\t1000\t1121\tW\tx\n");
    let catalog = RegionCatalog::load(file.path()).unwrap();
    let mut command = ScoreCommand::new("S4");
    command.config = ScoreConfig::new(100, 200, 10);
    let (_, lines) = score_to_gz(&command, &catalog);

    // Fragment [1000, 1121) with hw 10: core [1010, 1111)
    let plus: u32 = lines[1..]
        .iter()
        .map(|l| column(l, "protection_score_plus").parse::<u32>().unwrap())
        .sum();
    assert_eq!(plus, 101);
}

#[test]
fn test_malformed_catalog_is_format_error() {
    let file = catalog_file("chr1\t100\t200\tGENE\n");
    match RegionCatalog::load(file.path()) {
        Err(ScoreError::Format { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected format error, got {:?}", other.map(|c| c.len())),
    }
}
