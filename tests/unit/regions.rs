//! Genomic region parsing round trips and failure modes.

use epsmatch::region::{GenomicRegion, INVALID_ID, INVALID_POS};

#[test]
fn format_parse_round_trip() {
    for s in ["chr1", "chr1:1-1", "chrX:1000-2000"] {
        let region = GenomicRegion::parse(s).unwrap();
        assert_eq!(region.to_string(), s);
    }
}

#[test]
fn comma_groups_canonicalise() {
    let region = GenomicRegion::parse("chrX:1,000-2,000").unwrap();
    assert_eq!(region.to_string(), "chrX:1000-2000");
}

#[test]
fn unresolved_fields_stay_at_sentinels() {
    let region = GenomicRegion::parse("scaffold_12").unwrap();
    assert_eq!(region.seq_id, INVALID_ID);
    assert_eq!(region.begin_pos, INVALID_POS);
    assert_eq!(region.end_pos, INVALID_POS);
}

#[test]
fn start_only_form() {
    let region = GenomicRegion::parse("chr2:500").unwrap();
    assert_eq!(region.begin_pos, 499);
    assert_eq!(region.end_pos, INVALID_POS);
    assert_eq!(region.to_string(), "chr2:500");
}

#[test]
fn positions_below_one_fail() {
    let err = GenomicRegion::parse("chr1:0").unwrap_err();
    assert_eq!(
        err.to_string(),
        "GenomicRegion: Begin position less than 1"
    );
    let err = GenomicRegion::parse("chr1:5-0").unwrap_err();
    assert_eq!(err.to_string(), "GenomicRegion: End position less than 1");
}

#[test]
fn garbage_positions_fail() {
    assert!(GenomicRegion::parse("chr1:12x").is_err());
    assert!(GenomicRegion::parse("chr1:,").is_err());
}
