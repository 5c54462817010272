//! SWIFT filter properties: completeness and determinism.

use epsmatch::alphabet::Alphabet;
use epsmatch::filter::{find_repeats, RepeatMask, SwiftFilter};
use epsmatch::index::QGramIndex;
use epsmatch::options::SearchParams;
use epsmatch::sequence::SeqRecord;

fn rec(id: &str, seq: &str) -> SeqRecord {
    SeqRecord {
        id: id.to_string(),
        seq: seq.as_bytes().to_vec(),
    }
}

/// A unique one-error eps-match must be covered by at least one emitted
/// parallelogram.
#[test]
fn completeness_for_a_one_error_match() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let p = SearchParams {
        epsilon: 0.1,
        min_length: 10,
        qgram: 4,
        ..SearchParams::default()
    };
    let fp = p.filter_params();
    assert!(fp.threshold >= 1);
    let index = QGramIndex::build(&queries, Alphabet::Dna5, 4, 1.0);
    let filter = SwiftFilter::new(&index, fp);

    // the eps-match lives at db [2, 12) x query [0, 10) with one mismatch
    let db = b"TTACGTTCGTACTT";
    let mut mask = RepeatMask::new(Vec::new());
    let hits = filter.scan(db, (0, db.len()), &mut mask);
    assert!(
        hits.iter()
            .any(|h| h.db_begin <= 2 && h.db_end >= 12 && h.q_begin == 0 && h.q_end == 10),
        "no parallelogram covers the match: {hits:?}"
    );
}

#[test]
fn scan_is_deterministic() {
    let queries = vec![
        rec("q0", "ACGTACGTACGTACGT"),
        rec("q1", "TTGCATTGCATTGCAA"),
    ];
    let p = SearchParams {
        epsilon: 0.05,
        min_length: 16,
        qgram: 5,
        ..SearchParams::default()
    };
    let index = QGramIndex::build(&queries, Alphabet::Dna5, 5, 1.0);
    let filter = SwiftFilter::new(&index, p.filter_params());
    let db = b"CCACGTACGTACGTACGTCCTTGCATTGCATTGCAACC";

    let mut mask1 = RepeatMask::new(Vec::new());
    let first = filter.scan(db, (0, db.len()), &mut mask1);
    let mut mask2 = RepeatMask::new(Vec::new());
    let second = filter.scan(db, (0, db.len()), &mut mask2);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn repeat_bypass_suppresses_hits_inside_masked_runs() {
    let queries = vec![rec("q0", "ATATATATATATATAT")];
    let p = SearchParams {
        epsilon: 0.0,
        min_length: 16,
        qgram: 4,
        min_repeat_length: 12,
        max_repeat_period: 2,
        ..SearchParams::default()
    };
    let index = QGramIndex::build(&queries, Alphabet::Dna5, 4, 1.0);
    let filter = SwiftFilter::new(&index, p.filter_params());
    let db: Vec<u8> = b"AT".iter().cycle().take(40).copied().collect();
    let repeats = find_repeats(&db, p.min_repeat_length, p.max_repeat_period);
    assert!(!repeats.is_empty());
    let mut mask = RepeatMask::new(repeats);
    let hits = filter.scan(&db, (0, db.len()), &mut mask);
    assert!(hits.is_empty());
}
