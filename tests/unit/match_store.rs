//! Match store invariants at the engine level.

use crate::helpers::{flat, params, rec, run};
use epsmatch::matches::{compact_matches, mask_overlaps};
use epsmatch::options::SearchParams;

/// After the final compaction, no two retained matches of one query are
/// mutually redundant: running the overlap mask again changes nothing.
#[test]
fn retained_matches_are_overlap_free() {
    let queries = vec![rec("q0", "ACGTACGTACGTACGTACGT")];
    let database = vec![rec("d0", "CCACGTACGTACGTACGTACGTCCACGTACGTACGTACGTACGTCC")];
    let p = params(0.05, 20);
    let outcome = run(&queries, &database, &p);

    for qm in &outcome.matches {
        let mut copy: Vec<_> = qm.matches.to_vec();
        let before = copy.len();
        mask_overlaps(&mut copy, p.min_length);
        assert_eq!(copy.len(), before, "final list still held redundant matches");
    }
    assert!(!flat(&outcome).is_empty());
}

/// compact(compact(M)) == compact(M).
#[test]
fn compaction_is_idempotent_at_engine_level() {
    let queries = vec![rec("q0", "ACGTACGTACGTACGTACGT")];
    let database = vec![rec("d0", "CCACGTACGTACGTACGTACGTCCACGTACGTACGTACGTACGTCC")];
    let outcome = run(&queries, &database, &params(0.05, 20));

    for qm in &outcome.matches {
        let mut once: Vec<_> = qm.matches.to_vec();
        mask_overlaps(&mut once, 20);
        compact_matches(&mut once, 50);
        let mut twice = once.clone();
        mask_overlaps(&mut twice, 20);
        compact_matches(&mut twice, 50);
        let key = |ms: &[epsmatch::matches::EpsMatch]| {
            ms.iter()
                .map(|m| (m.db_begin(), m.db_end(), m.q_begin(), m.q_end()))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&once), key(&twice));
    }
}

/// numMatches caps the per-query list at the longest matches.
#[test]
fn num_matches_caps_the_list() {
    let unit = "ACGTTGACCA";
    // four separated copies of the query in the database
    let db_seq = format!(
        "{u}GGGGGGG{u}GGGGGGG{u}GGGGGGG{u}",
        u = unit.repeat(2)
    );
    let queries = vec![rec("q0", &unit.repeat(2))];
    let database = vec![rec("d0", &db_seq)];
    let p = SearchParams {
        num_matches: 2,
        reverse: false,
        ..params(0.0, 20)
    };
    let outcome = run(&queries, &database, &p);
    assert_eq!(outcome.matches[0].matches.len(), 2);
}

/// A disabled query is reported in the disabled list and contributes no
/// matches.
#[test]
fn disabled_query_has_no_matches() {
    let unit = "ACGT".repeat(10);
    let db_seq = unit.repeat(6);
    let queries = vec![rec("q0", &unit), rec("q1", "TTGACCATGCATGCATTGCAGGCCTTAGGCCATTGGAACC")];
    let database = vec![rec("d0", &db_seq)];
    let p = SearchParams {
        disable_thresh: 3,
        reverse: false,
        ..params(0.05, 20)
    };
    let outcome = run(&queries, &database, &p);
    assert_eq!(outcome.disabled_query_ids(), vec![0]);
    assert!(outcome.matches[0].matches.is_empty());
}
