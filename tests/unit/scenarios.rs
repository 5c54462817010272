//! Literal end-to-end scenarios.

use crate::helpers::{flat, params, rec, run};
use epsmatch::engine::search;
use epsmatch::options::SearchParams;
use epsmatch::region::GenomicRegion;

#[test]
fn s1_exact_match() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![rec("d0", "TTACGTACGTACTT")];
    let outcome = run(&queries, &database, &params(0.0, 10));
    let ms = flat(&outcome);
    assert_eq!(ms, vec![(0, 0, '+', 2, 12, 0, 10, 0)]);
}

#[test]
fn s2_one_mismatch_within_epsilon() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![rec("d0", "TTACGTTCGTACTT")];
    let outcome = run(&queries, &database, &params(0.1, 10));
    let ms = flat(&outcome);
    assert_eq!(ms.len(), 1);
    let (_, _, strand, db_begin, db_end, _, _, errors) = ms[0];
    assert_eq!(strand, '+');
    assert_eq!((db_begin, db_end), (2, 12));
    assert_eq!(errors, 1);
}

#[test]
fn s3_unrelated_sequences() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![rec("d0", "TTTTTTTTTT")];
    let outcome = run(&queries, &database, &params(0.1, 10));
    assert!(flat(&outcome).is_empty());
}

#[test]
fn s4_reverse_complement_of_homopolymer_is_absent() {
    let queries = vec![rec("q0", "AAAAAAAAAA")];
    let database = vec![rec("d0", "GGGGAAAAAAAAAAGGGG")];
    let outcome = run(&queries, &database, &params(0.0, 10));
    let ms = flat(&outcome);
    // forward strand only: the reverse complement pass searches for
    // matches of the query against rc(database), which holds only T and C
    assert_eq!(ms, vec![(0, 0, '+', 4, 14, 0, 10, 0)]);
}

#[test]
fn s5_repetitive_queries_are_disabled() {
    let unit = "ACGT".repeat(30);
    let queries: Vec<_> = (0..100).map(|i| rec(&format!("q{i}"), &unit)).collect();
    let db_seq = format!("{}{}{}", unit, "N".repeat(20), unit);
    let database = vec![rec("d0", &db_seq)];
    let p = SearchParams {
        disable_thresh: 50,
        ..params(0.05, 20)
    };
    let outcome = run(&queries, &database, &p);
    assert_eq!(outcome.disabled_query_ids().len(), 100);
    assert!(flat(&outcome).is_empty());
}

#[test]
fn s6_region_parse() {
    let r = GenomicRegion::parse("chrX:1,500-2,000").unwrap();
    assert_eq!(r.seq_name, "chrX");
    assert_eq!(r.begin_pos, 1499);
    assert_eq!(r.end_pos, 2000);
}

#[test]
fn strand_symmetry() {
    // database holds the reverse complement of the query
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let forward_db = "GGGGGTACGTACGTGGGG";
    let database = vec![rec("d0", forward_db)];
    let outcome = run(&queries, &database, &params(0.0, 10));
    let ms = flat(&outcome);
    assert_eq!(ms.len(), 1);
    let (_, _, strand, db_begin, db_end, q_begin, q_end, errors) = ms[0];
    assert_eq!(strand, '-');
    assert_eq!((db_begin, db_end), (4, 14));
    assert_eq!((q_begin, q_end), (0, 10));
    assert_eq!(errors, 0);

    // the forward run against rc(database) reports the same coordinates
    // after reflection
    let rc_db: String = forward_db
        .bytes()
        .rev()
        .map(|b| match b {
            b'A' => 'T',
            b'T' => 'A',
            b'G' => 'C',
            b'C' => 'G',
            other => other as char,
        })
        .collect();
    let database2 = vec![rec("d0", &rc_db)];
    let p2 = SearchParams {
        reverse: false,
        ..params(0.0, 10)
    };
    let outcome2 = run(&queries, &database2, &p2);
    let ms2 = flat(&outcome2);
    assert_eq!(ms2.len(), 1);
    let (_, _, strand2, db_begin2, db_end2, ..) = ms2[0];
    assert_eq!(strand2, '+');
    let len = forward_db.len();
    assert_eq!((len - db_end2, len - db_begin2), (db_begin, db_end));
}

#[test]
fn deterministic_across_runs() {
    let queries = vec![
        rec("q0", "ACGTACGTACGTACGTACGT"),
        rec("q1", "TTGACCATGCATGCATTGCA"),
    ];
    let database = vec![
        rec("d0", "CCACGTACGTACGTACGTACGTCC"),
        rec("d1", "ATTGACCATGCATGCATTGCAAT"),
    ];
    let p = params(0.05, 20);
    let first = flat(&run(&queries, &database, &p));
    let second = flat(&run(&queries, &database, &p));
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn matches_touching_sequence_ends_stay_in_range() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![rec("d0", "ACGTACGTAC")];
    let outcome = run(&queries, &database, &params(0.0, 10));
    let ms = flat(&outcome);
    assert_eq!(ms.len(), 1);
    let (_, _, _, db_begin, db_end, q_begin, q_end, _) = ms[0];
    assert_eq!((db_begin, db_end), (0, 10));
    assert_eq!((q_begin, q_end), (0, 10));
}

#[test]
fn segment_restricts_the_scan() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![
        rec("d0", "TTACGTACGTACTT"),
        rec("d1", "TTACGTACGTACTT"),
    ];
    let p = params(0.0, 10);
    let region = GenomicRegion::parse("d1").unwrap();
    let outcome = search(&queries, &database, &p, Some(&region), false).unwrap();
    let ms = flat(&outcome);
    assert_eq!(ms.len(), 1);
    assert_eq!(ms[0].1, 1); // only the named contig was searched

    let unknown = GenomicRegion::parse("chrZ").unwrap();
    assert!(search(&queries, &database, &p, Some(&unknown), false).is_err());
}

#[test]
fn reported_matches_satisfy_the_eps_contract() {
    let queries = vec![rec("q0", "ACGTACGTACGTACGTACGT")];
    let database = vec![rec("d0", "CCACGTACGTTCGTACGTACGTCC")];
    let p = params(0.1, 20);
    let outcome = run(&queries, &database, &p);
    for qm in &outcome.matches {
        for m in &qm.matches {
            assert!(m.len() >= 20);
            assert!(m.errors() as f64 <= 0.1 * m.len() as f64 + 1e-9);
            assert!(m.alignment.spans_consistent());
        }
    }
    assert!(!flat(&outcome).is_empty());
}
