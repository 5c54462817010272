//! Verification pipeline properties across banded DP, X-drop splitting,
//! and extension.

use crate::helpers::{flat, params, rec, run};
use epsmatch::align::{AlignOp, Alignment};
use epsmatch::alphabet::Scoring;
use epsmatch::engine::search;
use epsmatch::options::{SearchParams, VerificationMethod};
use epsmatch::verify::extend::longest_eps_match;
use epsmatch::verify::xdrop::split_at_xdrops;

fn align_of(ops: Vec<AlignOp>) -> Alignment {
    let db = ops.iter().filter(|op| op.advances_db()).count();
    let q = ops.iter().filter(|op| op.advances_query()).count();
    Alignment {
        ops,
        db_begin: 0,
        db_end: db,
        q_begin: 0,
        q_end: q,
    }
}

/// No emitted sub-alignment may contain an interior prefix-to-suffix score
/// dip deeper than the drop-off.
#[test]
fn split_output_has_no_interior_xdrop() {
    let scoring = Scoring::from_epsilon(0.25, 1000); // +1 / -3
    let drop_off = 6i64;
    let mut ops = Vec::new();
    for chunk in [5usize, 2, 7, 3, 4, 1, 6] {
        ops.extend(vec![AlignOp::Match; chunk]);
        ops.extend(vec![AlignOp::Mismatch; chunk % 3 + 1]);
    }
    ops.extend(vec![AlignOp::Match; 5]);
    let a = align_of(ops);

    for part in split_at_xdrops(&a, scoring, drop_off, 3) {
        let mut running = 0i64;
        let mut peak = 0i64;
        for &op in &part.ops {
            running += if op.is_error() {
                scoring.penalty
            } else {
                scoring.match_score
            };
            peak = peak.max(running);
            assert!(
                peak - running <= drop_off,
                "interior dip of {} exceeds {}",
                peak - running,
                drop_off
            );
        }
    }
}

#[test]
fn longest_eps_match_upholds_both_bounds() {
    let mut ops = vec![AlignOp::Match; 30];
    ops[7] = AlignOp::Mismatch;
    ops[22] = AlignOp::GapDb;
    let a = align_of(ops);
    for (eps, min_len) in [(0.0, 10), (0.05, 20), (0.1, 25)] {
        if let Some(m) = longest_eps_match(&a, eps, min_len) {
            assert!(m.len() >= min_len);
            assert!(m.errors() as f64 <= eps * m.len() as f64 + 1e-9);
        }
    }
    // eps 0 selects the longest clean run
    let clean = longest_eps_match(&a, 0.0, 10).expect("clean window");
    assert_eq!(clean.errors(), 0);
    assert_eq!(clean.len(), 14);
}

#[test]
fn banded_global_extend_finds_the_exact_match() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![rec("d0", "TTACGTACGTACTT")];
    let p = SearchParams {
        verification: VerificationMethod::BandedGlobalExtend,
        ..params(0.0, 10)
    };
    let outcome = run(&queries, &database, &p);
    let ms = flat(&outcome);
    assert_eq!(ms, vec![(0, 0, '+', 2, 12, 0, 10, 0)]);
}

#[test]
fn best_local_reports_the_same_single_match() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![rec("d0", "TTACGTACGTACTT")];
    let p = SearchParams {
        verification: VerificationMethod::BestLocal,
        ..params(0.0, 10)
    };
    let outcome = run(&queries, &database, &p);
    assert_eq!(flat(&outcome), vec![(0, 0, '+', 2, 12, 0, 10, 0)]);
}

#[test]
fn banded_global_is_rejected_up_front() {
    let queries = vec![rec("q0", "ACGTACGTAC")];
    let database = vec![rec("d0", "TTACGTACGTACTT")];
    let p = SearchParams {
        verification: VerificationMethod::BandedGlobal,
        ..params(0.0, 10)
    };
    assert!(search(&queries, &database, &p, None, false).is_err());
}
