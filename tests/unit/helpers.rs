//! Shared builders for integration tests.

use epsmatch::engine::{search, SearchOutcome};
use epsmatch::options::SearchParams;
use epsmatch::sequence::SeqRecord;

pub fn rec(id: &str, seq: &str) -> SeqRecord {
    SeqRecord {
        id: id.to_string(),
        seq: seq.as_bytes().to_vec(),
    }
}

pub fn params(epsilon: f64, min_length: usize) -> SearchParams {
    SearchParams {
        epsilon,
        min_length,
        ..SearchParams::default()
    }
}

pub fn run(queries: &[SeqRecord], database: &[SeqRecord], params: &SearchParams) -> SearchOutcome {
    params.validate().expect("valid parameters");
    search(queries, database, params, None, false).expect("search")
}

/// Flattened (query, db, strand, db_begin, db_end, q_begin, q_end, errors)
/// tuples for easy comparison.
pub fn flat(outcome: &SearchOutcome) -> Vec<(u32, u32, char, usize, usize, usize, usize, usize)> {
    outcome
        .matches
        .iter()
        .flat_map(|qm| {
            qm.matches.iter().map(|m| {
                (
                    m.query_id,
                    m.db_id,
                    m.strand.symbol(),
                    m.db_begin(),
                    m.db_end(),
                    m.q_begin(),
                    m.q_end(),
                    m.errors(),
                )
            })
        })
        .collect()
}
