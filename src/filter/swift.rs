//! SWIFT q-gram filter (Rasmussen, Stoye, Myers 2006).
//!
//! Streams one database sequence against the q-gram index of the query set
//! and emits candidate parallelograms: diagonal bands of the dynamic
//! programming matrix in which at least `threshold` shared q-grams fall
//! within the active text window. Every eps-match of the configured minimal
//! length shares that many q-grams with the database on diagonals deviating
//! by at most delta, so each such match is contained in an emitted
//! parallelogram.
//!
//! Diagonals are grouped into bins of width delta; each hit is counted in
//! its own bin and the preceding one, so parallelograms overlap by one
//! delta and every delta-wide diagonal band lies completely inside some
//! parallelogram.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;

use crate::filter::repeat::RepeatMask;
use crate::index::QGramIndex;
use crate::options::FilterParams;

/// Candidate parallelogram handed to verification. Coordinates are
/// half-open into the full database sequence and the full query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwiftHit {
    pub query_id: u32,
    pub db_begin: usize,
    pub db_end: usize,
    pub q_begin: usize,
    pub q_end: usize,
}

/// Pack (query, diagonal bin) into one key; bins are small signed numbers.
#[inline]
fn pack_bin_key(query_id: u32, bin: i64) -> u64 {
    ((query_id as u64) << 32) | (bin as i32 as u32 as u64)
}

#[derive(Debug, Default)]
struct BinState {
    /// Text start positions of the q-gram hits inside the active window.
    hits: VecDeque<u32>,
    /// Index of the parallelogram currently being extended, if any.
    open: Option<u32>,
}

pub struct SwiftFilter<'i, 'q> {
    index: &'i QGramIndex<'q>,
    params: FilterParams,
}

impl<'i, 'q> SwiftFilter<'i, 'q> {
    pub fn new(index: &'i QGramIndex<'q>, params: FilterParams) -> Self {
        SwiftFilter { index, params }
    }

    /// Scan `db_seq[span]` and return all parallelogram hits in ascending
    /// text position, ascending query id within one text column. The scan
    /// is free of randomness; output depends only on the inputs.
    pub fn scan(
        &self,
        db_seq: &[u8],
        span: (usize, usize),
        repeat_mask: &mut RepeatMask,
    ) -> Vec<SwiftHit> {
        let FilterParams { qgram, delta, .. } = self.params;
        let queries = self.index.queries();
        let (scan_begin, scan_end) = span;

        let mut hits: Vec<SwiftHit> = Vec::new();
        let mut bins: FxHashMap<u64, BinState> = FxHashMap::default();
        let mut coder = self.index.coder();

        for pos in scan_begin..scan_end.min(db_seq.len()) {
            let Some(code) = coder.push(db_seq[pos]) else {
                continue;
            };
            let text_start = pos + 1 - qgram;
            // repeat q-grams bypass filtering entirely
            if repeat_mask.covers(text_start) {
                continue;
            }

            for &(query_id, offset) in self.index.bucket(code) {
                let q_len = queries[query_id as usize].seq.len();
                let diag = text_start as i64 - offset as i64;
                let bin = (diag + q_len as i64).div_euclid(delta as i64);
                // count into the owning bin and its left neighbour; the
                // neighbour's parallelogram covers this diagonal through
                // the overlap
                for b in [bin, bin - 1] {
                    self.count_hit(
                        &mut bins,
                        &mut hits,
                        query_id,
                        q_len,
                        b,
                        text_start,
                        (scan_begin, scan_end),
                    );
                }
            }
        }
        hits
    }

    #[allow(clippy::too_many_arguments)]
    fn count_hit(
        &self,
        bins: &mut FxHashMap<u64, BinState>,
        hits: &mut Vec<SwiftHit>,
        query_id: u32,
        q_len: usize,
        bin: i64,
        text_start: usize,
        scan_span: (usize, usize),
    ) {
        let FilterParams {
            qgram,
            threshold,
            delta,
            overlap,
            window,
            ..
        } = self.params;

        let state = bins.entry(pack_bin_key(query_id, bin)).or_default();

        // slide the window: drop hits too far behind the current column
        while let Some(&front) = state.hits.front() {
            if text_start - front as usize > window {
                state.hits.pop_front();
            } else {
                break;
            }
        }
        if state.hits.is_empty() {
            state.open = None;
        }
        state.hits.push_back(text_start as u32);

        if state.hits.len() < threshold {
            return;
        }

        // parallelogram geometry: text span of the windowed hits padded by
        // the overlap, diagonals [bin*delta, (bin+2)*delta) shifted by the
        // query length
        let first = *state.hits.front().expect("non-empty window") as usize;
        let db_begin = first.saturating_sub(overlap).max(scan_span.0);
        let db_end = (text_start + qgram + overlap).min(scan_span.1);
        let diag_lo = bin * delta as i64 - q_len as i64;
        let diag_hi = (bin + 2) * delta as i64 - q_len as i64 - 1;
        let q_begin = (db_begin as i64 - diag_hi).clamp(0, q_len as i64) as usize;
        let q_end = (db_end as i64 - diag_lo).clamp(0, q_len as i64) as usize;
        if q_end <= q_begin {
            return;
        }

        match state.open {
            // keep growing the open parallelogram while the cluster lasts
            Some(idx) if hits[idx as usize].db_end >= db_begin => {
                let hit = &mut hits[idx as usize];
                hit.db_end = hit.db_end.max(db_end);
                hit.q_end = hit.q_end.max(q_end);
                hit.q_begin = hit.q_begin.min(q_begin);
            }
            _ => {
                state.open = Some(hits.len() as u32);
                hits.push(SwiftHit {
                    query_id,
                    db_begin,
                    db_end,
                    q_begin,
                    q_end,
                });
            }
        }
    }
}
