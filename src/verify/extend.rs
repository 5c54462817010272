//! Bidirectional seed extension and eps-match extraction.
//!
//! A seed sub-alignment is extended into the full sequences with X-drop
//! gapped DP (an ungapped fast path handles clean flanks without touching
//! the matrix), then shrunk to the longest contained sub-alignment whose
//! error rate stays within epsilon and whose length reaches the minimum.

use crate::align::{AlignOp, Alignment};
use crate::alphabet::Scoring;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendDirection {
    None,
    Left,
    Right,
    Both,
}

impl ExtendDirection {
    /// Placement of a seed among its siblings from one local alignment:
    /// a lone seed extends both ways, flank seeds extend outward only,
    /// interior seeds not at all.
    pub fn for_seed(index: usize, count: usize) -> Self {
        if count == 1 {
            ExtendDirection::Both
        } else if index == 0 {
            ExtendDirection::Right
        } else if index + 1 == count {
            ExtendDirection::Left
        } else {
            ExtendDirection::None
        }
    }

    fn left(self) -> bool {
        matches!(self, ExtendDirection::Left | ExtendDirection::Both)
    }

    fn right(self) -> bool {
        matches!(self, ExtendDirection::Right | ExtendDirection::Both)
    }
}

/// Extend `seed` (full-sequence coordinates) into `db` and `query`, then
/// extract the longest contained eps-match of at least `min_length`
/// columns. None if no qualifying window exists.
pub fn extend_and_extract(
    seed: &Alignment,
    db: &[u8],
    query: &[u8],
    direction: ExtendDirection,
    scoring: Scoring,
    drop_off: i64,
    epsilon: f64,
    min_length: usize,
) -> Option<Alignment> {
    let mut ops: Vec<AlignOp> = Vec::with_capacity(seed.ops.len());
    let mut db_begin = seed.db_begin;
    let mut q_begin = seed.q_begin;
    let mut db_end = seed.db_end;
    let mut q_end = seed.q_end;

    if direction.left() && db_begin > 0 && q_begin > 0 {
        let h_rev: Vec<u8> = db[..db_begin].iter().rev().copied().collect();
        let v_rev: Vec<u8> = query[..q_begin].iter().rev().copied().collect();
        if let Some((mut ext_ops, h_used, v_used)) =
            xdrop_extend(&h_rev, &v_rev, scoring, drop_off)
        {
            ext_ops.reverse();
            db_begin -= h_used;
            q_begin -= v_used;
            ops.extend(ext_ops);
        }
    }

    ops.extend_from_slice(&seed.ops);

    if direction.right() && db_end < db.len() && q_end < query.len() {
        if let Some((ext_ops, h_used, v_used)) =
            xdrop_extend(&db[db_end..], &query[q_end..], scoring, drop_off)
        {
            db_end += h_used;
            q_end += v_used;
            ops.extend(ext_ops);
        }
    }

    let extended = Alignment {
        ops,
        db_begin,
        db_end,
        q_begin,
        q_end,
    };
    debug_assert!(extended.spans_consistent());
    longest_eps_match(&extended, epsilon, min_length)
}

/// One-directional gapped X-drop extension anchored at the start of both
/// slices. Cells falling more than `drop_off` below the best score are
/// pruned; the returned columns run to the furthest surviving cell, so the
/// extension may end in error columns. The eps-match shrink afterwards
/// trims those.
///
/// Clean flanks short-circuit: a run of equal symbols reaching either
/// slice end never enters the DP.
fn xdrop_extend(
    h: &[u8],
    v: &[u8],
    scoring: Scoring,
    drop_off: i64,
) -> Option<(Vec<AlignOp>, usize, usize)> {
    if h.is_empty() || v.is_empty() {
        return None;
    }

    // ungapped fast path
    let mut run = 0usize;
    while run < h.len() && run < v.len() && h[run] == v[run] {
        run += 1;
    }
    if run == h.len() || run == v.len() {
        if run == 0 {
            return None;
        }
        return Some((vec![AlignOp::Match; run], run, run));
    }

    const STOP: u8 = 0;
    const DIAG: u8 = 1;
    const UP: u8 = 2;
    const LEFT: u8 = 3;
    const NEG: i64 = i64::MIN / 4;

    struct Row {
        lo: usize,
        dirs: Vec<u8>,
    }

    let mut rows: Vec<Row> = Vec::new();
    // best score governs pruning; the furthest surviving cell becomes the
    // extension endpoint
    let mut best_score = 0i64;
    let mut far: (usize, usize, usize) = (0, 0, 0); // (i + j, i, j)

    // row 0: leading database gaps
    let mut dirs0 = vec![STOP];
    let mut scores0 = vec![0i64];
    let mut j0 = 1usize;
    while j0 <= v.len() && scoring.penalty * j0 as i64 >= -drop_off {
        dirs0.push(LEFT);
        scores0.push(scoring.penalty * j0 as i64);
        j0 += 1;
    }
    if scores0.len() > 1 {
        far = (scores0.len() - 1, 0, scores0.len() - 1);
    }
    rows.push(Row { lo: 0, dirs: dirs0 });
    let mut prev_scores = scores0;
    let mut prev_lo = 0usize;

    for i in 1..=h.len() {
        let prev_hi = prev_lo + prev_scores.len() - 1;
        let lo_bound = prev_lo;
        let hi_bound = (prev_hi + 1).min(v.len());
        if lo_bound > hi_bound {
            break;
        }
        let mut dirs: Vec<u8> = Vec::with_capacity(hi_bound - lo_bound + 1);
        let mut scores: Vec<i64> = Vec::with_capacity(hi_bound - lo_bound + 1);
        for j in lo_bound..=hi_bound {
            let mut score = NEG;
            let mut dir = STOP;
            if j > 0 {
                // diag from (i-1, j-1)
                if j - 1 >= prev_lo && j - 1 <= prev_hi {
                    let sub = if h[i - 1] == v[j - 1] {
                        scoring.match_score
                    } else {
                        scoring.penalty
                    };
                    let cand = prev_scores[j - 1 - prev_lo].saturating_add(sub);
                    if cand > score {
                        score = cand;
                        dir = DIAG;
                    }
                }
                // left from (i, j-1)
                if j - 1 >= lo_bound && !scores.is_empty() {
                    let cand = scores[j - 1 - lo_bound].saturating_add(scoring.penalty);
                    if cand > score {
                        score = cand;
                        dir = LEFT;
                    }
                }
            }
            // up from (i-1, j)
            if j >= prev_lo && j <= prev_hi {
                let cand = prev_scores[j - prev_lo].saturating_add(scoring.penalty);
                if cand > score {
                    score = cand;
                    dir = UP;
                }
            }
            dirs.push(dir);
            scores.push(score);
        }

        // X-drop pruning against the best score seen so far
        let floor = best_score - drop_off;
        let mut lo = lo_bound;
        let mut hi = hi_bound;
        while lo <= hi && scores[lo - lo_bound] < floor {
            lo += 1;
        }
        while hi > lo && scores[hi - lo_bound] < floor {
            hi -= 1;
        }
        if lo > hi || (lo == hi && scores[lo - lo_bound] < floor) {
            rows.push(Row {
                lo: lo_bound,
                dirs,
            });
            break;
        }
        for j in lo..=hi {
            let s = scores[j - lo_bound];
            if s > best_score {
                best_score = s;
            }
        }
        if i + hi > far.0 {
            far = (i + hi, i, hi);
        }
        // dirs keep the full computed range; only the score window narrows,
        // so traceback can follow gap chains through pruned cells
        scores.drain(..lo - lo_bound);
        scores.truncate(hi - lo + 1);
        rows.push(Row {
            lo: lo_bound,
            dirs,
        });
        prev_scores = scores;
        prev_lo = lo;
    }

    if far.0 == 0 {
        return None;
    }

    // traceback
    let (_, mut i, mut j) = far;
    let mut ops: Vec<AlignOp> = Vec::new();
    while i > 0 || j > 0 {
        let row = &rows[i];
        let dir = row.dirs[j - row.lo];
        match dir {
            DIAG => {
                ops.push(if h[i - 1] == v[j - 1] {
                    AlignOp::Match
                } else {
                    AlignOp::Mismatch
                });
                i -= 1;
                j -= 1;
            }
            UP => {
                ops.push(AlignOp::GapQuery);
                i -= 1;
            }
            LEFT => {
                ops.push(AlignOp::GapDb);
                j -= 1;
            }
            _ => break,
        }
    }
    ops.reverse();
    Some((ops, far.1, far.2))
}

/// Longest sub-range of columns whose error count stays within epsilon and
/// whose length reaches `min_length`; ties favour the earliest begin.
pub fn longest_eps_match(
    align: &Alignment,
    epsilon: f64,
    min_length: usize,
) -> Option<Alignment> {
    let len = align.ops.len();
    if len < min_length {
        return None;
    }
    let mut prefix_errors = vec![0u32; len + 1];
    for (i, op) in align.ops.iter().enumerate() {
        prefix_errors[i + 1] = prefix_errors[i] + op.is_error() as u32;
    }

    for span in (min_length..=len).rev() {
        let budget = epsilon * span as f64 + 1e-9;
        for begin in 0..=len - span {
            let errors = prefix_errors[begin + span] - prefix_errors[begin];
            if (errors as f64) <= budget {
                return Some(align.slice_columns(begin, begin + span));
            }
        }
    }
    None
}
