//! X-drop splitting of gapped alignments (Zhang et al. 1999,
//! "Post-processing long pairwise alignments").
//!
//! The alignment is walked into an alternating queue of positive (all
//! match) and negative (mismatch or indel) segments. Two rewrite rules
//! fuse segments that cannot straddle a split point; whenever the queue
//! holds exactly a (left, middle, drop) triple whose drop scores below
//! -X, the middle is emitted as a sub-alignment if it reaches the score
//! floor. Emitted sub-alignments contain no interior prefix-to-suffix
//! score dip larger than X.

use crate::align::Alignment;
use crate::alphabet::Scoring;

/// Sentinel standing in for an unbounded drop at both alignment ends.
const SENTINEL: i64 = i64::MIN / 4;

#[derive(Debug, Clone, Copy)]
struct Segment {
    begin: usize,
    end: usize,
    score: i64,
}

/// Append the maximal run of match columns starting at `pos`.
fn append_positive(align: &Alignment, pos: &mut usize, scoring: Scoring, queue: &mut Vec<Segment>) {
    let len = align.ops.len();
    if *pos == len {
        return;
    }
    let begin = *pos;
    let mut score = 0i64;
    while *pos < len && !align.ops[*pos].is_error() {
        score += scoring.match_score;
        *pos += 1;
    }
    queue.push(Segment {
        begin,
        end: *pos,
        score,
    });
}

/// Append the maximal run of error columns starting at `pos`; the run that
/// reaches the alignment end scores as an unbounded drop.
fn append_negative(align: &Alignment, pos: &mut usize, scoring: Scoring, queue: &mut Vec<Segment>) {
    let len = align.ops.len();
    let begin = *pos;
    let mut score = 0i64;
    while *pos < len && align.ops[*pos].is_error() {
        score += scoring.penalty;
        *pos += 1;
    }
    let score = if *pos == len { SENTINEL } else { score };
    queue.push(Segment {
        begin,
        end: *pos,
        score,
    });
}

/// Lemma 5: fuse (ab, bc, cd) when the middle is non-negative and smaller
/// than the magnitude of the larger flanking drop.
fn negative_merge(queue: &mut Vec<Segment>) -> bool {
    let len = queue.len();
    if len < 3 {
        return false;
    }
    let cd = queue[len - 1];
    let bc = queue[len - 2];
    let ab = queue[len - 3];
    if bc.score < 0 || bc.score >= ab.score.max(cd.score).saturating_abs() {
        return false;
    }
    let fused = Segment {
        begin: ab.begin,
        end: cd.end,
        score: ab.score.saturating_add(bc.score).saturating_add(cd.score),
    };
    queue.truncate(len - 3);
    queue.push(fused);
    true
}

/// Lemma 6: fuse the middle triple of (ab, bc, cd, de, ef) when cd is a
/// drop no deeper than either flanking drop.
fn positive_merge(queue: &mut Vec<Segment>) -> bool {
    let len = queue.len();
    if len < 5 {
        return false;
    }
    let ef = queue[len - 1];
    let de = queue[len - 2];
    let cd = queue[len - 3];
    let bc = queue[len - 4];
    let ab = queue[len - 5];
    if cd.score >= 0 || cd.score < ab.score.max(ef.score) {
        return false;
    }
    let fused = Segment {
        begin: bc.begin,
        end: de.end,
        score: bc.score.saturating_add(cd.score).saturating_add(de.score),
    };
    queue.splice(len - 4..len - 1, std::iter::once(fused));
    true
}

/// Split `align` into the maximal sub-alignments without an interior
/// score drop of `drop_off` or more that still score at least `min_score`.
pub fn split_at_xdrops(
    align: &Alignment,
    scoring: Scoring,
    drop_off: i64,
    min_score: i64,
) -> Vec<Alignment> {
    let len = align.ops.len();
    let mut out = Vec::new();
    let mut queue: Vec<Segment> = vec![Segment {
        begin: 0,
        end: 0,
        score: SENTINEL,
    }];
    let mut pos = 0usize;

    while pos < len || queue.len() > 1 {
        if !negative_merge(&mut queue) && !positive_merge(&mut queue) {
            append_positive(align, &mut pos, scoring, &mut queue);
            append_negative(align, &mut pos, scoring, &mut queue);
        }

        if queue.len() == 3 && queue[2].score < -drop_off {
            if queue[1].score >= min_score {
                out.push(align.slice_columns(queue[1].begin, queue[1].end));
            }
            queue.drain(0..2);
        }
    }
    out
}
