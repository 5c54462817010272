//! Per-query match bookkeeping: overlap suppression, length compaction,
//! and the disable policy for pathologically repetitive queries.

use std::cmp::Ordering;

use crate::align::Alignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// One reported eps-match. Database coordinates are always forward-strand;
/// for reverse matches the alignment columns read along the
/// reverse-complemented database.
#[derive(Debug, Clone)]
pub struct EpsMatch {
    pub query_id: u32,
    pub db_id: u32,
    pub strand: Strand,
    pub alignment: Alignment,
}

impl EpsMatch {
    #[inline]
    pub fn len(&self) -> usize {
        self.alignment.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alignment.is_empty()
    }

    #[inline]
    pub fn errors(&self) -> usize {
        self.alignment.errors()
    }

    #[inline]
    pub fn db_begin(&self) -> usize {
        self.alignment.db_begin
    }

    #[inline]
    pub fn db_end(&self) -> usize {
        self.alignment.db_end
    }

    #[inline]
    pub fn q_begin(&self) -> usize {
        self.alignment.q_begin
    }

    #[inline]
    pub fn q_end(&self) -> usize {
        self.alignment.q_end
    }
}

/// Matches of one query with the adaptive compaction state.
#[derive(Debug, Default)]
pub struct QueryMatches {
    pub matches: Vec<EpsMatch>,
    pub disabled: bool,
}

impl QueryMatches {
    /// Append a match, compacting when the threshold is exceeded. The
    /// compact threshold grows by half whenever a compaction still leaves
    /// the list more than half full. Inserts into a disabled query are
    /// no-ops.
    pub fn insert(
        &mut self,
        m: EpsMatch,
        min_length: usize,
        disable_thresh: usize,
        compact_thresh: &mut usize,
        num_matches: usize,
    ) {
        if self.disabled {
            return;
        }
        self.matches.push(m);
        if self.remove_overlaps_and_compact(disable_thresh, *compact_thresh, min_length, num_matches)
            && self.matches.len() * 2 > *compact_thresh
        {
            *compact_thresh += *compact_thresh >> 1;
        }
    }

    /// Disable or compact as needed; true if a compaction ran.
    pub fn remove_overlaps_and_compact(
        &mut self,
        disable_thresh: usize,
        compact_thresh: usize,
        min_length: usize,
        num_matches: usize,
    ) -> bool {
        if self.disabled {
            return false;
        }
        if self.matches.len() > disable_thresh {
            self.disabled = true;
            self.matches.clear();
            return false;
        }
        if self.matches.len() <= compact_thresh {
            return false;
        }
        mask_overlaps(&mut self.matches, min_length);
        compact_matches(&mut self.matches, num_matches);
        true
    }
}

/// Two matches overlap redundantly in the query row: same database
/// sequence and strand, overlapping query spans without two long unique
/// parts, and equal diagonal offsets at their begin anchors.
fn check_overlap(a: &EpsMatch, b: &EpsMatch, min_length: usize) -> bool {
    if a.db_id != b.db_id || a.strand != b.strand {
        return false;
    }
    let diag = |m: &EpsMatch| m.q_begin() as i64 - m.db_begin() as i64;
    if a.q_begin() >= b.q_begin() {
        if a.q_end() >= b.q_end()
            && a.q_begin() - b.q_begin() >= min_length
            && a.q_end() - b.q_end() >= min_length
        {
            return false;
        }
        if diag(a) != diag(b) {
            return false;
        }
    } else {
        if a.q_end() < b.q_end()
            && b.q_begin() - a.q_begin() >= min_length
            && b.q_end() - a.q_end() >= min_length
        {
            return false;
        }
        if diag(b) != diag(a) {
            return false;
        }
    }
    true
}

/// Walk the shared database span of two overlapping matches and compare
/// their query projections column by column. Fewer than `min_length`
/// differing columns means the shorter match adds nothing.
fn check_align_col_overlap(a: &EpsMatch, b: &EpsMatch, min_length: usize) -> bool {
    let begin = a.db_begin().max(b.db_begin());
    let end = a.db_end().min(b.db_end());
    if begin >= end {
        return true;
    }
    let proj_a = projection_in_range(&a.alignment, a.strand, begin, end);
    let proj_b = projection_in_range(&b.alignment, b.strand, begin, end);
    let mut diff_cols = 0usize;
    let (mut ia, mut ib) = (0usize, 0usize);
    while ia < proj_a.len() && ib < proj_b.len() {
        match proj_a[ia].0.cmp(&proj_b[ib].0) {
            Ordering::Less => ia += 1,
            Ordering::Greater => ib += 1,
            Ordering::Equal => {
                if proj_a[ia].1 != proj_b[ib].1 {
                    diff_cols += 1;
                }
                ia += 1;
                ib += 1;
            }
        }
    }
    diff_cols < min_length
}

/// (db position, projected query position) pairs over `[begin, end)`,
/// ascending in db position. Reverse-strand alignments store forward
/// database coordinates but their columns read along the reverse
/// complement, so they are walked back to front.
fn projection_in_range(
    alignment: &Alignment,
    strand: Strand,
    begin: usize,
    end: usize,
) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    match strand {
        Strand::Forward => {
            let mut db = alignment.db_begin;
            let mut q = alignment.q_begin;
            for &op in &alignment.ops {
                if op.advances_db() {
                    if db >= begin && db < end {
                        pairs.push((db, q));
                    }
                    db += 1;
                }
                if op.advances_query() {
                    q += 1;
                }
            }
        }
        Strand::Reverse => {
            let mut db = alignment.db_begin;
            let mut q = alignment.q_end;
            for &op in alignment.ops.iter().rev() {
                if op.advances_query() {
                    q -= 1;
                }
                if op.advances_db() {
                    if db >= begin && db < end {
                        pairs.push((db, q));
                    }
                    db += 1;
                }
            }
        }
    }
    pairs
}

/// Invalidate matches whose query-row overlap with a longer match is
/// redundant. Matches are left sorted by database begin position.
pub fn mask_overlaps(matches: &mut Vec<EpsMatch>, min_length: usize) {
    matches.sort_by(|x, y| {
        (x.db_begin(), x.db_end(), x.q_begin(), x.q_end())
            .cmp(&(y.db_begin(), y.db_end(), y.q_begin(), y.q_end()))
    });

    let mut valid = vec![true; matches.len()];
    // indices of open matches ordered by descending database end
    let mut overlaps: Vec<usize> = Vec::new();

    for cur in 0..matches.len() {
        if !valid[cur] {
            continue;
        }
        let mut insert_pos = 0usize;
        let mut scanned = overlaps.len();

        for (oi, &other) in overlaps.iter().enumerate() {
            // position bookkeeping counts invalidated entries too, they
            // only leave the list when the sweep passes them
            if matches[cur].db_end() < matches[other].db_end() {
                insert_pos += 1;
            }
            // open list is sorted by descending end; past this point
            // nothing overlaps the current match in the database row
            if matches[other].db_end() <= matches[cur].db_begin() {
                scanned = oi;
                break;
            }
            if !valid[other] {
                continue;
            }
            // both unique database parts long enough: keep both
            if matches[cur].db_begin() - matches[other].db_begin() >= min_length
                && matches[cur].db_end() > matches[other].db_end()
                && matches[cur].db_end() - matches[other].db_end() >= min_length
            {
                continue;
            }
            if !check_overlap(&matches[cur], &matches[other], min_length) {
                continue;
            }
            if !check_align_col_overlap(&matches[other], &matches[cur], min_length) {
                continue;
            }
            // redundancy: drop the shorter of the two; a dead current
            // match can no longer invalidate anything
            if matches[cur].len() > matches[other].len() {
                valid[other] = false;
            } else {
                valid[cur] = false;
                break;
            }
        }

        overlaps.truncate(scanned);
        if valid[cur] {
            overlaps.insert(insert_pos.min(overlaps.len()), cur);
        }
    }

    let mut keep = valid.iter();
    matches.retain(|_| *keep.next().expect("validity flag per match"));
}

/// Keep only the `num_matches` longest matches, longest first.
pub fn compact_matches(matches: &mut Vec<EpsMatch>, num_matches: usize) {
    matches.sort_by(|x, y| {
        y.len()
            .cmp(&x.len())
            .then_with(|| (x.db_begin(), x.q_begin()).cmp(&(y.db_begin(), y.q_begin())))
    });
    matches.truncate(num_matches);
}

/// Deterministic report order within one query.
pub fn sort_for_report(matches: &mut [EpsMatch]) {
    matches.sort_by(|x, y| {
        (x.strand, x.db_id, x.db_begin(), x.db_end(), x.q_begin()).cmp(&(
            y.strand,
            y.db_id,
            y.db_begin(),
            y.db_end(),
            y.q_begin(),
        ))
    });
}
