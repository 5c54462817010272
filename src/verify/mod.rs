//! Verification of SWIFT parallelogram hits.
//!
//! One tagged method per run: banded local enumeration with X-drop
//! splitting and extension (all-local / best-local), or one banded global
//! alignment over the parallelogram followed by extension
//! (banded-global-extend). The plain banded-global variant is not
//! implemented and refuses at dispatch.

pub mod banded;
pub mod extend;
pub mod xdrop;

use crate::align::Alignment;
use crate::alphabet::Scoring;
use crate::error::{Error, Result};
use crate::filter::SwiftHit;
use crate::options::{SearchParams, VerificationMethod};

use banded::{banded_global, parallelogram_band, BandedLocalEnumerator};
use extend::{extend_and_extract, ExtendDirection};
use xdrop::split_at_xdrops;

/// Parallelograms longer than this are skipped with a warning.
const MAX_PARALLELOGRAM_LENGTH: usize = 1_000_000_000;

/// Verify one parallelogram and return its eps-matches in full-sequence
/// coordinates. `delta` is the filter delta plus overlap, relaxing the
/// band where the query infix is pinned to a sequence end.
pub fn verify_swift_hit(
    hit: &SwiftHit,
    db_seq: &[u8],
    query_seq: &[u8],
    params: &SearchParams,
    delta: usize,
) -> Result<Vec<Alignment>> {
    if hit.db_end - hit.db_begin > MAX_PARALLELOGRAM_LENGTH {
        eprintln!(
            "[WARN] SWIFT hit <{},{}> x <{},{}> too long, verification skipped",
            hit.db_begin, hit.db_end, hit.q_begin, hit.q_end
        );
        return Ok(Vec::new());
    }

    let h = &db_seq[hit.db_begin..hit.db_end];
    let v = &query_seq[hit.q_begin..hit.q_end];
    let scoring = Scoring::from_epsilon(params.epsilon, db_seq.len());
    let drop_off = scoring.drop_off(params.x_drop);
    let min_score = params.min_score_floor();
    let (lower, upper) = parallelogram_band(
        hit.db_begin,
        hit.db_end,
        hit.q_begin,
        hit.q_end,
        query_seq.len(),
        delta,
    );

    match params.verification {
        VerificationMethod::AllLocal | VerificationMethod::BestLocal => {
            let mut out = Vec::new();
            let mut enumerator =
                BandedLocalEnumerator::new(h, v, scoring, lower, upper, min_score);
            while let Some(local) = enumerator.next_local() {
                let lifted = lift(local.alignment, hit);
                let seeds = split_at_xdrops(&lifted, scoring, drop_off, min_score);
                for (i, seed) in seeds.iter().enumerate() {
                    let direction = ExtendDirection::for_seed(i, seeds.len());
                    if let Some(m) = extend_and_extract(
                        seed,
                        db_seq,
                        query_seq,
                        direction,
                        scoring,
                        drop_off,
                        params.epsilon,
                        params.min_length,
                    ) {
                        out.push(m);
                    }
                }
                if params.verification.fast_exit() {
                    break;
                }
            }
            Ok(out)
        }
        VerificationMethod::BandedGlobalExtend => {
            let Some(global) = banded_global(h, v, scoring, lower, upper) else {
                return Ok(Vec::new());
            };
            let seed = lift(global, hit);
            Ok(extend_and_extract(
                &seed,
                db_seq,
                query_seq,
                ExtendDirection::Both,
                scoring,
                drop_off,
                params.epsilon,
                params.min_length,
            )
            .into_iter()
            .collect())
        }
        VerificationMethod::BandedGlobal => Err(Error::Unsupported(
            "banded-global verification is not implemented; use banded-global-extend".into(),
        )),
    }
}

/// Shift an infix-local alignment into full-sequence coordinates.
fn lift(mut alignment: Alignment, hit: &SwiftHit) -> Alignment {
    alignment.db_begin += hit.db_begin;
    alignment.db_end += hit.db_begin;
    alignment.q_begin += hit.q_begin;
    alignment.q_end += hit.q_begin;
    alignment
}
