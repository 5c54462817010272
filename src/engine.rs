//! Orchestration of one search run: index construction, strand passes,
//! parallel contig scanning, verification, and match merging.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::align::Alignment;
use crate::error::{Error, Result};
use crate::filter::{find_repeats, RepeatMask, SwiftFilter};
use crate::index::QGramIndex;
use crate::matches::{EpsMatch, QueryMatches, Strand};
use crate::options::{SearchParams, VerificationMethod};
use crate::region::GenomicRegion;
use crate::sequence::{reverse_complement, SeqRecord};
use crate::verify::verify_swift_hit;

/// Filter and verification counters of one run, printed under --verbose.
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelStats {
    pub swift_hits: usize,
    pub total_parallelogram_length: usize,
    pub max_parallelogram_length: usize,
}

impl KernelStats {
    fn absorb(&mut self, other: KernelStats) {
        self.swift_hits += other.swift_hits;
        self.total_parallelogram_length += other.total_parallelogram_length;
        self.max_parallelogram_length = self
            .max_parallelogram_length
            .max(other.max_parallelogram_length);
    }
}

pub struct SearchOutcome {
    /// Per-query match lists, index-aligned with the query set.
    pub matches: Vec<QueryMatches>,
    pub stats: KernelStats,
}

impl SearchOutcome {
    pub fn disabled_query_ids(&self) -> Vec<usize> {
        self.matches
            .iter()
            .enumerate()
            .filter(|(_, qm)| qm.disabled)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Run the complete search. The q-gram index is built once and shared
/// immutably; database contigs are scanned in parallel per strand and the
/// per-worker match buffers are merged in contig order, which keeps the
/// final output independent of the thread count.
pub fn search(
    queries: &[SeqRecord],
    database: &[SeqRecord],
    params: &SearchParams,
    segment: Option<&GenomicRegion>,
    verbose: bool,
) -> Result<SearchOutcome> {
    if params.verification == VerificationMethod::BandedGlobal {
        return Err(Error::Unsupported(
            "banded-global verification is not implemented; use banded-global-extend".into(),
        ));
    }

    let segment_target = match segment {
        None => None,
        Some(region) => {
            let idx = database
                .iter()
                .position(|r| r.id == region.seq_name)
                .ok_or_else(|| {
                    Error::InvalidOption(format!(
                        "segment sequence '{}' not found in database",
                        region.seq_name
                    ))
                })?;
            Some((idx, region.resolve_span(database[idx].seq.len())))
        }
    };

    let qgram = params.effective_qgram();
    let index = QGramIndex::build(queries, params.alphabet, qgram, params.abundance_cut);
    if verbose {
        eprintln!(
            "[INFO] q-gram index: q={}, masked buckets={}",
            qgram,
            index.masked_bucket_count()
        );
    }
    let filter_params = params.filter_params();
    // band relaxation handed to verification
    let band_delta = filter_params.delta + filter_params.overlap;
    let filter = SwiftFilter::new(&index, filter_params);

    let mut strands = Vec::new();
    if params.forward {
        strands.push(Strand::Forward);
    }
    if params.reverse && params.alphabet.supports_reverse() {
        strands.push(Strand::Reverse);
    }

    let bar = ProgressBar::new((database.len() * strands.len()) as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("static template"),
    );

    let mut global: Vec<QueryMatches> = (0..queries.len()).map(|_| QueryMatches::default()).collect();
    let mut compact_thresh = params.compact_thresh;
    let mut stats = KernelStats::default();

    for &strand in &strands {
        let pass: Vec<Result<(Vec<QueryMatches>, usize, KernelStats)>> = database
            .par_iter()
            .enumerate()
            .map(|(db_idx, contig)| {
                let result = scan_contig(
                    db_idx,
                    contig,
                    strand,
                    queries,
                    &filter,
                    params,
                    band_delta,
                    segment_target,
                );
                bar.inc(1);
                result
            })
            .collect();

        for worker in pass {
            let (local, local_compact, local_stats) = worker?;
            compact_thresh = compact_thresh.max(local_compact);
            stats.absorb(local_stats);
            for (qm, local_qm) in global.iter_mut().zip(local) {
                if local_qm.disabled {
                    qm.disabled = true;
                    qm.matches.clear();
                }
                if qm.disabled {
                    continue;
                }
                qm.matches.extend(local_qm.matches);
                if qm.matches.len() > params.disable_thresh {
                    qm.disabled = true;
                    qm.matches.clear();
                }
            }
        }
    }
    bar.finish_and_clear();

    // final compaction: forced overlap masking and length selection
    for qm in &mut global {
        qm.remove_overlaps_and_compact(
            params.disable_thresh,
            0,
            params.min_length,
            params.num_matches,
        );
        crate::matches::sort_for_report(&mut qm.matches);
    }

    if verbose {
        eprintln!(
            "[INFO] SWIFT hits: {}, total length: {}, longest: {}",
            stats.swift_hits, stats.total_parallelogram_length, stats.max_parallelogram_length
        );
    }

    Ok(SearchOutcome {
        matches: global,
        stats,
    })
}

/// Scan one contig on one strand with a private match buffer.
#[allow(clippy::too_many_arguments)]
fn scan_contig(
    db_idx: usize,
    contig: &SeqRecord,
    strand: Strand,
    queries: &[SeqRecord],
    filter: &SwiftFilter<'_, '_>,
    params: &SearchParams,
    band_delta: usize,
    segment_target: Option<(usize, (usize, usize))>,
) -> Result<(Vec<QueryMatches>, usize, KernelStats)> {
    let mut local: Vec<QueryMatches> = (0..queries.len()).map(|_| QueryMatches::default()).collect();
    let mut local_compact = params.compact_thresh;
    let mut stats = KernelStats::default();

    let len = contig.seq.len();
    let span = match segment_target {
        Some((seg_idx, _)) if seg_idx != db_idx => return Ok((local, local_compact, stats)),
        Some((_, (begin, end))) => match strand {
            Strand::Forward => (begin, end),
            // the region is given in forward coordinates
            Strand::Reverse => (len - end, len - begin),
        },
        None => (0, len),
    };

    let scan_seq: std::borrow::Cow<[u8]> = match strand {
        Strand::Forward => std::borrow::Cow::Borrowed(&contig.seq),
        Strand::Reverse => std::borrow::Cow::Owned(reverse_complement(&contig.seq, params.alphabet)),
    };

    let repeats = find_repeats(&scan_seq, params.min_repeat_length, params.max_repeat_period);
    let mut mask = RepeatMask::new(repeats);
    let hits = filter.scan(&scan_seq, span, &mut mask);

    for hit in &hits {
        stats.swift_hits += 1;
        stats.total_parallelogram_length += hit.db_end - hit.db_begin;
        stats.max_parallelogram_length = stats.max_parallelogram_length.max(hit.db_end - hit.db_begin);

        let qm = &mut local[hit.query_id as usize];
        if qm.disabled {
            continue;
        }
        let query_seq = &queries[hit.query_id as usize].seq;
        let alignments = verify_swift_hit(hit, &scan_seq, query_seq, params, band_delta)?;
        for alignment in alignments {
            let alignment = match strand {
                Strand::Forward => alignment,
                Strand::Reverse => reflect_to_forward(alignment, len),
            };
            qm.insert(
                EpsMatch {
                    query_id: hit.query_id,
                    db_id: db_idx as u32,
                    strand,
                    alignment,
                },
                params.min_length,
                params.disable_thresh,
                &mut local_compact,
                params.num_matches,
            );
        }
    }
    Ok((local, local_compact, stats))
}

/// Reflect reverse-strand database coordinates onto the forward strand;
/// the alignment columns keep reading along the reverse complement.
fn reflect_to_forward(mut alignment: Alignment, db_len: usize) -> Alignment {
    let begin = db_len - alignment.db_end;
    let end = db_len - alignment.db_begin;
    alignment.db_begin = begin;
    alignment.db_end = end;
    alignment
}
