//! FASTA loading and sequence-level helpers.

use anyhow::{Context, Result};
use bio::io::fasta;
use rustc_hash::FxHashSet;
use std::path::Path;

use crate::alphabet::Alphabet;

/// One named sequence, id truncated at the first whitespace.
#[derive(Debug, Clone)]
pub struct SeqRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Read all records of a FASTA file. Non-unique ids are accepted with a
/// warning; downstream bookkeeping is positional, so duplicates only affect
/// readability of the report.
pub fn read_fasta(path: &Path) -> Result<Vec<SeqRecord>> {
    let reader = fasta::Reader::from_file(path)
        .with_context(|| format!("failed to open FASTA file {}", path.display()))?;

    let mut records = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for result in reader.records() {
        let record = result.with_context(|| format!("failed to parse {}", path.display()))?;
        let id = record
            .id()
            .split_whitespace()
            .next()
            .unwrap_or("unknown")
            .to_string();
        if !seen.insert(id.clone()) {
            eprintln!("[WARN] duplicate sequence id '{id}' in {}", path.display());
        }
        records.push(SeqRecord {
            id,
            seq: record.seq().to_vec(),
        });
    }
    Ok(records)
}

/// Reverse complement under the given alphabet; ambiguous symbols map to N.
pub fn reverse_complement(seq: &[u8], alphabet: Alphabet) -> Vec<u8> {
    seq.iter().rev().map(|&b| alphabet.complement(b)).collect()
}
