//! Match report writers.

pub mod gff;
pub mod tabular;

use anyhow::{Context, Result};
use bio::io::fasta;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::matches::QueryMatches;
use crate::options::OutputFormat;
use crate::sequence::SeqRecord;

/// Write all retained matches, one line per match, to `out_path` or stdout.
pub fn write_report(
    matches: &[QueryMatches],
    queries: &[SeqRecord],
    database: &[SeqRecord],
    format: OutputFormat,
    out_path: Option<&PathBuf>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut writer: Box<dyn Write> = if let Some(path) = out_path {
        Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ))
    } else {
        Box::new(BufWriter::new(stdout.lock()))
    };

    for (query_id, qm) in matches.iter().enumerate() {
        for m in &qm.matches {
            debug_assert_eq!(m.query_id as usize, query_id);
            let query = &queries[query_id];
            let db = &database[m.db_id as usize];
            match format {
                OutputFormat::Gff => gff::write_match(&mut writer, m, query, db)?,
                OutputFormat::Tabular => tabular::write_match(&mut writer, m, query, db)?,
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write the disabled queries as FASTA.
pub fn write_disabled_fasta(
    path: &PathBuf,
    queries: &[SeqRecord],
    disabled_ids: &[usize],
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = fasta::Writer::new(BufWriter::new(file));
    for &id in disabled_ids {
        let record = &queries[id];
        writer.write(&record.id, None, &record.seq)?;
    }
    Ok(())
}
