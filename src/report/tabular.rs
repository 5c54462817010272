//! BLAST-style tabular output.

use anyhow::Result;
use std::io::Write;

use crate::matches::EpsMatch;
use crate::sequence::SeqRecord;

pub fn write_match(
    writer: &mut dyn Write,
    m: &EpsMatch,
    query: &SeqRecord,
    db: &SeqRecord,
) -> Result<()> {
    writeln!(
        writer,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{}",
        query.id,
        db.id,
        m.strand.symbol(),
        m.db_begin() + 1,
        m.db_end(),
        m.q_begin() + 1,
        m.q_end(),
        m.alignment.percent_identity(),
        m.alignment.cigar()
    )?;
    Ok(())
}
