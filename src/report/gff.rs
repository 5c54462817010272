//! GFF output, one feature line per eps-match.

use anyhow::Result;
use std::io::Write;

use crate::align::AlignOp;
use crate::matches::EpsMatch;
use crate::sequence::SeqRecord;

/// Query positions and symbols of all mismatch columns, 1-based.
fn mutations(m: &EpsMatch, query: &SeqRecord) -> String {
    let mut out = String::new();
    let mut q = m.q_begin();
    for &op in &m.alignment.ops {
        if op == AlignOp::Mismatch {
            if !out.is_empty() {
                out.push(',');
            }
            out.push_str(&(q + 1).to_string());
            out.push(query.seq[q] as char);
        }
        if op.advances_query() {
            q += 1;
        }
    }
    out
}

pub fn write_match(
    writer: &mut dyn Write,
    m: &EpsMatch,
    query: &SeqRecord,
    db: &SeqRecord,
) -> Result<()> {
    let mut attributes = format!(
        "ID={};seq2Range={},{};cigar={}",
        query.id,
        m.q_begin() + 1,
        m.q_end(),
        m.alignment.cigar()
    );
    let muts = mutations(m, query);
    if !muts.is_empty() {
        attributes.push_str(";mutations=");
        attributes.push_str(&muts);
    }
    writeln!(
        writer,
        "{}\tepsmatch\teps-match\t{}\t{}\t{:.4}\t{}\t.\t{}",
        db.id,
        m.db_begin() + 1,
        m.db_end(),
        m.alignment.percent_identity(),
        m.strand.symbol(),
        attributes
    )?;
    Ok(())
}
