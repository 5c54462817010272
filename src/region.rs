//! Genomic region parsing for contig-restricted runs.
//!
//! Syntax: `NAME`, `NAME:START`, or `NAME:START-END`. START and END are
//! 1-based and may contain comma digit groups (`1,000`). Internally the
//! region is 0-based half-open; unset fields keep the `u32::MAX` sentinel.

use crate::error::{Error, Result};
use std::fmt;

pub const INVALID_POS: u32 = u32::MAX;
pub const INVALID_ID: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicRegion {
    pub seq_name: String,
    /// Index into the database set, -1 until resolved.
    pub seq_id: i32,
    /// 0-based begin, `INVALID_POS` if absent.
    pub begin_pos: u32,
    /// 0-based exclusive end, `INVALID_POS` if absent.
    pub end_pos: u32,
}

impl GenomicRegion {
    pub fn new(seq_name: &str) -> Self {
        GenomicRegion {
            seq_name: seq_name.to_string(),
            seq_id: INVALID_ID,
            begin_pos: INVALID_POS,
            end_pos: INVALID_POS,
        }
    }

    pub fn has_begin(&self) -> bool {
        self.begin_pos != INVALID_POS
    }

    pub fn has_end(&self) -> bool {
        self.end_pos != INVALID_POS
    }

    /// Parse `NAME[:START[-END]]`. Commas within numbers are ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let (name, rest) = match input.split_once(':') {
            Some((n, r)) => (n, Some(r)),
            None => (input, None),
        };
        if name.is_empty() {
            return Err(Error::Parse("GenomicRegion: Empty sequence name".into()));
        }
        let mut region = GenomicRegion::new(name);

        let Some(rest) = rest else {
            return Ok(region);
        };

        let (start_str, end_str) = match rest.split_once('-') {
            Some((s, e)) => (s, Some(e)),
            None => (rest, None),
        };

        let start = parse_grouped_number(start_str)
            .ok_or_else(|| Error::Parse(format!("GenomicRegion: Invalid position {start_str}")))?;
        if start < 1 {
            return Err(Error::Parse(
                "GenomicRegion: Begin position less than 1".into(),
            ));
        }
        region.begin_pos = start - 1;

        if let Some(end_str) = end_str {
            let end = parse_grouped_number(end_str)
                .ok_or_else(|| Error::Parse(format!("GenomicRegion: Invalid position {end_str}")))?;
            if end < 1 {
                return Err(Error::Parse(
                    "GenomicRegion: End position less than 1".into(),
                ));
            }
            region.end_pos = end;
        }
        Ok(region)
    }

    /// Clamp the region to a concrete sequence length, yielding the
    /// half-open slice to scan.
    pub fn resolve_span(&self, seq_len: usize) -> (usize, usize) {
        let begin = if self.has_begin() {
            (self.begin_pos as usize).min(seq_len)
        } else {
            0
        };
        let end = if self.has_end() {
            (self.end_pos as usize).min(seq_len)
        } else {
            seq_len
        };
        (begin, end.max(begin))
    }
}

impl fmt::Display for GenomicRegion {
    /// Canonical form without comma groups; round-trips with `parse`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seq_name)?;
        if self.has_begin() {
            write!(f, ":{}", self.begin_pos + 1)?;
            if self.has_end() {
                write!(f, "-{}", self.end_pos)?;
            }
        }
        Ok(())
    }
}

fn parse_grouped_number(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    let mut saw_digit = false;
    for c in s.chars() {
        match c {
            '0'..='9' => {
                saw_digit = true;
                value = value * 10 + (c as u64 - '0' as u64);
                if value > u32::MAX as u64 {
                    return None;
                }
            }
            ',' => continue,
            _ => return None,
        }
    }
    if saw_digit {
        Some(value as u32)
    } else {
        None
    }
}
