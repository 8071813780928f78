//! Streaming parser for SAM alignment rows.
//!
//! Header lines (`@HD`, `@SQ`, ...) are skipped. Each alignment row must have
//! at least the 11 mandatory tab-separated columns:
//!
//! | Column | Index | Used as |
//! |--------|-------|---------|
//! | QNAME  | 0     | identifier |
//! | RNAME  | 2     | reference (`*` = unmapped) |
//! | POS    | 3     | 1-based position, stored 0-based (`0` = unavailable) |
//! | CIGAR  | 5     | kept verbatim, decoded later |
//! | SEQ    | 9     | sequence (`*` = absent) |
//! | QUAL   | 10    | quality (`*` = absent) |

use std::io::BufRead;
use std::path::Path;

use crate::core::alignment::Alignment;
use crate::core::cigar::Cigar;
use crate::core::sequence::{Quality, Sequence};
use crate::parsing::input::{open_input, trim_line_end};
use crate::parsing::ParseError;
use crate::utils::validation::snippet;

/// Number of mandatory SAM columns
pub const MANDATORY_FIELDS: usize = 11;

/// Placeholder for absent RNAME, SEQ and QUAL values
pub const MISSING: &str = "*";

/// Lazy reader yielding one [`Alignment`] per SAM row
pub struct SamReader<R: BufRead> {
    reader: R,
    line: String,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> SamReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::with_capacity(512),
            line_number: 0,
            done: false,
        }
    }

    fn read_alignment(&mut self) -> Result<Option<Alignment>, ParseError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let row = trim_line_end(&self.line);
            if row.is_empty() || row.starts_with('@') {
                continue;
            }
            return parse_row(row, self.line_number).map(Some);
        }
    }
}

impl<R: BufRead> Iterator for SamReader<R> {
    type Item = Result<Alignment, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_alignment() {
            Ok(Some(alignment)) => Some(Ok(alignment)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for SamReader<R> {}

/// Parse one alignment row (without line terminator)
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the row has fewer than 11 columns or
/// an unparseable position, `ParseError::InvalidAlphabet` for a bad sequence or
/// quality, and `ParseError::LengthMismatch` if both are present with different
/// lengths.
pub fn parse_row(row: &str, line_number: usize) -> Result<Alignment, ParseError> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < MANDATORY_FIELDS {
        return Err(ParseError::InvalidFormat(format!(
            "line {line_number}: expected at least {MANDATORY_FIELDS} tab-separated fields, got {}",
            fields.len()
        )));
    }

    let identifier = fields[0].to_string();

    let reference = match fields[2] {
        MISSING => None,
        name => Some(name.to_string()),
    };

    let position: u64 = fields[3].parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "line {line_number}: invalid position {}",
            snippet(fields[3])
        ))
    })?;
    // 1-based in the file, 0 means no position
    let reference_position = position.checked_sub(1);

    let sequence = match fields[9] {
        MISSING => None,
        raw => Some(Sequence::new(raw).ok_or_else(|| {
            ParseError::InvalidAlphabet(format!(
                "line {line_number}: expected nucleotide/amino acid sequence, got {}",
                snippet(raw)
            ))
        })?),
    };

    let quality = match fields[10] {
        MISSING => None,
        raw => Some(Quality::new(raw).ok_or_else(|| {
            ParseError::InvalidAlphabet(format!(
                "line {line_number}: expected quality string, got {}",
                snippet(raw)
            ))
        })?),
    };

    if let (Some(seq), Some(qual)) = (&sequence, &quality) {
        if seq.len() != qual.len() {
            return Err(ParseError::LengthMismatch {
                record: identifier,
                sequence: seq.len(),
                quality: qual.len(),
            });
        }
    }

    Ok(Alignment {
        identifier,
        reference,
        reference_position,
        cigar: Cigar::new(fields[5]),
        sequence,
        quality,
    })
}

/// Open a SAM file (plain or gzip) as a lazy alignment stream
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn read_sam_file(path: &Path) -> Result<SamReader<Box<dyn BufRead>>, ParseError> {
    Ok(SamReader::new(open_input(path)?))
}
