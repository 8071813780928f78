//! Streaming FASTA parser.
//!
//! A header line starts with `>`; its first whitespace-delimited token is the
//! identifier and the rest is the description. Sequence lines up to the next
//! header are trimmed and concatenated. Each sequence line must be entirely
//! nucleotide (`ATCGUN`) or entirely amino acid (`ACDEFGHIKLMNPQRSTVWYZ`),
//! ignoring case. Blank lines are skipped.
//!
//! Supported inputs: plain, gzip and bgzip (see [`crate::parsing::input`]).

use std::io::BufRead;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::contig::{Contig, ContigSet};
use crate::core::read::{split_header, Read};
use crate::core::sequence::Sequence;
use crate::parsing::input::open_input;
use crate::parsing::ParseError;
use crate::utils::validation::{is_valid_sequence, snippet};

/// Lazy reader yielding one [`Read`] per FASTA record (quality always absent)
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: String,
    line_number: usize,
    header: Option<(String, String)>,
    sequence: String,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::with_capacity(256),
            line_number: 0,
            header: None,
            sequence: String::new(),
            done: false,
        }
    }

    fn fail(&mut self, error: ParseError) -> Option<Result<Read, ParseError>> {
        self.done = true;
        Some(Err(error))
    }

    /// Finish the record under the current header, if it has any sequence.
    fn take_record(&mut self) -> Option<Read> {
        let (identifier, description) = self.header.take()?;
        if self.sequence.is_empty() {
            warn!(record = %identifier, "FASTA record has no sequence, skipping");
            return None;
        }
        let sequence = Sequence::from_validated_lines(std::mem::take(&mut self.sequence));
        Some(Read::new(identifier, sequence).with_description(description))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<Read, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.line.clear();
            let n = match self.reader.read_line(&mut self.line) {
                Ok(n) => n,
                Err(e) => return self.fail(e.into()),
            };
            if n == 0 {
                self.done = true;
                return self.take_record().map(Ok);
            }
            self.line_number += 1;

            let line = self.line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('>') {
                let Some(parsed) = split_header(header) else {
                    let msg = format!(
                        "line {}: expected >identifier, got {}",
                        self.line_number,
                        snippet(line)
                    );
                    return self.fail(ParseError::InvalidFormat(msg));
                };
                let finished = self.take_record();
                self.header = Some(parsed);
                if finished.is_some() {
                    return finished.map(Ok);
                }
            } else if self.header.is_none() {
                let msg = format!(
                    "line {}: expected >identifier, got {}",
                    self.line_number,
                    snippet(line)
                );
                return self.fail(ParseError::InvalidFormat(msg));
            } else if !is_valid_sequence(line) {
                let msg = format!(
                    "line {}: expected nucleotide/amino acid sequence, got {}",
                    self.line_number,
                    snippet(line)
                );
                return self.fail(ParseError::InvalidAlphabet(msg));
            } else {
                self.sequence.push_str(line);
            }
        }
        None
    }
}

impl<R: BufRead> std::iter::FusedIterator for FastaReader<R> {}

/// Open a FASTA file (plain or gzip) as a lazy record stream
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn read_fasta_file(path: &Path) -> Result<FastaReader<Box<dyn BufRead>>, ParseError> {
    Ok(FastaReader::new(open_input(path)?))
}

/// Load every record of a FASTA stream into a [`ContigSet`]
///
/// # Errors
///
/// Returns the first `ParseError` produced by the stream.
pub fn load_contigs<R: BufRead>(reader: R) -> Result<ContigSet, ParseError> {
    let mut contigs = ContigSet::new();
    for result in FastaReader::new(reader) {
        contigs.insert(Contig::from(result?));
    }
    Ok(contigs)
}

/// Load a reference FASTA file (plain or gzip) into a [`ContigSet`]
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the first
/// validation error in the file.
pub fn load_contigs_file(path: &Path) -> Result<ContigSet, ParseError> {
    let contigs = load_contigs(open_input(path)?)?;
    debug!(
        path = %path.display(),
        contigs = contigs.len(),
        bases = contigs.total_length(),
        "Loaded reference"
    );
    Ok(contigs)
}
