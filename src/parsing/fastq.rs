//! Streaming FASTQ parser.
//!
//! Records are exactly four lines:
//!
//! ```text
//! @identifier optional description
//! SEQUENCE
//! +anything
//! QUALITY
//! ```
//!
//! The sequence must be entirely nucleotide or entirely amino acid, the quality
//! must be printable ASCII (`!`..=`~`), and both must have the same length.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::read::{split_header, Read};
use crate::core::sequence::{Quality, Sequence};
use crate::parsing::input::{open_input, trim_line_end, STDIN};
use crate::parsing::ParseError;
use crate::utils::validation::snippet;

/// Lazy reader yielding one [`Read`] per FASTQ record
pub struct FastqReader<R: BufRead> {
    reader: R,
    lines: [String; 4],
    line_number: usize,
    done: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lines: Default::default(),
            line_number: 0,
            done: false,
        }
    }

    /// Fill the four line buffers. Returns how many lines were read (0..=4).
    fn read_lines(&mut self) -> std::io::Result<usize> {
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.clear();
            if self.reader.read_line(line)? == 0 {
                return Ok(i);
            }
            self.line_number += 1;
        }
        Ok(4)
    }

    fn read_record(&mut self) -> Result<Option<Read>, ParseError> {
        let count = self.read_lines()?;
        if count == 0 {
            return Ok(None);
        }

        // Identifier first so a stray line reads as a format problem
        let record_start = self.line_number + 1 - count;
        let header_line = trim_line_end(&self.lines[0]);
        let Some(header) = header_line.strip_prefix('@') else {
            return Err(ParseError::InvalidFormat(format!(
                "line {record_start}: expected @READ_IDENTIFIER, got {}",
                snippet(header_line)
            )));
        };

        if count < 4 {
            return Err(ParseError::Truncated(self.line_number));
        }

        let separator = trim_line_end(&self.lines[2]);
        if !separator.starts_with('+') {
            return Err(ParseError::InvalidFormat(format!(
                "line {}: expected +..., got {}",
                record_start + 2,
                snippet(separator)
            )));
        }

        let Some((identifier, description)) = split_header(header) else {
            return Err(ParseError::InvalidFormat(format!(
                "line {record_start}: missing read identifier"
            )));
        };

        let sequence_line = trim_line_end(&self.lines[1]);
        let sequence = Sequence::new(sequence_line).ok_or_else(|| {
            ParseError::InvalidAlphabet(format!(
                "line {}: expected nucleotide/amino acid sequence, got {}",
                record_start + 1,
                snippet(sequence_line)
            ))
        })?;

        let quality_line = trim_line_end(&self.lines[3]);
        let quality = Quality::new(quality_line).ok_or_else(|| {
            ParseError::InvalidAlphabet(format!(
                "line {}: expected quality string, got {}",
                record_start + 3,
                snippet(quality_line)
            ))
        })?;

        if sequence.len() != quality.len() {
            return Err(ParseError::LengthMismatch {
                record: identifier,
                sequence: sequence.len(),
                quality: quality.len(),
            });
        }

        Ok(Some(
            Read::new(identifier, sequence)
                .with_description(description)
                .with_quality(quality),
        ))
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<Read, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(read)) => Some(Ok(read)),
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

impl<R: BufRead> std::iter::FusedIterator for FastqReader<R> {}

/// Open a FASTQ file (plain or gzip, or `-` for stdin) as a lazy record stream
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn read_fastq_file(path: &Path) -> Result<FastqReader<Box<dyn BufRead>>, ParseError> {
    Ok(FastqReader::new(open_input(path)?))
}

/// Reads from several FASTQ sources in order, or from stdin when given none.
///
/// Each source is opened only when the previous one is exhausted, and is
/// closed as soon as it ends or fails.
pub struct MultiFastqReader {
    pending: std::vec::IntoIter<PathBuf>,
    current: Option<(PathBuf, FastqReader<Box<dyn BufRead>>)>,
    done: bool,
}

impl MultiFastqReader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let paths = if paths.is_empty() {
            vec![PathBuf::from(STDIN)]
        } else {
            paths
        };
        Self {
            pending: paths.into_iter(),
            current: None,
            done: false,
        }
    }
}

impl Iterator for MultiFastqReader {
    type Item = Result<Read, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if let Some((path, reader)) = self.current.as_mut() {
                match reader.next() {
                    Some(Ok(read)) => return Some(Ok(read)),
                    Some(Err(e)) => {
                        self.done = true;
                        self.current = None;
                        return Some(Err(e));
                    }
                    None => {
                        info!(source = %path.display(), "Finished processing reads");
                        self.current = None;
                    }
                }
            }

            let Some(path) = self.pending.next() else {
                self.done = true;
                break;
            };
            info!(source = %path.display(), "Processing reads");
            match read_fastq_file(&path) {
                Ok(reader) => self.current = Some((path, reader)),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
