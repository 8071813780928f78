//! Streaming parsers for FASTA, FASTQ and SAM text.
//!
//! Every parser is an [`Iterator`] over `Result<Record, ParseError>`. Records
//! are validated as they are read and the first invalid record ends the
//! stream: the error is yielded once and every later call returns `None`.
//!
//! - **FASTA**: `>` headers, multi-line sequences, per-line alphabet check
//! - **FASTQ**: strict four-line records with matching sequence/quality lengths
//! - **SAM**: tab-separated rows with 11 mandatory columns, headers skipped
//!
//! [`input::open_input`] turns a path into a buffered text stream, decoding
//! gzip when the name ends in `.gz` or `.bgz`.
//!
//! ## Example
//!
//! ```rust
//! use ngs_stats::parsing::fastq::FastqReader;
//!
//! let text = "@id desc\nACAC\n+\nAAAA\n";
//! let reads: Vec<_> = FastqReader::new(text.as_bytes())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(reads[0].identifier, "id");
//! ```

use thiserror::Error;

pub mod fasta;
pub mod fastq;
pub mod input;
pub mod sam;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A structural marker is missing or a field cannot be interpreted
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A character outside the sequence or quality alphabet
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("Sequence and quality length mismatch for record '{record}': {sequence} != {quality}")]
    LengthMismatch {
        record: String,
        sequence: usize,
        quality: usize,
    },

    #[error("Truncated FASTQ file: {0} lines is not a multiple of 4")]
    Truncated(usize),
}
