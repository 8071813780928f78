//! # ngs-stats
//!
//! A library for strict parsing of sequencing reads and alignments, and for
//! measuring how aligned reads differ from their reference.
//!
//! Sequencing technologies make characteristic errors: some substitute bases,
//! others insert or drop bases, often next to long runs of the same base.
//! `ngs-stats` walks each alignment's CIGAR string against the reference and
//! tallies every substitution, insertion and deletion so these profiles can be
//! compared between runs, chemistries or basecallers.
//!
//! ## Features
//!
//! - **Strict streaming parsers**: FASTA, FASTQ and SAM readers that validate
//!   alphabets, qualities and lengths, and stop at the first bad record
//! - **CIGAR interpretation**: Decoding of all nine operations with their
//!   reference/query consumption rules
//! - **Error profiling**: Per-alignment error rates, event counts, indel lengths
//!   and the qualities of erroneous bases
//! - **Homopolymer detection**: Flags insertions adjacent to long single-base runs
//! - **Secondary reports**: Coverage, per-position quality and GC content
//! - **Transparent decompression**: gzip/bgzip inputs and stdin
//!
//! ## Example
//!
//! ```rust
//! use ngs_stats::parsing::fasta::load_contigs;
//! use ngs_stats::parsing::sam::SamReader;
//! use ngs_stats::stats::mismatch::{compute_mismatch_stats, BaseChange, MismatchConfig};
//!
//! let contigs = load_contigs(">chr1\nACGTACGTAC\n".as_bytes()).unwrap();
//! let sam = "r1\t0\tchr1\t1\t60\t4M1I5M\t*\t0\t0\tACGTTACGTA\tIIIIIIIIII\n";
//!
//! let stats = compute_mismatch_stats(
//!     &contigs,
//!     SamReader::new(sam.as_bytes()),
//!     &MismatchConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(stats.events.get(&BaseChange::insertion(b'T')), 1);
//! assert_eq!(stats.mean_insertion_length, Some(1.0));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for reads, alignments, contigs and CIGAR strings
//! - [`parsing`]: Parsers for FASTA, FASTQ and SAM, and input decompression
//! - [`stats`]: Mismatch, coverage, quality and GC-content statistics
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod stats;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::alignment::Alignment;
pub use core::cigar::{Cigar, CigarOp, Kind};
pub use core::contig::{Contig, ContigSet};
pub use core::read::Read;
pub use core::sequence::{Quality, Sequence};
pub use parsing::ParseError;
pub use stats::mismatch::{MismatchConfig, MismatchStats};
pub use stats::StatsError;
