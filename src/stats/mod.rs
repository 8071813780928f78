//! Statistics computed from parsed reads and alignments.
//!
//! - [`mismatch`]: CIGAR-driven reconciliation of alignments against the
//!   reference, producing substitution/insertion/deletion counts and error rates
//! - [`homopolymer`]: homopolymer-adjacency test used for insertions
//! - [`coverage`]: per-contig depth arrays
//! - [`quality`]: mean base quality by read position
//! - [`gc_content`]: per-read GC percentage histogram
//!
//! ## Example
//!
//! ```rust
//! use ngs_stats::parsing::fasta::load_contigs;
//! use ngs_stats::parsing::sam::SamReader;
//! use ngs_stats::stats::mismatch::{compute_mismatch_stats, MismatchConfig};
//!
//! let contigs = load_contigs(">chr1\nACGTACGT\n".as_bytes()).unwrap();
//! let sam = "r1\t0\tchr1\t1\t60\t8M\t*\t0\t0\tACGTACGA\tIIIIIIII\n";
//! let stats = compute_mismatch_stats(
//!     &contigs,
//!     SamReader::new(sam.as_bytes()),
//!     &MismatchConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(stats.mean_error_rate, Some(1.0 / 8.0));
//! ```

use thiserror::Error;

use crate::parsing::ParseError;

pub mod coverage;
pub mod gc_content;
pub mod homopolymer;
pub mod mismatch;
pub mod quality;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Alignment '{alignment}' references unknown contig '{reference}'")]
    UnknownReference {
        alignment: String,
        reference: String,
    },
}

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Running arithmetic mean.
///
/// Equivalent to keeping the full list of samples and dividing its sum by its
/// length, without holding the samples in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// None when no samples were pushed
    #[must_use]
    pub fn get(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / count_to_f64(self.count))
    }
}
