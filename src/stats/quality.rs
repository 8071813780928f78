//! Mean base quality at each read position.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::read::Read;
use crate::parsing::fastq::MultiFastqReader;
use crate::parsing::ParseError;
use crate::stats::Mean;

/// Per-position quality summary over a set of reads
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub total_reads: u64,
    /// Reads that carried a quality string
    pub reads_with_quality: u64,
    /// Mean Phred score at positions `0..=max read length - 1`
    pub mean_quality_by_position: Vec<Option<f64>>,
}

/// Accumulates Phred scores by read position
#[derive(Debug, Default)]
pub struct QualityDistribution {
    positions: Vec<Mean>,
    total_reads: u64,
    reads_with_quality: u64,
}

impl QualityDistribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one read. Reads without quality only add to the read count.
    pub fn add(&mut self, read: &Read) {
        self.total_reads += 1;
        let Some(quality) = read.quality.as_ref() else {
            return;
        };
        self.reads_with_quality += 1;
        if self.positions.len() < quality.len() {
            self.positions.resize(quality.len(), Mean::default());
        }
        for (mean, score) in self.positions.iter_mut().zip(quality.scores()) {
            mean.push(f64::from(score));
        }
    }

    #[must_use]
    pub fn finish(self) -> QualityReport {
        QualityReport {
            total_reads: self.total_reads,
            reads_with_quality: self.reads_with_quality,
            mean_quality_by_position: self.positions.iter().map(Mean::get).collect(),
        }
    }
}

/// Build the quality distribution of a read stream
///
/// # Errors
///
/// Returns the first parse error from the stream.
pub fn compute_quality_distribution<I>(reads: I) -> Result<QualityReport, ParseError>
where
    I: IntoIterator<Item = Result<Read, ParseError>>,
{
    let mut distribution = QualityDistribution::new();
    for read in reads {
        distribution.add(&read?);
    }
    Ok(distribution.finish())
}

/// Build the quality distribution over one or more FASTQ files (stdin when
/// `paths` is empty)
///
/// # Errors
///
/// Returns `ParseError` if a file cannot be read or holds an invalid record.
pub fn evaluate_quality(paths: Vec<PathBuf>) -> Result<QualityReport, ParseError> {
    compute_quality_distribution(MultiFastqReader::new(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::{Quality, Sequence};
    use crate::parsing::fastq::FastqReader;

    #[test]
    fn test_mean_by_position() {
        let mut distribution = QualityDistribution::new();
        // '+' = 10, '5' = 20, 'I' = 40
        let read = |id: &str, seq: &str| Read::new(id, Sequence::new(seq).unwrap());
        distribution.add(&read("a", "ACG").with_quality(Quality::new("+5I").unwrap()));
        distribution.add(&read("b", "AC").with_quality(Quality::new("5+").unwrap()));
        distribution.add(&read("c", "ACGT"));

        let report = distribution.finish();
        assert_eq!(report.total_reads, 3);
        assert_eq!(report.reads_with_quality, 2);
        assert_eq!(
            report.mean_quality_by_position,
            vec![Some(15.0), Some(15.0), Some(40.0)]
        );
    }

    #[test]
    fn test_empty_input() {
        let report = compute_quality_distribution(FastqReader::new(&b""[..])).unwrap();
        assert_eq!(report.total_reads, 0);
        assert!(report.mean_quality_by_position.is_empty());
    }

    #[test]
    fn test_parse_error_propagates() {
        let result = compute_quality_distribution(FastqReader::new(&b"@r\nACGT\n+\nII\n"[..]));
        assert!(matches!(result, Err(ParseError::LengthMismatch { .. })));
    }
}
