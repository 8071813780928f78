//! Per-contig read depth.
//!
//! Every contig gets a depth array with `length + 1` slots. Each mapped
//! alignment adds one to `depth[position + i]` for every query base `i`,
//! stopping at the end of the array. Gaps in the alignment (deletions, skips)
//! are not taken into account.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::alignment::Alignment;
use crate::core::contig::ContigSet;
use crate::parsing::fasta::load_contigs_file;
use crate::parsing::sam::read_sam_file;
use crate::parsing::ParseError;
use crate::stats::{count_to_f64, StatsError};

/// Default moving-average window
pub const DEFAULT_WINDOW: usize = 1000;

/// Configuration for coverage evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Window size of the smoothed depth track
    pub window: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

/// Depth summary for one contig
#[derive(Debug, Clone, Serialize)]
pub struct ContigCoverage {
    pub name: String,
    pub length: usize,
    /// Mean over all `length + 1` slots
    pub mean_depth: f64,
    pub max_depth: u32,
    #[serde(skip)]
    pub depth: Vec<u32>,
}

impl ContigCoverage {
    fn new(name: String, length: usize, depth: Vec<u32>) -> Self {
        let total: u64 = depth.iter().map(|&d| u64::from(d)).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean_depth = if depth.is_empty() {
            0.0
        } else {
            total as f64 / count_to_f64(depth.len())
        };
        let max_depth = depth.iter().copied().max().unwrap_or(0);
        Self {
            name,
            length,
            mean_depth,
            max_depth,
            depth,
        }
    }

    /// Depth smoothed over `window` slots
    #[must_use]
    pub fn track(&self, window: usize) -> Vec<f64> {
        moving_average(&self.depth, window)
    }
}

/// Coverage over every loaded contig, in reference order
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub contigs: Vec<ContigCoverage>,
    pub alignments_counted: u64,
    pub alignments_skipped: u64,
}

/// Sliding-window means of `values`.
///
/// Returns `values.len() - window + 1` entries, or nothing when `window` is 0
/// or longer than `values`.
///
/// # Examples
///
/// ```
/// use ngs_stats::stats::coverage::moving_average;
///
/// assert_eq!(moving_average(&[1, 2, 3, 4], 2), vec![1.5, 2.5, 3.5]);
/// assert!(moving_average(&[1, 2], 3).is_empty());
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn moving_average(values: &[u32], window: usize) -> Vec<f64> {
    if window == 0 || window > values.len() {
        return Vec::new();
    }

    let mut cumsum = Vec::with_capacity(values.len() + 1);
    cumsum.push(0u64);
    let mut running = 0u64;
    for &v in values {
        running += u64::from(v);
        cumsum.push(running);
    }

    let width = count_to_f64(window);
    cumsum
        .windows(window + 1)
        .map(|w| (w[window] - w[0]) as f64 / width)
        .collect()
}

/// Accumulates depth arrays across alignments
#[derive(Debug)]
pub struct CoverageCounter<'a> {
    contigs: &'a ContigSet,
    depths: Vec<Vec<u32>>,
    alignments_counted: u64,
    alignments_skipped: u64,
}

impl<'a> CoverageCounter<'a> {
    pub fn new(contigs: &'a ContigSet) -> Self {
        let depths = contigs.iter().map(|c| vec![0; c.length() + 1]).collect();
        Self {
            contigs,
            depths,
            alignments_counted: 0,
            alignments_skipped: 0,
        }
    }

    /// Add one alignment's query bases to its contig's depth array.
    ///
    /// Returns false when the alignment was skipped (unmapped, no position or
    /// no sequence).
    ///
    /// # Errors
    ///
    /// Returns `StatsError::UnknownReference` if the alignment names a contig
    /// that was not loaded.
    pub fn add(&mut self, alignment: &Alignment) -> Result<bool, StatsError> {
        let Some(reference) = alignment.reference.as_deref() else {
            self.alignments_skipped += 1;
            return Ok(false);
        };
        let index =
            self.contigs
                .index_of(reference)
                .ok_or_else(|| StatsError::UnknownReference {
                    alignment: alignment.identifier.clone(),
                    reference: reference.to_string(),
                })?;
        let (Some(position), Some(sequence)) =
            (alignment.reference_position, alignment.sequence.as_ref())
        else {
            self.alignments_skipped += 1;
            return Ok(false);
        };

        let depth = &mut self.depths[index];
        let start = usize::try_from(position)
            .unwrap_or(usize::MAX)
            .min(depth.len());
        let end = start.saturating_add(sequence.len()).min(depth.len());
        for slot in &mut depth[start..end] {
            *slot = slot.saturating_add(1);
        }

        self.alignments_counted += 1;
        Ok(true)
    }

    #[must_use]
    pub fn finish(self) -> CoverageReport {
        let contigs = self
            .contigs
            .iter()
            .zip(self.depths)
            .map(|(contig, depth)| ContigCoverage::new(contig.name.clone(), contig.length(), depth))
            .collect();
        CoverageReport {
            contigs,
            alignments_counted: self.alignments_counted,
            alignments_skipped: self.alignments_skipped,
        }
    }
}

/// Compute depth arrays for a stream of alignments
///
/// # Errors
///
/// Returns the first parse error from the stream or the first unknown
/// reference.
pub fn compute_coverage<I>(contigs: &ContigSet, alignments: I) -> Result<CoverageReport, StatsError>
where
    I: IntoIterator<Item = Result<Alignment, ParseError>>,
{
    let mut counter = CoverageCounter::new(contigs);
    for result in alignments {
        let alignment = result?;
        if !counter.add(&alignment)? {
            debug!(alignment = %alignment.identifier, "Skipping alignment without coverage");
        }
    }
    Ok(counter.finish())
}

/// Load a reference FASTA and compute depth arrays from a SAM file
///
/// # Errors
///
/// Returns `StatsError::Parse` if either file cannot be read or is invalid, and
/// `StatsError::UnknownReference` if an alignment names a missing contig.
pub fn evaluate_coverage(reference: &Path, alignment: &Path) -> Result<CoverageReport, StatsError> {
    let contigs = load_contigs_file(reference)?;
    let report = compute_coverage(&contigs, read_sam_file(alignment)?)?;
    info!(
        contigs = report.contigs.len(),
        counted = report.alignments_counted,
        "Computed coverage"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cigar::Cigar;
    use crate::core::contig::Contig;
    use crate::core::sequence::Sequence;
    use crate::parsing::sam::SamReader;

    fn contigs() -> ContigSet {
        [("chr1", "ACGTACGT"), ("chr2", "ACGT")]
            .iter()
            .map(|(name, seq)| Contig::new(*name, Sequence::new(*seq).unwrap()))
            .collect()
    }

    fn alignment(reference: &str, pos: u64, seq: &str) -> Alignment {
        Alignment {
            identifier: "read".to_string(),
            reference: Some(reference.to_string()),
            reference_position: Some(pos),
            cigar: Cigar::new(format!("{}M", seq.len())),
            sequence: Sequence::new(seq),
            quality: None,
        }
    }

    #[test]
    fn test_depth_accumulates() {
        let refs = contigs();
        let mut counter = CoverageCounter::new(&refs);
        assert!(counter.add(&alignment("chr1", 0, "ACGT")).unwrap());
        assert!(counter.add(&alignment("chr1", 2, "GTAC")).unwrap());

        let report = counter.finish();
        let chr1 = &report.contigs[0];
        assert_eq!(chr1.depth, vec![1, 1, 2, 2, 1, 1, 0, 0, 0]);
        assert_eq!(chr1.length, 8);
        assert_eq!(chr1.max_depth, 2);
        assert!((chr1.mean_depth - 8.0 / 9.0).abs() < 1e-9);

        let chr2 = &report.contigs[1];
        assert_eq!(chr2.depth, vec![0; 5]);
        assert!((chr2.mean_depth - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_depth_clipped_at_contig_end() {
        let refs = contigs();
        let mut counter = CoverageCounter::new(&refs);
        counter.add(&alignment("chr2", 2, "GTAAAA")).unwrap();
        counter.add(&alignment("chr2", 10, "A")).unwrap();
        let report = counter.finish();
        assert_eq!(report.contigs[1].depth, vec![0, 0, 1, 1, 1]);
        assert_eq!(report.alignments_counted, 2);
    }

    #[test]
    fn test_skips_and_unknown_reference() {
        let refs = contigs();
        let mut counter = CoverageCounter::new(&refs);

        let mut unmapped = alignment("chr1", 0, "ACGT");
        unmapped.reference = None;
        assert!(!counter.add(&unmapped).unwrap());

        let mut no_sequence = alignment("chr1", 0, "ACGT");
        no_sequence.sequence = None;
        assert!(!counter.add(&no_sequence).unwrap());

        assert!(matches!(
            counter.add(&alignment("chrX", 0, "ACGT")),
            Err(StatsError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_compute_from_sam() {
        let refs = contigs();
        let sam = "@HD\tVN:1.6\nr1\t0\tchr2\t2\t60\t2M\t*\t0\t0\tCG\tII\n";
        let report = compute_coverage(&refs, SamReader::new(sam.as_bytes())).unwrap();
        assert_eq!(report.contigs[1].depth, vec![0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_moving_average() {
        assert_eq!(moving_average(&[2, 4, 6], 1), vec![2.0, 4.0, 6.0]);
        assert_eq!(moving_average(&[2, 4, 6], 3), vec![4.0]);
        assert!(moving_average(&[2, 4, 6], 0).is_empty());
        assert!(moving_average(&[], 1).is_empty());

        let coverage = ContigCoverage::new("c".to_string(), 3, vec![0, 2, 2, 0]);
        assert_eq!(coverage.track(2), vec![1.0, 2.0, 1.0]);
    }
}
