//! Per-read GC percentage histogram.
//!
//! Only bases whose quality character is at least `min_base_quality` are
//! "good" and take part in the computation. A read lands in bucket
//! `round(100 * gc / good)`, with halves rounded to even.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::read::Read;
use crate::parsing::fastq::MultiFastqReader;
use crate::parsing::ParseError;
use crate::stats::count_to_f64;
use crate::utils::validation::MIN_QUALITY_CHAR;

/// Number of histogram buckets, one per whole percent
pub const BUCKETS: usize = 101;

/// Default minimum number of good bases for a read to be kept
pub const DEFAULT_MIN_GOOD_BASES: usize = 0;

/// Default minimum fraction of good bases for a read to be kept
pub const DEFAULT_MIN_GOOD_BASES_FRACTION: f64 = 0.0;

/// Read and base filters for the GC histogram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcContentConfig {
    /// Lowest quality character counted as a good base
    pub min_base_quality: char,
    pub min_good_bases: usize,
    pub min_good_bases_fraction: f64,
}

impl Default for GcContentConfig {
    fn default() -> Self {
        Self {
            min_base_quality: char::from(MIN_QUALITY_CHAR),
            min_good_bases: DEFAULT_MIN_GOOD_BASES,
            min_good_bases_fraction: DEFAULT_MIN_GOOD_BASES_FRACTION,
        }
    }
}

/// Histogram of read GC percentages
#[derive(Debug, Clone, Serialize)]
pub struct GcContentReport {
    /// `histogram[p]` is the number of kept reads with GC percentage `p`
    pub histogram: Vec<u64>,
    pub kept_reads: u64,
    pub discarded_reads: u64,
    pub total_reads: u64,
    pub discarded_fraction: f64,
}

/// Accumulates the GC histogram read by read
#[derive(Debug)]
pub struct GcHistogram {
    config: GcContentConfig,
    histogram: Vec<u64>,
    kept_reads: u64,
    discarded_reads: u64,
}

impl GcHistogram {
    #[must_use]
    pub fn new(config: GcContentConfig) -> Self {
        Self {
            config,
            histogram: vec![0; BUCKETS],
            kept_reads: 0,
            discarded_reads: 0,
        }
    }

    /// GC percentage bucket for `read`, or None when it fails the filters.
    ///
    /// Reads without quality treat every base as good.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bucket(&self, read: &Read) -> Option<usize> {
        let min_quality = u32::from(self.config.min_base_quality);
        let total = read.sequence.len();
        let (good, gc) = match read.quality.as_ref() {
            Some(_) => read
                .bases_with_quality()
                .filter(|&(_, q)| u32::from(q) >= min_quality)
                .fold((0usize, 0usize), |(good, gc), (base, _)| {
                    (good + 1, gc + usize::from(is_gc(base)))
                }),
            None => (total, gc_count(read.sequence.as_bytes())),
        };

        if good == 0
            || good < self.config.min_good_bases
            || count_to_f64(good) / count_to_f64(total) < self.config.min_good_bases_fraction
        {
            return None;
        }

        let percent = (count_to_f64(gc) * 100.0 / count_to_f64(good)).round_ties_even();
        Some((percent as usize).min(BUCKETS - 1))
    }

    /// Count one read; returns whether it was kept
    pub fn add(&mut self, read: &Read) -> bool {
        match self.bucket(read) {
            Some(bucket) => {
                self.histogram[bucket] += 1;
                self.kept_reads += 1;
                true
            }
            None => {
                self.discarded_reads += 1;
                false
            }
        }
    }

    #[must_use]
    pub fn finish(self) -> GcContentReport {
        let total_reads = self.kept_reads + self.discarded_reads;
        #[allow(clippy::cast_precision_loss)]
        let discarded_fraction = if total_reads > 0 {
            self.discarded_reads as f64 / total_reads as f64
        } else {
            0.0
        };
        GcContentReport {
            histogram: self.histogram,
            kept_reads: self.kept_reads,
            discarded_reads: self.discarded_reads,
            total_reads,
            discarded_fraction,
        }
    }
}

fn is_gc(base: u8) -> bool {
    matches!(base, b'G' | b'C' | b'g' | b'c')
}

fn gc_count(bases: &[u8]) -> usize {
    bases.iter().filter(|&&b| is_gc(b)).count()
}

/// Build the GC histogram of a read stream
///
/// # Errors
///
/// Returns the first parse error from the stream.
pub fn compute_gc_content<I>(
    reads: I,
    config: &GcContentConfig,
) -> Result<GcContentReport, ParseError>
where
    I: IntoIterator<Item = Result<Read, ParseError>>,
{
    let mut histogram = GcHistogram::new(config.clone());
    for read in reads {
        histogram.add(&read?);
    }
    Ok(histogram.finish())
}

/// Build the GC histogram over one or more FASTQ files (stdin when `paths` is
/// empty)
///
/// # Errors
///
/// Returns `ParseError` if a file cannot be read or holds an invalid record.
pub fn evaluate_gc_content(
    paths: Vec<PathBuf>,
    config: &GcContentConfig,
) -> Result<GcContentReport, ParseError> {
    compute_gc_content(MultiFastqReader::new(paths), config)
}
