//! Per-base error statistics from alignments reconciled against a reference.
//!
//! Each mapped alignment is walked operation by operation with two independent
//! 0-based offsets: one into the contig (starting at the alignment position)
//! and one into the query sequence/quality (starting at 0).
//!
//! | Op      | Reference | Query | Recorded |
//! |---------|-----------|-------|----------|
//! | M = X   | advance   | advance | one `(ref, query)` event per differing base |
//! | I       | -         | advance | one `(-, query)` event per inserted base |
//! | D       | advance   | -     | one `(ref, -)` event per deleted base |
//! | S       | -         | advance | nothing |
//! | N       | advance   | -     | nothing |
//! | H P     | -         | -     | nothing |
//!
//! The per-alignment error rate is `wrong / total` where inserted and deleted
//! bases count as both wrong and total positions. The summary error rate is the
//! unweighted mean of the per-alignment rates, so a 50 bp alignment weighs as
//! much as a 50 kb one.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::core::alignment::Alignment;
use crate::core::cigar::Kind;
use crate::core::contig::ContigSet;
use crate::parsing::fasta::load_contigs_file;
use crate::parsing::sam::{read_sam_file, SamReader};
use crate::parsing::ParseError;
use crate::stats::homopolymer::{is_homopolymer_adjacent, DEFAULT_HOMOPOLYMER_LENGTH};
use crate::stats::{count_to_f64, Mean, StatsError};
use crate::utils::validation::phred;

/// Configuration for mismatch evaluation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MismatchConfig {
    /// Minimum run length for an insertion to count as homopolymer-adjacent
    pub homopolymer_length: usize,
}

impl Default for MismatchConfig {
    fn default() -> Self {
        Self {
            homopolymer_length: DEFAULT_HOMOPOLYMER_LENGTH,
        }
    }
}

/// A single base-level difference. `None` on the reference side is an
/// insertion, `None` on the query side a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseChange {
    pub from: Option<u8>,
    pub to: Option<u8>,
}

impl BaseChange {
    #[must_use]
    pub fn substitution(from: u8, to: u8) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    #[must_use]
    pub fn insertion(to: u8) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    #[must_use]
    pub fn deletion(from: u8) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    fn side(base: Option<u8>) -> String {
        base.map(|b| char::from(b).to_string()).unwrap_or_default()
    }
}

impl std::fmt::Display for BaseChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = |b: Option<u8>| b.map_or('-', char::from);
        write!(f, "{}>{}", side(self.from), side(self.to))
    }
}

impl Serialize for BaseChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BaseChange", 2)?;
        state.serialize_field("from", &Self::side(self.from))?;
        state.serialize_field("to", &Self::side(self.to))?;
        state.end()
    }
}

/// Occurrence counts keyed by [`BaseChange`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCounts(BTreeMap<BaseChange, u64>);

impl EventCounts {
    /// Insert-or-increment
    pub fn record(&mut self, change: BaseChange) {
        *self.0.entry(change).or_insert(0) += 1;
    }

    #[must_use]
    pub fn get(&self, change: &BaseChange) -> u64 {
        self.0.get(change).copied().unwrap_or(0)
    }

    /// Number of distinct changes observed
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of events
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BaseChange, u64)> {
        self.0.iter().map(|(k, &v)| (k, v))
    }
}

#[derive(Serialize)]
struct EventCountEntry<'a> {
    #[serde(flatten)]
    change: &'a BaseChange,
    count: u64,
}

impl Serialize for EventCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.0
                .iter()
                .map(|(change, &count)| EventCountEntry { change, count }),
        )
    }
}

/// Wrong and total positions counted for one alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionCounts {
    pub wrong: usize,
    pub total: usize,
}

impl PositionCounts {
    /// None when no position was counted
    #[must_use]
    pub fn error_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| count_to_f64(self.wrong) / count_to_f64(self.total))
    }
}

/// Why an alignment contributed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unmapped,
    NoPosition,
    NoSequence,
}

/// Outcome of reconciling one alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Counted(PositionCounts),
    Skipped(SkipReason),
}

/// Summary statistics over all reconciled alignments.
///
/// Means over an empty sample set are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct MismatchStats {
    /// Substitution, insertion and deletion counts
    pub events: EventCounts,
    /// Unweighted mean of per-alignment error rates
    pub mean_error_rate: Option<f64>,
    pub mean_insertion_length: Option<f64>,
    pub mean_deletion_length: Option<f64>,
    /// Homopolymer-adjacent insertions / all insertion operations, 0 without insertions
    pub homopolymer_insertion_rate: f64,
    pub mean_insertion_quality: Option<f64>,
    pub mean_mismatch_quality: Option<f64>,
    pub alignments_counted: u64,
    pub alignments_skipped: u64,
    pub insertions: u64,
    pub homopolymer_insertions: u64,
}

/// Accumulates reconciliation results across alignments
#[derive(Debug)]
pub struct MismatchCounter<'a> {
    contigs: &'a ContigSet,
    config: MismatchConfig,
    events: EventCounts,
    error_rates: Mean,
    insertion_lengths: Mean,
    deletion_lengths: Mean,
    insertion_qualities: Mean,
    mismatch_qualities: Mean,
    homopolymer_insertions: u64,
    insertions: u64,
    alignments_counted: u64,
    alignments_skipped: u64,
}

/// `len` bytes from `start`, clipped to the end of `bytes`
fn window(bytes: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(bytes.len());
    let end = start.saturating_add(len).min(bytes.len());
    &bytes[start..end]
}

impl<'a> MismatchCounter<'a> {
    pub fn new(contigs: &'a ContigSet, config: MismatchConfig) -> Self {
        Self {
            contigs,
            config,
            events: EventCounts::default(),
            error_rates: Mean::default(),
            insertion_lengths: Mean::default(),
            deletion_lengths: Mean::default(),
            insertion_qualities: Mean::default(),
            mismatch_qualities: Mean::default(),
            homopolymer_insertions: 0,
            insertions: 0,
            alignments_counted: 0,
            alignments_skipped: 0,
        }
    }

    /// Reconcile one alignment against its contig and fold the result in.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::UnknownReference` if the alignment names a contig
    /// that was not loaded, or `StatsError::Parse` with
    /// `ParseError::InvalidFormat` if its CIGAR string is malformed.
    pub fn add(&mut self, alignment: &Alignment) -> Result<Reconciliation, StatsError> {
        let Some(reference) = alignment.reference.as_deref() else {
            return Ok(self.skip(SkipReason::Unmapped));
        };
        let contig = self
            .contigs
            .get(reference)
            .ok_or_else(|| StatsError::UnknownReference {
                alignment: alignment.identifier.clone(),
                reference: reference.to_string(),
            })?;
        let Some(position) = alignment.reference_position else {
            return Ok(self.skip(SkipReason::NoPosition));
        };
        let Some(sequence) = alignment.sequence.as_ref() else {
            return Ok(self.skip(SkipReason::NoSequence));
        };
        if !alignment.cigar.is_well_formed() {
            return Err(ParseError::InvalidFormat(format!(
                "alignment '{}': malformed CIGAR {:?}",
                alignment.identifier,
                alignment.cigar.as_str()
            ))
            .into());
        }

        let reference = contig.sequence.as_bytes();
        let query = sequence.as_bytes();
        let quality = alignment.quality.as_ref().map_or(&[][..], |q| q.as_bytes());

        let mut counts = PositionCounts::default();
        let mut reference_offset = usize::try_from(position).unwrap_or(usize::MAX);
        let mut query_offset = 0usize;

        for op in alignment.cigar.ops() {
            let n = op.len;
            match op.kind {
                Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                    let expected = window(reference, reference_offset, n);
                    let observed = window(query, query_offset, n);
                    let qualities = window(quality, query_offset, n);
                    for (i, (&from, &to)) in expected.iter().zip(observed).enumerate() {
                        if from != to {
                            counts.wrong += 1;
                            self.events.record(BaseChange::substitution(from, to));
                            if let Some(&q) = qualities.get(i) {
                                self.mismatch_qualities.push(f64::from(phred(q)));
                            }
                        }
                    }
                    counts.total += expected.len();
                    reference_offset = reference_offset.saturating_add(n);
                    query_offset = query_offset.saturating_add(n);
                }
                Kind::Insertion => {
                    let inserted = window(query, query_offset, n);
                    let qualities = window(quality, query_offset, n);
                    for &to in inserted {
                        self.events.record(BaseChange::insertion(to));
                    }
                    for &q in qualities {
                        self.insertion_qualities.push(f64::from(phred(q)));
                    }
                    counts.wrong += inserted.len();
                    counts.total += inserted.len();
                    self.insertion_lengths.push(count_to_f64(inserted.len()));

                    if is_homopolymer_adjacent(
                        reference,
                        reference_offset,
                        self.config.homopolymer_length,
                    ) {
                        self.homopolymer_insertions += 1;
                    }
                    self.insertions += 1;
                    query_offset = query_offset.saturating_add(n);
                }
                Kind::Deletion => {
                    let deleted = window(reference, reference_offset, n);
                    for &from in deleted {
                        self.events.record(BaseChange::deletion(from));
                    }
                    counts.wrong += deleted.len();
                    counts.total += deleted.len();
                    self.deletion_lengths.push(count_to_f64(deleted.len()));
                    reference_offset = reference_offset.saturating_add(n);
                }
                Kind::SoftClip => query_offset = query_offset.saturating_add(n),
                Kind::Skip => reference_offset = reference_offset.saturating_add(n),
                Kind::HardClip | Kind::Pad => {}
            }
        }

        if let Some(rate) = counts.error_rate() {
            self.error_rates.push(rate);
        }
        self.alignments_counted += 1;
        Ok(Reconciliation::Counted(counts))
    }

    fn skip(&mut self, reason: SkipReason) -> Reconciliation {
        self.alignments_skipped += 1;
        Reconciliation::Skipped(reason)
    }

    /// Aggregate everything seen so far into summary statistics
    #[must_use]
    pub fn finish(self) -> MismatchStats {
        #[allow(clippy::cast_precision_loss)]
        let homopolymer_insertion_rate = if self.insertions > 0 {
            self.homopolymer_insertions as f64 / self.insertions as f64
        } else {
            0.0
        };

        MismatchStats {
            events: self.events,
            mean_error_rate: self.error_rates.get(),
            mean_insertion_length: self.insertion_lengths.get(),
            mean_deletion_length: self.deletion_lengths.get(),
            homopolymer_insertion_rate,
            mean_insertion_quality: self.insertion_qualities.get(),
            mean_mismatch_quality: self.mismatch_qualities.get(),
            alignments_counted: self.alignments_counted,
            alignments_skipped: self.alignments_skipped,
            insertions: self.insertions,
            homopolymer_insertions: self.homopolymer_insertions,
        }
    }
}

/// Reconcile a stream of alignments against loaded contigs
///
/// # Errors
///
/// Returns the first parse error from the stream, or the first reconciliation
/// error (unknown reference, malformed CIGAR). No statistics are returned for
/// a failed run.
pub fn compute_mismatch_stats<I>(
    contigs: &ContigSet,
    alignments: I,
    config: &MismatchConfig,
) -> Result<MismatchStats, StatsError>
where
    I: IntoIterator<Item = Result<Alignment, ParseError>>,
{
    let mut counter = MismatchCounter::new(contigs, config.clone());
    for result in alignments {
        let alignment = result?;
        if let Reconciliation::Skipped(reason) = counter.add(&alignment)? {
            debug!(alignment = %alignment.identifier, ?reason, "Skipping alignment");
        }
    }
    Ok(counter.finish())
}

/// Reconcile SAM text against a FASTA reference held in memory readers
///
/// # Errors
///
/// See [`compute_mismatch_stats`].
pub fn evaluate_mismatch_readers<F: BufRead, S: BufRead>(
    reference: F,
    alignments: S,
    config: &MismatchConfig,
) -> Result<MismatchStats, StatsError> {
    let contigs = crate::parsing::fasta::load_contigs(reference)?;
    compute_mismatch_stats(&contigs, SamReader::new(alignments), config)
}

/// Load a reference FASTA and reconcile every alignment of a SAM file against it.
/// Both files may be gzip-compressed.
///
/// # Errors
///
/// Returns `StatsError::Parse` if either file cannot be read or is invalid, and
/// `StatsError::UnknownReference` if an alignment names a missing contig.
pub fn evaluate_mismatch_frequency(
    reference: &Path,
    alignment: &Path,
    config: &MismatchConfig,
) -> Result<MismatchStats, StatsError> {
    let contigs = load_contigs_file(reference)?;
    info!(contigs = contigs.len(), "Loaded reference contigs");
    let stats = compute_mismatch_stats(&contigs, read_sam_file(alignment)?, config)?;
    info!(
        counted = stats.alignments_counted,
        skipped = stats.alignments_skipped,
        "Reconciled alignments"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cigar::Cigar;
    use crate::core::contig::Contig;
    use crate::core::sequence::{Quality, Sequence};

    const EPS: f64 = 1e-9;

    fn contigs(entries: &[(&str, &str)]) -> ContigSet {
        entries
            .iter()
            .map(|(name, seq)| Contig::new(*name, Sequence::new(*seq).unwrap()))
            .collect()
    }

    fn alignment(reference: &str, pos: u64, cigar: &str, seq: &str, qual: &str) -> Alignment {
        Alignment {
            identifier: "read".to_string(),
            reference: Some(reference.to_string()),
            reference_position: Some(pos),
            cigar: Cigar::new(cigar),
            sequence: Sequence::new(seq),
            quality: Quality::new(qual),
        }
    }

    fn counted(wrong: usize, total: usize) -> Reconciliation {
        Reconciliation::Counted(PositionCounts { wrong, total })
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < EPS)
    }

    #[test]
    fn test_single_substitution() {
        let refs = contigs(&[("chr1", "ACGTACGTAC")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());

        // 0-based offset 2: G -> T
        let outcome = counter
            .add(&alignment("chr1", 0, "10M", "ACTTACGTAC", "IIII5IIIII"))
            .unwrap();
        assert_eq!(outcome, counted(1, 10));

        let stats = counter.finish();
        assert!(close(stats.mean_error_rate, 0.1));
        assert_eq!(stats.events.len(), 1);
        assert_eq!(stats.events.get(&BaseChange::substitution(b'G', b'T')), 1);
        assert!(close(stats.mean_mismatch_quality, 40.0));
        assert_eq!(stats.mean_insertion_length, None);
        assert_eq!(stats.mean_deletion_length, None);
        assert_eq!(stats.mean_insertion_quality, None);
        assert!((stats.homopolymer_insertion_rate - 0.0).abs() < EPS);
    }

    #[test]
    fn test_mismatch_quality_value() {
        let refs = contigs(&[("chr1", "AAAA")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        counter
            .add(&alignment("chr1", 0, "4M", "AACA", "II5I"))
            .unwrap();
        let stats = counter.finish();
        assert!(close(stats.mean_mismatch_quality, 20.0));
        assert!(close(stats.mean_error_rate, 0.25));
    }

    #[test]
    fn test_insertion_and_deletion() {
        // ref:   ACGT--ACGTAC
        // query: AC-TGGACGTAC  => 2M 1D 1M 2I 6M
        let refs = contigs(&[("chr1", "ACGTACGTAC")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let outcome = counter
            .add(&alignment(
                "chr1",
                0,
                "2M1D1M2I6M",
                "ACTGGACGTAC",
                "III+5IIIIII",
            ))
            .unwrap();
        // total = 2 + 1 + 1 + 2 + 6, wrong = 1 deleted + 2 inserted
        assert_eq!(outcome, counted(3, 12));

        let stats = counter.finish();
        assert_eq!(stats.events.get(&BaseChange::deletion(b'G')), 1);
        assert_eq!(stats.events.get(&BaseChange::insertion(b'G')), 2);
        assert_eq!(stats.events.total(), 3);
        assert!(close(stats.mean_insertion_length, 2.0));
        assert!(close(stats.mean_deletion_length, 1.0));
        // '+' = 10, '5' = 20
        assert!(close(stats.mean_insertion_quality, 15.0));
        assert_eq!(stats.mean_mismatch_quality, None);
        assert_eq!(stats.insertions, 1);
    }

    #[test]
    fn test_soft_clip_skip_and_hard_clip() {
        // 2S consumes query only, 3N consumes reference only, 2H nothing
        let refs = contigs(&[("chr1", "AACCCGGTT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let outcome = counter
            .add(&alignment("chr1", 0, "2H2S2M3N4M", "TTAAGGTT", "IIIIIIII"))
            .unwrap();
        assert_eq!(outcome, counted(0, 6));
        let stats = counter.finish();
        assert!(stats.events.is_empty());
        assert!(close(stats.mean_error_rate, 0.0));
    }

    #[test]
    fn test_position_is_zero_based() {
        let refs = contigs(&[("chr1", "GGGGACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let outcome = counter
            .add(&alignment("chr1", 4, "4M", "ACGT", "IIII"))
            .unwrap();
        assert_eq!(outcome, counted(0, 4));
    }

    #[test]
    fn test_reference_span_matches_cigar() {
        // Deletions and skips advance the reference: the trailing M lands on "TT"
        let refs = contigs(&[("chr1", "ACGTACGTTT")]);
        let cigar = "2M2D1M3N2M";
        assert_eq!(Cigar::new(cigar).reference_span(), 10);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let outcome = counter
            .add(&alignment("chr1", 0, cigar, "ACATT", "IIIII"))
            .unwrap();
        assert_eq!(outcome, counted(2, 7));
    }

    #[test]
    fn test_homopolymer_adjacent_insertion() {
        let refs = contigs(&[("chr1", "AAAAAAAAAACGTCGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        // insertion anchored at reference offset 10, right after ten A's
        let qual = "I".repeat(17);
        counter
            .add(&alignment("chr1", 0, "10M1I6M", "AAAAAAAAAAACGTCGT", &qual))
            .unwrap();
        // insertion anchored at offset 12, no run on either side
        counter
            .add(&alignment("chr1", 10, "2M1I4M", "CGATCGT", &"I".repeat(7)))
            .unwrap();

        let stats = counter.finish();
        assert_eq!(stats.insertions, 2);
        assert_eq!(stats.homopolymer_insertions, 1);
        assert!((stats.homopolymer_insertion_rate - 0.5).abs() < EPS);
    }

    #[test]
    fn test_homopolymer_threshold_config() {
        let refs = contigs(&[("chr1", "CCCGT")]);
        let config = MismatchConfig {
            homopolymer_length: 3,
        };
        let mut counter = MismatchCounter::new(&refs, config);
        counter
            .add(&alignment("chr1", 0, "3M1I2M", "CCCAGT", "IIIIII"))
            .unwrap();
        let rate = counter.finish().homopolymer_insertion_rate;
        assert!((rate - 1.0).abs() < EPS);
    }

    #[test]
    fn test_insertion_counted_once_per_op() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        counter
            .add(&alignment("chr1", 0, "2M5I2M", "ACTTTTTGT", &"I".repeat(9)))
            .unwrap();
        let stats = counter.finish();
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.events.get(&BaseChange::insertion(b'T')), 5);
        assert!(close(stats.mean_insertion_length, 5.0));
    }

    #[test]
    fn test_error_rate_is_unweighted_mean() {
        let refs = contigs(&[("chr1", "ACGTACGTAC")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        // 1/10 and 1/2; pooled would be 2/12
        counter
            .add(&alignment("chr1", 0, "10M", "TCGTACGTAC", "IIIIIIIIII"))
            .unwrap();
        counter
            .add(&alignment("chr1", 0, "2M", "AG", "II"))
            .unwrap();
        let stats = counter.finish();
        assert!(close(stats.mean_error_rate, (0.1 + 0.5) / 2.0));
        assert_eq!(stats.alignments_counted, 2);
    }

    #[test]
    fn test_skipped_alignments_contribute_nothing() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());

        let mut unmapped = alignment("chr1", 0, "4M", "TTTT", "IIII");
        unmapped.reference = None;
        assert_eq!(
            counter.add(&unmapped).unwrap(),
            Reconciliation::Skipped(SkipReason::Unmapped)
        );

        let no_sequence = alignment("chr1", 0, "4M", "*", "*");
        assert!(no_sequence.sequence.is_none());
        assert_eq!(
            counter.add(&no_sequence).unwrap(),
            Reconciliation::Skipped(SkipReason::NoSequence)
        );

        let mut no_position = alignment("chr1", 0, "4M", "TTTT", "IIII");
        no_position.reference_position = None;
        assert_eq!(
            counter.add(&no_position).unwrap(),
            Reconciliation::Skipped(SkipReason::NoPosition)
        );

        let stats = counter.finish();
        assert_eq!(stats.alignments_skipped, 3);
        assert_eq!(stats.alignments_counted, 0);
        assert!(stats.events.is_empty());
        assert_eq!(stats.mean_error_rate, None);
    }

    #[test]
    fn test_zero_positions_give_no_error_sample() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        counter
            .add(&alignment("chr1", 0, "4S", "ACGT", "IIII"))
            .unwrap();
        let stats = counter.finish();
        assert_eq!(stats.alignments_counted, 1);
        assert_eq!(stats.mean_error_rate, None);
    }

    #[test]
    fn test_missing_quality_still_counts_events() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let mut unqualified = alignment("chr1", 0, "4M", "ACGA", "IIII");
        unqualified.quality = None;
        counter.add(&unqualified).unwrap();
        let stats = counter.finish();
        assert_eq!(stats.events.get(&BaseChange::substitution(b'T', b'A')), 1);
        assert_eq!(stats.mean_mismatch_quality, None);
        assert!(close(stats.mean_error_rate, 0.25));
    }

    #[test]
    fn test_alignment_past_contig_end_is_clipped() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let outcome = counter
            .add(&alignment("chr1", 2, "4M", "GTAA", "IIII"))
            .unwrap();
        assert_eq!(outcome, counted(0, 2));
    }

    #[test]
    fn test_unknown_reference() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let err = counter
            .add(&alignment("chr9", 0, "4M", "ACGT", "IIII"))
            .unwrap_err();
        match err {
            StatsError::UnknownReference {
                alignment,
                reference,
            } => {
                assert_eq!(alignment, "read");
                assert_eq!(reference, "chr9");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_cigar() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let mut counter = MismatchCounter::new(&refs, MismatchConfig::default());
        let err = counter
            .add(&alignment("chr1", 0, "4M?", "ACGT", "IIII"))
            .unwrap_err();
        assert!(matches!(
            err,
            StatsError::Parse(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_compute_from_sam_text() {
        let refs = contigs(&[("chr1", "ACGTACGTAC")]);
        let sam = "@SQ\tSN:chr1\tLN:10
r1\t0\tchr1\t1\t60\t10M\t*\t0\t0\tACGTACGTAA\tIIIIIIIIII
r2\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII
r3\t0\tchr1\t1\t60\t4M\t*\t0\t0\t*\t*
";
        let stats = compute_mismatch_stats(
            &refs,
            SamReader::new(sam.as_bytes()),
            &MismatchConfig::default(),
        )
        .unwrap();
        assert_eq!(stats.alignments_counted, 1);
        assert_eq!(stats.alignments_skipped, 2);
        assert!(close(stats.mean_error_rate, 0.1));
        assert_eq!(stats.events.get(&BaseChange::substitution(b'C', b'A')), 1);
    }

    #[test]
    fn test_evaluate_readers() {
        let stats = evaluate_mismatch_readers(
            ">chr1\nACGT\n".as_bytes(),
            "r1\t0\tchr1\t1\t60\t4M\t*\t0\t0\tACGG\tIIII\n".as_bytes(),
            &MismatchConfig::default(),
        )
        .unwrap();
        assert!(close(stats.mean_error_rate, 0.25));
    }

    #[test]
    fn test_parse_error_aborts_run() {
        let refs = contigs(&[("chr1", "ACGT")]);
        let sam = "r1\t0\tchr1\t1\t60\t4M\t*\t0\t0\tACGT\tIII\n";
        let err = compute_mismatch_stats(
            &refs,
            SamReader::new(sam.as_bytes()),
            &MismatchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StatsError::Parse(ParseError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_event_counts_serialize_as_list() {
        let mut events = EventCounts::default();
        events.record(BaseChange::substitution(b'A', b'C'));
        events.record(BaseChange::substitution(b'A', b'C'));
        events.record(BaseChange::insertion(b'T'));
        let json = serde_json::to_value(&events).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"from": "", "to": "T", "count": 1},
                {"from": "A", "to": "C", "count": 2}
            ])
        );
        assert_eq!(BaseChange::deletion(b'G').to_string(), "G>-");
    }
}
