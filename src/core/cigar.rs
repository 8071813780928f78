//! CIGAR strings and their run-length decoded operations.
//!
//! A CIGAR string is an ordered list of `<count><opcode>` pairs, e.g. `10M2I3D`.
//! Decoding is a direct scan: a run of ASCII digits followed by one opcode
//! character, repeated until the string is exhausted.
//!
//! | Opcode | Consumes reference | Consumes query |
//! |--------|--------------------|----------------|
//! | M = X  | yes                | yes            |
//! | I      | no                 | yes            |
//! | D      | yes                | no             |
//! | S      | no                 | yes            |
//! | N      | yes                | no             |
//! | H P    | no                 | no             |

use serde::{Deserialize, Serialize};

/// The unavailable-CIGAR sentinel used by SAM.
pub const UNAVAILABLE: &str = "*";

/// CIGAR operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Alignment match, may be a sequence match or mismatch (M)
    Match,
    /// Insertion to the reference (I)
    Insertion,
    /// Deletion from the reference (D)
    Deletion,
    /// Skipped reference region, e.g. an intron (N)
    Skip,
    /// Soft clip, bases present in the read (S)
    SoftClip,
    /// Hard clip, bases absent from the read (H)
    HardClip,
    /// Silent deletion from a padded reference (P)
    Pad,
    /// Sequence match (=)
    SequenceMatch,
    /// Sequence mismatch (X)
    SequenceMismatch,
}

impl Kind {
    #[must_use]
    pub fn from_char(c: u8) -> Option<Self> {
        match c {
            b'M' => Some(Self::Match),
            b'I' => Some(Self::Insertion),
            b'D' => Some(Self::Deletion),
            b'N' => Some(Self::Skip),
            b'S' => Some(Self::SoftClip),
            b'H' => Some(Self::HardClip),
            b'P' => Some(Self::Pad),
            b'=' => Some(Self::SequenceMatch),
            b'X' => Some(Self::SequenceMismatch),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Match => 'M',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
            Self::Skip => 'N',
            Self::SoftClip => 'S',
            Self::HardClip => 'H',
            Self::Pad => 'P',
            Self::SequenceMatch => '=',
            Self::SequenceMismatch => 'X',
        }
    }

    /// M, =, X, D and N advance the reference offset
    #[must_use]
    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            Self::Match
                | Self::SequenceMatch
                | Self::SequenceMismatch
                | Self::Deletion
                | Self::Skip
        )
    }

    /// M, =, X, I and S advance the query offset
    #[must_use]
    pub fn consumes_query(self) -> bool {
        matches!(
            self,
            Self::Match
                | Self::SequenceMatch
                | Self::SequenceMismatch
                | Self::Insertion
                | Self::SoftClip
        )
    }
}

/// A single decoded CIGAR operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CigarOp {
    pub len: usize,
    pub kind: Kind,
}

impl CigarOp {
    pub fn new(len: usize, kind: Kind) -> Self {
        Self { len, kind }
    }

    /// `(count, opcode)` pair as it appears in the string
    #[must_use]
    pub fn as_pair(&self) -> (usize, char) {
        (self.len, self.kind.as_char())
    }
}

impl std::fmt::Display for CigarOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.len, self.kind.as_char())
    }
}

/// A CIGAR string stored verbatim; decoded lazily with [`Cigar::ops`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cigar(String);

impl Cigar {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the `*` sentinel
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.0 == UNAVAILABLE
    }

    /// Decode operations left to right. Decoding stops silently at the first
    /// position that is not `<digits><opcode>`; use [`Cigar::is_well_formed`]
    /// to detect that case.
    pub fn ops(&self) -> CigarOps<'_> {
        if self.is_unavailable() {
            CigarOps::new(b"")
        } else {
            CigarOps::new(self.0.as_bytes())
        }
    }

    /// True when every byte of the string decodes into an operation.
    /// The `*` sentinel is the empty CIGAR and is well formed.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        if self.is_unavailable() {
            return true;
        }
        if self.0.is_empty() {
            return false;
        }
        let mut ops = self.ops();
        for _ in ops.by_ref() {}
        ops.remainder().is_empty()
    }

    /// Number of reference bases spanned (M, =, X, D, N)
    #[must_use]
    pub fn reference_span(&self) -> usize {
        self.ops()
            .filter(|op| op.kind.consumes_reference())
            .map(|op| op.len)
            .sum()
    }

    /// Number of query bases described (M, =, X, I, S)
    #[must_use]
    pub fn query_len(&self) -> usize {
        self.ops()
            .filter(|op| op.kind.consumes_query())
            .map(|op| op.len)
            .sum()
    }
}

impl std::fmt::Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lazy decoder over the operations of a CIGAR string
#[derive(Debug, Clone)]
pub struct CigarOps<'a> {
    rest: &'a [u8],
    stopped: bool,
}

impl<'a> CigarOps<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            rest: bytes,
            stopped: false,
        }
    }

    /// Bytes not yet decoded. Non-empty after exhaustion means the string was
    /// malformed at that point.
    #[must_use]
    pub fn remainder(&self) -> &'a [u8] {
        self.rest
    }
}

impl Iterator for CigarOps<'_> {
    type Item = CigarOp;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped || self.rest.is_empty() {
            return None;
        }

        let digits = self.rest.iter().take_while(|b| b.is_ascii_digit()).count();
        let op = (digits > 0)
            .then(|| self.rest.get(digits).copied().and_then(Kind::from_char))
            .flatten()
            .and_then(|kind| {
                // Digits are ASCII, so the slice is valid UTF-8
                std::str::from_utf8(&self.rest[..digits])
                    .ok()?
                    .parse::<usize>()
                    .ok()
                    .filter(|&len| len > 0)
                    .map(|len| CigarOp::new(len, kind))
            });

        match op {
            Some(op) => {
                self.rest = &self.rest[digits + 1..];
                Some(op)
            }
            None => {
                self.stopped = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for CigarOps<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(s: &str) -> Vec<(usize, char)> {
        Cigar::new(s).ops().map(|op| op.as_pair()).collect()
    }

    #[test]
    fn test_decode_simple() {
        assert_eq!(pairs("10M2I3D"), vec![(10, 'M'), (2, 'I'), (3, 'D')]);
        assert_eq!(pairs("100M"), vec![(100, 'M')]);
        assert_eq!(
            pairs("5S10=1X4=2N3H1P"),
            vec![
                (5, 'S'),
                (10, '='),
                (1, 'X'),
                (4, '='),
                (2, 'N'),
                (3, 'H'),
                (1, 'P')
            ]
        );
    }

    #[test]
    fn test_decode_concatenation() {
        let mut joined = pairs("10M2I");
        joined.extend(pairs("3D"));
        assert_eq!(joined, pairs("10M2I3D"));
    }

    #[test]
    fn test_decode_stops_at_garbage() {
        assert_eq!(pairs("10M?5I"), vec![(10, 'M')]);
        assert_eq!(pairs("M10"), vec![]);
        assert_eq!(pairs("10Q"), vec![]);
        assert_eq!(pairs("0M5I"), vec![]);
        assert_eq!(pairs("*"), vec![]);
        assert_eq!(pairs(""), vec![]);
    }

    #[test]
    fn test_remainder_after_stop() {
        let cigar = Cigar::new("3M!4I");
        let mut ops = cigar.ops();
        assert_eq!(ops.next(), Some(CigarOp::new(3, Kind::Match)));
        assert_eq!(ops.next(), None);
        assert_eq!(ops.next(), None);
        assert_eq!(ops.remainder(), b"!4I");
    }

    #[test]
    fn test_is_well_formed() {
        assert!(Cigar::new("10M2I3D").is_well_formed());
        assert!(Cigar::new("*").is_well_formed());
        assert!(!Cigar::new("").is_well_formed());
        assert!(!Cigar::new("10M2").is_well_formed());
        assert!(!Cigar::new("10m").is_well_formed());
        assert!(!Cigar::new("99999999999999999999999M").is_well_formed());
    }

    #[test]
    fn test_reference_span_and_query_len() {
        let cigar = Cigar::new("2S10M2I3D4N1=1X5H");
        assert_eq!(cigar.reference_span(), 10 + 3 + 4 + 1 + 1);
        assert_eq!(cigar.query_len(), 2 + 10 + 2 + 1 + 1);
        assert_eq!(Cigar::new("*").reference_span(), 0);
    }

    #[test]
    fn test_consumption_table() {
        use Kind::*;
        for kind in [Match, SequenceMatch, SequenceMismatch] {
            assert!(kind.consumes_reference() && kind.consumes_query());
        }
        assert!(!Insertion.consumes_reference() && Insertion.consumes_query());
        assert!(Deletion.consumes_reference() && !Deletion.consumes_query());
        assert!(!SoftClip.consumes_reference() && SoftClip.consumes_query());
        assert!(Skip.consumes_reference() && !Skip.consumes_query());
        assert!(!HardClip.consumes_reference() && !HardClip.consumes_query());
        assert!(!Pad.consumes_reference() && !Pad.consumes_query());
    }

    #[test]
    fn test_display_round_trip() {
        let cigar = Cigar::new("3S7M1I2D");
        let rendered: String = cigar.ops().map(|op| op.to_string()).collect();
        assert_eq!(rendered, "3S7M1I2D");
    }
}
