//! Centralized alphabet validation helpers.

/// Nucleotide alphabet (upper case; matching is case-insensitive).
pub const NUCLEOTIDES: &[u8] = b"ATCGUN";

/// Amino-acid alphabet (upper case; matching is case-insensitive).
pub const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWYZ";

/// Lowest printable quality character (`!`, Phred 0).
pub const MIN_QUALITY_CHAR: u8 = b'!';

/// Highest printable quality character (`~`, Phred 93).
pub const MAX_QUALITY_CHAR: u8 = b'~';

fn all_in(s: &str, alphabet: &[u8]) -> bool {
    s.bytes()
        .all(|b| alphabet.contains(&b.to_ascii_uppercase()))
}

/// Check that a string is a non-empty nucleotide or amino-acid sequence.
///
/// The whole string must come from one alphabet: a line mixing `U` (nucleotide
/// only) with `E` (amino acid only) is rejected.
///
/// # Examples
///
/// ```
/// use ngs_stats::utils::validation::is_valid_sequence;
///
/// assert!(is_valid_sequence("ACGTN"));
/// assert!(is_valid_sequence("acgu"));
/// assert!(is_valid_sequence("MKVLE"));
/// assert!(!is_valid_sequence("ACAB"));
/// assert!(!is_valid_sequence("UE"));
/// assert!(!is_valid_sequence(""));
/// ```
#[must_use]
pub fn is_valid_sequence(s: &str) -> bool {
    !s.is_empty() && (all_in(s, NUCLEOTIDES) || all_in(s, AMINO_ACIDS))
}

/// Check that a string is a non-empty run of printable quality characters
/// (`!` through `~`).
///
/// # Examples
///
/// ```
/// use ngs_stats::utils::validation::is_valid_quality;
///
/// assert!(is_valid_quality("!?#$"));
/// assert!(!is_valid_quality("AA A"));
/// assert!(!is_valid_quality(""));
/// ```
#[must_use]
pub fn is_valid_quality(s: &str) -> bool {
    let printable = MIN_QUALITY_CHAR..=MAX_QUALITY_CHAR;
    !s.is_empty() && s.bytes().all(|b| printable.contains(&b))
}

/// Phred score of a single quality character.
#[inline]
#[must_use]
pub fn phred(q: u8) -> u8 {
    q.saturating_sub(MIN_QUALITY_CHAR)
}

/// Shorten a record snippet for diagnostics so a corrupt multi-megabyte line
/// does not end up in an error message.
#[must_use]
pub fn snippet(s: &str) -> String {
    const MAX_SNIPPET: usize = 40;
    if s.chars().count() <= MAX_SNIPPET {
        format!("{s:?}")
    } else {
        let head: String = s.chars().take(MAX_SNIPPET).collect();
        format!("{head:?}...")
    }
}
