/// Default minimum run length for a homopolymer
pub const DEFAULT_HOMOPOLYMER_LENGTH: usize = 10;

/// Check whether a homopolymer of `threshold` bases ends at or starts at
/// `position`.
///
/// The window `[position - threshold, position)` and the window
/// `[position, position + threshold)` are each checked only when they lie
/// entirely inside `sequence`; a window running off either end never matches.
///
/// # Examples
///
/// ```
/// use ngs_stats::stats::homopolymer::is_homopolymer_adjacent;
///
/// assert!(is_homopolymer_adjacent(b"AAAAAAAAAAC", 10, 10));
/// assert!(!is_homopolymer_adjacent(b"AAAAAAAAAAC", 9, 10));
/// ```
#[must_use]
pub fn is_homopolymer_adjacent(sequence: &[u8], position: usize, threshold: usize) -> bool {
    if threshold == 0 {
        return false;
    }

    let is_uniform = |window: &[u8]| window.windows(2).all(|pair| pair[0] == pair[1]);

    let before = position
        .checked_sub(threshold)
        .filter(|_| position <= sequence.len())
        .is_some_and(|start| is_uniform(&sequence[start..position]));

    before
        || position
            .checked_add(threshold)
            .filter(|&end| end <= sequence.len())
            .is_some_and(|end| is_uniform(&sequence[position..end]))
}
