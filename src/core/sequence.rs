use serde::{Deserialize, Serialize};

use crate::utils::validation::{is_valid_quality, is_valid_sequence, phred};

/// A validated nucleotide or amino-acid sequence.
///
/// Always non-empty and ASCII, so byte offsets and character offsets coincide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(String);

impl Sequence {
    /// Validate and wrap a sequence string.
    /// Returns None if the string is empty or mixes alphabets.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        if is_valid_sequence(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Wrap a sequence assembled from individually validated lines.
    ///
    /// FASTA validates each line on its own, so the concatenation may legally
    /// combine lines from different alphabets.
    pub(crate) fn from_validated_lines(joined: String) -> Self {
        Self(joined)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Sequence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Phred+33 quality string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(String);

impl Quality {
    /// Validate and wrap a quality string.
    /// Returns None if the string is empty or contains non-printable characters.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        if is_valid_quality(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric Phred scores, one per base.
    pub fn scores(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(phred)
    }
}

impl AsRef<str> for Quality {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
