use serde::{Deserialize, Serialize};

use crate::core::sequence::{Quality, Sequence};

/// A sequencing read from a FASTA or FASTQ file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Read {
    /// First whitespace-delimited token of the header line
    pub identifier: String,

    /// Remaining header text, empty if absent
    pub description: String,

    pub sequence: Sequence,

    /// Per-base qualities (FASTQ only), same length as `sequence`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

impl Read {
    pub fn new(identifier: impl Into<String>, sequence: Sequence) -> Self {
        Self {
            identifier: identifier.into(),
            description: String::new(),
            sequence,
            quality: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Bases paired with their quality characters. Empty when the read has no
    /// quality string.
    pub fn bases_with_quality(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        let quality = self.quality.as_ref().map_or(&[][..], Quality::as_bytes);
        self.sequence
            .as_bytes()
            .iter()
            .copied()
            .zip(quality.iter().copied())
    }
}

/// Split a header line (without its `>`/`@` marker) into identifier and
/// description. Returns None when there is no identifier token.
pub(crate) fn split_header(header: &str) -> Option<(String, String)> {
    let header = header.trim_start();
    if header.is_empty() {
        return None;
    }
    match header.split_once(char::is_whitespace) {
        Some((id, rest)) => Some((id.to_string(), rest.trim_start().to_string())),
        None => Some((header.to_string(), String::new())),
    }
}
