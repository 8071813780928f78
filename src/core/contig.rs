use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::read::Read;
use crate::core::sequence::Sequence;

/// A named reference sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contig {
    /// Sequence name (first token of the FASTA header)
    pub name: String,

    pub sequence: Sequence,
}

impl Contig {
    pub fn new(name: impl Into<String>, sequence: Sequence) -> Self {
        Self {
            name: name.into(),
            sequence,
        }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.sequence.len()
    }
}

impl From<Read> for Contig {
    fn from(read: Read) -> Self {
        Self::new(read.identifier, read.sequence)
    }
}

/// Reference contigs keyed by name, fully loaded before reconciliation.
///
/// Iteration follows the order contigs were first seen in the FASTA file.
#[derive(Debug, Clone, Default)]
pub struct ContigSet {
    contigs: Vec<Contig>,
    name_to_index: HashMap<String, usize>,
}

impl ContigSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contig. A later contig with the same name replaces the earlier one.
    pub fn insert(&mut self, contig: Contig) {
        if let Some(&index) = self.name_to_index.get(&contig.name) {
            warn!(contig = %contig.name, "Duplicate contig name, keeping the last definition");
            self.contigs[index] = contig;
        } else {
            self.name_to_index
                .insert(contig.name.clone(), self.contigs.len());
            self.contigs.push(contig);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Contig> {
        self.name_to_index.get(name).map(|&i| &self.contigs[i])
    }

    /// Position of the named contig in iteration order
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }

    /// Total number of bases across all contigs
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.contigs.iter().map(Contig::length).sum()
    }
}

impl FromIterator<Contig> for ContigSet {
    fn from_iter<I: IntoIterator<Item = Contig>>(iter: I) -> Self {
        let mut set = Self::new();
        for contig in iter {
            set.insert(contig);
        }
        set
    }
}
