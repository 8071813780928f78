use serde::{Deserialize, Serialize};

use crate::core::cigar::Cigar;
use crate::core::sequence::{Quality, Sequence};

/// One alignment row from a SAM file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// Query template name (QNAME)
    pub identifier: String,

    /// Reference contig name (RNAME); None for the unmapped sentinel `*`
    pub reference: Option<String>,

    /// 0-based leftmost mapping position; None when the file position is 0
    pub reference_position: Option<u64>,

    /// Raw CIGAR string, decoded on demand
    pub cigar: Cigar,

    /// Query sequence; None for the `*` sentinel
    pub sequence: Option<Sequence>,

    /// Query qualities; None for the `*` sentinel
    pub quality: Option<Quality>,
}

impl Alignment {
    /// True when the alignment names no reference contig
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.reference.is_none()
    }
}
