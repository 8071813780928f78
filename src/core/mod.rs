//! Core data types for reads, alignments and reference contigs.
//!
//! - [`Sequence`], [`Quality`]: validated, immutable sequence and quality strings
//! - [`Read`]: a FASTA/FASTQ record
//! - [`Alignment`]: a SAM alignment row with a lazily decoded [`Cigar`]
//! - [`Contig`], [`ContigSet`]: reference sequences keyed by name
//!
//! ## Coordinates
//!
//! All positions are 0-based. SAM's 1-based `POS` column is converted once by
//! the parser; nothing downstream sees 1-based values.
//!
//! [`Sequence`]: sequence::Sequence
//! [`Quality`]: sequence::Quality
//! [`Read`]: read::Read
//! [`Alignment`]: alignment::Alignment
//! [`Cigar`]: cigar::Cigar
//! [`Contig`]: contig::Contig
//! [`ContigSet`]: contig::ContigSet

pub mod alignment;
pub mod cigar;
pub mod contig;
pub mod read;
pub mod sequence;
