//! Command-line interface for ngs-stats.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **mismatch**: Per-base error statistics of a SAM file against a FASTA reference
//! - **coverage**: Per-contig read depth of a SAM file
//! - **quality**: Mean base quality by read position over FASTQ files
//! - **gc-content**: Per-read GC percentage histogram over FASTQ files
//!
//! ## Usage
//!
//! ```text
//! # Error profile of an alignment
//! ngs-stats mismatch reference.fa.gz reads.sam
//!
//! # JSON output for scripting
//! ngs-stats mismatch reference.fa reads.sam --format json
//!
//! # Smoothed depth track
//! ngs-stats coverage reference.fa reads.sam --track --window 500 --format tsv
//!
//! # Pipe reads from stdin
//! zcat reads.fq.gz | ngs-stats quality
//! ```

use clap::{Parser, Subcommand};

pub mod coverage;
pub mod gc_content;
pub mod mismatch;
pub mod quality;

#[derive(Parser)]
#[command(name = "ngs-stats")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Error, coverage, quality and GC statistics for sequencing reads")]
#[command(
    long_about = "ngs-stats reads FASTA, FASTQ and SAM files (optionally gzip-compressed) with strict validation and reports:\n- Substitution, insertion and deletion profiles of aligned reads\n- Homopolymer-adjacent insertion rates\n- Per-contig coverage\n- Per-position base quality and per-read GC content"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile alignments against the reference and report error statistics
    Mismatch(mismatch::MismatchArgs),

    /// Report per-contig read depth
    Coverage(coverage::CoverageArgs),

    /// Report mean base quality by read position
    Quality(quality::QualityArgs),

    /// Report the per-read GC content distribution
    GcContent(gc_content::GcContentArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Render an optional statistic, `NA` when absent
pub(crate) fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{v:.precision$}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(0.125), 4), "0.1250");
        assert_eq!(format_optional(None, 4), "NA");
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ngs-stats",
            "mismatch",
            "ref.fa",
            "reads.sam",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Mismatch(_)));
    }
}
