use std::path::PathBuf;

use clap::Args;

use crate::cli::{format_optional, OutputFormat};
use crate::stats::homopolymer::DEFAULT_HOMOPOLYMER_LENGTH;
use crate::stats::mismatch::{evaluate_mismatch_frequency, MismatchConfig, MismatchStats};

#[derive(Args)]
pub struct MismatchArgs {
    /// Reference FASTA file (optionally gzipped)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// SAM alignment file (optionally gzipped), or '-' for stdin
    #[arg(required = true)]
    pub alignment: PathBuf,

    /// Minimum run of identical reference bases next to an insertion for it
    /// to count as homopolymer-adjacent
    #[arg(long, default_value_t = DEFAULT_HOMOPOLYMER_LENGTH)]
    pub homopolymer_length: usize,
}

pub fn run(args: MismatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = MismatchConfig {
        homopolymer_length: args.homopolymer_length,
    };

    let stats = evaluate_mismatch_frequency(&args.reference, &args.alignment, &config)?;

    if verbose {
        eprintln!(
            "Reconciled {} alignments ({} skipped)",
            stats.alignments_counted, stats.alignments_skipped
        );
    }

    match format {
        OutputFormat::Text => print_text_stats(&args, &stats),
        OutputFormat::Json => print_json_stats(&args, &config, &stats)?,
        OutputFormat::Tsv => print_tsv_stats(&stats),
    }

    Ok(())
}

fn print_text_stats(args: &MismatchArgs, stats: &MismatchStats) {
    println!("Mismatch Statistics");
    println!("{}", "=".repeat(60));

    println!("\nReference: {}", args.reference.display());
    println!("Alignments: {}", args.alignment.display());
    println!("  Counted: {}", stats.alignments_counted);
    println!("  Skipped: {}", stats.alignments_skipped);

    println!("\nError Rates:");
    println!(
        "  Mean error rate: {}",
        format_optional(stats.mean_error_rate, 6)
    );
    println!(
        "  Mean insertion length: {}",
        format_optional(stats.mean_insertion_length, 2)
    );
    println!(
        "  Mean deletion length: {}",
        format_optional(stats.mean_deletion_length, 2)
    );
    println!(
        "  Homopolymer-adjacent insertions: {} of {} ({:.2}%)",
        stats.homopolymer_insertions,
        stats.insertions,
        stats.homopolymer_insertion_rate * 100.0
    );

    println!("\nQualities:");
    println!(
        "  Mean insertion quality: {}",
        format_optional(stats.mean_insertion_quality, 2)
    );
    println!(
        "  Mean mismatch quality: {}",
        format_optional(stats.mean_mismatch_quality, 2)
    );

    if stats.events.is_empty() {
        println!("\nNo mismatches found.");
        return;
    }

    println!("\nEvents ({} total):", stats.events.total());
    for (change, count) in stats.events.iter() {
        println!("  {:<6} {}", change.to_string(), count);
    }
}

fn print_json_stats(
    args: &MismatchArgs,
    config: &MismatchConfig,
    stats: &MismatchStats,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "reference": args.reference.display().to_string(),
        "alignment": args.alignment.display().to_string(),
        "config": config,
        "stats": stats,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_stats(stats: &MismatchStats) {
    println!(
        "alignments_counted\talignments_skipped\tmean_error_rate\tmean_insertion_length\tmean_deletion_length\thomopolymer_insertion_rate\tmean_insertion_quality\tmean_mismatch_quality"
    );
    println!(
        "{}\t{}\t{}\t{}\t{}\t{:.6}\t{}\t{}",
        stats.alignments_counted,
        stats.alignments_skipped,
        format_optional(stats.mean_error_rate, 6),
        format_optional(stats.mean_insertion_length, 4),
        format_optional(stats.mean_deletion_length, 4),
        stats.homopolymer_insertion_rate,
        format_optional(stats.mean_insertion_quality, 4),
        format_optional(stats.mean_mismatch_quality, 4),
    );
}
