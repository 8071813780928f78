use std::path::PathBuf;

use clap::Args;

use crate::cli::{format_optional, OutputFormat};
use crate::stats::quality::{evaluate_quality, QualityReport};

#[derive(Args)]
pub struct QualityArgs {
    /// FASTQ files (optionally gzipped); reads stdin when none are given
    pub inputs: Vec<PathBuf>,
}

pub fn run(args: QualityArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let report = evaluate_quality(args.inputs)?;

    if verbose {
        eprintln!(
            "Read {} reads ({} with quality)",
            report.total_reads, report.reads_with_quality
        );
    }

    match format {
        OutputFormat::Text => print_text_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    Ok(())
}

fn print_text_report(report: &QualityReport) {
    println!("Quality by Position");
    println!("{}", "=".repeat(60));
    println!("\nReads: {}", report.total_reads);
    println!("Reads with quality: {}", report.reads_with_quality);

    if report.mean_quality_by_position.is_empty() {
        println!("\nNo quality scores found.");
        return;
    }

    println!("\n  Position  Mean quality");
    for (position, mean) in report.mean_quality_by_position.iter().enumerate() {
        println!("  {:>8}  {}", position, format_optional(*mean, 2));
    }
}

fn print_tsv_report(report: &QualityReport) {
    println!("position\tmean_quality");
    for (position, mean) in report.mean_quality_by_position.iter().enumerate() {
        println!("{}\t{}", position, format_optional(*mean, 4));
    }
}
