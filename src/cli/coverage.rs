use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::stats::coverage::{evaluate_coverage, CoverageConfig, CoverageReport, DEFAULT_WINDOW};

#[derive(Args)]
pub struct CoverageArgs {
    /// Reference FASTA file (optionally gzipped)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// SAM alignment file (optionally gzipped), or '-' for stdin
    #[arg(required = true)]
    pub alignment: PathBuf,

    /// Also report the depth smoothed with a moving average
    #[arg(long)]
    pub track: bool,

    /// Moving-average window size in bases
    #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
}

pub fn run(args: CoverageArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = CoverageConfig {
        window: args.window,
    };

    let report = evaluate_coverage(&args.reference, &args.alignment)?;

    if verbose {
        eprintln!(
            "Counted {} alignments over {} contigs ({} skipped)",
            report.alignments_counted,
            report.contigs.len(),
            report.alignments_skipped
        );
    }

    match format {
        OutputFormat::Text => print_text_report(&report, args.track.then_some(&config)),
        OutputFormat::Json => print_json_report(&report, args.track.then_some(&config))?,
        OutputFormat::Tsv => print_tsv_report(&report, args.track.then_some(&config)),
    }

    Ok(())
}

fn print_text_report(report: &CoverageReport, track: Option<&CoverageConfig>) {
    println!("Coverage");
    println!("{}", "=".repeat(60));
    println!(
        "\nAlignments counted: {} (skipped: {})",
        report.alignments_counted, report.alignments_skipped
    );

    for contig in &report.contigs {
        println!("\n{}", contig.name);
        println!("  Length: {}", contig.length);
        println!("  Mean depth: {:.2}", contig.mean_depth);
        println!("  Max depth: {}", contig.max_depth);

        if let Some(config) = track {
            let values = contig.track(config.window);
            if values.is_empty() {
                println!("  Track: contig shorter than window of {}", config.window);
            } else {
                println!("  Track (window {}):", config.window);
                for (start, value) in values.iter().enumerate() {
                    println!("    {start}\t{value:.2}");
                }
            }
        }
    }
}

fn print_json_report(
    report: &CoverageReport,
    track: Option<&CoverageConfig>,
) -> anyhow::Result<()> {
    let contigs: Vec<serde_json::Value> = report
        .contigs
        .iter()
        .map(|contig| {
            let mut value = serde_json::json!({
                "name": contig.name,
                "length": contig.length,
                "mean_depth": contig.mean_depth,
                "max_depth": contig.max_depth,
            });
            if let Some(config) = track {
                value["track"] = serde_json::json!(contig.track(config.window));
            }
            value
        })
        .collect();

    let output = serde_json::json!({
        "alignments_counted": report.alignments_counted,
        "alignments_skipped": report.alignments_skipped,
        "window": track.map(|config| config.window),
        "contigs": contigs,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &CoverageReport, track: Option<&CoverageConfig>) {
    match track {
        Some(config) => {
            println!("contig\tstart\tmean_depth");
            for contig in &report.contigs {
                for (start, value) in contig.track(config.window).iter().enumerate() {
                    println!("{}\t{}\t{:.4}", contig.name, start, value);
                }
            }
        }
        None => {
            println!("contig\tlength\tmean_depth\tmax_depth");
            for contig in &report.contigs {
                println!(
                    "{}\t{}\t{:.4}\t{}",
                    contig.name, contig.length, contig.mean_depth, contig.max_depth
                );
            }
        }
    }
}
