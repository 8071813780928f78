use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::stats::gc_content::{
    evaluate_gc_content, GcContentConfig, GcContentReport, DEFAULT_MIN_GOOD_BASES,
    DEFAULT_MIN_GOOD_BASES_FRACTION,
};
use crate::utils::validation::{MAX_QUALITY_CHAR, MIN_QUALITY_CHAR};

#[derive(Args)]
pub struct GcContentArgs {
    /// FASTQ files (optionally gzipped); reads stdin when none are given
    pub inputs: Vec<PathBuf>,

    /// Lowest quality character for a base to count as good
    #[arg(long, default_value_t = char::from(MIN_QUALITY_CHAR), value_parser = parse_quality_char)]
    pub min_base_quality: char,

    /// Minimum number of good bases for a read to be kept
    #[arg(long, default_value_t = DEFAULT_MIN_GOOD_BASES)]
    pub min_good_bases: usize,

    /// Minimum fraction of good bases for a read to be kept (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_MIN_GOOD_BASES_FRACTION, value_parser = parse_fraction)]
    pub min_good_bases_fraction: f64,
}

fn parse_quality_char(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None)
            if (char::from(MIN_QUALITY_CHAR)..=char::from(MAX_QUALITY_CHAR)).contains(&c) =>
        {
            Ok(c)
        }
        _ => Err(format!(
            "expected a single quality character between '{}' and '{}'",
            char::from(MIN_QUALITY_CHAR),
            char::from(MAX_QUALITY_CHAR)
        )),
    }
}

fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0.0 and 1.0"))
    }
}

pub fn run(args: GcContentArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = GcContentConfig {
        min_base_quality: args.min_base_quality,
        min_good_bases: args.min_good_bases,
        min_good_bases_fraction: args.min_good_bases_fraction,
    };

    let report = evaluate_gc_content(args.inputs, &config)?;

    if verbose {
        eprintln!("Kept {} of {} reads", report.kept_reads, report.total_reads);
    }

    match format {
        OutputFormat::Text => print_text_report(&report),
        OutputFormat::Json => print_json_report(&config, &report)?,
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    Ok(())
}

fn print_text_report(report: &GcContentReport) {
    println!("GC Content");
    println!("{}", "=".repeat(60));
    println!("\nReads: {}", report.total_reads);
    println!("  Kept: {}", report.kept_reads);
    println!(
        "  Discarded: {} ({:.2}%)",
        report.discarded_reads,
        report.discarded_fraction * 100.0
    );

    if report.kept_reads == 0 {
        return;
    }

    println!("\n  GC%  Reads");
    for (percent, count) in report.histogram.iter().enumerate() {
        if *count > 0 {
            println!("  {percent:>3}  {count}");
        }
    }
}

fn print_json_report(config: &GcContentConfig, report: &GcContentReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "config": config,
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &GcContentReport) {
    println!("gc_percent\treads");
    for (percent, count) in report.histogram.iter().enumerate() {
        println!("{percent}\t{count}");
    }
}
