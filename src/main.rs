use clap::Parser;
use ngs_stats::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ngs_stats=debug,info")
    } else {
        EnvFilter::new("ngs_stats=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Mismatch(args) => {
            cli::mismatch::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Coverage(args) => {
            cli::coverage::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Quality(args) => {
            cli::quality::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::GcContent(args) => {
            cli::gc_content::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
