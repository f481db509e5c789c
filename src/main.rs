//! CLI entry point for the Gutenberg harvester.

use anyhow::Result;
use clap::Parser;
use harvester_core::{HarvestSummary, Harvester, HttpClient, TextUrlResolver};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Gutenberg harvester starting");

    let client = HttpClient::with_settings(args.retry_policy(), args.timeout())?;
    let resolver = TextUrlResolver::new(args.mirror_url.clone());
    let harvester = Harvester::new(args.harvest_config(), resolver);

    let summary = match harvester.run(&client).await {
        Ok(summary) => summary,
        Err(error) if error.is_catalog_failure() => {
            debug!(error = %error, "catalog unavailable");
            println!("Failed to fetch the book list. Please try again later.");
            return Ok(());
        }
        Err(error) => return Err(error.into()),
    };

    if !args.quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &HarvestSummary) {
    println!(
        "Processed {} of {} books: {} new, {} already recorded, {} failed",
        summary.windowed,
        summary.discovered,
        summary.new_records,
        summary.skipped_known,
        summary.failed
    );
    if summary.download_failures > 0 {
        println!(
            "{} text downloads failed; their rows have no filename",
            summary.download_failures
        );
    }
    println!("Metadata table now holds {} books", summary.total_records);
}
