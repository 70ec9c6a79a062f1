// Copyright 2026 Pagefeed Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pagefeed::config::{self, FeedConfig};
use pagefeed::pipeline;

#[derive(Parser)]
#[command(
    name = "pagefeed",
    about = "Scrape a single public web page into an RSS 2.0 feed",
    version,
    after_help = "A feed file is written on every outcome, including degraded ones; \
                  the exit code is non-zero only when the write itself fails."
)]
struct Cli {
    /// Page URL to scrape
    #[arg(default_value = config::DEFAULT_PAGE_URL)]
    url: String,

    /// Output file path
    #[arg(long, short, default_value = config::DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Maximum number of items in the feed
    #[arg(long, default_value_t = config::DEFAULT_MAX_ITEMS)]
    max_items: usize,

    /// Minimum trimmed text length for a candidate post
    #[arg(long, default_value_t = config::DEFAULT_MIN_TEXT_LEN)]
    min_chars: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Skip scraping and emit a synthetic heartbeat item instead
    #[arg(long)]
    heartbeat: bool,

    /// Suppress non-essential output
    #[arg(long, short)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = run(&cli).await;

    if let Err(e) = &result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    result
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = FeedConfig::new(&cli.url).context("invalid page URL")?;
    config.output_path = cli.output.clone();
    config.max_items = cli.max_items;
    config.min_text_len = cli.min_chars;
    config.timeout_secs = cli.timeout;
    config.heartbeat = cli.heartbeat;

    let report = pipeline::run(&config)
        .await
        .context("could not write the feed file")?;

    if !cli.quiet {
        println!(
            "feed written to {} ({} item(s), {:?})",
            config.output_path.display(),
            report.item_count,
            report.outcome
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "pagefeed=debug"
    } else if quiet {
        "error"
    } else {
        "pagefeed=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
