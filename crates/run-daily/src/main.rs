use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shared::{collectors, io, DigestConfig, DigestGenerator, NewsItem, NewsStore};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "run-daily")]
#[command(about = "Collect AI news, store it, and produce the daily digest")]
struct Args {
    /// Path to the SQLite database
    #[arg(long, default_value = "digest.sqlite3")]
    database: PathBuf,

    /// Directory for digest JSON output
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Number of stored items to consider for the digest (defaults to MAX_STORIES)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Collect and store only; skip digest generation
    #[arg(long)]
    skip_digest: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = DigestConfig::from_env();

    let store = NewsStore::open(&args.database)?;

    println!("📚 Collecting news items...");
    let mut total = 0;
    for collector in collectors::default_collectors()? {
        match collector.fetch_items().await {
            Ok(items) => {
                let inserted = store.save_batch(&items).with_context(|| {
                    format!("Failed to store items from {}", collector.source_name())
                })?;
                println!(
                    "  [{}] {} items ({} new)",
                    collector.source_name(),
                    items.len(),
                    inserted
                );
                total += items.len();
            }
            Err(e) => eprintln!(
                "  ✗ [{}] collection failed: {:#}",
                collector.source_name(),
                e
            ),
        }
    }
    println!("✓ Saved {} items in total", total);

    if args.skip_digest {
        return Ok(());
    }

    let limit = args.limit.unwrap_or(config.max_stories);
    let items = store.recent_items(limit)?;
    if items.is_empty() {
        println!("No items found for digest generation.");
        return Ok(());
    }

    println!("\n🤖 Generating digest for {} items...", items.len());
    match generate_digest(config, items, &args.output).await {
        Ok(path) => println!("✓ Daily digest written to {}", path.display()),
        Err(e) => eprintln!("✗ Digest generation failed: {:#}", e),
    }

    Ok(())
}

/// Digest failures are reported but never discard the items already stored
/// this run.
async fn generate_digest(
    config: DigestConfig,
    items: Vec<NewsItem>,
    output: &Path,
) -> Result<PathBuf> {
    let generator = DigestGenerator::new(config)?;
    let digest = generator
        .create_digest(items, Utc::now().date_naive())
        .await?;
    io::save_digest(&digest, output)
}
