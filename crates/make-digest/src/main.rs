use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use shared::{io, DigestConfig, DigestGenerator, NewsStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "make-digest")]
#[command(about = "Produce a digest from already-collected news items")]
struct Args {
    /// Path to the SQLite database
    #[arg(long, default_value = "digest.sqlite3")]
    database: PathBuf,

    /// Directory for digest JSON output
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Number of stored items to consider (defaults to MAX_STORIES)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Digest date as YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = DigestConfig::from_env();

    let date = match &args.date {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {} (expected YYYY-MM-DD)", value))?,
        None => Utc::now().date_naive(),
    };

    let store = NewsStore::open(&args.database)?;
    let limit = args.limit.unwrap_or(config.max_stories);
    let items = store.recent_items(limit)?;
    if items.is_empty() {
        println!("No items found for digest generation.");
        return Ok(());
    }

    println!("🤖 Generating digest for {} items...", items.len());
    let generator = DigestGenerator::new(config)?;
    let digest = generator.create_digest(items, date).await?;

    let path = io::save_digest(&digest, &args.output)?;
    println!("✓ Digest written to {}", path.display());

    Ok(())
}
