use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use newsdesk::config;
use newsdesk::db;
use newsdesk::model::NewArticle;
use newsdesk::worker;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Insert articles from a JSON Lines file and queue their categorization"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// JSON Lines input, one article per line; reads stdin when omitted
    input: Option<PathBuf>,

    /// Categorize the queued articles in this process instead of leaving them
    /// to the workers
    #[arg(long)]
    inline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url());
    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    let raw = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let mut inserted = 0usize;
    let mut duplicates = 0usize;
    let mut rejected = 0usize;
    for (lineno, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let article: NewArticle = match serde_json::from_str(line) {
            Ok(article) => article,
            Err(err) => {
                warn!(line = lineno + 1, %err, "skipping malformed article");
                rejected += 1;
                continue;
            }
        };
        if db::insert_article(&pool, &article).await? {
            inserted += 1;
        } else {
            duplicates += 1;
        }
    }
    info!(inserted, duplicates, rejected, "ingest finished");

    if args.inline {
        let categorizer = cfg.categories.categorizer();
        let processed = worker::drain(&pool, &categorizer).await?;
        info!(processed, "categorized queued articles");
        for (category, count) in db::category_counts(&pool).await? {
            info!(%category, count, "category total");
        }
    }

    pool.close().await;
    Ok(())
}
