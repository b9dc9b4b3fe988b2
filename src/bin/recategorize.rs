use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use newsdesk::config;
use newsdesk::db;
use newsdesk::model::JobKind;
use newsdesk::worker;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Queue categorization again for stored articles, overwriting their category"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Article ids to requeue; all stored articles when omitted
    ids: Vec<String>,

    /// Run the jobs in this process and exit when the queue is empty
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

    let ids = if args.ids.is_empty() {
        db::list_article_ids(&pool).await?
    } else {
        args.ids
    };
    for id in &ids {
        db::enqueue_job(&pool, JobKind::CategorizeArticle, id).await?;
    }
    info!(queued = ids.len(), "categorization jobs queued");

    if args.inline {
        let categorizer = cfg.categories.categorizer();
        let processed = worker::drain(&pool, &categorizer).await?;
        info!(processed, "queue drained");
        for (category, count) in db::category_counts(&pool).await? {
            info!(%category, count, "category total");
        }
    }

    pool.close().await;
    Ok(())
}
