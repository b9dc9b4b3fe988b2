use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

use newsdesk::config;
use newsdesk::db;
use newsdesk::worker;

#[derive(Debug, Parser)]
#[command(author, version, about = "Run the article categorization workers")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override `queue.workers` from the config file
    #[arg(long)]
    workers: Option<usize>,
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

    let categorizer = Arc::new(cfg.categories.categorizer());
    let workers = args.workers.unwrap_or(cfg.queue.workers).max(1);
    let poll_interval = Duration::from_millis(cfg.queue.poll_interval_ms);

    let pending = db::count_pending_jobs(&pool).await?;
    info!(%database_url, workers, pending, "starting categorization workers");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handles = worker::spawn_workers(workers, &pool, categorizer, poll_interval, &shutdown_rx);

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested; waiting for workers");
    shutdown_tx.send(true)?;
    worker::join_workers(handles).await;

    pool.close().await;
    info!("categorization workers stopped");
    Ok(())
}
