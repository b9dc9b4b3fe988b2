//! Categorization workers draining the job queue.
use crate::categorize::Categorizer;
use crate::db;
use crate::model::JobKind;
use anyhow::Result;
use futures::future::join_all;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Claim and run one job. Returns whether a job was claimed.
///
/// A claimed job is gone from the queue whatever happens next; it is not
/// retried if categorization fails.
#[instrument(skip_all)]
pub async fn process_next_job(pool: &SqlitePool, categorizer: &Categorizer) -> Result<bool> {
    let Some(job) = db::claim_next_job(pool).await? else {
        return Ok(false);
    };
    match JobKind::parse_kind(&job.kind) {
        Some(JobKind::CategorizeArticle) => {
            categorize_article(pool, categorizer, &job.article_id).await?;
        }
        None => {
            warn!(id = job.id, kind = %job.kind, "unknown job kind; dropping");
        }
    }
    Ok(true)
}

/// Categorize a stored article and persist the label. An unknown id is a
/// silent no-op and yields `None`.
#[instrument(skip_all, fields(article_id = %article_id))]
pub async fn categorize_article(
    pool: &SqlitePool,
    categorizer: &Categorizer,
    article_id: &str,
) -> Result<Option<String>> {
    let Some(article) = db::fetch_article(pool, article_id).await? else {
        debug!(article_id, "article not found; skipping");
        return Ok(None);
    };
    let category = categorizer.categorize(&article.content).to_string();
    db::update_article_category(pool, &article.id, &category).await?;
    info!(article_id, category = %category, "article categorized");
    Ok(Some(category))
}

/// Process jobs until the queue is empty. Returns how many were claimed.
pub async fn drain(pool: &SqlitePool, categorizer: &Categorizer) -> Result<usize> {
    let mut processed = 0;
    while process_next_job(pool, categorizer).await? {
        processed += 1;
    }
    Ok(processed)
}

/// Poll the queue until `shutdown` flips to true or its sender goes away.
pub async fn run_worker(
    worker_id: usize,
    pool: SqlitePool,
    categorizer: Arc<Categorizer>,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(worker_id, "categorization worker started");
    while !*shutdown.borrow() {
        let pause = match process_next_job(&pool, &categorizer).await {
            Ok(true) => continue,
            Ok(false) => poll_interval,
            Err(err) => {
                error!(?err, worker_id, "categorization job failed");
                Duration::from_secs(1)
            }
        };
        let stop = tokio::select! {
            _ = tokio::time::sleep(pause) => false,
            changed = shutdown.changed() => changed.is_err(),
        };
        if stop {
            break;
        }
    }
    info!(worker_id, "categorization worker stopped");
}

/// Spawn `workers` polling workers sharing one categorizer.
pub fn spawn_workers(
    workers: usize,
    pool: &SqlitePool,
    categorizer: Arc<Categorizer>,
    poll_interval: Duration,
    shutdown: &watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    (0..workers)
        .map(|worker_id| {
            tokio::spawn(run_worker(
                worker_id,
                pool.clone(),
                categorizer.clone(),
                poll_interval,
                shutdown.clone(),
            ))
        })
        .collect()
}

/// Wait for every worker to exit, logging any that panicked.
pub async fn join_workers(handles: Vec<JoinHandle<()>>) {
    for res in join_all(handles).await {
        if let Err(err) = res {
            error!(?err, "worker task panicked");
        }
    }
}
