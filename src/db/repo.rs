use super::model::ClaimedJob;
use crate::model::{Article, JobKind, NewArticle};
use anyhow::{Context, Result};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use tracing::instrument;

pub type Pool = SqlitePool;

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    // Enable WAL and stricter durability.
    let options = SqliteConnectOptions::from_str(&normalized)
        .with_context(|| format!("invalid database url {normalized}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Full);

    // Every connection to sqlite::memory: is a separate database, so keep
    // exactly one and never let it expire.
    let mut pool_options = SqlitePoolOptions::new();
    if normalized.starts_with("sqlite::memory") {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_options.connect_with(options).await?;
    Ok(pool)
}

/// For file-backed SQLite URLs, expand a leading `~/` and create the parent
/// directory. Other schemes and in-memory URLs pass through untouched.
fn prepare_sqlite_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    if rest.starts_with(":memory") {
        return url.to_string();
    }

    let path_with_query = rest.strip_prefix("//").unwrap_or(rest);
    let (path_part, query_part) = match path_with_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_with_query, None),
    };
    if path_part.is_empty() {
        return url.to_string();
    }

    let expanded_path = match (path_part.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
        _ => path_part.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&expanded_path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    match query_part {
        Some(q) => format!("sqlite://{expanded_path}?{q}"),
        None => format!("sqlite://{expanded_path}"),
    }
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Store `article` unless its id already exists, and queue its categorization
/// in the same transaction. Returns whether a row was inserted; a duplicate id
/// leaves the stored article and the queue untouched.
#[instrument(skip_all, fields(article_id = %article.id))]
pub async fn insert_article(pool: &Pool, article: &NewArticle) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        "INSERT INTO news_articles (id, title, content, pub_date, source_url) VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO NOTHING",
    )
    .bind(&article.id)
    .bind(&article.title)
    .bind(&article.content)
    .bind(article.pub_date)
    .bind(&article.source_url)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if inserted {
        enqueue_job_tx(&mut tx, JobKind::CategorizeArticle, &article.id).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

#[instrument(skip_all)]
pub async fn fetch_article(pool: &Pool, article_id: &str) -> Result<Option<Article>> {
    let row = sqlx::query(
        "SELECT id, title, content, pub_date, source_url, category FROM news_articles WHERE id = ?",
    )
    .bind(article_id)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(article_from_row).transpose()
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        pub_date: row.try_get("pub_date")?,
        source_url: row.try_get("source_url")?,
        category: row.try_get("category")?,
    })
}

/// Overwrite the category of an article. Returns false when the id is unknown.
#[instrument(skip_all)]
pub async fn update_article_category(pool: &Pool, article_id: &str, category: &str) -> Result<bool> {
    let res = sqlx::query(
        "UPDATE news_articles SET category = ?, categorized_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(category)
    .bind(article_id)
    .execute(pool)
    .await
    .context("failed to persist article category")?;
    Ok(res.rows_affected() == 1)
}

pub async fn list_article_ids(pool: &Pool) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar("SELECT id FROM news_articles ORDER BY pub_date ASC, id ASC")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

pub async fn category_counts(pool: &Pool) -> Result<Vec<(String, i64)>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT category, COUNT(*) FROM news_articles GROUP BY category ORDER BY COUNT(*) DESC, category ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[instrument(skip_all)]
pub async fn enqueue_job(pool: &Pool, kind: JobKind, article_id: &str) -> Result<i64> {
    let mut tx = pool.begin().await?;
    let id = enqueue_job_tx(&mut tx, kind, article_id).await?;
    tx.commit().await?;
    Ok(id)
}

async fn enqueue_job_tx(
    tx: &mut Transaction<'_, Sqlite>,
    kind: JobKind,
    article_id: &str,
) -> Result<i64> {
    let rec = sqlx::query("INSERT INTO jobs (kind, article_id) VALUES (?, ?) RETURNING id")
        .bind(kind.as_str())
        .bind(article_id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(rec.get("id"))
}

/// Remove and return the oldest queued job. The single DELETE ... RETURNING
/// statement keeps two workers from claiming the same job.
#[instrument(skip_all)]
pub async fn claim_next_job(pool: &Pool) -> Result<Option<ClaimedJob>> {
    let row = sqlx::query(
        "DELETE FROM jobs WHERE id = (SELECT id FROM jobs ORDER BY id ASC LIMIT 1) \
         RETURNING id, kind, article_id",
    )
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(Some(ClaimedJob {
        id: row.try_get("id")?,
        kind: row.try_get("kind")?,
        article_id: row.try_get("article_id")?,
    }))
}

#[instrument(skip_all)]
pub async fn count_pending_jobs(pool: &Pool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
