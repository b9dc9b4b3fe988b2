use chrono::{TimeZone, Utc};
use newsdesk::categorize::Categorizer;
use newsdesk::db;
use newsdesk::model::{JobKind, NewArticle};
use newsdesk::worker::{self, process_next_job};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Duration;

async fn setup_pool() -> sqlx::SqlitePool {
    let pool = db::init_pool("sqlite::memory:").await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

fn article(id: &str, content: &str) -> NewArticle {
    NewArticle {
        id: id.to_string(),
        title: format!("Title {id}"),
        content: content.to_string(),
        pub_date: Utc.with_ymd_and_hms(2024, 5, 17, 8, 0, 0).unwrap(),
        source_url: format!("https://wire.example/{id}"),
    }
}

async fn category_of(pool: &sqlx::SqlitePool, id: &str) -> String {
    db::fetch_article(pool, id).await.unwrap().unwrap().category
}

#[tokio::test]
async fn inserted_article_is_categorized_by_job() {
    let pool = setup_pool().await;
    let categorizer = Categorizer::default();

    db::insert_article(
        &pool,
        &article("quake-1", "A massive earthquake caused terrorism-related protest"),
    )
    .await
    .unwrap();
    assert_eq!(category_of(&pool, "quake-1").await, "Others");

    assert!(process_next_job(&pool, &categorizer).await.unwrap());
    assert!(!process_next_job(&pool, &categorizer).await.unwrap());

    assert_eq!(
        category_of(&pool, "quake-1").await,
        "Terrorism/Protest/Political Unrest/Riot"
    );
}

#[tokio::test]
async fn each_rule_and_fallback() {
    let pool = setup_pool().await;
    let categorizer = Categorizer::default();

    let cases = [
        ("pos", "It was an uplifting and positive story", "Positive/Uplifting"),
        ("calm", "The weather was calm today", "Others"),
        ("phrase", "Officials called it a natural disaster", "Others"),
        ("flood", "A natural disaster: the flood reached town", "Natural Disasters"),
    ];
    for (id, content, _) in &cases {
        db::insert_article(&pool, &article(id, content)).await.unwrap();
    }

    assert_eq!(worker::drain(&pool, &categorizer).await.unwrap(), cases.len());
    for (id, _, expected) in &cases {
        assert_eq!(category_of(&pool, id).await, *expected, "article {id}");
    }
}

#[tokio::test]
async fn duplicate_insert_keeps_first_and_queues_once() {
    let pool = setup_pool().await;
    let categorizer = Categorizer::default();

    assert!(db::insert_article(&pool, &article("dup", "Hurricane season begins"))
        .await
        .unwrap());
    assert!(!db::insert_article(&pool, &article("dup", "An inspiring rescue"))
        .await
        .unwrap());

    assert_eq!(db::count_pending_jobs(&pool).await.unwrap(), 1);
    assert_eq!(worker::drain(&pool, &categorizer).await.unwrap(), 1);

    let stored = db::fetch_article(&pool, "dup").await.unwrap().unwrap();
    assert_eq!(stored.content, "Hurricane season begins");
    assert_eq!(stored.category, "Natural Disasters");
}

#[tokio::test]
async fn job_for_missing_article_is_swallowed() {
    let pool = setup_pool().await;
    let categorizer = Categorizer::default();

    db::enqueue_job(&pool, JobKind::CategorizeArticle, "ghost")
        .await
        .unwrap();

    assert!(process_next_job(&pool, &categorizer).await.unwrap());
    assert_eq!(db::count_pending_jobs(&pool).await.unwrap(), 0);
    assert!(db::fetch_article(&pool, "ghost").await.unwrap().is_none());
    assert_eq!(
        worker::categorize_article(&pool, &categorizer, "ghost")
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn unknown_job_kind_is_dropped() {
    let pool = setup_pool().await;
    let categorizer = Categorizer::default();
    db::insert_article(&pool, &article("a", "A riot broke out"))
        .await
        .unwrap();
    sqlx::query("UPDATE jobs SET kind = 'bogus'")
        .execute(&pool)
        .await
        .unwrap();

    assert!(process_next_job(&pool, &categorizer).await.unwrap());
    assert_eq!(db::count_pending_jobs(&pool).await.unwrap(), 0);
    assert_eq!(category_of(&pool, "a").await, "Others");
}

#[tokio::test]
async fn rerun_overwrites_category() {
    let pool = setup_pool().await;
    let categorizer = Categorizer::default();
    db::insert_article(&pool, &article("edit", "Floods swept the delta"))
        .await
        .unwrap();
    worker::drain(&pool, &categorizer).await.unwrap();
    assert_eq!(category_of(&pool, "edit").await, "Natural Disasters");

    sqlx::query("UPDATE news_articles SET content = ? WHERE id = ?")
        .bind("Volunteers delivered an inspiring recovery")
        .bind("edit")
        .execute(&pool)
        .await
        .unwrap();
    db::enqueue_job(&pool, JobKind::CategorizeArticle, "edit")
        .await
        .unwrap();
    worker::drain(&pool, &categorizer).await.unwrap();

    assert_eq!(category_of(&pool, "edit").await, "Positive/Uplifting");
}

#[tokio::test]
async fn worker_pool_drains_queue_and_stops() {
    let pool = setup_pool().await;
    let categorizer = Arc::new(Categorizer::default());

    for i in 0..20 {
        let content = if i % 2 == 0 {
            "Protesters marched downtown"
        } else {
            "Markets were quiet"
        };
        db::insert_article(&pool, &article(&format!("bulk-{i}"), content))
            .await
            .unwrap();
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handles = worker::spawn_workers(
        3,
        &pool,
        categorizer,
        Duration::from_millis(10),
        &shutdown_rx,
    );

    for _ in 0..500 {
        if db::count_pending_jobs(&pool).await.unwrap() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), worker::join_workers(handles))
        .await
        .expect("workers stop after shutdown");

    assert_eq!(db::count_pending_jobs(&pool).await.unwrap(), 0);
    let counts = db::category_counts(&pool).await.unwrap();
    assert_eq!(
        counts,
        vec![
            ("Others".to_string(), 10),
            ("Terrorism/Protest/Political Unrest/Riot".to_string(), 10),
        ]
    );
}
