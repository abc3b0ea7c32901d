//! Integration tests for the sync run audit repository.
//!
//! These need a Postgres server; run with
//! `DATABASE_URL=postgres://... cargo test -p crmsync-db -- --ignored`.

use chrono::Utc;
use sqlx::PgPool;
use crmsync_core::sync_status::SyncRunStatus;
use crmsync_db::models::sync_run::CompleteSyncRun;
use crmsync_db::repositories::SyncRunRepo;

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn run_starts_running_with_zero_count(pool: PgPool) {
    let run = SyncRunRepo::create_running(&pool, Utc::now()).await.unwrap();

    assert_eq!(run.status(), Ok(SyncRunStatus::Running));
    assert_eq!(run.records_synced, 0);
    assert!(run.completed_at.is_none());
    assert!(run.error_message.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn terminal_runs_are_never_rewritten(pool: PgPool) {
    let run = SyncRunRepo::create_running(&pool, Utc::now()).await.unwrap();

    let done = SyncRunRepo::complete(&pool, run.id, &CompleteSyncRun::success(2, Utc::now()))
        .await
        .unwrap()
        .expect("running run should complete");
    assert_eq!(done.status(), Ok(SyncRunStatus::Success));
    assert_eq!(done.records_synced, 2);

    let again = SyncRunRepo::complete(
        &pool,
        run.id,
        &CompleteSyncRun::failure("late failure", Utc::now()),
    )
    .await
    .unwrap();
    assert!(again.is_none());

    let stored = SyncRunRepo::find_by_id(&pool, run.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), Ok(SyncRunStatus::Success));
    assert!(stored.error_message.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn failure_keeps_existing_count(pool: PgPool) {
    let run = SyncRunRepo::create_running(&pool, Utc::now()).await.unwrap();

    let failed = SyncRunRepo::complete(
        &pool,
        run.id,
        &CompleteSyncRun::failure("authentication failed", Utc::now()),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(failed.status(), Ok(SyncRunStatus::Failed));
    assert_eq!(failed.records_synced, 0);
    assert_eq!(failed.error_message.as_deref(), Some("authentication failed"));
    assert!(failed.completed_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn history_is_newest_first(pool: PgPool) {
    let older = Utc::now() - chrono::Duration::minutes(30);
    let first = SyncRunRepo::create_running(&pool, older).await.unwrap();
    let second = SyncRunRepo::create_running(&pool, Utc::now()).await.unwrap();

    let history = SyncRunRepo::list(&pool, 10, 0).await.unwrap();
    let ids: Vec<_> = history.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let latest = SyncRunRepo::latest(&pool).await.unwrap().unwrap();
    assert_eq!(latest.id, second.id);
}
