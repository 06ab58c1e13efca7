//! Ledger contract tests against Postgres.
//!
//! Skipped unless `DATABASE_URL` points at a scratch database.

use chrono::Utc;
use keeper_database::{ClosureFilter, ClosureLedger, Database, NewClosure};
use sqlx::postgres::PgPoolOptions;

async fn connect() -> Option<Database> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("DATABASE_URL reachable");

    let db = Database::new(pool);
    db.migrate().await.expect("migrations apply");
    Some(db)
}

/// A thread id no earlier run has used.
fn fresh_thread_id() -> u64 {
    let nanos = Utc::now().timestamp_nanos_opt().expect("timestamp in range");
    nanos.unsigned_abs() >> 1
}

fn closure(thread_id: u64, user_id: u64) -> NewClosure {
    NewClosure {
        thread_id,
        user_id,
        user_name: Some(format!("mod-{user_id}")),
        thread_name: None,
        channel_id: 300,
    }
}

#[tokio::test]
async fn unique_violation_reports_already_closed() {
    let Some(db) = connect().await else {
        return;
    };
    let thread_id = fresh_thread_id();

    let first = db
        .record_closure(closure(thread_id, 1))
        .await
        .expect("ledger available")
        .expect("fresh thread");
    let second = db
        .record_closure(closure(thread_id, 2))
        .await
        .expect("duplicate is not an error");

    assert_eq!(first.thread_id, thread_id);
    assert_eq!(first.user_name.as_deref(), Some("mod-1"));
    assert_eq!(second, None);
    assert!(db.was_closed(thread_id).await.expect("ledger available"));

    let records = db
        .query_closures(ClosureFilter {
            user_id: Some(1),
            channel_id: Some(300),
        })
        .await
        .expect("ledger available");
    let matching = records
        .iter()
        .filter(|record| record.thread_id == thread_id)
        .count();
    assert_eq!(matching, 1);
}
