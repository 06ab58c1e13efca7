use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{ClosureFilter, ClosureRecord, Database, LedgerError, NewClosure};

/// Append-only log of thread closures.
///
/// `thread_id` is unique: [`ClosureLedger::record_closure`] returns `Ok(None)`
/// for a thread that already has a record instead of writing a second one.
#[async_trait]
pub trait ClosureLedger: Send + Sync {
    /// Record a closure, or return `None` when the thread was already closed.
    async fn record_closure(&self, closure: NewClosure)
    -> Result<Option<ClosureRecord>, LedgerError>;

    /// Whether the thread has a closure record.
    async fn was_closed(&self, thread_id: u64) -> Result<bool, LedgerError>;

    /// All records matching the filter, in no particular order.
    async fn query_closures(&self, filter: ClosureFilter)
    -> Result<Vec<ClosureRecord>, LedgerError>;
}

#[derive(sqlx::FromRow)]
struct ClosureRow {
    id: i64,
    thread_id: i64,
    user_id: i64,
    user_name: Option<String>,
    thread_name: Option<String>,
    channel_id: i64,
    closed_at: DateTime<Utc>,
}

// Snowflakes fit in 63 bits, so the BIGINT round trip is lossless.
impl From<ClosureRow> for ClosureRecord {
    fn from(row: ClosureRow) -> Self {
        Self {
            id: row.id,
            thread_id: row.thread_id as u64,
            user_id: row.user_id as u64,
            user_name: row.user_name,
            thread_name: row.thread_name,
            channel_id: row.channel_id as u64,
            closed_at: row.closed_at,
        }
    }
}

#[async_trait]
impl ClosureLedger for Database {
    async fn record_closure(
        &self,
        closure: NewClosure,
    ) -> Result<Option<ClosureRecord>, LedgerError> {
        let inserted = sqlx::query_as::<_, ClosureRow>(
            r#"
            INSERT INTO thread_closures (thread_id, user_id, user_name, thread_name, channel_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, thread_id, user_id, user_name, thread_name, channel_id, closed_at
            "#,
        )
        .bind(closure.thread_id as i64)
        .bind(closure.user_id as i64)
        .bind(&closure.user_name)
        .bind(&closure.thread_name)
        .bind(closure.channel_id as i64)
        .fetch_one(self.pool())
        .await;

        match inserted {
            Ok(row) => {
                let record = ClosureRecord::from(row);
                info!(
                    thread_id = record.thread_id,
                    user_id = record.user_id,
                    channel_id = record.channel_id,
                    "thread closure recorded"
                );
                Ok(Some(record))
            }
            Err(sqlx::Error::Database(source)) if source.is_unique_violation() => {
                debug!(thread_id = closure.thread_id, "thread already has a closure record");
                Ok(None)
            }
            Err(source) => Err(source.into()),
        }
    }

    async fn was_closed(&self, thread_id: u64) -> Result<bool, LedgerError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM thread_closures WHERE thread_id = $1)")
                .bind(thread_id as i64)
                .fetch_one(self.pool())
                .await?;

        Ok(exists.0)
    }

    async fn query_closures(
        &self,
        filter: ClosureFilter,
    ) -> Result<Vec<ClosureRecord>, LedgerError> {
        let rows = sqlx::query_as::<_, ClosureRow>(
            r#"
            SELECT id, thread_id, user_id, user_name, thread_name, channel_id, closed_at
            FROM thread_closures
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
              AND ($2::BIGINT IS NULL OR channel_id = $2)
            "#,
        )
        .bind(filter.user_id.map(|id| id as i64))
        .bind(filter.channel_id.map(|id| id as i64))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(ClosureRecord::from).collect())
    }
}
