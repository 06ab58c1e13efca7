use thiserror::Error;

/// The ledger could not serve a request.
///
/// Never retried; the enclosing command fails with it.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("closure ledger unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
    #[error("closure ledger schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
