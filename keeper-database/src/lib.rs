use sqlx::{PgPool, migrate::Migrator};

/// Compile-time discovered SQLx migrations for the `keeper-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared database handle passed across crates.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), LedgerError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Expose the underlying pool for query modules.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Closure ledger trait and its Postgres backend.
pub mod closures;
mod error;
/// In-process ledger used without a configured database.
pub mod memory;
/// Ledger record and query types.
pub mod model;

pub use closures::ClosureLedger;
pub use error::LedgerError;
pub use memory::MemoryLedger;
pub use model::{ClosureFilter, ClosureRecord, NewClosure};
