use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{ClosureFilter, ClosureLedger, ClosureRecord, LedgerError, NewClosure};

/// Ledger kept in process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: RwLock<Vec<ClosureRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record with an explicit closure time.
    ///
    /// Same uniqueness rule as [`ClosureLedger::record_closure`].
    pub async fn record_closure_at(
        &self,
        closure: NewClosure,
        closed_at: DateTime<Utc>,
    ) -> Option<ClosureRecord> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|record| record.thread_id == closure.thread_id)
        {
            return None;
        }

        let record = ClosureRecord {
            id: records.len() as i64 + 1,
            thread_id: closure.thread_id,
            user_id: closure.user_id,
            user_name: closure.user_name,
            thread_name: closure.thread_name,
            channel_id: closure.channel_id,
            closed_at,
        };
        records.push(record.clone());

        Some(record)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ClosureLedger for MemoryLedger {
    async fn record_closure(
        &self,
        closure: NewClosure,
    ) -> Result<Option<ClosureRecord>, LedgerError> {
        Ok(self.record_closure_at(closure, Utc::now()).await)
    }

    async fn was_closed(&self, thread_id: u64) -> Result<bool, LedgerError> {
        let records = self.records.read().await;
        Ok(records.iter().any(|record| record.thread_id == thread_id))
    }

    async fn query_closures(
        &self,
        filter: ClosureFilter,
    ) -> Result<Vec<ClosureRecord>, LedgerError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
