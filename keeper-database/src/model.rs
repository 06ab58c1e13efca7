use chrono::{DateTime, Utc};

/// One closed thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosureRecord {
    pub id: i64,
    pub thread_id: u64,
    pub user_id: u64,
    pub user_name: Option<String>,
    pub thread_name: Option<String>,
    pub channel_id: u64,
    pub closed_at: DateTime<Utc>,
}

/// Insert payload for [`crate::ClosureLedger::record_closure`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClosure {
    pub thread_id: u64,
    pub user_id: u64,
    pub user_name: Option<String>,
    pub thread_name: Option<String>,
    pub channel_id: u64,
}

/// Optional equality constraints for [`crate::ClosureLedger::query_closures`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClosureFilter {
    pub user_id: Option<u64>,
    pub channel_id: Option<u64>,
}

impl ClosureFilter {
    pub fn matches(&self, record: &ClosureRecord) -> bool {
        self.user_id.is_none_or(|user_id| record.user_id == user_id)
            && self
                .channel_id
                .is_none_or(|channel_id| record.channel_id == channel_id)
    }
}
