use std::sync::Arc;

use twilight_http::Client;

use keeper_database::ClosureLedger;
use keeper_utils::pagination::PaginationRegistry;

/// Environment-driven runtime settings.
pub mod config;
/// The two moderated forums and their display wording.
pub mod forum;

pub use config::Config;
pub use forum::{Forum, ForumProfile};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub ledger: Arc<dyn ClosureLedger>,
    pub pagination: PaginationRegistry,
    pub config: Arc<Config>,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, ledger: Arc<dyn ClosureLedger>, config: Config) -> Self {
        Self {
            http,
            ledger,
            pagination: PaginationRegistry::new(),
            config: Arc::new(config),
        }
    }
}
