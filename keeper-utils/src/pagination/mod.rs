//! Stable facade for pagination helpers used by command handlers.

/// Default inactivity timeout for button-based pagination sessions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

mod components;
pub mod respond;
pub mod session;
pub mod token;
pub mod view;

pub use respond::{handle_navigation, send_paginated_response};
pub use session::{PaginationRegistry, PaginationSession};
pub use view::{NavAction, PageCursor, ViewState};
