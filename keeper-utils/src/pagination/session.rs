//! Live pagination sessions keyed by the message they are attached to.

use std::{collections::HashMap, sync::Arc};

use tokio::{sync::Mutex, task::JoinHandle};
use twilight_model::{
    channel::message::{component::Component, embed::Embed},
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};

use super::components::build_nav_components;
use super::view::{NavAction, PageCursor, Transition, TransitionError};

/// Pre-rendered pages plus cursor state for one paginated response.
#[derive(Debug, Clone)]
pub struct PaginationSession {
    command: String,
    owner_user_id: u64,
    pages: Vec<Embed>,
    cursor: PageCursor,
}

/// Embed and controls for the page under the cursor.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub embed: Embed,
    pub components: Vec<Component>,
}

impl PaginationSession {
    /// `None` when `pages` is empty.
    pub fn new(command: &str, owner_user_id: u64, pages: Vec<Embed>) -> Option<Self> {
        let cursor = PageCursor::new(pages.len())?;

        Some(Self {
            command: command.to_owned(),
            owner_user_id,
            pages,
            cursor,
        })
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn render(&self) -> RenderedPage {
        RenderedPage {
            embed: self.pages[self.cursor.cursor()].clone(),
            components: build_nav_components(
                &self.command,
                self.owner_user_id,
                self.cursor.controls(),
            ),
        }
    }
}

/// What the caller must do after a navigation press.
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// Edit the message in place with this page.
    Render(RenderedPage),
    /// Delete the bound message.
    Dismissed { channel_id: Id<ChannelMarker> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// No live session for the message (timed out, dismissed, or bot restarted).
    #[error("pagination session expired")]
    Expired,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

struct BoundSession {
    session: PaginationSession,
    channel_id: Id<ChannelMarker>,
    expiry: Option<JoinHandle<()>>,
}

/// Shared map of live sessions. Cheap to clone.
///
/// The lock is only held for state updates, never across HTTP calls.
#[derive(Clone, Default)]
pub struct PaginationRegistry {
    sessions: Arc<Mutex<HashMap<Id<MessageMarker>, BoundSession>>>,
}

impl PaginationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a session to the message that displays it.
    pub async fn bind(
        &self,
        message_id: Id<MessageMarker>,
        channel_id: Id<ChannelMarker>,
        session: PaginationSession,
    ) {
        let mut sessions = self.sessions.lock().await;
        let previous = sessions.insert(
            message_id,
            BoundSession {
                session,
                channel_id,
                expiry: None,
            },
        );

        if let Some(expiry) = previous.and_then(|bound| bound.expiry) {
            expiry.abort();
        }
    }

    /// Apply a control press to the session bound to `message_id`.
    ///
    /// A page change cancels the pending inactivity timer, so the caller must
    /// schedule a new one once the page is shown.
    pub async fn navigate(
        &self,
        message_id: Id<MessageMarker>,
        action: NavAction,
    ) -> Result<NavigationOutcome, NavigationError> {
        let mut sessions = self.sessions.lock().await;
        let bound = sessions
            .get_mut(&message_id)
            .ok_or(NavigationError::Expired)?;

        match bound.session.cursor.apply(action)? {
            Transition::Show(_) => {
                if let Some(expiry) = bound.expiry.take() {
                    expiry.abort();
                }
                Ok(NavigationOutcome::Render(bound.session.render()))
            }
            Transition::Dismissed => {
                let channel_id = bound.channel_id;
                if let Some(expiry) = sessions
                    .remove(&message_id)
                    .and_then(|bound| bound.expiry)
                {
                    expiry.abort();
                }
                Ok(NavigationOutcome::Dismissed { channel_id })
            }
        }
    }

    /// Freeze and forget the session, returning its final disabled rendering.
    ///
    /// `None` when the session is already gone.
    pub async fn freeze(
        &self,
        message_id: Id<MessageMarker>,
    ) -> Option<(Id<ChannelMarker>, RenderedPage)> {
        let mut bound = self.sessions.lock().await.remove(&message_id)?;
        bound.session.cursor.freeze();

        Some((bound.channel_id, bound.session.render()))
    }

    /// Replace the inactivity timer of a session, aborting the old one.
    ///
    /// The new timer is aborted too if the session no longer exists.
    pub async fn set_expiry(&self, message_id: Id<MessageMarker>, expiry: JoinHandle<()>) {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&message_id) {
            Some(bound) => {
                if let Some(previous) = bound.expiry.replace(expiry) {
                    previous.abort();
                }
            }
            None => expiry.abort(),
        }
    }

    pub async fn contains(&self, message_id: Id<MessageMarker>) -> bool {
        self.sessions.lock().await.contains_key(&message_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
