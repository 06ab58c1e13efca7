//! Cursor state machine behind a paginated message.

/// A control on a paginated message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
    Dismiss,
}

impl NavAction {
    pub const ALL: [NavAction; 5] = [
        NavAction::First,
        NavAction::Previous,
        NavAction::Next,
        NavAction::Last,
        NavAction::Dismiss,
    ];

    /// Stable name used inside component custom IDs.
    pub fn as_str(self) -> &'static str {
        match self {
            NavAction::First => "first",
            NavAction::Previous => "prev",
            NavAction::Next => "next",
            NavAction::Last => "last",
            NavAction::Dismiss => "stop",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == raw)
    }
}

/// Lifecycle of a paginated view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ViewState {
    /// Accepting navigation.
    Active,
    /// Inactivity timeout elapsed; controls stay visible but disabled.
    Frozen,
    /// Dismissed; the bound message is gone.
    Closed,
}

/// Result of a successful transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// Render the page at this zero-based index.
    Show(usize),
    /// Delete the bound message.
    Dismissed,
}

/// Actions are only accepted while the view is active.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("pagination view timed out")]
    Frozen,
    #[error("pagination view was dismissed")]
    Closed,
}

/// Enabled flags for each control, in display order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NavControls {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
    pub dismiss: bool,
}

impl NavControls {
    pub fn enabled(&self, action: NavAction) -> bool {
        match action {
            NavAction::First => self.first,
            NavAction::Previous => self.previous,
            NavAction::Next => self.next,
            NavAction::Last => self.last,
            NavAction::Dismiss => self.dismiss,
        }
    }
}

/// Cursor over `total` pages. Invariant: `cursor < total` and `total >= 1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageCursor {
    cursor: usize,
    total: usize,
    state: ViewState,
}

impl PageCursor {
    /// Start on the first page. `None` when there is nothing to page through.
    pub fn new(total: usize) -> Option<Self> {
        (total > 0).then_some(Self {
            cursor: 0,
            total,
            state: ViewState::Active,
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    fn last_index(&self) -> usize {
        self.total - 1
    }

    pub fn apply(&mut self, action: NavAction) -> Result<Transition, TransitionError> {
        match self.state {
            ViewState::Active => {}
            ViewState::Frozen => return Err(TransitionError::Frozen),
            ViewState::Closed => return Err(TransitionError::Closed),
        }

        self.cursor = match action {
            NavAction::First => 0,
            NavAction::Previous => self.cursor.saturating_sub(1),
            NavAction::Next => (self.cursor + 1).min(self.last_index()),
            NavAction::Last => self.last_index(),
            NavAction::Dismiss => {
                self.state = ViewState::Closed;
                return Ok(Transition::Dismissed);
            }
        };

        Ok(Transition::Show(self.cursor))
    }

    /// Absorb an inactivity timeout. Returns `false` if the view was not active.
    pub fn freeze(&mut self) -> bool {
        if self.state != ViewState::Active {
            return false;
        }

        self.state = ViewState::Frozen;
        true
    }

    pub fn controls(&self) -> NavControls {
        if self.state != ViewState::Active {
            return NavControls {
                first: false,
                previous: false,
                next: false,
                last: false,
                dismiss: false,
            };
        }

        let at_start = self.cursor == 0;
        let at_end = self.cursor == self.last_index();

        NavControls {
            first: !at_start,
            previous: !at_start,
            next: !at_end,
            last: !at_end,
            dismiss: true,
        }
    }
}
