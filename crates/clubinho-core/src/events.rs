//! Events fanned out to passive observers (log views, status bars).
//!
//! The controller broadcasts on a `tokio::sync::broadcast` channel; slow
//! subscribers lose old events rather than back-pressuring the controller.

/// Severity of a [`ControllerEvent::Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
        }
    }
}

/// What a controller tells the outside world.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// Visible rows changed (fetch commit, row splice or row removal).
    /// Subscribers should re-read the snapshot.
    RowsUpdated { rows: usize, total: u64 },

    /// A list fetch failed; `message` is the banner text. Previously
    /// displayed rows stay valid.
    FetchFailed { message: String },

    /// A mutation settled; `message` is the toast text.
    Notification {
        level: NotificationLevel,
        message: String,
    },
}

impl ControllerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerEvent::RowsUpdated { .. } => "rows-updated",
            ControllerEvent::FetchFailed { .. } => "fetch-failed",
            ControllerEvent::Notification { .. } => "notification",
        }
    }
}
