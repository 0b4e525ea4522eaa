use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use clubinho_core::{ControllerEvent, NotificationLevel};

/// Log one controller event at the level its kind warrants.
///
/// `RowsUpdated` fires on every commit and stays at debug. Fetch
/// failures warn, since the table keeps showing the previous rows.
/// Notifications carry their own severity.
#[inline]
pub fn log_event(event: &ControllerEvent) {
    match event {
        ControllerEvent::RowsUpdated { rows, total } => {
            debug!(rows = *rows, total = *total, "table refreshed")
        }
        ControllerEvent::FetchFailed { message } => {
            warn!(reason = %message, "list fetch failed, previous rows kept")
        }
        ControllerEvent::Notification { level, message } => match level {
            NotificationLevel::Info => info!("{message}"),
            NotificationLevel::Success => info!(outcome = "ok", "{message}"),
            NotificationLevel::Error => error!("{message}"),
        },
    }
}

/// Drain a controller's event stream into the log.
///
/// Runs until every sender is gone, i.e. until the controller that
/// handed out `events` shuts down and drops. Lagging skips events but
/// never stops the drain.
pub async fn log_events(mut events: Receiver<ControllerEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => log_event(&event),
            Err(RecvError::Lagged(missed)) => warn!(missed, "event stream lagged"),
            Err(RecvError::Closed) => return,
        }
    }
}
