use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors returned by controller verbs.
///
/// Gateway failures on the list path never surface here; they land in the
/// snapshot's `error` field. Mutation verbs record their failure in
/// `dialog_error` and then return it, so callers can toast it.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("another dialog operation is still running")]
    MutationInFlight,

    #[error("cannot sort {resource} by \"{field}\"")]
    UnsortableField { resource: String, field: String },

    #[error("controller is shut down")]
    Closed,

    #[error("no club with number {0}")]
    UnknownClubNumber(u32),

    #[error("not a club number: \"{0}\"")]
    InvalidClubNumber(String),
}
