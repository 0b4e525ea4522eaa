use serde::{Deserialize, Serialize};

use crate::EntityId;

/// What a mutation verb did, for notifications and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    /// Relationship edit (`assign-club`, `move-club`, ...).
    Relate,
}

impl MutationKind {
    /// Short symbolic name for logging and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::Relate => "relate",
        }
    }
}

/// Summary of a successful mutation, handed back to the caller and echoed
/// on the event bus once reconciliation has settled.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub kind: MutationKind,
    /// Row the verb touched (the created row's id for `create`).
    pub id: Option<EntityId>,
    /// Server-supplied confirmation text, when the backend provides one.
    pub message: Option<String>,
}

/// Response body of a relationship verb (`PATCH /{resource}/{id}/{verb}`).
///
/// The backend answers these with an optional human-readable confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
