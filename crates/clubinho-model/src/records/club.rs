use serde::{Deserialize, Serialize};

use crate::{EntityId, ResourceRow};

/// A weekly club meeting group.
///
/// Clubs are referred to by their human-facing `number` everywhere in the
/// admin screens; the id only appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: EntityId,
    pub number: u32,
    /// Meeting day, backend-formatted (e.g. `saturday`).
    pub weekday: String,
}

impl ResourceRow for Club {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
