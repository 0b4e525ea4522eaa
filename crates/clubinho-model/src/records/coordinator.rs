use serde::{Deserialize, Serialize};

use crate::{EntityId, FilterSet, ResourceRow};

/// Club coordinator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinator {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub active: bool,
    /// Club this coordinator runs, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<EntityId>,
    /// Last-modification timestamp as the backend formats it; the client
    /// never parses it, only sorts by it server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ResourceRow for Coordinator {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Filters of the coordinator manager: free-text search plus an
/// active-only toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorFilters {
    pub q: Option<String>,
    pub active: Option<bool>,
}

impl CoordinatorFilters {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            active: None,
        }
    }
}

impl FilterSet for CoordinatorFilters {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().map(str::trim)
            && !q.is_empty()
        {
            pairs.push(("q".to_string(), q.to_string()));
        }
        if let Some(active) = self.active {
            pairs.push(("active".to_string(), active.to_string()));
        }
        pairs
    }
}
