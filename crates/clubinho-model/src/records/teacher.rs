use serde::{Deserialize, Serialize};

use crate::{EntityId, ResourceRow};

/// Club teacher account. Teachers share the coordinator manager's search
/// filters ([`SearchFilters`](crate::SearchFilters) suffices).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ResourceRow for Teacher {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_serde_roundtrip() {
        let t = Teacher {
            id: EntityId::from("t9"),
            name: "Carla Lima".to_string(),
            email: None,
            club_id: Some(EntityId::from("c2")),
            updated_at: None,
        };

        let json = serde_json::to_string(&t).unwrap();
        let back: Teacher = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
