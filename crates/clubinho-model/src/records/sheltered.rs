use serde::{Deserialize, Serialize};

use crate::{EntityId, FilterSet, ResourceRow};

/// A sheltered child enrolled in a club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheltered {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Shelter the child lives in, when enrolled through one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ResourceRow for Sheltered {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Sheltered manager filters: search by name plus the club tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelteredFilters {
    pub q: Option<String>,
    pub club_id: Option<EntityId>,
}

impl FilterSet for ShelteredFilters {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().map(str::trim)
            && !q.is_empty()
        {
            pairs.push(("q".to_string(), q.to_string()));
        }
        if let Some(club_id) = &self.club_id {
            pairs.push(("clubId".to_string(), club_id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheltered_serde_roundtrip() {
        let s = Sheltered {
            id: EntityId::from("s1"),
            name: "João".to_string(),
            birth_date: Some("2017-03-09".to_string()),
            shelter: Some("Casa Esperança".to_string()),
            club_id: None,
            updated_at: None,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"birthDate\""));
        let back: Sheltered = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn filters_include_club_scope() {
        let f = ShelteredFilters {
            q: None,
            club_id: Some(EntityId::from("c3")),
        };
        assert_eq!(
            f.query_pairs(),
            vec![("clubId".to_string(), "c3".to_string())]
        );
    }
}
