use serde::{Deserialize, Serialize};

use crate::{EntityId, FilterSet, ResourceRow};

/// A weekly attendance entry (one per child per club week).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagela {
    pub id: EntityId,
    pub sheltered_id: EntityId,
    pub year: u16,
    pub week: u8,
    #[serde(default)]
    pub present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ResourceRow for Pagela {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Pagela listings are scoped by calendar position, not text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagelaFilters {
    pub year: Option<u16>,
    pub week: Option<u8>,
}

impl FilterSet for PagelaFilters {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(year) = self.year {
            pairs.push(("year".to_string(), year.to_string()));
        }
        if let Some(week) = self.week {
            pairs.push(("week".to_string(), week.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagela_serde_roundtrip() {
        let p = Pagela {
            id: EntityId::from("p1"),
            sheltered_id: EntityId::from("s1"),
            year: 2025,
            week: 14,
            present: true,
            notes: None,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"shelteredId\""));
        let back: Pagela = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn present_defaults_to_false() {
        let p: Pagela =
            serde_json::from_str(r#"{"id":"p2","shelteredId":"s2","year":2025,"week":1}"#).unwrap();
        assert!(!p.present);
    }

    #[test]
    fn calendar_filters_in_order() {
        let f = PagelaFilters {
            year: Some(2025),
            week: Some(3),
        };
        assert_eq!(
            f.query_pairs(),
            vec![
                ("year".to_string(), "2025".to_string()),
                ("week".to_string(), "3".to_string()),
            ]
        );
    }
}
