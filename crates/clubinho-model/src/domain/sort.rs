use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordering direction for a sorted list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    /// Ascending (smallest first).
    #[default]
    Asc,
    /// Descending (largest first).
    Desc,
}

impl SortDirection {
    /// Wire value used in the `order` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid sort direction: {0} (expected: asc|desc)")]
pub struct InvalidSortDirection(pub String);

impl FromStr for SortDirection {
    type Err = InvalidSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(InvalidSortDirection(s.to_string())),
        }
    }
}

/// Field and direction pair for server-side sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    /// Backend field name, e.g. `updatedAt`.
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Desc
    }
}
