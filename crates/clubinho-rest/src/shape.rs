//! The two list-response shapes the platform serves.
//!
//! Older endpoints answer `{"items": [...], "total": n}`; newer ones
//! answer `{"data": [...], "meta": {"totalItems": n}}`. Both normalize
//! into [`Page`] here so nothing above this module knows which shape a
//! resource speaks.

use serde::Deserialize;

use clubinho_model::Page;

/// Raw list body, either shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Flat { items: Vec<T>, total: u64 },
    Nested { data: Vec<T>, meta: ListMeta },
}

/// Pagination envelope of the nested shape. Extra counters the backend
/// sends alongside (`totalPages`, `currentPage`) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub total_items: u64,
}

impl<T> From<ListBody<T>> for Page<T> {
    fn from(body: ListBody<T>) -> Self {
        match body {
            ListBody::Flat { items, total } => Page { items, total },
            ListBody::Nested { data, meta } => Page {
                items: data,
                total: meta.total_items,
            },
        }
    }
}
