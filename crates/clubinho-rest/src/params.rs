//! Query-string rendering for list calls.

use clubinho_model::ListRequest;

/// Render `request` as the platform's list parameters.
///
/// The backend counts pages from 1 while the query state counts from 0;
/// this function is the only place that shift happens. Sort renders as a
/// `sort`/`order` pair and filter pairs append as-is after the paging
/// keys, already trimmed and canonicalized by the filter set.
pub fn list_query_pairs(request: &ListRequest) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(4 + request.filter_pairs.len());
    pairs.push(("page".to_string(), (request.page_index + 1).to_string()));
    pairs.push(("limit".to_string(), request.page_size.to_string()));
    if let Some(sort) = &request.sort {
        pairs.push(("sort".to_string(), sort.field.clone()));
        pairs.push(("order".to_string(), sort.direction.as_param().to_string()));
    }
    pairs.extend(request.filter_pairs.iter().cloned());
    pairs
}
