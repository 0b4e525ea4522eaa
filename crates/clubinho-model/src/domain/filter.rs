/// Filter parameters attached to a list request.
///
/// `query_pairs` is the canonical serialization: it feeds both the request
/// query string and the structural fetch key, so equal filter values must
/// emit identical pairs in a stable order.
pub trait FilterSet: Clone + Default + PartialEq + Send + Sync + 'static {
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// True when no filter constrains the listing.
    fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

/// Filter set for resources listed without any filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilters;

impl FilterSet for NoFilters {
    fn query_pairs(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Free-text search shared by most manager screens.
///
/// Blank or whitespace-only input counts as "no filter" so that clearing
/// the search box returns to the unfiltered listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub q: Option<String>,
}

impl SearchFilters {
    pub fn query(q: impl Into<String>) -> Self {
        Self { q: Some(q.into()) }
    }
}

impl FilterSet for SearchFilters {
    fn query_pairs(&self) -> Vec<(String, String)> {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => vec![("q".to_string(), q.to_string())],
            _ => Vec::new(),
        }
    }
}
