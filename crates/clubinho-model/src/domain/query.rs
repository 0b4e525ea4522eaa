use crate::{FilterSet, SortSpec, page_count};

/// Default rows-per-page used by the manager grids.
pub const DEFAULT_PAGE_SIZE: u32 = 12;
/// Upper bound accepted for a page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Client-held list position: page, size, sort and filters.
///
/// Pure state; every list request derives from it via
/// [`QueryState::to_request`]. Edits follow the manager-screen rules:
/// changing the page size, the sort or the filters moves the view back to
/// the first page, since the old position no longer means anything under
/// the new shape. Sort is no exception.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<F> {
    page_index: u32,
    page_size: u32,
    sort: Option<SortSpec>,
    filters: F,
}

impl<F: FilterSet> QueryState<F> {
    pub fn new() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            filters: F::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.set_sort(Some(sort));
        self
    }

    pub fn with_filters(mut self, filters: F) -> Self {
        self.set_filters(filters);
        self
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn set_page_index(&mut self, page_index: u32) {
        self.page_index = page_index;
    }

    /// Clamped to `1..=MAX_PAGE_SIZE`. Resets the page index.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.page_index = 0;
    }

    /// Resets the page index, same rule as filters and page size.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.page_index = 0;
    }

    /// Resets the page index: the old position is meaningless once the
    /// filtered set changes.
    pub fn set_filters(&mut self, filters: F) {
        self.filters = filters;
        self.page_index = 0;
    }

    /// Clamp the page index to the last page implied by `total`.
    ///
    /// Returns true when the index moved, in which case the caller owes the
    /// server a fetch for the corrected page.
    pub fn clamp_page_index(&mut self, total: u64) -> bool {
        let last = page_count(total, self.page_size).saturating_sub(1);
        if self.page_index > last {
            self.page_index = last;
            true
        } else {
            false
        }
    }

    /// Structural key identifying this exact query.
    ///
    /// Two states with equal keys would issue identical requests, so the
    /// fetcher treats a repeated key as a no-op.
    pub fn key(&self) -> String {
        let mut key = format!("p={};n={}", self.page_index, self.page_size);
        if let Some(sort) = &self.sort {
            key.push_str(&format!(";s={};o={}", sort.field, sort.direction.as_param()));
        }
        for (name, value) in self.filters.query_pairs() {
            key.push_str(&format!(";f:{name}={value}"));
        }
        key
    }

    /// Boundary-neutral request descriptor handed to the gateway.
    pub fn to_request(&self) -> ListRequest {
        ListRequest {
            page_index: self.page_index,
            page_size: self.page_size,
            sort: self.sort.clone(),
            filter_pairs: self.filters.query_pairs(),
        }
    }
}

impl<F: FilterSet> Default for QueryState<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// One list call, fully described.
///
/// This is what the fetcher derives from a [`QueryState`] snapshot and
/// hands to the gateway. The page index stays 0-based here; the wire
/// adapter converts to the API's 1-based `page` parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub page_index: u32,
    pub page_size: u32,
    pub sort: Option<SortSpec>,
    pub filter_pairs: Vec<(String, String)>,
}
