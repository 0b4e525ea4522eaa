use serde::{Deserialize, Serialize};

/// One page of rows plus the full filtered count.
///
/// `total` reflects the complete filtered set on the server, never
/// `items.len()`; the two only coincide on a single-page listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Number of pages this listing spans at the given page size.
    pub fn page_count(&self, page_size: u32) -> u32 {
        page_count(self.total, page_size)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Number of pages needed for `total` rows at `page_size` rows per page.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(57, 12), 5);
        assert_eq!(page_count(60, 12), 5);
        assert_eq!(page_count(61, 12), 6);
        assert_eq!(page_count(1, 12), 1);
    }

    #[test]
    fn page_count_empty_listing() {
        assert_eq!(page_count(0, 12), 0);
        assert_eq!(Page::<String>::empty().page_count(12), 0);
    }

    #[test]
    fn page_count_guards_zero_size() {
        assert_eq!(page_count(10, 0), 0);
    }
}
