//! Renderable state of one listing, with the fetch/mutation transitions
//! the controller drives it through.
//!
//! All transitions run under a single lock so that sequence checks, row
//! replacement and the page clamp are atomic. The sequence number makes
//! fetches last-write-wins: only the most recently issued fetch may
//! commit, however late the others finish.

use std::sync::{Arc, RwLock};

use tokio_util::sync::CancellationToken;

use clubinho_model::{EntityId, FilterSet, ListRequest, Page, QueryState, ResourceRow};

use crate::error::CoreError;

/// Cheap copy of everything a renderer needs for one listing.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R> {
    /// Rows of the current page, in server order.
    pub rows: Vec<R>,
    /// Full filtered count across all pages.
    pub total: u64,
    /// True strictly between issuing a fetch and resolving the latest one.
    pub loading: bool,
    /// Banner text of the last failed fetch; rows stay valid while set.
    pub error: Option<String>,
    /// True while a mutation verb is running.
    pub dialog_loading: bool,
    /// Display text of the last failed mutation.
    pub dialog_error: Option<String>,
    /// Bumped on every visible change; lets consumers skip stale reads.
    pub version: u64,
}

/// A fetch admitted by [`ListState::begin_fetch`].
pub(crate) struct IssuedFetch {
    pub seq: u64,
    pub token: CancellationToken,
    pub request: ListRequest,
}

pub(crate) enum FetchAdmission {
    Issue(IssuedFetch),
    /// Same structural key as the last issued fetch; nothing to do.
    Deduped,
    Closed,
}

pub(crate) enum FetchCommit {
    Committed {
        rows: usize,
        total: u64,
        /// The committed total pushed `page_index` past the last page and
        /// the query was moved back; the caller must fetch again.
        clamped: bool,
    },
    /// A newer fetch was issued (or the controller closed) while this one
    /// was in flight; the response was dropped.
    Stale,
}

/// Shared mutable state of one controller.
#[derive(Clone)]
pub(crate) struct ListState<R, F: FilterSet> {
    inner: Arc<RwLock<Inner<R, F>>>,
}

struct Inner<R, F: FilterSet> {
    query: QueryState<F>,
    rows: Vec<R>,
    total: u64,
    loading: bool,
    error: Option<String>,
    dialog_loading: bool,
    dialog_error: Option<String>,
    version: u64,
    /// Sequence of the most recently issued fetch.
    seq: u64,
    /// Structural key of the most recently issued fetch.
    last_key: Option<String>,
    /// Cancels the in-flight gateway call when a newer fetch is issued.
    fetch_cancel: Option<CancellationToken>,
    closed: bool,
}

impl<R: ResourceRow, F: FilterSet> ListState<R, F> {
    pub(crate) fn new(query: QueryState<F>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                query,
                rows: Vec::new(),
                total: 0,
                loading: false,
                error: None,
                dialog_loading: false,
                dialog_error: None,
                version: 0,
                seq: 0,
                last_key: None,
                fetch_cancel: None,
                closed: false,
            })),
        }
    }

    pub(crate) fn snapshot(&self) -> ListSnapshot<R> {
        let inner = self.inner.read().unwrap();
        ListSnapshot {
            rows: inner.rows.clone(),
            total: inner.total,
            loading: inner.loading,
            error: inner.error.clone(),
            dialog_loading: inner.dialog_loading,
            dialog_error: inner.dialog_error.clone(),
            version: inner.version,
        }
    }

    pub(crate) fn query(&self) -> QueryState<F> {
        self.inner.read().unwrap().query.clone()
    }

    /// Current `(rows on page, total)` without cloning the rows.
    pub(crate) fn counts(&self) -> (usize, u64) {
        let inner = self.inner.read().unwrap();
        (inner.rows.len(), inner.total)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.read().unwrap().closed
    }

    /// Apply an edit to the query state.
    pub(crate) fn edit_query(
        &self,
        edit: impl FnOnce(&mut QueryState<F>),
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.write().unwrap();
        if inner.closed {
            return Err(CoreError::Closed);
        }
        edit(&mut inner.query);
        inner.version += 1;
        Ok(())
    }

    /// Admit a fetch for the current query.
    ///
    /// Unless `force` is set, a fetch whose structural key equals the last
    /// issued one is deduplicated. Admission cancels the in-flight gateway
    /// call, bumps the sequence and turns `loading` on.
    pub(crate) fn begin_fetch(&self, force: bool) -> FetchAdmission {
        let mut inner = self.inner.write().unwrap();
        if inner.closed {
            return FetchAdmission::Closed;
        }

        let key = inner.query.key();
        if !force && inner.last_key.as_deref() == Some(key.as_str()) {
            return FetchAdmission::Deduped;
        }

        inner.seq += 1;
        inner.last_key = Some(key);
        inner.loading = true;
        inner.version += 1;

        let token = CancellationToken::new();
        if let Some(previous) = inner.fetch_cancel.replace(token.clone()) {
            previous.cancel();
        }

        FetchAdmission::Issue(IssuedFetch {
            seq: inner.seq,
            token,
            request: inner.query.to_request(),
        })
    }

    /// Commit a fetch response, unless a newer fetch superseded it.
    ///
    /// On commit the rows and total are replaced wholesale, the banner is
    /// cleared and the page index is clamped to the last page implied by
    /// the new total.
    pub(crate) fn finish_fetch_ok(&self, seq: u64, page: Page<R>) -> FetchCommit {
        let mut inner = self.inner.write().unwrap();
        if inner.closed || seq != inner.seq {
            return FetchCommit::Stale;
        }

        inner.rows = page.items;
        inner.total = page.total;
        inner.loading = false;
        inner.error = None;

        let total = inner.total;
        let clamped = inner.query.clamp_page_index(total);

        inner.version += 1;
        FetchCommit::Committed {
            rows: inner.rows.len(),
            total: inner.total,
            clamped,
        }
    }

    /// Record a fetch failure. Returns false when the failure belonged to
    /// a superseded fetch and was swallowed. Rows and total are never
    /// touched: the previous page stays on display next to the banner.
    pub(crate) fn finish_fetch_err(&self, seq: u64, message: String) -> bool {
        let mut inner = self.inner.write().unwrap();
        if inner.closed || seq != inner.seq {
            return false;
        }
        inner.loading = false;
        inner.error = Some(message);
        inner.version += 1;
        true
    }

    /// Claim the dialog for one mutation verb.
    pub(crate) fn begin_mutation(&self) -> Result<(), CoreError> {
        let mut inner = self.inner.write().unwrap();
        if inner.closed {
            return Err(CoreError::Closed);
        }
        if inner.dialog_loading {
            return Err(CoreError::MutationInFlight);
        }
        inner.dialog_loading = true;
        inner.dialog_error = None;
        inner.version += 1;
        Ok(())
    }

    pub(crate) fn finish_mutation_ok(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.dialog_loading = false;
        inner.version += 1;
    }

    pub(crate) fn finish_mutation_err(&self, message: String) {
        let mut inner = self.inner.write().unwrap();
        inner.dialog_loading = false;
        inner.dialog_error = Some(message);
        inner.version += 1;
    }

    /// Replace the row with the same id in place. Order and length are
    /// preserved; false when the row is not on the current page.
    pub(crate) fn splice_row(&self, row: R) -> bool {
        let mut inner = self.inner.write().unwrap();
        if inner.closed {
            return false;
        }
        let id = row.id().clone();
        match inner.rows.iter().position(|r| *r.id() == id) {
            Some(index) => {
                inner.rows[index] = row;
                inner.version += 1;
                true
            }
            None => false,
        }
    }

    /// Drop a row from the current page. `total` intentionally keeps its
    /// stale value until the next full refetch.
    pub(crate) fn remove_row(&self, id: &EntityId) -> bool {
        let mut inner = self.inner.write().unwrap();
        if inner.closed {
            return false;
        }
        let before = inner.rows.len();
        inner.rows.retain(|r| r.id() != id);
        if inner.rows.len() != before {
            inner.version += 1;
            true
        } else {
            false
        }
    }

    /// Shut the state down: cancel the in-flight fetch and refuse every
    /// further admission and commit.
    pub(crate) fn close(&self) {
        let mut inner = self.inner.write().unwrap();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.loading = false;
        inner.version += 1;
        if let Some(token) = inner.fetch_cancel.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubinho_model::records::Club;
    use clubinho_model::{DEFAULT_PAGE_SIZE, NoFilters};

    fn club(id: &str, number: u32) -> Club {
        Club {
            id: EntityId::from(id),
            number,
            weekday: "saturday".to_string(),
        }
    }

    fn page(ids: &[(&str, u32)], total: u64) -> Page<Club> {
        Page {
            items: ids.iter().map(|(id, n)| club(id, *n)).collect(),
            total,
        }
    }

    fn setup_state() -> ListState<Club, NoFilters> {
        ListState::new(QueryState::default())
    }

    fn issue(state: &ListState<Club, NoFilters>, force: bool) -> IssuedFetch {
        match state.begin_fetch(force) {
            FetchAdmission::Issue(fetch) => fetch,
            _ => panic!("fetch should be admitted"),
        }
    }

    #[test]
    fn commit_replaces_rows_and_clears_error() {
        let state = setup_state();
        let fetch = issue(&state, false);
        state.finish_fetch_err(fetch.seq, "boom".to_string());
        assert_eq!(state.snapshot().error.as_deref(), Some("boom"));

        let fetch = issue(&state, true);
        let commit = state.finish_fetch_ok(fetch.seq, page(&[("c1", 1), ("c2", 2)], 2));
        assert!(matches!(
            commit,
            FetchCommit::Committed {
                rows: 2,
                total: 2,
                clamped: false
            }
        ));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.total, 2);
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
    }

    #[test]
    fn unchanged_key_is_deduped_and_force_bypasses() {
        let state = setup_state();
        let fetch = issue(&state, false);
        state.finish_fetch_ok(fetch.seq, page(&[("c1", 1)], 1));

        assert!(matches!(state.begin_fetch(false), FetchAdmission::Deduped));
        assert!(matches!(state.begin_fetch(true), FetchAdmission::Issue(_)));
    }

    #[test]
    fn edited_query_issues_a_new_key() {
        let state = setup_state();
        let fetch = issue(&state, false);
        state.finish_fetch_ok(fetch.seq, page(&[], 0));

        state.edit_query(|q| q.set_page_index(2)).unwrap();
        assert!(matches!(state.begin_fetch(false), FetchAdmission::Issue(_)));
    }

    #[test]
    fn late_superseded_response_is_dropped() {
        let state = setup_state();
        let first = issue(&state, false);
        assert!(!first.token.is_cancelled());

        state.edit_query(|q| q.set_page_index(1)).unwrap();
        let second = issue(&state, false);
        // Admitting the second fetch cancels the first one's token.
        assert!(first.token.is_cancelled());

        let commit = state.finish_fetch_ok(second.seq, page(&[("new", 2)], 20));
        assert!(matches!(commit, FetchCommit::Committed { .. }));
        assert!(!state.snapshot().loading);

        // The slow first response arrives afterwards and must not commit.
        let commit = state.finish_fetch_ok(first.seq, page(&[("old", 1)], 10));
        assert!(matches!(commit, FetchCommit::Stale));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.rows[0].number, 2);
        assert_eq!(snapshot.total, 20);
    }

    #[test]
    fn stale_failure_is_swallowed() {
        let state = setup_state();
        let first = issue(&state, false);
        state.edit_query(|q| q.set_page_index(1)).unwrap();
        let second = issue(&state, false);

        assert!(!state.finish_fetch_err(first.seq, "late failure".to_string()));
        let snapshot = state.snapshot();
        assert!(snapshot.error.is_none());
        // Latest fetch is still pending.
        assert!(snapshot.loading);

        assert!(state.finish_fetch_err(second.seq, "real failure".to_string()));
        assert_eq!(state.snapshot().error.as_deref(), Some("real failure"));
    }

    #[test]
    fn failure_keeps_previous_rows_on_display() {
        let state = setup_state();
        let fetch = issue(&state, false);
        state.finish_fetch_ok(fetch.seq, page(&[("c1", 1)], 1));

        let fetch = issue(&state, true);
        state.finish_fetch_err(fetch.seq, "offline".to_string());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.error.as_deref(), Some("offline"));
    }

    #[test]
    fn commit_clamps_page_past_the_end() {
        let state = setup_state();
        state.edit_query(|q| q.set_page_index(10)).unwrap();

        let fetch = issue(&state, false);
        // 57 records at the default size of 12 means pages 0..=4.
        let commit = state.finish_fetch_ok(fetch.seq, page(&[], 57));
        match commit {
            FetchCommit::Committed { clamped, .. } => assert!(clamped),
            FetchCommit::Stale => panic!("commit expected"),
        }
        assert_eq!(state.query().page_index(), 4);
        assert_eq!(state.query().page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn commit_clamps_empty_listing_to_first_page() {
        let state = setup_state();
        state.edit_query(|q| q.set_page_index(3)).unwrap();

        let fetch = issue(&state, false);
        let commit = state.finish_fetch_ok(fetch.seq, page(&[], 0));
        match commit {
            FetchCommit::Committed { clamped, .. } => assert!(clamped),
            FetchCommit::Stale => panic!("commit expected"),
        }
        assert_eq!(state.query().page_index(), 0);
    }

    #[test]
    fn mutation_guard_rejects_concurrent_verbs() {
        let state = setup_state();
        state.begin_mutation().unwrap();
        assert!(matches!(
            state.begin_mutation(),
            Err(CoreError::MutationInFlight)
        ));

        state.finish_mutation_ok();
        assert!(state.begin_mutation().is_ok());
    }

    #[test]
    fn mutation_failure_is_recorded_for_the_dialog() {
        let state = setup_state();
        state.begin_mutation().unwrap();
        state.finish_mutation_err("name is required".to_string());

        let snapshot = state.snapshot();
        assert!(!snapshot.dialog_loading);
        assert_eq!(snapshot.dialog_error.as_deref(), Some("name is required"));

        // The next verb starts with a clean dialog.
        state.begin_mutation().unwrap();
        assert!(state.snapshot().dialog_error.is_none());
    }

    #[test]
    fn splice_replaces_in_place_and_preserves_order() {
        let state = setup_state();
        let fetch = issue(&state, false);
        state.finish_fetch_ok(fetch.seq, page(&[("c1", 1), ("c2", 2), ("c3", 3)], 3));

        assert!(state.splice_row(club("c2", 22)));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.rows.len(), 3);
        assert_eq!(snapshot.rows[1].id, EntityId::from("c2"));
        assert_eq!(snapshot.rows[1].number, 22);
        assert_eq!(snapshot.total, 3);
    }

    #[test]
    fn splice_of_absent_row_is_a_noop() {
        let state = setup_state();
        let fetch = issue(&state, false);
        state.finish_fetch_ok(fetch.seq, page(&[("c1", 1)], 1));

        let version = state.snapshot().version;
        assert!(!state.splice_row(club("ghost", 9)));
        assert_eq!(state.snapshot().version, version);
    }

    #[test]
    fn remove_keeps_total_until_next_refetch() {
        let state = setup_state();
        let fetch = issue(&state, false);
        state.finish_fetch_ok(fetch.seq, page(&[("c1", 1), ("c2", 2)], 30));

        assert!(state.remove_row(&EntityId::from("c1")));
        assert!(!state.remove_row(&EntityId::from("c1")));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.total, 30);
    }

    #[test]
    fn close_cancels_and_blocks_everything() {
        let state = setup_state();
        let fetch = issue(&state, false);

        state.close();
        assert!(fetch.token.is_cancelled());
        assert!(matches!(state.begin_fetch(true), FetchAdmission::Closed));
        assert!(matches!(
            state.finish_fetch_ok(fetch.seq, page(&[("c1", 1)], 1)),
            FetchCommit::Stale
        ));
        assert!(matches!(state.begin_mutation(), Err(CoreError::Closed)));
        assert!(matches!(
            state.edit_query(|q| q.set_page_index(1)),
            Err(CoreError::Closed)
        ));
        assert!(!state.snapshot().loading);
    }
}
