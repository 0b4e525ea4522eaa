//! The list controller: one instance per listing screen.
//!
//! Verbs fall into two families with different error contracts. Query
//! edits and refreshes never return gateway failures; those land in the
//! snapshot's `error` banner while the previous rows stay on display.
//! Mutation verbs record their failure in `dialog_error` and then return
//! it, so the caller can toast and decide what to do with the dialog.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, instrument, trace, warn};

use clubinho_model::{
    EntityId, FilterSet, MutationKind, MutationOutcome, QueryState, ResourceRow, SortDirection,
    SortSpec, resources::ResourceConfig,
};

use crate::{
    config::ControllerConfig,
    debounce::Debouncer,
    error::CoreError,
    events::{ControllerEvent, NotificationLevel},
    gateway::{CreateBody, GatewayError, ResourceGateway},
    metrics::{MetricsSink, NoopMetrics},
    state::{FetchAdmission, FetchCommit, ListSnapshot, ListState},
};

/// Outcome of a single-row refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRefresh {
    /// The fresh record was spliced in at the row's current index.
    Updated,
    /// The record could not be fetched anymore; the row was dropped from
    /// the page. `total` stays stale until the next full refetch.
    Removed,
    /// The row is not on the current page; nothing changed.
    Absent,
}

struct Shared<R: ResourceRow, F: FilterSet> {
    config: ControllerConfig,
    gateway: Arc<dyn ResourceGateway<R>>,
    state: ListState<R, F>,
    events: broadcast::Sender<ControllerEvent>,
    metrics: Arc<dyn MetricsSink>,
    debounce: Debouncer,
}

/// Drives one paginated listing against one [`ResourceGateway`].
///
/// Cheap to clone; clones share the same state. Construction issues no
/// fetch; call [`refresh`](ListController::refresh) to load the first
/// page once a renderer is attached.
pub struct ListController<R: ResourceRow, F: FilterSet> {
    shared: Arc<Shared<R, F>>,
}

impl<R: ResourceRow, F: FilterSet> Clone for ListController<R, F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: ResourceRow, F: FilterSet> ListController<R, F> {
    pub fn new(config: ControllerConfig, gateway: Arc<dyn ResourceGateway<R>>) -> Self {
        Self::with_metrics(config, gateway, Arc::new(NoopMetrics))
    }

    pub fn with_metrics(
        config: ControllerConfig,
        gateway: Arc<dyn ResourceGateway<R>>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        let mut query = QueryState::new().with_page_size(config.page_size);
        if let Some(sort) = config.resource.default_sort() {
            query = query.with_sort(sort.clone());
        }
        let (events, _) = broadcast::channel(config.event_capacity);
        let debounce = Debouncer::new(config.debounce_window);

        Self {
            shared: Arc::new(Shared {
                state: ListState::new(query),
                config,
                gateway,
                events,
                metrics,
                debounce,
            }),
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<R> {
        self.shared.state.snapshot()
    }

    pub fn query(&self) -> QueryState<F> {
        self.shared.state.query()
    }

    pub fn resource(&self) -> &ResourceConfig {
        &self.shared.config.resource
    }

    /// Subscribe to [`ControllerEvent`]s. Slow subscribers lose old events
    /// rather than slowing the controller down.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.shared.events.subscribe()
    }

    /// Jump to a page. Fetches unless the view is already there.
    pub async fn set_page_index(&self, page_index: u32) -> Result<(), CoreError> {
        self.shared
            .state
            .edit_query(|q| q.set_page_index(page_index))?;
        self.run_fetch(false).await;
        Ok(())
    }

    /// Change the rows-per-page. Resets the view to the first page.
    pub async fn set_page_size(&self, page_size: u32) -> Result<(), CoreError> {
        self.shared
            .state
            .edit_query(|q| q.set_page_size(page_size))?;
        self.run_fetch(false).await;
        Ok(())
    }

    /// Sort by `field`. Rejected locally when the resource does not list
    /// the field as sortable; nothing reaches the wire in that case.
    /// Resets the view to the first page.
    pub async fn set_sort(&self, field: &str, direction: SortDirection) -> Result<(), CoreError> {
        if !self.shared.config.resource.allows_sort(field) {
            return Err(CoreError::UnsortableField {
                resource: self.resource_path().to_string(),
                field: field.to_string(),
            });
        }
        let sort = SortSpec {
            field: field.to_string(),
            direction,
        };
        self.shared.state.edit_query(|q| q.set_sort(Some(sort)))?;
        self.run_fetch(false).await;
        Ok(())
    }

    /// Apply filters immediately. Resets the view to the first page.
    pub async fn set_filters(&self, filters: F) -> Result<(), CoreError> {
        self.shared.state.edit_query(|q| q.set_filters(filters))?;
        self.run_fetch(false).await;
        Ok(())
    }

    /// Apply filters once the caller has been quiet for the configured
    /// window. A burst of edits collapses into one fetch carrying the last
    /// value; shutdown cancels whatever is pending.
    pub fn set_filters_debounced(&self, filters: F) {
        let weak = Arc::downgrade(&self.shared);
        self.shared.debounce.call(async move {
            if let Some(shared) = weak.upgrade() {
                let controller = ListController { shared };
                // The only possible failure is a shutdown race; the timer
                // is already spent either way.
                let _ = controller.set_filters(filters).await;
            }
        });
    }

    /// Refetch the current query, bypassing the structural-key dedup.
    /// Reconciliation and pull-to-refresh both come through here.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        if self.shared.state.is_closed() {
            return Err(CoreError::Closed);
        }
        self.run_fetch(true).await;
        Ok(())
    }

    /// Create a record, refetch the page, then notify.
    #[instrument(level = "debug", skip(self, body))]
    pub async fn create(&self, body: CreateBody) -> Result<MutationOutcome, CoreError> {
        self.shared.state.begin_mutation()?;
        let created = match self.shared.gateway.create(body).await {
            Ok(created) => created,
            Err(err) => return Err(self.fail_mutation(MutationKind::Create, "create", err)),
        };
        let id = created.map(|row| row.id().clone());
        self.run_fetch(true).await;
        Ok(self.settle_mutation(MutationKind::Create, "create", id, None))
    }

    /// Update a record, refetch the page, then notify. The page refetch is
    /// deliberate: an update can move the row under the active sort.
    #[instrument(level = "debug", skip(self, body))]
    pub async fn update(&self, id: &EntityId, body: Value) -> Result<MutationOutcome, CoreError> {
        self.shared.state.begin_mutation()?;
        if let Err(err) = self.shared.gateway.update(id, body).await {
            return Err(self.fail_mutation(MutationKind::Update, "update", err));
        }
        self.run_fetch(true).await;
        Ok(self.settle_mutation(MutationKind::Update, "update", Some(id.clone()), None))
    }

    /// Delete a record, refetch the page, then notify. Deleting the last
    /// row of the last page clamps the view back into range.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: &EntityId) -> Result<MutationOutcome, CoreError> {
        self.shared.state.begin_mutation()?;
        if let Err(err) = self.shared.gateway.delete(id).await {
            return Err(self.fail_mutation(MutationKind::Delete, "delete", err));
        }
        self.run_fetch(true).await;
        Ok(self.settle_mutation(MutationKind::Delete, "delete", Some(id.clone()), None))
    }

    /// Apply a relationship verb, refresh just the affected row, then
    /// notify with the receipt's message.
    #[instrument(level = "debug", skip(self, body))]
    pub async fn relate(
        &self,
        id: &EntityId,
        verb: &str,
        body: Value,
    ) -> Result<MutationOutcome, CoreError> {
        self.shared.state.begin_mutation()?;
        let receipt = match self.shared.gateway.relate(id, verb, body).await {
            Ok(receipt) => receipt,
            Err(err) => return Err(self.fail_mutation(MutationKind::Relate, verb, err)),
        };
        self.refresh_row_inner(id).await;
        Ok(self.settle_mutation(MutationKind::Relate, verb, Some(id.clone()), receipt.message))
    }

    /// Re-read one record and splice it into the page in place.
    ///
    /// Any gateway failure means "the record is gone": the row is removed
    /// and `total` keeps its stale value until the next full refetch.
    pub async fn refresh_row(&self, id: &EntityId) -> Result<RowRefresh, CoreError> {
        if self.shared.state.is_closed() {
            return Err(CoreError::Closed);
        }
        Ok(self.refresh_row_inner(id).await)
    }

    /// Unmount: cancel the pending debounce and the in-flight fetch, and
    /// refuse every further edit and commit. Idempotent.
    pub fn shutdown(&self) {
        self.shared.debounce.cancel();
        self.shared.state.close();
        debug!(target: "clubinho.core", resource = self.resource_path(), "controller shut down");
    }

    /// Issue-and-commit loop for the current query.
    ///
    /// A commit that clamps the page owes the server another fetch, so the
    /// loop continues until the committed page is in range. Superseded and
    /// cancelled completions end the loop silently: a newer fetch owns the
    /// listing by then.
    async fn run_fetch(&self, force: bool) {
        let resource = self.resource_path();
        let mut force = force;
        loop {
            let fetch = match self.shared.state.begin_fetch(force) {
                FetchAdmission::Issue(fetch) => fetch,
                FetchAdmission::Deduped => {
                    trace!(target: "clubinho.core", resource, "fetch deduped");
                    return;
                }
                FetchAdmission::Closed => return,
            };

            self.shared.metrics.fetch_issued(resource);
            debug!(
                target: "clubinho.core",
                resource,
                seq = fetch.seq,
                page = fetch.request.page_index,
                "fetch issued"
            );

            let started = Instant::now();
            let outcome = tokio::select! {
                _ = fetch.token.cancelled() => None,
                result = self.shared.gateway.list(&fetch.request) => Some(result),
            };

            match outcome {
                None => {
                    self.shared.metrics.fetch_superseded(resource);
                    trace!(target: "clubinho.core", resource, seq = fetch.seq, "fetch cancelled");
                    return;
                }
                Some(Ok(page)) => match self.shared.state.finish_fetch_ok(fetch.seq, page) {
                    FetchCommit::Committed {
                        rows,
                        total,
                        clamped,
                    } => {
                        self.shared
                            .metrics
                            .fetch_committed(resource, started.elapsed());
                        debug!(
                            target: "clubinho.core",
                            resource,
                            seq = fetch.seq,
                            rows,
                            total,
                            clamped,
                            "fetch committed"
                        );
                        let _ = self
                            .shared
                            .events
                            .send(ControllerEvent::RowsUpdated { rows, total });
                        if clamped {
                            force = false;
                            continue;
                        }
                        return;
                    }
                    FetchCommit::Stale => {
                        self.shared.metrics.fetch_superseded(resource);
                        trace!(target: "clubinho.core", resource, seq = fetch.seq, "fetch superseded");
                        return;
                    }
                },
                Some(Err(err)) => {
                    let message = err.to_string();
                    if self.shared.state.finish_fetch_err(fetch.seq, message.clone()) {
                        self.shared.metrics.fetch_failed(resource);
                        warn!(target: "clubinho.core", resource, seq = fetch.seq, %message, "fetch failed");
                        let _ = self
                            .shared
                            .events
                            .send(ControllerEvent::FetchFailed { message });
                    } else {
                        self.shared.metrics.fetch_superseded(resource);
                    }
                    return;
                }
            }
        }
    }

    async fn refresh_row_inner(&self, id: &EntityId) -> RowRefresh {
        let refresh = match self.shared.gateway.get_one(id).await {
            Ok(row) => {
                if self.shared.state.splice_row(row) {
                    RowRefresh::Updated
                } else {
                    RowRefresh::Absent
                }
            }
            Err(err) => {
                debug!(
                    target: "clubinho.core",
                    resource = self.resource_path(),
                    id = %id,
                    error = %err,
                    "row refresh failed; dropping the row"
                );
                if self.shared.state.remove_row(id) {
                    RowRefresh::Removed
                } else {
                    RowRefresh::Absent
                }
            }
        };
        if refresh != RowRefresh::Absent {
            let (rows, total) = self.shared.state.counts();
            let _ = self
                .shared
                .events
                .send(ControllerEvent::RowsUpdated { rows, total });
        }
        refresh
    }

    fn fail_mutation(&self, kind: MutationKind, verb: &str, err: GatewayError) -> CoreError {
        let message = err.to_string();
        warn!(
            target: "clubinho.core",
            resource = self.resource_path(),
            kind = kind.as_str(),
            verb,
            %message,
            "mutation failed"
        );
        self.shared.state.finish_mutation_err(message);
        self.shared
            .metrics
            .mutation(self.resource_path(), verb, false);
        CoreError::Gateway(err)
    }

    fn settle_mutation(
        &self,
        kind: MutationKind,
        verb: &str,
        id: Option<EntityId>,
        message: Option<String>,
    ) -> MutationOutcome {
        self.shared.state.finish_mutation_ok();
        self.shared
            .metrics
            .mutation(self.resource_path(), verb, true);
        let message = message.unwrap_or_else(|| default_message(kind).to_string());
        let _ = self.shared.events.send(ControllerEvent::Notification {
            level: NotificationLevel::Success,
            message: message.clone(),
        });
        MutationOutcome {
            kind,
            id,
            message: Some(message),
        }
    }

    fn resource_path(&self) -> &'static str {
        self.shared.config.resource.path()
    }
}

impl<R: ResourceRow, F: FilterSet> std::fmt::Debug for ListController<R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("resource", &self.resource_path())
            .finish_non_exhaustive()
    }
}

/// Toast text used when the backend does not supply one.
fn default_message(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Create => "record created",
        MutationKind::Update => "record updated",
        MutationKind::Delete => "record deleted",
        MutationKind::Relate => "record updated",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use clubinho_model::records::{Coordinator, CoordinatorFilters};
    use clubinho_model::{
        DEFAULT_PAGE_SIZE, ListRequest, Page, RelationReceipt, page_count, resources,
        resources::verbs,
    };

    use super::*;

    fn person(id: &str, name: &str) -> Coordinator {
        Coordinator {
            id: EntityId::from(id),
            name: name.to_string(),
            email: None,
            active: true,
            club_id: None,
            updated_at: None,
        }
    }

    /// In-memory coordinators backend with scriptable latency and failures.
    #[derive(Default)]
    struct FakeGateway {
        people: Mutex<Vec<Coordinator>>,
        list_calls: Mutex<Vec<ListRequest>>,
        get_calls: Mutex<Vec<EntityId>>,
        relate_calls: Mutex<Vec<(EntityId, String, Value)>>,
        fail_next_list: AtomicBool,
        fail_mutations: AtomicBool,
        /// Extra latency keyed on the `q` filter value.
        delays: Mutex<HashMap<String, Duration>>,
    }

    impl FakeGateway {
        fn seeded(count: usize) -> Arc<Self> {
            let gateway = Self::default();
            {
                let mut people = gateway.people.lock().unwrap();
                for i in 0..count {
                    people.push(person(&format!("p{i}"), &format!("Person {i:02}")));
                }
            }
            Arc::new(gateway)
        }

        fn list_count(&self) -> usize {
            self.list_calls.lock().unwrap().len()
        }

        fn last_list(&self) -> ListRequest {
            self.list_calls.lock().unwrap().last().cloned().unwrap()
        }

        fn delay_for(&self, q: &str, delay: Duration) {
            self.delays.lock().unwrap().insert(q.to_string(), delay);
        }
    }

    #[async_trait]
    impl ResourceGateway<Coordinator> for FakeGateway {
        async fn list(&self, request: &ListRequest) -> Result<Page<Coordinator>, GatewayError> {
            self.list_calls.lock().unwrap().push(request.clone());

            let q = request
                .filter_pairs
                .iter()
                .find(|(name, _)| name == "q")
                .map(|(_, value)| value.to_lowercase())
                .unwrap_or_default();

            let delay = self.delays.lock().unwrap().get(&q).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_next_list.swap(false, Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    status: 500,
                    message: "backend exploded".to_string(),
                });
            }

            let people = self.people.lock().unwrap();
            let filtered: Vec<Coordinator> = people
                .iter()
                .filter(|p| q.is_empty() || p.name.to_lowercase().contains(&q))
                .cloned()
                .collect();
            let total = filtered.len() as u64;
            let start = (request.page_index * request.page_size) as usize;
            let items = filtered
                .into_iter()
                .skip(start)
                .take(request.page_size as usize)
                .collect();
            Ok(Page { items, total })
        }

        async fn get_one(&self, id: &EntityId) -> Result<Coordinator, GatewayError> {
            self.get_calls.lock().unwrap().push(id.clone());
            self.people
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == *id)
                .cloned()
                .ok_or(GatewayError::NotFound)
        }

        async fn create(&self, body: CreateBody) -> Result<Option<Coordinator>, GatewayError> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    status: 422,
                    message: "name is required".to_string(),
                });
            }
            let CreateBody::Json(value) = body else {
                return Err(GatewayError::InvalidRequest(
                    "multipart not supported here".to_string(),
                ));
            };
            let name = value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("unnamed")
                .to_string();

            let mut people = self.people.lock().unwrap();
            let id = format!("new{}", people.len());
            let row = person(&id, &name);
            people.insert(0, row.clone());
            Ok(Some(row))
        }

        async fn update(
            &self,
            id: &EntityId,
            body: Value,
        ) -> Result<Option<Coordinator>, GatewayError> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    status: 422,
                    message: "name is required".to_string(),
                });
            }
            let mut people = self.people.lock().unwrap();
            let Some(row) = people.iter_mut().find(|p| p.id == *id) else {
                return Err(GatewayError::NotFound);
            };
            if let Some(name) = body.get("name").and_then(Value::as_str) {
                row.name = name.to_string();
            }
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: &EntityId) -> Result<(), GatewayError> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    status: 409,
                    message: "still referenced".to_string(),
                });
            }
            let mut people = self.people.lock().unwrap();
            let before = people.len();
            people.retain(|p| p.id != *id);
            if people.len() == before {
                return Err(GatewayError::NotFound);
            }
            Ok(())
        }

        async fn relate(
            &self,
            id: &EntityId,
            verb: &str,
            body: Value,
        ) -> Result<RelationReceipt, GatewayError> {
            self.relate_calls
                .lock()
                .unwrap()
                .push((id.clone(), verb.to_string(), body.clone()));
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    status: 422,
                    message: "cannot link".to_string(),
                });
            }
            let mut people = self.people.lock().unwrap();
            let Some(row) = people.iter_mut().find(|p| p.id == *id) else {
                return Err(GatewayError::NotFound);
            };
            match verb {
                verbs::ASSIGN_CLUB | verbs::MOVE_CLUB => {
                    row.club_id = body
                        .get("clubId")
                        .and_then(Value::as_str)
                        .map(EntityId::from);
                }
                verbs::UNASSIGN_CLUB => row.club_id = None,
                _ => {}
            }
            Ok(RelationReceipt {
                message: Some(format!("{verb} ok")),
            })
        }
    }

    fn controller_with(
        gateway: Arc<FakeGateway>,
    ) -> ListController<Coordinator, CoordinatorFilters> {
        let config = ControllerConfig::new(resources::coordinators())
            .with_debounce_window(Duration::from_millis(25));
        ListController::new(config, gateway)
    }

    #[tokio::test]
    async fn unchanged_query_fetches_once() {
        let gateway = FakeGateway::seeded(3);
        let controller = controller_with(gateway.clone());

        controller
            .set_filters(CoordinatorFilters::default())
            .await
            .unwrap();
        assert_eq!(gateway.list_count(), 1);

        // Same structural key: nothing reaches the gateway.
        controller
            .set_filters(CoordinatorFilters::default())
            .await
            .unwrap();
        assert_eq!(gateway.list_count(), 1);

        // refresh() is the explicit bypass.
        controller.refresh().await.unwrap();
        assert_eq!(gateway.list_count(), 2);
    }

    #[tokio::test]
    async fn slow_superseded_response_never_overwrites() {
        let gateway = FakeGateway::seeded(40);
        gateway.delay_for("person 3", Duration::from_millis(150));
        let controller = controller_with(gateway.clone());

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .set_filters(CoordinatorFilters::search("person 3"))
                    .await
            })
        };
        // Wait for the slow fetch to be issued before racing it.
        while gateway.list_count() == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        controller
            .set_filters(CoordinatorFilters::search("person 01"))
            .await
            .unwrap();
        slow.await.unwrap().unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].name, "Person 01");
        assert_eq!(snapshot.total, 1);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn filter_and_size_edits_reset_the_page() {
        let gateway = FakeGateway::seeded(57);
        let controller = controller_with(gateway.clone());

        controller.set_page_index(3).await.unwrap();
        assert_eq!(controller.query().page_index(), 3);

        controller
            .set_filters(CoordinatorFilters::search("person"))
            .await
            .unwrap();
        assert_eq!(controller.query().page_index(), 0);

        controller.set_page_index(2).await.unwrap();
        controller.set_page_size(24).await.unwrap();
        assert_eq!(controller.query().page_index(), 0);
        assert_eq!(controller.query().page_size(), 24);
        assert_eq!(gateway.last_list().page_index, 0);
    }

    #[tokio::test]
    async fn sort_must_be_on_the_allowlist() {
        let gateway = FakeGateway::seeded(3);
        let controller = controller_with(gateway.clone());

        let err = controller
            .set_sort("password", SortDirection::Asc)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsortableField { .. }));
        assert_eq!(gateway.list_count(), 0);

        controller
            .set_sort("name", SortDirection::Asc)
            .await
            .unwrap();
        let sort = gateway.last_list().sort.unwrap();
        assert_eq!(sort.field, "name");
        assert!(!sort.is_descending());
    }

    #[tokio::test]
    async fn page_past_the_end_clamps_and_refetches() {
        let gateway = FakeGateway::seeded(57);
        let controller = controller_with(gateway.clone());

        controller.set_page_index(10).await.unwrap();

        assert_eq!(controller.query().page_index(), 4);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total, 57);
        // 57 records at 12/page leave 9 on the last page.
        assert_eq!(snapshot.rows.len(), 9);

        let requests = gateway.list_calls.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].page_index, 10);
        assert_eq!(requests[1].page_index, 4);
    }

    #[tokio::test]
    async fn debounced_edits_collapse_into_one_fetch() {
        let gateway = FakeGateway::seeded(30);
        let controller = controller_with(gateway.clone());

        for text in ["p", "pe", "per", "pers"] {
            controller.set_filters_debounced(CoordinatorFilters::search(text));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(gateway.list_count(), 1);
        let request = gateway.last_list();
        assert!(
            request
                .filter_pairs
                .contains(&("q".to_string(), "pers".to_string()))
        );
        assert_eq!(controller.snapshot().total, 30);
    }

    #[tokio::test]
    async fn create_refetches_before_notifying() {
        let gateway = FakeGateway::seeded(3);
        let controller = controller_with(gateway.clone());
        controller.refresh().await.unwrap();

        let mut events = controller.subscribe();
        let outcome = controller
            .create(CreateBody::json(json!({ "name": "Nova Pessoa" })))
            .await
            .unwrap();
        assert_eq!(outcome.kind, MutationKind::Create);
        assert!(outcome.id.is_some());

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.rows[0].name, "Nova Pessoa");
        assert!(!snapshot.dialog_loading);

        // Rows must be reconciled before the success toast goes out.
        let first = events.recv().await.unwrap();
        assert!(matches!(
            first,
            ControllerEvent::RowsUpdated { total: 4, .. }
        ));
        let second = events.recv().await.unwrap();
        assert!(matches!(
            second,
            ControllerEvent::Notification {
                level: NotificationLevel::Success,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn update_refetches_the_page() {
        let gateway = FakeGateway::seeded(3);
        let controller = controller_with(gateway.clone());
        controller.refresh().await.unwrap();

        let outcome = controller
            .update(&EntityId::from("p1"), json!({ "name": "Renamed" }))
            .await
            .unwrap();
        assert_eq!(outcome.kind, MutationKind::Update);
        assert_eq!(gateway.list_count(), 2);
        assert!(
            controller
                .snapshot()
                .rows
                .iter()
                .any(|row| row.name == "Renamed")
        );
    }

    #[tokio::test]
    async fn delete_refetches_and_clamps_an_emptied_page() {
        let gateway = FakeGateway::seeded(13);
        let controller = controller_with(gateway.clone());
        controller.set_page_index(1).await.unwrap();
        assert_eq!(controller.snapshot().rows.len(), 1);

        let outcome = controller.delete(&EntityId::from("p12")).await.unwrap();
        assert_eq!(outcome.kind, MutationKind::Delete);

        // The last page vanished with its only row; the clamp pulled the
        // view back onto the remaining page.
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total, 12);
        assert_eq!(snapshot.rows.len(), 12);
        assert_eq!(controller.query().page_index(), 0);
    }

    #[tokio::test]
    async fn relate_refreshes_only_the_affected_row() {
        let gateway = FakeGateway::seeded(5);
        let controller = controller_with(gateway.clone());
        controller.refresh().await.unwrap();
        let before: Vec<EntityId> = controller
            .snapshot()
            .rows
            .iter()
            .map(|row| row.id.clone())
            .collect();

        let outcome = controller
            .relate(
                &EntityId::from("p2"),
                verbs::ASSIGN_CLUB,
                json!({ "clubId": "club-9" }),
            )
            .await
            .unwrap();
        assert_eq!(outcome.kind, MutationKind::Relate);
        assert_eq!(outcome.message.as_deref(), Some("assign-club ok"));

        let after = controller.snapshot();
        let ids: Vec<EntityId> = after.rows.iter().map(|row| row.id.clone()).collect();
        assert_eq!(ids, before);
        assert_eq!(after.rows[2].club_id, Some(EntityId::from("club-9")));
        // One row refresh, no page refetch.
        assert_eq!(gateway.get_calls.lock().unwrap().len(), 1);
        assert_eq!(gateway.list_count(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_rows_and_raises_banner() {
        let gateway = FakeGateway::seeded(20);
        let controller = controller_with(gateway.clone());
        controller.refresh().await.unwrap();
        let before = controller.snapshot();

        gateway.fail_next_list.store(true, Ordering::SeqCst);
        controller.refresh().await.unwrap();

        let after = controller.snapshot();
        assert_eq!(after.rows.len(), before.rows.len());
        assert_eq!(after.total, before.total);
        assert_eq!(after.error.as_deref(), Some("backend exploded"));

        // The next successful fetch clears the banner.
        controller.refresh().await.unwrap();
        assert!(controller.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn failed_mutation_records_dialog_error_and_propagates() {
        let gateway = FakeGateway::seeded(3);
        let controller = controller_with(gateway.clone());
        controller.refresh().await.unwrap();

        gateway.fail_mutations.store(true, Ordering::SeqCst);
        let err = controller
            .create(CreateBody::json(json!({ "name": "x" })))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Gateway(GatewayError::Status { status: 422, .. })
        ));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.dialog_error.as_deref(), Some("name is required"));
        assert!(!snapshot.dialog_loading);
        assert_eq!(snapshot.total, 3);
        // No reconciliation refetch on failure.
        assert_eq!(gateway.list_count(), 1);
    }

    #[tokio::test]
    async fn first_page_request_carries_the_manager_defaults() {
        let gateway = FakeGateway::seeded(57);
        let controller = controller_with(gateway.clone());
        controller.refresh().await.unwrap();

        let request = gateway.last_list();
        assert_eq!(request.page_index, 0);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        let sort = request.sort.unwrap();
        assert_eq!(sort.field, "updatedAt");
        assert!(sort.is_descending());

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.rows.len(), 12);
        assert_eq!(snapshot.total, 57);
        assert_eq!(page_count(snapshot.total, DEFAULT_PAGE_SIZE), 5);
    }

    #[tokio::test]
    async fn refresh_of_deleted_row_drops_it_but_keeps_total() {
        let gateway = FakeGateway::seeded(5);
        let controller = controller_with(gateway.clone());
        controller.refresh().await.unwrap();

        // Someone else deleted p3 behind our back.
        gateway
            .people
            .lock()
            .unwrap()
            .retain(|p| p.id != EntityId::from("p3"));

        let refresh = controller
            .refresh_row(&EntityId::from("p3"))
            .await
            .unwrap();
        assert_eq!(refresh, RowRefresh::Removed);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.rows.len(), 4);
        // Stale on purpose until the next full refetch.
        assert_eq!(snapshot.total, 5);

        let refresh = controller
            .refresh_row(&EntityId::from("p3"))
            .await
            .unwrap();
        assert_eq!(refresh, RowRefresh::Absent);
    }

    #[tokio::test]
    async fn shutdown_during_debounce_prevents_the_fetch() {
        let gateway = FakeGateway::seeded(5);
        let controller = controller_with(gateway.clone());

        controller.set_filters_debounced(CoordinatorFilters::search("ana"));
        controller.shutdown();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(gateway.list_count(), 0);
        assert!(matches!(
            controller.refresh().await,
            Err(CoreError::Closed)
        ));
        assert!(matches!(
            controller.set_page_index(1).await,
            Err(CoreError::Closed)
        ));
    }
}
