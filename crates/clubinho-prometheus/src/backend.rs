use std::time::Duration;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

use clubinho_core::MetricsSink;

/// Registry-backed [`MetricsSink`].
///
/// Owns its [`Registry`]; clones share it, so one instance can feed
/// several controllers while the exporter gathers from any clone.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    fetches_issued: IntCounterVec,
    fetches_completed: IntCounterVec,
    fetch_duration: HistogramVec,
    mutations: IntCounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let fetches_issued = IntCounterVec::new(
            Opts::new(
                "clubinho_fetches_issued_total",
                "List fetches issued to the backend",
            ),
            &["resource"],
        )?;
        let fetches_completed = IntCounterVec::new(
            Opts::new(
                "clubinho_fetches_completed_total",
                "List fetches by final outcome",
            ),
            &["resource", "outcome"],
        )?;
        let fetch_duration = HistogramVec::new(
            HistogramOpts::new(
                "clubinho_fetch_duration_seconds",
                "Latency of committed list fetches",
            ),
            &["resource"],
        )?;
        let mutations = IntCounterVec::new(
            Opts::new(
                "clubinho_mutations_total",
                "Dialog mutations by verb and outcome",
            ),
            &["resource", "verb", "outcome"],
        )?;

        registry.register(Box::new(fetches_issued.clone()))?;
        registry.register(Box::new(fetches_completed.clone()))?;
        registry.register(Box::new(fetch_duration.clone()))?;
        registry.register(Box::new(mutations.clone()))?;

        Ok(Self {
            registry,
            fetches_issued,
            fetches_completed,
            fetch_duration,
            mutations,
        })
    }

    /// Snapshot every family in this backend's registry.
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// The registry the families live in, for merging into an existing
    /// exporter.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl MetricsSink for PrometheusMetrics {
    fn fetch_issued(&self, resource: &str) {
        self.fetches_issued.with_label_values(&[resource]).inc();
    }

    fn fetch_committed(&self, resource: &str, duration: Duration) {
        self.fetches_completed
            .with_label_values(&[resource, "committed"])
            .inc();
        self.fetch_duration
            .with_label_values(&[resource])
            .observe(duration.as_secs_f64());
    }

    fn fetch_superseded(&self, resource: &str) {
        self.fetches_completed
            .with_label_values(&[resource, "superseded"])
            .inc();
    }

    fn fetch_failed(&self, resource: &str) {
        self.fetches_completed
            .with_label_values(&[resource, "failed"])
            .inc();
    }

    fn mutation(&self, resource: &str, verb: &str, success: bool) {
        let outcome = if success { "ok" } else { "error" };
        self.mutations
            .with_label_values(&[resource, verb, outcome])
            .inc();
    }
}
