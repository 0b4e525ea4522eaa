//! Instrumentation seam.
//!
//! The controller reports fetch and mutation outcomes to a [`MetricsSink`].
//! The default sink discards everything; `clubinho-prometheus` ships a
//! registry-backed one. Implementations are called on the controller's
//! hot path and must not block.

use std::time::Duration;

/// Receiver for controller instrumentation samples.
pub trait MetricsSink: Send + Sync {
    /// A fetch was issued to the gateway.
    fn fetch_issued(&self, resource: &str);

    /// A fetch response was committed to the snapshot.
    fn fetch_committed(&self, resource: &str, duration: Duration);

    /// A fetch response arrived after a newer fetch was issued and was
    /// discarded.
    fn fetch_superseded(&self, resource: &str);

    /// A fetch failed and its message went to the error banner.
    fn fetch_failed(&self, resource: &str);

    /// A mutation verb settled.
    fn mutation(&self, resource: &str, verb: &str, success: bool);
}

/// Sink that drops every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn fetch_issued(&self, _resource: &str) {}
    fn fetch_committed(&self, _resource: &str, _duration: Duration) {}
    fn fetch_superseded(&self, _resource: &str) {}
    fn fetch_failed(&self, _resource: &str) {}
    fn mutation(&self, _resource: &str, _verb: &str, _success: bool) {}
}
