//! Prometheus metrics backend for the clubinho list controllers.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of
//! [`clubinho_core::MetricsSink`] that exposes controller activity in
//! Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use clubinho_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let sink = Arc::new(metrics.clone());
//! // Hand `sink` to `ListController::with_metrics`, then expose
//! // `metrics.gather()` from the app's own exporter endpoint.
//! # let _ = sink;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `clubinho_fetches_issued_total{resource}` - Counter
//! - `clubinho_fetches_completed_total{resource, outcome}` - Counter, outcome is `committed|superseded|failed`
//! - `clubinho_fetch_duration_seconds{resource}` - Histogram, committed fetches only
//! - `clubinho_mutations_total{resource, verb, outcome}` - Counter, outcome is `ok|error`
//!
//! ## HTTP Server
//! This crate does NOT serve a `/metrics` endpoint. Encode the gathered
//! families with [`TextEncoder`] inside whatever HTTP surface the host
//! app already runs.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
