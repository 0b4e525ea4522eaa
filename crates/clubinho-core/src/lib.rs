//! Generic paginated-resource list controller.
//!
//! One [`ListController`] instance drives one listing screen: it owns the
//! query state (page, size, sort, filters), fetches pages through a
//! [`ResourceGateway`], discards superseded responses, debounces filter
//! edits and coordinates create/update/delete/relate mutations with their
//! reconciliation. Renderers read [`ListSnapshot`]s and subscribe to
//! [`ControllerEvent`]s; this crate performs no I/O of its own beyond the
//! gateway seam.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod events;
pub mod gateway;
pub mod lookup;
pub mod metrics;
pub mod state;

pub use config::ControllerConfig;
pub use controller::{ListController, RowRefresh};
pub use debounce::Debouncer;
pub use error::CoreError;
pub use events::{ControllerEvent, NotificationLevel};
pub use gateway::{CreateBody, GatewayError, ResourceGateway, UploadPart};
pub use lookup::{ClubIndex, assign_club_by_number};
pub use metrics::{MetricsSink, NoopMetrics};
pub use state::ListSnapshot;
