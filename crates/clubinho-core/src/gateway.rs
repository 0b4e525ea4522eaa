//! Seam between the controller and the remote platform API.
//!
//! The controller talks to exactly one [`ResourceGateway`] per resource.
//! Production code plugs in the REST adapter; tests plug in in-memory
//! fakes. Everything behind the seam (auth, transport, response shapes)
//! stays out of this crate.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use clubinho_model::{EntityId, ListRequest, Page, RelationReceipt, ResourceRow};

/// Errors crossing the gateway seam.
///
/// `Status` carries the display text for banners and dialogs: the
/// server-supplied `message` when the body had one, a generic fallback
/// otherwise. Adapters do that extraction; the controller only displays.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("resource not found")]
    NotFound,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Body of a create call: plain JSON, or multipart for upload endpoints.
#[derive(Debug, Clone)]
pub enum CreateBody {
    Json(Value),
    Multipart {
        fields: Vec<(String, String)>,
        parts: Vec<UploadPart>,
    },
}

impl CreateBody {
    pub fn json(value: Value) -> Self {
        CreateBody::Json(value)
    }
}

/// One file in a multipart create.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub name: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Async boundary to one remote resource collection.
///
/// `create` and `update` return the affected record when the backend
/// echoes it; the controller reconciles by refetching either way.
#[async_trait]
pub trait ResourceGateway<R: ResourceRow>: Send + Sync {
    /// Fetch one page matching `request`.
    async fn list(&self, request: &ListRequest) -> Result<Page<R>, GatewayError>;

    /// Fetch a single record. A missing record is `GatewayError::NotFound`.
    async fn get_one(&self, id: &EntityId) -> Result<R, GatewayError>;

    /// Create a record.
    async fn create(&self, body: CreateBody) -> Result<Option<R>, GatewayError>;

    /// Patch (or replace, per resource) an existing record.
    async fn update(&self, id: &EntityId, body: Value) -> Result<Option<R>, GatewayError>;

    /// Delete a record.
    async fn delete(&self, id: &EntityId) -> Result<(), GatewayError>;

    /// Apply a relationship verb (`assign-club`, `move-club`, ...) to a
    /// record. The receipt's message feeds the confirmation toast.
    async fn relate(
        &self,
        id: &EntityId,
        verb: &str,
        body: Value,
    ) -> Result<RelationReceipt, GatewayError>;
}
