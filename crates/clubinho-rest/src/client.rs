//! Reqwest-backed gateway.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use clubinho_core::{CreateBody, GatewayError, ResourceGateway};
use clubinho_model::resources::ResourceConfig;
use clubinho_model::{EntityId, ListRequest, Page, RelationReceipt, ResourceRow};

use crate::params::list_query_pairs;
use crate::shape::ListBody;

/// Shared HTTP client for one backend: base URL plus the session's
/// bearer token. Cloning is cheap; the gateways of every resource hang
/// off one instance.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    bearer: Option<String>,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            bearer: None,
        }
    }

    /// Attach the logged-in session's token; every request carries it as
    /// `Authorization: Bearer`.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Bind a typed gateway for one resource collection.
    pub fn gateway<R>(&self, resource: ResourceConfig) -> RestGateway<R> {
        RestGateway::new(self.clone(), resource)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.bearer {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

/// One resource collection bound to a [`RestClient`].
///
/// `R` is the row type pages and echoes decode into; the marker keeps
/// the gateway `Send + Sync` whatever `R` is.
pub struct RestGateway<R> {
    client: RestClient,
    resource: ResourceConfig,
    _marker: PhantomData<fn() -> R>,
}

impl<R> RestGateway<R> {
    pub fn new(client: RestClient, resource: ResourceConfig) -> Self {
        Self {
            client,
            resource,
            _marker: PhantomData,
        }
    }

    pub fn resource(&self) -> &ResourceConfig {
        &self.resource
    }

    fn item_path(&self, id: &EntityId) -> String {
        format!("{}/{}", self.resource.path(), id)
    }
}

#[async_trait]
impl<R> ResourceGateway<R> for RestGateway<R>
where
    R: ResourceRow + DeserializeOwned,
{
    async fn list(&self, request: &ListRequest) -> Result<Page<R>, GatewayError> {
        debug!(
            target: "clubinho.rest",
            resource = self.resource.path(),
            page = request.page_index + 1,
            "list"
        );
        let builder = self
            .client
            .request(Method::GET, self.resource.path())
            .query(&list_query_pairs(request));
        let body = send_checked(builder).await?;
        let parsed: ListBody<R> = decode(&body)?;
        Ok(parsed.into())
    }

    async fn get_one(&self, id: &EntityId) -> Result<R, GatewayError> {
        let builder = self.client.request(Method::GET, &self.item_path(id));
        let body = send_checked(builder).await?;
        decode(&body)
    }

    async fn create(&self, body: CreateBody) -> Result<Option<R>, GatewayError> {
        debug!(target: "clubinho.rest", resource = self.resource.path(), "create");
        let path = self.resource.path();
        let builder = match body {
            CreateBody::Json(value) => self.client.request(Method::POST, path).json(&value),
            CreateBody::Multipart { fields, parts } => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for part in parts {
                    let piece = reqwest::multipart::Part::bytes(part.bytes)
                        .file_name(part.filename)
                        .mime_str(&part.content_type)
                        .map_err(|e| {
                            GatewayError::InvalidRequest(format!("bad upload content type: {e}"))
                        })?;
                    form = form.part(part.name, piece);
                }
                self.client.request(Method::POST, path).multipart(form)
            }
        };
        let body = send_checked(builder).await?;
        Ok(decode_echo(&body))
    }

    async fn update(&self, id: &EntityId, body: Value) -> Result<Option<R>, GatewayError> {
        // Most resources patch; a few replace the whole record.
        let method = if self.resource.updates_via_put() {
            Method::PUT
        } else {
            Method::PATCH
        };
        debug!(
            target: "clubinho.rest",
            resource = self.resource.path(),
            method = %method,
            "update"
        );
        let builder = self
            .client
            .request(method, &self.item_path(id))
            .json(&body);
        let text = send_checked(builder).await?;
        Ok(decode_echo(&text))
    }

    async fn delete(&self, id: &EntityId) -> Result<(), GatewayError> {
        debug!(target: "clubinho.rest", resource = self.resource.path(), "delete");
        let builder = self.client.request(Method::DELETE, &self.item_path(id));
        send_checked(builder).await?;
        Ok(())
    }

    async fn relate(
        &self,
        id: &EntityId,
        verb: &str,
        body: Value,
    ) -> Result<RelationReceipt, GatewayError> {
        debug!(target: "clubinho.rest", resource = self.resource.path(), verb, "relate");
        let path = format!("{}/{}", self.item_path(id), verb);
        let builder = self.client.request(Method::PATCH, &path).json(&body);
        let text = send_checked(builder).await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

/// Issue the request and read the whole body before judging the status,
/// so error messages can quote what the backend actually said.
async fn send_checked(builder: RequestBuilder) -> Result<String, GatewayError> {
    let response = builder.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound);
    }
    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        });
    }
    Ok(body)
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

/// Pull the backend's `{"message": ...}` out of an error body, falling
/// back to a status line when the body is empty or some other shape.
fn error_message(status: u16, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.message.trim().is_empty() => parsed.message,
        _ => format!("request failed with status {status}"),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body)
        .map_err(|e| GatewayError::Decode(format!("failed to parse response: {e}, body: {body}")))
}

/// Create and update responses are the record, a bare `{"message"}`, or
/// nothing at all. Only an actual record is worth handing back; anything
/// else decodes to `None` and the reconciliation refetch settles the
/// table.
fn decode_echo<R: DeserializeOwned>(body: &str) -> Option<R> {
    serde_json::from_str(body).ok()
}
