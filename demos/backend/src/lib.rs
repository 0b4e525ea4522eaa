//! In-memory stand-in for the Clubinho platform API.
//!
//! Serves the wire contract the SDK's REST adapter expects: bearer-only
//! routes, flat `{items,total}` coordinator pages, nested `{data,meta}`
//! club pages, `{"message"}` error bodies and relationship verbs as
//! `PATCH /{resource}/{id}/{verb}`.

mod error;
mod store;

pub use error::ApiError;
pub use store::Store;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use clubinho_model::EntityId;
use clubinho_model::records::Coordinator;

/// Query parameters every list route accepts.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub q: Option<String>,
    pub active: Option<bool>,
}

impl ListParams {
    /// 1-based page, defaulting to the first.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1) as usize
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(12).clamp(1, 100) as usize
    }

    pub fn descending(&self) -> bool {
        self.order.as_deref() == Some("desc")
    }
}

pub fn router(store: Store) -> Router {
    Router::new()
        .route(
            "/coordinators",
            get(list_coordinators).post(create_coordinator),
        )
        .route(
            "/coordinators/{id}",
            get(get_coordinator)
                .patch(update_coordinator)
                .delete(delete_coordinator),
        )
        .route("/coordinators/{id}/assign-club", patch(assign_club))
        .route("/coordinators/{id}/unassign-club", patch(unassign_club))
        .route("/clubs", get(list_clubs))
        .with_state(store)
}

async fn list_coordinators(
    State(store): State<Store>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers)?;
    debug!(target: "clubinho.backend", page = params.page(), q = ?params.q, "list coordinators");
    let (items, total) = store.list_coordinators(&params);
    Ok(Json(json!({ "items": items, "total": total })))
}

async fn create_coordinator(
    State(store): State<Store>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    require_bearer(&headers)?;
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::InvalidRequest("name é obrigatório".to_string()))?
        .to_string();
    let email = body.get("email").and_then(Value::as_str).map(str::to_string);

    let created = store.create_coordinator(name, email)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_coordinator(
    State(store): State<Store>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Coordinator>, ApiError> {
    require_bearer(&headers)?;
    Ok(Json(store.coordinator(&EntityId::from(id))?))
}

async fn update_coordinator(
    State(store): State<Store>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Coordinator>, ApiError> {
    require_bearer(&headers)?;
    Ok(Json(store.update_coordinator(&EntityId::from(id), &body)?))
}

async fn delete_coordinator(
    State(store): State<Store>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers)?;
    store.delete_coordinator(&EntityId::from(id))?;
    Ok(Json(json!({ "message": "Coordenador removido!" })))
}

async fn assign_club(
    State(store): State<Store>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers)?;
    let club_id = body
        .get("clubId")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::InvalidRequest("clubId é obrigatório".to_string()))?;

    let number = store.assign_club(&EntityId::from(id), &EntityId::from(club_id))?;
    Ok(Json(
        json!({ "message": format!("Coordenador vinculado ao clube {number}!") }),
    ))
}

async fn unassign_club(
    State(store): State<Store>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers)?;
    store.unassign_club(&EntityId::from(id))?;
    Ok(Json(json!({ "message": "Coordenador desvinculado!" })))
}

async fn list_clubs(
    State(store): State<Store>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers)?;
    let (data, total) = store.list_clubs(&params);
    Ok(Json(json!({
        "data": data,
        "meta": {
            "totalItems": total,
            "totalPages": total.div_ceil(params.limit()),
            "currentPage": params.page(),
        }
    })))
}

fn require_bearer(headers: &HeaderMap) -> Result<(), ApiError> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());

    if authorized {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
