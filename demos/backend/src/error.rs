use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Demo API failures, all rendered as the platform's `{"message"}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} não encontrado")]
    NotFound(&'static str),
    #[error("E-mail já cadastrado")]
    DuplicateEmail,
    #[error("credenciais ausentes ou inválidas")]
    Unauthorized,
    #[error("requisição inválida: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}
