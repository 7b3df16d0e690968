//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// No pass has completed yet, so there is nothing to read.
  #[error("no snapshot available; trigger a refresh first")]
  NoSnapshot,

  #[error("pass failed: {0}")]
  Pass(#[from] cohort_service::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::NoSnapshot => (StatusCode::CONFLICT, self.to_string()),
      ApiError::Pass(e) => {
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
