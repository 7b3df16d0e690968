//! Handlers for `/subjects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | All reconciled subjects in the latest snapshot |
//! | `GET`  | `/subjects/:code` | 404 if the code is in neither source |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use cohort_core::source::ActivitySource;
use cohort_service::SubjectReport;

use crate::{ApiState, error::ApiError};

/// `GET /subjects`
pub async fn list<S: ActivitySource>(
  State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<Vec<SubjectReport>>, ApiError> {
  let snapshot = state.coordinator.latest().ok_or(ApiError::NoSnapshot)?;
  Ok(Json(snapshot.subjects.clone()))
}

/// `GET /subjects/:code`
pub async fn get_one<S: ActivitySource>(
  State(state): State<Arc<ApiState<S>>>,
  Path(code): Path<String>,
) -> Result<Json<SubjectReport>, ApiError> {
  let snapshot = state.coordinator.latest().ok_or(ApiError::NoSnapshot)?;
  let report = snapshot
    .subject(&code)
    .cloned()
    .ok_or_else(|| ApiError::NotFound(format!("subject {code} not found")))?;
  Ok(Json(report))
}
