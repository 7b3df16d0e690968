//! Handler for `/refresh` — runs one reconciliation pass on demand.

use std::sync::Arc;

use axum::{Json, extract::State};
use cohort_core::source::ActivitySource;
use serde::Serialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
  pub epoch:         u64,
  pub subject_count: usize,
}

/// `POST /refresh`
pub async fn run<S: ActivitySource>(
  State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<RefreshResponse>, ApiError> {
  let snapshot = state.coordinator.run_pass(state.scope).await?;
  Ok(Json(RefreshResponse {
    epoch:         snapshot.epoch,
    subject_count: snapshot.subjects.len(),
  }))
}
