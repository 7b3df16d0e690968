//! Handler for `/export` — merged report rows for the spreadsheet builder.

use std::sync::Arc;

use axum::{Json, extract::State};
use cohort_core::{export::ExportRow, source::ActivitySource};

use crate::{ApiState, error::ApiError};

/// `GET /export`
pub async fn rows<S: ActivitySource>(
  State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<Vec<ExportRow>>, ApiError> {
  let snapshot = state.coordinator.latest().ok_or(ApiError::NoSnapshot)?;
  Ok(Json(snapshot.export.clone()))
}
