//! JSON read surface over the latest reconciliation snapshot.
//!
//! Exposes an axum [`Router`] backed by a [`cohort_service::Coordinator`]
//! over any [`cohort_core::source::ActivitySource`]. Presentation widgets
//! consume these endpoints; auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cohort_api::api_router(coordinator, scope))
//! ```

pub mod error;
pub mod export;
pub mod refresh;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use cohort_core::source::{ActivitySource, FetchScope};
use cohort_service::Coordinator;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared handler state: the coordinator plus the scope every refresh runs
/// against.
pub struct ApiState<S> {
  pub coordinator: Coordinator<S>,
  pub scope:       FetchScope,
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(coordinator: Coordinator<S>, scope: FetchScope) -> Router<()>
where
  S: ActivitySource + 'static,
{
  let state = Arc::new(ApiState { coordinator, scope });
  Router::new()
    .route("/subjects", get(subjects::list::<S>))
    .route("/subjects/{code}", get(subjects::get_one::<S>))
    .route("/export", get(export::rows::<S>))
    .route("/refresh", post(refresh::run::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
