//! Error types for `cohort-service`.
//!
//! Fetch failures never appear here — they are degraded to empty lists at
//! the fan-out site. What remains fatal is corrupt data inside a fetched
//! batch (malformed timestamps), surfaced from the core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] cohort_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
