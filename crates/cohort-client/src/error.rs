//! Error types for `cohort-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("GET {path} failed: {source}")]
  Request {
    path: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("GET {path} returned {status}")]
  Status {
    path:   String,
    status: reqwest::StatusCode,
  },

  #[error("deserialising {path} response: {source}")]
  Decode {
    path: String,
    #[source]
    source: reqwest::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
