//! Error types for `cohort-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A wire timestamp failed to parse. Fatal for the whole batch: silently
  /// dropping records would corrupt aggregate counts with no visible signal.
  #[error("malformed timestamp {value:?} in {context}: {source}")]
  MalformedTimestamp {
    value:   String,
    context: &'static str,
    #[source]
    source:  chrono::ParseError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
