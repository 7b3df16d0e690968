//! HTTP implementation of [`cohort_core::source::ActivitySource`].
//!
//! Wraps [`reqwest`] with a request timeout so a dead upstream degrades at
//! the service layer instead of stalling a reconciliation pass forever.

mod http;

pub mod error;

pub use error::{Error, Result};
pub use http::{HttpSource, SourceConfig};
