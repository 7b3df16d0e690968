//! Core types and pure logic for the cohort reconciliation engine.
//!
//! This crate is deliberately free of HTTP and runtime dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod enrollment;
pub mod error;
pub mod event;
pub mod export;
pub mod record;
pub mod source;
pub mod subject;

pub use error::{Error, Result};
