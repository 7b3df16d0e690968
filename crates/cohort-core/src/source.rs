//! The `ActivitySource` trait — the seam between this crate's pure logic
//! and whatever transport fetches the raw records.
//!
//! Implemented by `cohort-client` over HTTP and by in-memory fakes in the
//! service tests. All methods return `Send` futures so the trait can be used
//! from multi-threaded async runtimes.

use std::future::Future;

use crate::{
  event::{RawAudioTap, RawTap},
  record::{DeviceRecord, EnrollmentRecord},
};

/// Which slice of upstream data a fetch covers: one application area and,
/// where the endpoint supports it, one study within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchScope {
  pub app_id:   i64,
  pub study_id: Option<i64>,
}

impl FetchScope {
  pub fn app(app_id: i64) -> Self {
    Self { app_id, study_id: None }
  }

  pub fn study(app_id: i64, study_id: i64) -> Self {
    Self { app_id, study_id: Some(study_id) }
  }
}

/// A provider of the four raw record streams. Each method is an independent
/// fetch; callers decide how failures compose (the service layer degrades
/// each one to an empty list).
pub trait ActivitySource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Subject ↔ study join records from the enrollment store.
  fn enrollments(
    &self,
    scope: FetchScope,
  ) -> impl Future<Output = Result<Vec<EnrollmentRecord>, Self::Error>> + Send + '_;

  /// Tap-permission/expiry records from the device store.
  fn devices(
    &self,
    scope: FetchScope,
  ) -> impl Future<Output = Result<Vec<DeviceRecord>, Self::Error>> + Send + '_;

  /// The raw tap event stream, unordered.
  fn taps(
    &self,
    scope: FetchScope,
  ) -> impl Future<Output = Result<Vec<RawTap>, Self::Error>> + Send + '_;

  /// The raw audio-tap event stream, unordered.
  fn audio_taps(
    &self,
    scope: FetchScope,
  ) -> impl Future<Output = Result<Vec<RawAudioTap>, Self::Error>> + Send + '_;
}
