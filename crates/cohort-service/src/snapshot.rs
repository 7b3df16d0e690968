//! The output of one reconciliation pass.

use chrono::{DateTime, Utc};
use cohort_core::{
  activity::ActivitySummary, enrollment::EnrollmentWindow,
  export::ExportRow, subject::ReconciledSubject,
};
use serde::{Deserialize, Serialize};

/// One subject with its derived fields, as of the pass's `taken_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectReport {
  pub subject:           ReconciledSubject,
  /// Window for the pass's target study; the 14-day default when the
  /// subject has no matching enrollment or no study was targeted.
  pub window:            EnrollmentWindow,
  /// Whole days until the window expires, floor semantics.
  pub days_until_expiry: i64,
  /// Presentation form of the countdown ("Today" when zero).
  pub expiry_label:      String,
  /// Taps and audio-taps summed per bucket.
  pub activity:          ActivitySummary,
}

/// Everything one pass produced. Replaced wholesale; never mutated after
/// construction, so readers can hold it across the next pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
  /// Pass generation, claimed at trigger time. Strictly increasing across
  /// the installed history.
  pub epoch:    u64,
  pub taken_at: DateTime<Utc>,
  /// Sorted by participant code (the joiner's output order).
  pub subjects: Vec<SubjectReport>,
  /// Merged tap/audio-tap rows for the report builder.
  pub export:   Vec<ExportRow>,
}

impl Snapshot {
  /// Look up one subject by its exact participant code.
  pub fn subject(&self, participant_code: &str) -> Option<&SubjectReport> {
    self
      .subjects
      .iter()
      .find(|r| r.subject.participant_code == participant_code)
  }
}
