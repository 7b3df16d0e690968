//! Wire records from the two upstream stores.
//!
//! Both stores describe the same human subjects but are populated
//! independently: the enrollment store is keyed by an internal numeric id,
//! the device store by the human-readable participant code. Field names and
//! string timestamps are preserved verbatim from the upstream JSON; parsing
//! into `chrono` types happens only in the components that compute with them.

use serde::{Deserialize, Serialize};

/// Sentinel id for the enrollment-side placeholder. Real upstream ids are
/// positive.
pub const PLACEHOLDER_ID: i64 = -1;

// ─── Enrollment store ────────────────────────────────────────────────────────

/// One subject ↔ study join entry from the enrollment store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyEnrollment {
  pub study_id:   i64,
  pub consent:    bool,
  pub starts_on:  String,
  pub expires_on: String,
  pub created_on: String,
}

/// An API access grant attached to an enrollment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGrant {
  pub api_id:     i64,
  pub scope:      String,
  pub created_on: String,
}

/// A subject as known to the relational enrollment store. Read-only to this
/// crate; owned and mutated only upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
  pub id:               i64,
  pub created_on:       String,
  pub participant_code: String,
  pub studies:          Vec<StudyEnrollment>,
  pub api_grants:       Vec<ApiGrant>,
}

impl EnrollmentRecord {
  /// The fixed stand-in used when a participant exists only in the device
  /// store. Every field is a non-null constant so downstream access never
  /// needs an `Option` check.
  pub fn placeholder(participant_code: &str) -> Self {
    Self {
      id:               PLACEHOLDER_ID,
      created_on:       String::new(),
      participant_code: participant_code.to_string(),
      studies:          Vec::new(),
      api_grants:       Vec::new(),
    }
  }
}

// ─── Device store ────────────────────────────────────────────────────────────

/// A subject as known to the device/telemetry store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
  pub tap_permission:   bool,
  pub information:      String,
  pub participant_code: String,
  pub exp_time:         String,
  pub contact_email:    String,
  pub created_at:       String,
}

impl DeviceRecord {
  /// The fixed stand-in used when a participant exists only in the
  /// enrollment store.
  pub fn placeholder(participant_code: &str) -> Self {
    Self {
      tap_permission:   false,
      information:      String::new(),
      participant_code: participant_code.to_string(),
      exp_time:         String::new(),
      contact_email:    String::new(),
      created_at:       String::new(),
    }
  }
}
