//! The Enrollment Resolver — locates a subject's window for one study.
//!
//! "Unknown subject", "no target study", and "subject with no enrollment for
//! that study" all resolve to the same default window, so display code never
//! special-cases "we don't know yet".

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  error::Result, event::parse_instant, subject::ReconciledSubject,
};

/// Length of the policy-defined default window.
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// A subject's enrollment window for one study, with timestamps parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWindow {
  pub starts_on:  DateTime<Utc>,
  pub expires_on: DateTime<Utc>,
  pub consent:    bool,
}

impl EnrollmentWindow {
  /// The fallback window: starts now, expires in [`DEFAULT_WINDOW_DAYS`],
  /// no consent.
  pub fn default_window(now: DateTime<Utc>) -> Self {
    Self {
      starts_on:  now,
      expires_on: now + Duration::days(DEFAULT_WINDOW_DAYS),
      consent:    false,
    }
  }
}

/// Find `subject`'s enrollment window for `study_id`.
///
/// Absence at any level (no subject, no study id, no matching enrollment) is
/// not an error and yields the default window. A matching enrollment whose
/// stored timestamps fail to parse is an error — corrupt enrollment data
/// must not masquerade as "not enrolled". O(k) in the subject's enrollments.
pub fn resolve_enrollment(
  subject: Option<&ReconciledSubject>,
  study_id: Option<i64>,
  now: DateTime<Utc>,
) -> Result<EnrollmentWindow> {
  let (Some(subject), Some(study_id)) = (subject, study_id) else {
    return Ok(EnrollmentWindow::default_window(now));
  };

  match subject.studies.iter().find(|s| s.study_id == study_id) {
    Some(entry) => Ok(EnrollmentWindow {
      starts_on:  parse_instant(&entry.starts_on, "enrollment start")?,
      expires_on: parse_instant(&entry.expires_on, "enrollment expiry")?,
      consent:    entry.consent,
    }),
    None => Ok(EnrollmentWindow::default_window(now)),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::{EnrollmentRecord, StudyEnrollment};
  use crate::subject::reconcile;

  fn now() -> DateTime<Utc> {
    "2024-03-15T12:00:00Z".parse().unwrap()
  }

  fn subject_with_study(study_id: i64) -> ReconciledSubject {
    let record = EnrollmentRecord {
      id: 42,
      created_on: "2024-01-01T00:00:00Z".into(),
      participant_code: "A1".into(),
      studies: vec![StudyEnrollment {
        study_id,
        consent: true,
        starts_on: "2024-02-01T00:00:00Z".into(),
        expires_on: "2024-04-01T00:00:00Z".into(),
        created_on: "2024-02-01T00:00:00Z".into(),
      }],
      api_grants: Vec::new(),
    };
    reconcile(vec![record], Vec::new()).remove(0)
  }

  #[test]
  fn unknown_subject_yields_default_window() {
    let window = resolve_enrollment(None, Some(7), now()).unwrap();
    assert_eq!(window.starts_on, now());
    assert_eq!(window.expires_on, now() + Duration::days(14));
    assert!(!window.consent);
  }

  #[test]
  fn missing_study_id_yields_default_window() {
    let subject = subject_with_study(7);
    let window = resolve_enrollment(Some(&subject), None, now()).unwrap();
    assert_eq!(window.expires_on - window.starts_on, Duration::days(14));
  }

  #[test]
  fn matching_enrollment_is_returned_verbatim() {
    let subject = subject_with_study(7);
    let window = resolve_enrollment(Some(&subject), Some(7), now()).unwrap();

    assert_eq!(window.starts_on, "2024-02-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    assert_eq!(window.expires_on, "2024-04-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    assert!(window.consent);
  }

  #[test]
  fn non_matching_study_falls_back_to_default() {
    // Not an error: treated identically to "unknown subject".
    let subject = subject_with_study(7);
    let window = resolve_enrollment(Some(&subject), Some(99), now()).unwrap();
    assert_eq!(window.starts_on, now());
    assert!(!window.consent);
  }

  #[test]
  fn malformed_stored_timestamp_is_an_error() {
    let mut subject = subject_with_study(7);
    subject.studies[0].expires_on = "soon".into();

    let result = resolve_enrollment(Some(&subject), Some(7), now());
    assert!(result.is_err());
  }
}
