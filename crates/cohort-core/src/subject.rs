//! The Reconciliation Joiner — merges the two stores' views of a subject.
//!
//! The merged view is derived, never stored: each reconciliation pass builds
//! a fresh set and the previous one is discarded wholesale.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::record::{ApiGrant, DeviceRecord, EnrollmentRecord, StudyEnrollment};

// ─── Reconciled view ─────────────────────────────────────────────────────────

/// One participant across both sources, placeholder-completed.
///
/// Invariant: exactly one `ReconciledSubject` exists per distinct participant
/// code that appears in either source. A side with no record contributes its
/// fixed placeholder constants, so no field here is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledSubject {
  /// The union key. The device record's own copy of this field is dropped
  /// in favour of this one.
  pub participant_code: String,

  // Enrollment side (placeholder: id = -1, empty strings, empty lists).
  pub enrollment_id:    i64,
  pub enrolled_on:      String,
  pub studies:          Vec<StudyEnrollment>,
  pub api_grants:       Vec<ApiGrant>,

  // Device side (placeholder: permission = false, empty strings).
  pub tap_permission:   bool,
  pub information:      String,
  pub exp_time:         String,
  pub contact_email:    String,
  pub device_added_at:  String,
}

impl ReconciledSubject {
  fn from_sides(
    code: &str,
    enrollment: EnrollmentRecord,
    device: DeviceRecord,
  ) -> Self {
    Self {
      participant_code: code.to_string(),
      enrollment_id:    enrollment.id,
      enrolled_on:      enrollment.created_on,
      studies:          enrollment.studies,
      api_grants:       enrollment.api_grants,
      tap_permission:   device.tap_permission,
      information:      device.information,
      exp_time:         device.exp_time,
      contact_email:    device.contact_email,
      device_added_at:  device.created_at,
    }
  }

  /// True when the enrollment store had no record for this subject.
  pub fn enrollment_is_placeholder(&self) -> bool {
    self.enrollment_id == crate::record::PLACEHOLDER_ID
  }
}

// ─── Joiner ──────────────────────────────────────────────────────────────────

/// Merge both stores into one subject per distinct participant code.
///
/// Pure function of its inputs: same lists always yield the same output,
/// sorted by participant code so equality is field-for-field testable. Keys
/// present on only one side get the other side's placeholder. Duplicate
/// codes within a single source collapse to the last record seen; the
/// one-subject-per-code invariant holds regardless. O(n + m).
pub fn reconcile(
  enrollments: Vec<EnrollmentRecord>,
  devices: Vec<DeviceRecord>,
) -> Vec<ReconciledSubject> {
  let mut by_code_enrollment: HashMap<String, EnrollmentRecord> = enrollments
    .into_iter()
    .map(|r| (r.participant_code.clone(), r))
    .collect();
  let mut by_code_device: HashMap<String, DeviceRecord> = devices
    .into_iter()
    .map(|r| (r.participant_code.clone(), r))
    .collect();

  // The union of both key sets, not either list alone, defines the subject
  // population. BTreeSet gives the deterministic output order.
  let codes: BTreeSet<String> = by_code_enrollment
    .keys()
    .chain(by_code_device.keys())
    .cloned()
    .collect();

  codes
    .into_iter()
    .map(|code| {
      let enrollment = by_code_enrollment
        .remove(&code)
        .unwrap_or_else(|| EnrollmentRecord::placeholder(&code));
      let device = by_code_device
        .remove(&code)
        .unwrap_or_else(|| DeviceRecord::placeholder(&code));
      ReconciledSubject::from_sides(&code, enrollment, device)
    })
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::PLACEHOLDER_ID;

  fn enrollment(code: &str, id: i64) -> EnrollmentRecord {
    EnrollmentRecord {
      id,
      created_on: "2024-01-01T00:00:00Z".into(),
      participant_code: code.into(),
      studies: vec![StudyEnrollment {
        study_id:   7,
        consent:    true,
        starts_on:  "2024-01-01T00:00:00Z".into(),
        expires_on: "2024-06-01T00:00:00Z".into(),
        created_on: "2024-01-01T00:00:00Z".into(),
      }],
      api_grants: Vec::new(),
    }
  }

  fn device(code: &str, permission: bool) -> DeviceRecord {
    DeviceRecord {
      tap_permission:   permission,
      information:      "issued 2024-01".into(),
      participant_code: code.into(),
      exp_time:         "2024-06-01T00:00:00Z".into(),
      contact_email:    format!("{}@example.org", code.to_lowercase()),
      created_at:       "2024-01-02T00:00:00Z".into(),
    }
  }

  #[test]
  fn union_contains_every_code_exactly_once() {
    let subjects = reconcile(
      vec![enrollment("A1", 10), enrollment("B2", 11)],
      vec![device("B2", true), device("C3", false)],
    );

    let codes: Vec<_> =
      subjects.iter().map(|s| s.participant_code.as_str()).collect();
    assert_eq!(codes, ["A1", "B2", "C3"]);
  }

  #[test]
  fn device_only_subject_gets_enrollment_placeholder() {
    let subjects = reconcile(Vec::new(), vec![device("C3", true)]);

    assert_eq!(subjects.len(), 1);
    let s = &subjects[0];
    assert!(s.enrollment_is_placeholder());
    assert_eq!(s.enrollment_id, PLACEHOLDER_ID);
    assert_eq!(s.enrolled_on, "");
    assert!(s.studies.is_empty());
    assert!(s.api_grants.is_empty());
    // Device side is copied verbatim.
    assert!(s.tap_permission);
    assert_eq!(s.contact_email, "c3@example.org");
  }

  #[test]
  fn enrollment_only_subject_gets_device_placeholder() {
    let subjects = reconcile(vec![enrollment("A1", 10)], Vec::new());

    assert_eq!(subjects.len(), 1);
    let s = &subjects[0];
    assert!(!s.tap_permission);
    assert_eq!(s.information, "");
    assert_eq!(s.exp_time, "");
    assert_eq!(s.contact_email, "");
    assert_eq!(s.device_added_at, "");
    // Enrollment side is copied verbatim.
    assert_eq!(s.enrollment_id, 10);
    assert_eq!(s.studies.len(), 1);
  }

  #[test]
  fn both_sides_present_copies_both_verbatim() {
    let subjects =
      reconcile(vec![enrollment("A1", 10)], vec![device("A1", true)]);

    assert_eq!(subjects.len(), 1);
    let s = &subjects[0];
    assert_eq!(s.enrollment_id, 10);
    assert!(s.tap_permission);
    assert_eq!(s.information, "issued 2024-01");
  }

  #[test]
  fn reconcile_is_idempotent() {
    let enrollments = vec![enrollment("A1", 10), enrollment("B2", 11)];
    let devices = vec![device("B2", true), device("C3", false)];

    let first = reconcile(enrollments.clone(), devices.clone());
    let second = reconcile(enrollments, devices);
    assert_eq!(first, second);
  }

  #[test]
  fn duplicate_codes_in_one_source_collapse_to_one_subject() {
    let subjects = reconcile(
      vec![enrollment("A1", 10), enrollment("A1", 99)],
      Vec::new(),
    );

    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].participant_code, "A1");
  }

  #[test]
  fn empty_inputs_degenerate_cleanly() {
    assert!(reconcile(Vec::new(), Vec::new()).is_empty());

    let only_devices = reconcile(Vec::new(), vec![device("C3", true)]);
    assert_eq!(only_devices.len(), 1);
  }
}
