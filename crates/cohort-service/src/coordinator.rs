//! The pass coordinator: concurrent fetch, degrade, join, compute, install.

use std::sync::{
  Arc, RwLock,
  atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use cohort_core::{
  activity::{SubjectMatch, aggregate, countdown_label, days_until_expiry},
  enrollment::resolve_enrollment,
  event::{normalize_audio_taps, normalize_taps},
  export::export_rows,
  source::{ActivitySource, FetchScope},
  subject::reconcile,
};
use tracing::{debug, warn};

use crate::{
  error::Result,
  snapshot::{Snapshot, SubjectReport},
};

/// Runs reconciliation passes against one [`ActivitySource`] and keeps the
/// most recent snapshot.
///
/// The snapshot slot is the only shared state: exactly one pass writes it at
/// a time, wholesale, so readers never observe a half-built result.
pub struct Coordinator<S> {
  source:     S,
  next_epoch: AtomicU64,
  latest:     RwLock<Option<Arc<Snapshot>>>,
}

/// A failed fetch degrades to an empty list; the pass continues with
/// reduced data ("fail soft" — the dashboard under-counts rather than
/// erroring).
fn or_empty<T, E: std::error::Error>(
  result: Result<Vec<T>, E>,
  stream: &'static str,
) -> Vec<T> {
  match result {
    Ok(list) => list,
    Err(error) => {
      warn!(%error, stream, "fetch failed; continuing with empty list");
      Vec::new()
    }
  }
}

impl<S: ActivitySource> Coordinator<S> {
  pub fn new(source: S) -> Self {
    Self {
      source,
      next_epoch: AtomicU64::new(0),
      latest: RwLock::new(None),
    }
  }

  /// The most recently installed snapshot, if any pass has completed.
  pub fn latest(&self) -> Option<Arc<Snapshot>> {
    self.latest.read().ok().and_then(|guard| guard.clone())
  }

  /// Run one full reconciliation pass for `scope`.
  ///
  /// The four fetches fire concurrently; the `join!` below is the pass's
  /// only synchronization point. Returns this pass's snapshot whether or
  /// not it was installed (a pass superseded mid-flight is discarded from
  /// the shared slot but still handed back to its own caller).
  pub async fn run_pass(&self, scope: FetchScope) -> Result<Arc<Snapshot>> {
    let epoch = self.next_epoch.fetch_add(1, Ordering::SeqCst);
    debug!(epoch, app_id = scope.app_id, "reconciliation pass started");

    let (enrollments, devices, taps, audio_taps) = tokio::join!(
      self.source.enrollments(scope),
      self.source.devices(scope),
      self.source.taps(scope),
      self.source.audio_taps(scope),
    );
    let enrollments = or_empty(enrollments, "enrollments");
    let devices = or_empty(devices, "devices");
    let taps = or_empty(taps, "taps");
    let audio_taps = or_empty(audio_taps, "audio-taps");

    // Malformed timestamps are fatal for the pass: silently dropping events
    // would corrupt every count downstream.
    let mut events = normalize_taps(taps)?;
    events.extend(normalize_audio_taps(audio_taps)?);

    let now = Utc::now();
    let subjects = reconcile(enrollments, devices);

    let subjects = subjects
      .into_iter()
      .map(|subject| {
        let window =
          resolve_enrollment(Some(&subject), scope.study_id, now)?;
        let activity = aggregate(
          &events,
          &SubjectMatch::Exact(subject.participant_code.clone()),
          now,
        );
        let days = days_until_expiry(window.expires_on, now);
        Ok(SubjectReport {
          subject,
          window,
          days_until_expiry: days,
          expiry_label: countdown_label(days),
          activity,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    let snapshot = Arc::new(Snapshot {
      epoch,
      taken_at: now,
      export: export_rows(&events),
      subjects,
    });

    self.install(Arc::clone(&snapshot));
    Ok(snapshot)
  }

  /// Replace the shared snapshot unless a newer pass got there first.
  fn install(&self, snapshot: Arc<Snapshot>) {
    let Ok(mut guard) = self.latest.write() else {
      return;
    };
    match guard.as_ref() {
      Some(current) if current.epoch > snapshot.epoch => {
        debug!(
          stale = snapshot.epoch,
          current = current.epoch,
          "discarding superseded pass"
        );
      }
      _ => {
        debug!(epoch = snapshot.epoch, "snapshot installed");
        *guard = Some(snapshot);
      }
    }
  }
}
