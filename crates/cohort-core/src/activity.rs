//! The Activity Aggregator — time-windowed summaries over event streams.
//!
//! Days run 09:00-to-09:00 local, not midnight-to-midnight: subjects are
//! often active late at night, and the 9am cutoff keeps a whole night's
//! activity in one bucket. The rolling week total uses a different right
//! edge (the current instant) than the day buckets (the last 09:00
//! boundary), so the two figures may lawfully diverge near the boundary.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Hour at which one activity day ends and the next begins.
pub const DAY_BOUNDARY_HOUR: i64 = 9;

// ─── Subject matching ────────────────────────────────────────────────────────

/// How to match events to a subject. Both contracts are in use: detail
/// views match the exact code, cohort-wide views match a code prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum SubjectMatch {
  Exact(String),
  Prefix(String),
}

impl SubjectMatch {
  pub fn matches(&self, participant_code: &str) -> bool {
    match self {
      Self::Exact(code) => participant_code == code,
      Self::Prefix(prefix) => participant_code.starts_with(prefix.as_str()),
    }
  }
}

// ─── Summary types ───────────────────────────────────────────────────────────

/// One activity day: its display label and event count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
  /// Weekday name, except the most recent bucket which is always "Today".
  pub label: String,
  pub count: u64,
}

/// Derived per-subject activity; never stored, rebuilt on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
  /// Oldest first; `buckets[6]` is the current ("Today") bucket.
  pub buckets:            [DayBucket; 7],
  /// Independent count over `[now - 7 days, now)`. May differ from the
  /// bucket sum near the 09:00 boundary; that asymmetry is intentional.
  pub rolling_week_total: u64,
  /// True iff the current bucket has any activity.
  pub active_today:       bool,
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// The start of the current activity day: today's date at 09:00, even when
/// `now` is earlier than 09:00.
pub fn day_anchor(now: DateTime<Utc>) -> DateTime<Utc> {
  now.date_naive().and_time(NaiveTime::MIN).and_utc()
    + Duration::hours(DAY_BOUNDARY_HOUR)
}

fn count_between(
  events: &[Event],
  subject: &SubjectMatch,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
) -> u64 {
  events
    .iter()
    .filter(|e| subject.matches(&e.participant_code))
    .filter(|e| e.at >= start && e.at < end)
    .count() as u64
}

/// Summarise `events` for one subject as of `now`.
///
/// Seven half-open day buckets `[anchor - i days, anchor - i days + 1 day)`
/// for `i = 6..=0`, plus the rolling week count. Callers pass the stream(s)
/// relevant to their surface — taps, audio-taps, or both concatenated. An
/// empty stream yields all-zero buckets and `active_today = false`.
pub fn aggregate(
  events: &[Event],
  subject: &SubjectMatch,
  now: DateTime<Utc>,
) -> ActivitySummary {
  let anchor = day_anchor(now);

  let buckets: [DayBucket; 7] = std::array::from_fn(|idx| {
    let offset_days = (6 - idx) as i64;
    let start = anchor - Duration::days(offset_days);
    let end = start + Duration::days(1);
    let label = if offset_days == 0 {
      "Today".to_string()
    } else {
      start.format("%A").to_string()
    };
    DayBucket { label, count: count_between(events, subject, start, end) }
  });

  let rolling_week_total =
    count_between(events, subject, now - Duration::days(7), now);
  let active_today = buckets[6].count != 0;

  ActivitySummary { buckets, rolling_week_total, active_today }
}

// ─── Expiry countdown ────────────────────────────────────────────────────────

/// Whole days from `now` until `expiry`, floor semantics: 13 days and 23
/// hours is 13; one second past expiry is -1.
pub fn days_until_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
  (expiry - now).num_seconds().div_euclid(86_400)
}

/// Display rule for the countdown: zero renders as "Today".
pub fn countdown_label(days: i64) -> String {
  if days == 0 { "Today".to_string() } else { format!("{days} days") }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::event::EventKind;

  fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
  }

  fn tap(code: &str, time: &str) -> Event {
    Event {
      participant_code: code.into(),
      at:               at(time),
      timezone:         "UTC".into(),
      kind:             EventKind::Tap,
    }
  }

  fn exact(code: &str) -> SubjectMatch {
    SubjectMatch::Exact(code.into())
  }

  // 2024-03-15 is a Friday; the anchor is 09:00 that day.
  const NOW: &str = "2024-03-15T12:00:00Z";

  #[test]
  fn event_at_0859_lands_in_previous_bucket() {
    let events = vec![tap("A1", "2024-03-15T08:59:00Z")];
    let summary = aggregate(&events, &exact("A1"), at(NOW));

    assert_eq!(summary.buckets[6].count, 0, "Today must be empty");
    assert_eq!(summary.buckets[5].count, 1, "Thursday bucket holds it");
    assert!(!summary.active_today);
  }

  #[test]
  fn event_at_0900_exactly_lands_in_current_bucket() {
    let events = vec![tap("A1", "2024-03-15T09:00:00Z")];
    let summary = aggregate(&events, &exact("A1"), at(NOW));

    assert_eq!(summary.buckets[6].count, 1);
    assert!(summary.active_today);
  }

  #[test]
  fn bucket_labels_are_weekdays_with_today_override() {
    let summary = aggregate(&[], &exact("A1"), at(NOW));

    let labels: Vec<_> =
      summary.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
      labels,
      ["Saturday", "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Today"]
    );
  }

  #[test]
  fn anchor_stays_at_0900_even_before_0900() {
    // 07:00 on the 15th: the current bucket has not started yet.
    let anchor = day_anchor(at("2024-03-15T07:00:00Z"));
    assert_eq!(anchor, at("2024-03-15T09:00:00Z"));
  }

  #[test]
  fn empty_stream_is_all_zeros_not_an_error() {
    let summary = aggregate(&[], &exact("A1"), at(NOW));
    assert!(summary.buckets.iter().all(|b| b.count == 0));
    assert_eq!(summary.rolling_week_total, 0);
    assert!(!summary.active_today);
  }

  #[test]
  fn prefix_match_spans_a_cohort() {
    let events = vec![
      tap("A1", "2024-03-15T10:00:00Z"),
      tap("A2", "2024-03-15T10:30:00Z"),
      tap("B9", "2024-03-15T11:00:00Z"),
    ];
    let summary =
      aggregate(&events, &SubjectMatch::Prefix("A".into()), at(NOW));
    assert_eq!(summary.buckets[6].count, 2);
  }

  #[test]
  fn other_subjects_events_are_ignored() {
    let events = vec![tap("B2", "2024-03-15T10:00:00Z")];
    let summary = aggregate(&events, &exact("A1"), at(NOW));
    assert_eq!(summary.rolling_week_total, 0);
    assert!(!summary.active_today);
  }

  #[test]
  fn rolling_total_equals_bucket_sum_at_the_boundary() {
    // With `now` exactly on the 09:00 boundary and every event inside the
    // six most recent buckets, the two windows cover the same events.
    let now = at("2024-03-15T09:00:00Z");
    let events = vec![
      tap("A1", "2024-03-09T10:00:00Z"),
      tap("A1", "2024-03-12T03:00:00Z"),
      tap("A1", "2024-03-14T22:00:00Z"),
    ];
    let summary = aggregate(&events, &exact("A1"), now);

    let bucket_sum: u64 = summary.buckets.iter().map(|b| b.count).sum();
    assert_eq!(bucket_sum, 3);
    assert_eq!(summary.rolling_week_total, bucket_sum);
  }

  #[test]
  fn rolling_total_may_diverge_from_bucket_sum_off_the_boundary() {
    // With `now` an hour past the anchor, the rolling window reaches back
    // to 10:00 on the 8th — before the oldest bucket opens at 09:00 on the
    // 9th. An event in that gap is counted by the rolling window only.
    let now = at("2024-03-15T10:00:00Z");
    let events = vec![
      tap("A1", "2024-03-09T08:30:00Z"),
      tap("A1", "2024-03-12T12:00:00Z"),
    ];
    let summary = aggregate(&events, &exact("A1"), now);

    let bucket_sum: u64 = summary.buckets.iter().map(|b| b.count).sum();
    assert_eq!(bucket_sum, 1, "gap event precedes every bucket");
    assert_eq!(summary.rolling_week_total, 2);
    assert_eq!(summary.rolling_week_total - bucket_sum, 1);
  }

  #[test]
  fn expiry_countdown_floors_whole_days() {
    let now = at("2024-03-15T09:00:00Z");
    assert_eq!(days_until_expiry(at("2024-03-20T08:59:59Z"), now), 4);
    assert_eq!(days_until_expiry(at("2024-03-20T09:00:00Z"), now), 5);
    assert_eq!(days_until_expiry(at("2024-03-15T12:00:00Z"), now), 0);
    assert_eq!(days_until_expiry(at("2024-03-15T08:59:59Z"), now), -1);
  }

  #[test]
  fn zero_day_countdown_renders_as_today() {
    assert_eq!(countdown_label(0), "Today");
    assert_eq!(countdown_label(5), "5 days");
  }
}
