//! Tap and audio-tap events, and the normalizer that turns raw wire lists
//! into parsed, totally-ordered streams.
//!
//! Events arrive as unordered lists with string timestamps. Normalization
//! parses every timestamp and stable-sorts ascending, so equal instants keep
//! their original arrival order. A single malformed timestamp rejects the
//! whole batch — there is no partial-record recovery at this layer.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ─── Wire types ──────────────────────────────────────────────────────────────

/// What the subject did with the audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioAction {
  Play,
  Pause,
  Stop,
  Skip,
}

impl AudioAction {
  /// Lowercase wire form, used verbatim in export rows.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Play => "play",
      Self::Pause => "pause",
      Self::Stop => "stop",
      Self::Skip => "skip",
    }
  }
}

/// A plain tap event as fetched, timestamp still a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTap {
  pub participant_code: String,
  pub time:             String,
  pub timezone:         String,
}

/// An audio-tap event as fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAudioTap {
  pub participant_code: String,
  pub time:             String,
  pub timezone:         String,
  pub action:           AudioAction,
  pub audio_file_title: String,
}

// ─── Normalized form ─────────────────────────────────────────────────────────

/// Which stream an event came from, with the audio-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
  Tap,
  AudioTap {
    action:           AudioAction,
    audio_file_title: String,
  },
}

/// A normalized event: parsed instant, original timezone label kept as
/// metadata for the export surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub participant_code: String,
  pub at:               DateTime<Utc>,
  pub timezone:         String,
  pub kind:             EventKind,
}

// ─── Timestamp parsing ───────────────────────────────────────────────────────

/// Parse a wire timestamp. Accepts RFC 3339 (with offset) and, as a
/// fallback, an offset-less ISO datetime interpreted as UTC.
pub(crate) fn parse_instant(
  value: &str,
  context: &'static str,
) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
    .map(|naive| naive.and_utc())
    .map_err(|source| Error::MalformedTimestamp {
      value: value.to_string(),
      context,
      source,
    })
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Parse and sort a raw tap stream. Fails on the first malformed timestamp.
pub fn normalize_taps(raw: Vec<RawTap>) -> Result<Vec<Event>> {
  let mut events = raw
    .into_iter()
    .map(|t| {
      Ok(Event {
        at:               parse_instant(&t.time, "tap event")?,
        participant_code: t.participant_code,
        timezone:         t.timezone,
        kind:             EventKind::Tap,
      })
    })
    .collect::<Result<Vec<_>>>()?;
  // sort_by_key is stable: equal instants keep arrival order.
  events.sort_by_key(|e| e.at);
  Ok(events)
}

/// Parse and sort a raw audio-tap stream. Fails on the first malformed
/// timestamp.
pub fn normalize_audio_taps(raw: Vec<RawAudioTap>) -> Result<Vec<Event>> {
  let mut events = raw
    .into_iter()
    .map(|t| {
      Ok(Event {
        at:               parse_instant(&t.time, "audio-tap event")?,
        participant_code: t.participant_code,
        timezone:         t.timezone,
        kind:             EventKind::AudioTap {
          action:           t.action,
          audio_file_title: t.audio_file_title,
        },
      })
    })
    .collect::<Result<Vec<_>>>()?;
  events.sort_by_key(|e| e.at);
  Ok(events)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
