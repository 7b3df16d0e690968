//! Flat rows for the external report builder.
//!
//! The spreadsheet writer itself lives outside this crate; we only hand it
//! one merged list in its required order.

use serde::{Deserialize, Serialize};

use crate::event::{Event, EventKind};

/// One row of the merged tap/audio-tap report. Audio columns are blank for
/// plain taps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
  pub participant_code: String,
  pub time:             String,
  pub timezone:         String,
  pub audio_action:     String,
  pub audio_file_title: String,
}

/// Build the merged report: timestamp ascending, then participant code
/// ascending. Callers concatenate the normalized tap and audio-tap streams
/// before passing them in.
pub fn export_rows(events: &[Event]) -> Vec<ExportRow> {
  let mut ordered: Vec<&Event> = events.iter().collect();
  ordered.sort_by(|a, b| {
    a.at
      .cmp(&b.at)
      .then_with(|| a.participant_code.cmp(&b.participant_code))
  });

  ordered
    .into_iter()
    .map(|e| {
      let (audio_action, audio_file_title) = match &e.kind {
        EventKind::Tap => (String::new(), String::new()),
        EventKind::AudioTap { action, audio_file_title } => {
          (action.as_str().to_string(), audio_file_title.clone())
        }
      };
      ExportRow {
        participant_code: e.participant_code.clone(),
        time:             e.at.to_rfc3339(),
        timezone:         e.timezone.clone(),
        audio_action,
        audio_file_title,
      }
    })
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
