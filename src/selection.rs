//! Export selection.
//!
//! Tracks which `(timestamp, angle)` moments the user picked for the
//! highlight. The compiler only ever sees [`SelectionSet::sorted_by_time`].

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::events::{CameraAngle, TimestampEntry};
use crate::timestamp::Timestamp;

/// User-chosen moments in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<TimestampEntry>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry` if absent, remove it if present. Returns `true` when the
    /// entry is selected afterwards.
    pub fn toggle(&mut self, entry: TimestampEntry) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| *e == entry) {
            self.entries.remove(pos);
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    /// Whether `entry` is selected.
    pub fn contains(&self, entry: &TimestampEntry) -> bool {
        self.entries.contains(entry)
    }

    /// Drop every selected entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of selected entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in selection order.
    pub fn entries(&self) -> &[TimestampEntry] {
        &self.entries
    }

    /// Entries ordered by elapsed seconds. Stable: equal times keep their
    /// selection order regardless of angle.
    pub fn sorted_by_time(&self) -> Vec<TimestampEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|e| e.timestamp.to_seconds());
        sorted
    }
}

impl FromIterator<TimestampEntry> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = TimestampEntry>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            if !set.contains(&entry) {
                set.entries.push(entry);
            }
        }
        set
    }
}

/// Parse a `timestamp@angle` argument such as `1:26@2`. The angle defaults
/// to 1 when omitted.
pub fn parse_entry_arg(raw: &str) -> Result<TimestampEntry> {
    let (ts, angle) = match raw.split_once('@') {
        Some((ts, angle)) => {
            let id: u8 = angle.trim().parse().map_err(|_| Error::InvalidSelection {
                message: format!("'{raw}': camera angle must be 1 or 2"),
            })?;
            let angle = CameraAngle::try_from(id).map_err(|message| Error::InvalidSelection {
                message: format!("'{raw}': {message}"),
            })?;
            (ts, angle)
        }
        None => (raw, CameraAngle::One),
    };

    Ok(TimestampEntry::new(Timestamp::parse_elapsed(ts.trim())?, angle))
}

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct SelectionRecord {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Camera angle", default)]
    angle: Option<u8>,
}

/// Read a selection file.
///
/// Expects a header row with `Timestamp` and optionally `Camera angle`
/// columns; other columns are ignored. A missing angle means angle 1. Rows
/// repeating an earlier entry are skipped.
pub fn parse_selection_file(path: &Path) -> Result<SelectionSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::SelectionParseFailed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut selection = SelectionSet::new();

    for (line_num, result) in reader.deserialize::<SelectionRecord>().enumerate() {
        let line = line_num + 2;
        let record = result.map_err(|e| Error::InvalidSelection {
            message: format!("line {line}: {e}"),
        })?;

        let timestamp =
            Timestamp::parse_elapsed(&record.timestamp).map_err(|_| Error::InvalidSelection {
                message: format!("line {line}: invalid timestamp '{}'", record.timestamp),
            })?;
        let angle = match record.angle {
            Some(id) => CameraAngle::try_from(id).map_err(|message| Error::InvalidSelection {
                message: format!("line {line}: {message}"),
            })?,
            None => CameraAngle::One,
        };

        let entry = TimestampEntry::new(timestamp, angle);
        if selection.contains(&entry) {
            debug!("Skipping repeated selection {entry} on line {line}");
            continue;
        }
        selection.toggle(entry);
    }

    Ok(selection)
}
