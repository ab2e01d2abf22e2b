//! JSON envelope types for CLI output.
//!
//! Structured output lets courtreel act as a backend for a web frontend:
//! every command prints one envelope on stdout in `--output-mode json`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::aggregator::{AggregatorView, BucketCounts};
use crate::compiler::CompileStage;
use crate::events::{CameraAngle, TimestampEntry};
use crate::report::RunId;
use crate::setup::NormalizedSetup;
use crate::timestamp::Timestamp;

/// Version of the JSON envelope format.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T> {
    /// Envelope format version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Final result.
    Result,
    /// Error occurred.
    Error,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Compiled highlight.
    Highlight,
    /// Replayed event stream snapshot.
    Replay,
    /// Downloaded report.
    Report,
    /// Upload precondition check.
    UploadCheck,
    /// Normalized match setup.
    Setup,
    /// Configuration display.
    Config,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Error code (`snake_case` identifier).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Compile stage that failed, for retrying precisely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<CompileStage>,
}

impl From<&crate::Error> for ErrorPayload {
    fn from(e: &crate::Error) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
            stage: e.compile_stage(),
        }
    }
}

/// Payload for a compiled highlight.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Written file.
    pub output_file: PathBuf,
    /// Size in bytes.
    pub bytes: usize,
    /// Container descriptor.
    pub media_type: String,
    /// Length of each clip.
    pub clip_duration_secs: u32,
    /// Clips in output order.
    pub clips: Vec<ClipEntry>,
}

/// One clip of a highlight.
#[derive(Debug, Clone, Serialize)]
pub struct ClipEntry {
    /// Position in the output.
    pub index: usize,
    /// Moment the clip starts at.
    pub timestamp: Timestamp,
    /// Source recording.
    pub angle: CameraAngle,
    /// Start offset in seconds.
    pub start_secs: u64,
}

impl ClipEntry {
    /// Describe the clip at `index`.
    pub const fn new(index: usize, entry: &TimestampEntry) -> Self {
        Self {
            index,
            timestamp: entry.timestamp,
            angle: entry.angle,
            start_secs: entry.timestamp.to_seconds(),
        }
    }
}

/// Payload for a replayed event stream.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Events decoded from the log.
    pub events_read: usize,
    /// Collection sizes.
    pub counts: BucketCounts,
    /// Final aggregator view.
    #[serde(flatten)]
    pub view: AggregatorView,
}

/// Payload for a downloaded report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Run the report belongs to.
    pub run_id: RunId,
    /// Written file.
    pub output_file: PathBuf,
    /// Size in bytes.
    pub bytes: u64,
}

/// Payload for an upload precondition check.
#[derive(Debug, Clone, Serialize)]
pub struct UploadCheckPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Checked file name.
    pub filename: String,
    /// Already stored server-side.
    pub exists: bool,
}

/// Payload for a validated match setup.
#[derive(Debug, Clone, Serialize)]
pub struct SetupPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Normalized boundaries.
    #[serde(flatten)]
    pub setup: NormalizedSetup,
}

/// Payload for config show result.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// The configuration contents (as JSON value for flexibility).
    pub config: serde_json::Value,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_envelope_serialization() {
        let payload = UploadCheckPayload {
            result_type: ResultType::UploadCheck,
            filename: "game.mp4".to_string(),
            exists: true,
        };
        let envelope = JsonEnvelope::new(EventType::Result, payload);

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"spec_version\":\"1.0\""));
        assert!(json.contains("\"event\":\"result\""));
        assert!(json.contains("\"result_type\":\"upload_check\""));
        assert!(json.contains("\"exists\":true"));
    }

    #[test]
    fn test_clip_entry_uses_display_timestamp() {
        let entry = TimestampEntry::new(Timestamp::from_seconds(86), CameraAngle::Two);
        let json = serde_json::to_string(&ClipEntry::new(0, &entry)).unwrap();
        assert_eq!(
            json,
            r#"{"index":0,"timestamp":"1:26","angle":2,"start_secs":86}"#
        );
    }

    #[test]
    fn test_error_payload_carries_stage() {
        let payload = ErrorPayload::from(&Error::EmptySelection);
        assert_eq!(payload.code, "empty_selection");
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("\"stage\""));

        let payload = ErrorPayload::from(&Error::ConcatenationFailed {
            source: crate::compiler::BackendError::Io(std::io::Error::other("disk full")),
        });
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"stage\":\"concatenate\""));
    }
}
