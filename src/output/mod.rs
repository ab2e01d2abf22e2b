//! Structured output and progress display.

pub mod json_envelope;
pub mod progress;
mod reporter;

pub use json_envelope::{
    ClipEntry, ConfigPayload, ErrorPayload, EventType, HighlightPayload, JsonEnvelope,
    ReplayPayload, ReportPayload, ResultType, SetupPayload, UploadCheckPayload,
};
pub use reporter::{emit_json_error, emit_json_result, write_envelope};
