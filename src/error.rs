//! Error types for courtreel.

use crate::compiler::{BackendError, CompileStage};
use crate::events::{CameraAngle, TimestampEntry};

/// Result type alias for courtreel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for courtreel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Timestamp string is not in an accepted format.
    #[error("invalid timestamp '{value}' (expected hh:mm:ss or mm:ss)")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
    },

    /// Stream message could not be decoded.
    #[error("malformed stream event: {message}")]
    MalformedEvent {
        /// Decoder message.
        message: String,
    },

    /// Failed to open or read a selection file.
    #[error("failed to parse selection file '{path}'")]
    SelectionParseFailed {
        /// Path to the selection file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Selection input is invalid.
    #[error("invalid selection: {message}")]
    InvalidSelection {
        /// Description of the problem.
        message: String,
    },

    /// Match setup is invalid.
    #[error("invalid match setup: {message}")]
    InvalidMatchSetup {
        /// Description of the problem.
        message: String,
    },

    // Compiler errors
    /// Nothing selected to compile.
    #[error("no timestamps selected")]
    EmptySelection,

    /// A selected entry references a camera angle with no source video.
    #[error("selection references camera angle {angle} but no video was supplied for it")]
    MissingCameraAngle {
        /// The unresolved angle.
        angle: CameraAngle,
    },

    /// Another compilation is still running.
    #[error("a highlight compilation is already in progress")]
    CompilationInProgress,

    /// Selected sources cannot be joined without re-encoding.
    #[error("source videos differ in format ('{first}' vs '{second}'); copy-remux requires identical formats")]
    IncompatibleSources {
        /// Media type of angle 1.
        first: String,
        /// Media type of angle 2.
        second: String,
    },

    /// Source video set is inconsistent.
    #[error("invalid source videos: {message}")]
    InvalidSources {
        /// Description of the problem.
        message: String,
    },

    /// Media type has no known container.
    #[error("unsupported media type: {media_type}")]
    UnsupportedMediaType {
        /// The media type descriptor.
        media_type: String,
    },

    /// Failed to read a source video.
    #[error("failed to read source video '{path}'")]
    SourceVideoRead {
        /// Path to the video.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A clip could not be extracted.
    #[error("failed to extract clip {index} ({entry})")]
    ExtractionFailed {
        /// Position in the sorted selection.
        index: usize,
        /// The entry being extracted.
        entry: TimestampEntry,
        /// Backend failure.
        #[source]
        source: BackendError,
    },

    /// Clips could not be joined.
    #[error("failed to concatenate clips")]
    ConcatenationFailed {
        /// Backend failure.
        #[source]
        source: BackendError,
    },

    /// Failed to write the compiled highlight.
    #[error("failed to write highlight '{path}'")]
    HighlightWrite {
        /// Output path.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    // Stream status
    /// Event stream dropped; aggregated moments remain valid.
    #[error("event stream disconnected")]
    StreamDisconnected,

    /// Upstream connection failed.
    #[error("upstream connection error: {message}")]
    Upstream {
        /// Transport message.
        message: String,
    },

    // Report service
    /// Run identifier is empty.
    #[error("run identifier must not be empty")]
    InvalidRunId,

    /// Report request failed.
    #[error("report request to '{url}' failed")]
    ReportRequestFailed {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Upload precondition check failed.
    #[error("upload check at '{url}' failed")]
    UploadCheckFailed {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write JSON output.
    #[error("failed to serialize JSON output")]
    JsonSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// The compile stage that failed, for errors raised while compiling.
    pub const fn compile_stage(&self) -> Option<CompileStage> {
        match self {
            Self::ExtractionFailed { .. } => Some(CompileStage::Extract),
            Self::ConcatenationFailed { .. } => Some(CompileStage::Concatenate),
            _ => None,
        }
    }

    /// Stable `snake_case` identifier for structured output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::ConfigDirNotFound
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::ConfigWrite { .. }
            | Self::ConfigSerialize { .. } => "config",
            Self::InvalidTimestamp { .. } => "invalid_format",
            Self::MalformedEvent { .. } => "malformed_event",
            Self::SelectionParseFailed { .. } | Self::InvalidSelection { .. } => {
                "invalid_selection"
            }
            Self::InvalidMatchSetup { .. } => "invalid_match_setup",
            Self::EmptySelection => "empty_selection",
            Self::MissingCameraAngle { .. } => "missing_camera_angle",
            Self::CompilationInProgress => "compilation_in_progress",
            Self::IncompatibleSources { .. }
            | Self::InvalidSources { .. }
            | Self::UnsupportedMediaType { .. }
            | Self::SourceVideoRead { .. } => "invalid_source",
            Self::ExtractionFailed { .. } => "extraction_failed",
            Self::ConcatenationFailed { .. } => "concatenation_failed",
            Self::HighlightWrite { .. } => "highlight_write",
            Self::StreamDisconnected => "stream_disconnected",
            Self::Upstream { .. } => "upstream_error",
            Self::InvalidRunId | Self::ReportRequestFailed { .. } => "report",
            Self::UploadCheckFailed { .. } => "upload_check",
            Self::JsonSerialize { .. } => "json",
            Self::Internal { .. } => "internal",
        }
    }
}
