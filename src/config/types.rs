//! Configuration type definitions.

use crate::constants::{highlight, server};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis service endpoints.
    #[serde(default)]
    pub server: ServerConfig,

    /// Highlight compilation settings.
    #[serde(default)]
    pub highlight: HighlightConfig,
}

/// Analysis service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the service (scheme, host and port).
    pub base_url: String,

    /// Report rendering endpoint path.
    pub report_path: String,

    /// Upload precondition endpoint path.
    pub upload_check_path: String,

    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: server::DEFAULT_BASE_URL.to_string(),
            report_path: server::DEFAULT_REPORT_PATH.to_string(),
            upload_check_path: server::DEFAULT_UPLOAD_CHECK_PATH.to_string(),
            connect_timeout_secs: server::DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: server::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Highlight compilation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Length of each clip in seconds.
    pub clip_duration_secs: u32,

    /// ffmpeg executable (name on `PATH` or full path).
    pub ffmpeg_path: PathBuf,

    /// Clips extracted at the same time.
    pub max_parallel_extractions: usize,

    /// Default output file.
    pub output_file: PathBuf,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            clip_duration_secs: highlight::DEFAULT_CLIP_DURATION_SECS,
            ffmpeg_path: PathBuf::from(highlight::DEFAULT_FFMPEG),
            max_parallel_extractions: highlight::DEFAULT_MAX_PARALLEL_EXTRACTIONS,
            output_file: PathBuf::from(highlight::DEFAULT_OUTPUT_FILE),
        }
    }
}

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// Human-readable text.
    #[default]
    Human,
    /// A single JSON result envelope.
    Json,
}

impl OutputMode {
    /// Whether output is machine-readable.
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}
