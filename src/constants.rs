//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "courtreel";

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Highlight compilation defaults.
pub mod highlight {
    /// Default clip length in seconds.
    ///
    /// Observed deployments used 3, 5 and 7 seconds; 5 is the middle ground
    /// and can be changed in the config file or per invocation.
    pub const DEFAULT_CLIP_DURATION_SECS: u32 = 5;

    /// Shortest allowed clip length in seconds.
    pub const MIN_CLIP_DURATION_SECS: u32 = 1;

    /// Longest allowed clip length in seconds.
    pub const MAX_CLIP_DURATION_SECS: u32 = 60;

    /// Default number of clips extracted concurrently.
    pub const DEFAULT_MAX_PARALLEL_EXTRACTIONS: usize = 2;

    /// Default ffmpeg executable.
    pub const DEFAULT_FFMPEG: &str = "ffmpeg";

    /// Default output file for the compiled highlight.
    pub const DEFAULT_OUTPUT_FILE: &str = "highlight.mp4";

    /// Prefix for per-compilation scratch directories.
    pub const WORKSPACE_PREFIX: &str = "courtreel-";

    /// Number of ffmpeg stderr lines kept for error reports.
    pub const STDERR_TAIL_LINES: usize = 20;
}

/// Report service defaults.
pub mod server {
    /// Default analysis service base URL.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

    /// Default report rendering endpoint.
    pub const DEFAULT_REPORT_PATH: &str = "/generate_report";

    /// Default upload precondition endpoint.
    pub const DEFAULT_UPLOAD_CHECK_PATH: &str = "/check_file";

    /// Default connect timeout in seconds.
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Default whole-request timeout in seconds.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Default file name for a downloaded report.
    pub const DEFAULT_REPORT_FILE: &str = "report.pdf";
}

/// Supported containers, as `(media type, file extension)`.
pub const MEDIA_TYPES: &[(&str, &str)] = &[
    ("video/mp4", "mp4"),
    ("video/quicktime", "mov"),
    ("video/webm", "webm"),
    ("video/x-matroska", "mkv"),
];
