//! Highlight compilation from selected moments.
//!
//! Selected `(timestamp, angle)` entries are resolved against one or two
//! source recordings, cut into fixed-length clips and joined into a single
//! video. Both steps are copy-remux through a [`MediaBackend`], so every
//! source used together must share one container format.

mod backend;
pub mod command;
mod highlight;
mod source;

pub use backend::{BackendError, FfmpegBackend, MediaBackend};
pub use highlight::{
    ClipCompiler, CompileOptions, CompileProgress, CompileStage, CompiledHighlight,
    HighlightSession,
};
pub use source::{SourceVideo, SourceVideos, extension_for_media_type, media_type_for_extension};
