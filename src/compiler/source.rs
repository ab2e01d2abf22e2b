//! Source video buffers.

use std::path::Path;
use std::sync::Arc;

use crate::constants::MEDIA_TYPES;
use crate::error::{Error, Result};
use crate::events::CameraAngle;

/// An uploaded recording held in memory for the session.
///
/// The buffer is shared read-only; cloning is cheap and never copies media.
#[derive(Debug, Clone)]
pub struct SourceVideo {
    angle: CameraAngle,
    media_type: String,
    data: Arc<[u8]>,
}

impl SourceVideo {
    /// Wrap a buffer with its angle and media type.
    pub fn new(angle: CameraAngle, media_type: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            angle,
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Load a file, deriving the media type from its extension.
    pub fn from_path(angle: CameraAngle, path: &Path) -> Result<Self> {
        let media_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(media_type_for_extension)
            .ok_or_else(|| Error::UnsupportedMediaType {
                media_type: path.display().to_string(),
            })?;

        let data = std::fs::read(path).map_err(|e| Error::SourceVideoRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self::new(angle, media_type, data))
    }

    /// Camera angle this recording belongs to.
    pub const fn angle(&self) -> CameraAngle {
        self.angle
    }

    /// Container/codec descriptor, e.g. `video/mp4`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Raw media bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// File extension matching the media type.
    pub fn extension(&self) -> Result<&'static str> {
        extension_for_media_type(&self.media_type).ok_or_else(|| Error::UnsupportedMediaType {
            media_type: self.media_type.clone(),
        })
    }
}

/// One or two recordings, keyed by camera angle.
#[derive(Debug, Clone)]
pub struct SourceVideos {
    first: SourceVideo,
    second: Option<SourceVideo>,
}

impl SourceVideos {
    /// A single recording for angle 1.
    pub fn single(first: SourceVideo) -> Result<Self> {
        Self::new(first, None)
    }

    /// Recordings for angle 1 and optionally angle 2.
    pub fn new(first: SourceVideo, second: Option<SourceVideo>) -> Result<Self> {
        if first.angle != CameraAngle::One {
            return Err(Error::InvalidSources {
                message: format!("first video must be camera angle 1, got {}", first.angle),
            });
        }
        if let Some(ref second) = second
            && second.angle != CameraAngle::Two
        {
            return Err(Error::InvalidSources {
                message: format!("second video must be camera angle 2, got {}", second.angle),
            });
        }
        Ok(Self { first, second })
    }

    /// The recording for `angle`.
    pub fn resolve(&self, angle: CameraAngle) -> Result<&SourceVideo> {
        match angle {
            CameraAngle::One => Ok(&self.first),
            CameraAngle::Two => self
                .second
                .as_ref()
                .ok_or(Error::MissingCameraAngle { angle }),
        }
    }

    /// Whether a second angle was supplied.
    pub const fn has_second(&self) -> bool {
        self.second.is_some()
    }
}

/// Media type for a file extension (case-insensitive).
pub fn media_type_for_extension(ext: &str) -> Option<&'static str> {
    MEDIA_TYPES
        .iter()
        .find(|(_, e)| e.eq_ignore_ascii_case(ext))
        .map(|(media_type, _)| *media_type)
}

/// File extension for a media type.
pub fn extension_for_media_type(media_type: &str) -> Option<&'static str> {
    MEDIA_TYPES
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(media_type))
        .map(|(_, ext)| *ext)
}
