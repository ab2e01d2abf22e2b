//! Wire types for the detection event stream.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Which physically distinct recording a timestamp belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CameraAngle {
    /// First uploaded video. Used when an event carries no `video_id`.
    #[default]
    One,
    /// Second uploaded video (other half court).
    Two,
}

impl CameraAngle {
    /// Numeric identifier as used on the wire.
    pub const fn id(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for CameraAngle {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("camera angle must be 1 or 2, got {other}")),
        }
    }
}

impl From<CameraAngle> for u8 {
    fn from(angle: CameraAngle) -> Self {
        angle.id()
    }
}

impl fmt::Display for CameraAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Team a moment is attributed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Team A, also the fallback for events without a usable team.
    #[default]
    A,
    /// Team B.
    B,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Scoring (made shot) or shooting (missed attempt) moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// A made shot.
    Scoring,
    /// An attempted, missed shot.
    Shooting,
}

/// A shot detection as emitted by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// `true` for a made shot.
    pub success: bool,
    /// Offset into the recording in milliseconds.
    pub start_time: u64,
    /// Team label; anything other than `"A"` or `"B"` falls back to A.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Source recording; absent means camera angle 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<CameraAngle>,
}

/// Opaque final statistics payload delivered with `processing_complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalStatistics(pub serde_json::Value);

/// One named message on the event stream.
///
/// Wire form is `{"event": "<name>", "data": <payload>}`; events without a
/// payload omit `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Stream connected.
    Connect,
    /// Stream disconnected.
    Disconnect,
    /// Connection attempt failed; the transport retries on its own.
    ConnectError(String),
    /// A shot was detected.
    ShootingDetected(DetectionEvent),
    /// Analysis finished; no further detections follow.
    ProcessingComplete(FinalStatistics),
}

/// A `(timestamp, camera angle)` pair; the uniqueness key for moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampEntry {
    /// When the moment happened.
    pub timestamp: Timestamp,
    /// Which recording it happened in.
    pub angle: CameraAngle,
}

impl TimestampEntry {
    /// Create an entry.
    pub const fn new(timestamp: Timestamp, angle: CameraAngle) -> Self {
        Self { timestamp, angle }
    }
}

impl fmt::Display for TimestampEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.timestamp, self.angle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_angle_from_wire() {
        let angle: CameraAngle = serde_json::from_str("2").unwrap();
        assert_eq!(angle, CameraAngle::Two);
        assert!(serde_json::from_str::<CameraAngle>("3").is_err());
        assert!(serde_json::from_str::<CameraAngle>("0").is_err());
    }

    #[test]
    fn test_detection_event_optional_fields() {
        let event: DetectionEvent =
            serde_json::from_str(r#"{"success": false, "start_time": 1200}"#).unwrap();
        assert_eq!(event.team, None);
        assert_eq!(event.video_id, None);
    }

    #[test]
    fn test_stream_event_wire_form() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"event":"shooting_detected","data":{"success":true,"start_time":86000,"team":"A","video_id":1}}"#,
        )
        .unwrap();
        assert!(matches!(event, StreamEvent::ShootingDetected(ref d) if d.success));

        let event: StreamEvent = serde_json::from_str(r#"{"event":"connect"}"#).unwrap();
        assert_eq!(event, StreamEvent::Connect);
    }

    #[test]
    fn test_entry_display() {
        let entry = TimestampEntry::new(Timestamp::from_seconds(86), CameraAngle::Two);
        assert_eq!(entry.to_string(), "1:26@2");
    }
}
