//! Detection event stream: wire types, decoding and classification.
//!
//! The analysis service pushes named events with at-least-once delivery.
//! Decoding happens here, at the transport boundary, so malformed payloads are
//! rejected before they can reach the aggregator.

mod classifier;
mod types;

use std::io::BufRead;

use tracing::warn;

pub use classifier::{ClassifiedEntry, classify};
pub use types::{
    Bucket, CameraAngle, DetectionEvent, FinalStatistics, StreamEvent, Team, TimestampEntry,
};

use crate::error::{Error, Result};

/// Decode one wire message.
pub fn decode_event(line: &str) -> Result<StreamEvent> {
    serde_json::from_str(line).map_err(|e| Error::MalformedEvent {
        message: e.to_string(),
    })
}

/// Decode a recorded stream with one message per line.
///
/// Blank lines are skipped. Malformed lines are logged and dropped, the way a
/// live transport drops payloads it cannot decode.
pub fn read_event_log<R: BufRead>(reader: R) -> Result<Vec<StreamEvent>> {
    let mut events = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match decode_event(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => warn!("Dropping line {}: {e}", line_num + 1),
        }
    }

    Ok(events)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_bad_angle() {
        let result = decode_event(
            r#"{"event":"shooting_detected","data":{"success":true,"start_time":1000,"video_id":3}}"#,
        );
        assert!(matches!(result, Err(Error::MalformedEvent { .. })));
    }

    #[test]
    fn test_decode_rejects_negative_start_time() {
        let result = decode_event(
            r#"{"event":"shooting_detected","data":{"success":true,"start_time":-3000}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_event() {
        assert!(decode_event(r#"{"event":"halftime"}"#).is_err());
    }

    #[test]
    fn test_read_event_log_skips_malformed_lines() {
        let log = "{\"event\":\"connect\"}\n\nnot json\n{\"event\":\"disconnect\"}\n";
        let events = read_event_log(log.as_bytes()).unwrap();
        assert_eq!(events, vec![StreamEvent::Connect, StreamEvent::Disconnect]);
    }
}
