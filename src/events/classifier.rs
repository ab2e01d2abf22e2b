//! Detection event classification.

use super::{Bucket, DetectionEvent, Team, TimestampEntry};
use crate::timestamp::Timestamp;

/// A detection resolved to its bucket, team and `(timestamp, angle)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedEntry {
    /// Scoring or shooting.
    pub bucket: Bucket,
    /// Team the moment counts for.
    pub team: Team,
    /// Deduplication key.
    pub entry: TimestampEntry,
}

/// Classify a detection event. Total: every decoded event has a class.
pub fn classify(event: &DetectionEvent) -> ClassifiedEntry {
    let bucket = if event.success {
        Bucket::Scoring
    } else {
        Bucket::Shooting
    };

    let team = match event.team.as_deref() {
        Some("B") => Team::B,
        _ => Team::A,
    };

    ClassifiedEntry {
        bucket,
        team,
        entry: TimestampEntry::new(
            Timestamp::from_millis(event.start_time),
            event.video_id.unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CameraAngle;

    fn event(success: bool, start_time: u64, team: Option<&str>, video_id: Option<CameraAngle>) -> DetectionEvent {
        DetectionEvent {
            success,
            start_time,
            team: team.map(str::to_string),
            video_id,
        }
    }

    #[test]
    fn test_made_shot_is_scoring() {
        let c = classify(&event(true, 86_000, Some("A"), Some(CameraAngle::One)));
        assert_eq!(c.bucket, Bucket::Scoring);
        assert_eq!(c.team, Team::A);
        assert_eq!(c.entry.timestamp.to_string(), "1:26");
        assert_eq!(c.entry.angle, CameraAngle::One);
    }

    #[test]
    fn test_missed_shot_is_shooting() {
        let c = classify(&event(false, 5_000, Some("B"), Some(CameraAngle::Two)));
        assert_eq!(c.bucket, Bucket::Shooting);
        assert_eq!(c.team, Team::B);
        assert_eq!(c.entry.angle, CameraAngle::Two);
    }

    #[test]
    fn test_missing_or_unknown_team_defaults_to_a() {
        assert_eq!(classify(&event(true, 0, None, None)).team, Team::A);
        assert_eq!(classify(&event(true, 0, Some(""), None)).team, Team::A);
        assert_eq!(classify(&event(true, 0, Some("C"), None)).team, Team::A);
        assert_eq!(classify(&event(true, 0, Some("b"), None)).team, Team::A);
    }

    #[test]
    fn test_missing_video_id_defaults_to_angle_one() {
        assert_eq!(classify(&event(false, 0, None, None)).entry.angle, CameraAngle::One);
    }
}
