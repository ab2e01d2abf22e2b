//! Tests for live aggregation of the detection stream.

use std::time::Duration;

use courtreel::aggregator::{ConnectionStatus, LiveAggregator};
use courtreel::events::{
    Bucket, CameraAngle, DetectionEvent, FinalStatistics, StreamEvent, Team, TimestampEntry,
    decode_event,
};
use courtreel::timestamp::Timestamp;
use tokio::sync::mpsc;

fn detection(success: bool, start_time: u64, team: Option<&str>, video_id: Option<u8>) -> StreamEvent {
    StreamEvent::ShootingDetected(DetectionEvent {
        success,
        start_time,
        team: team.map(str::to_string),
        video_id: video_id.map(|id| CameraAngle::try_from(id).unwrap()),
    })
}

fn keys(agg: &LiveAggregator, bucket: Bucket, team: Team) -> Vec<String> {
    agg.snapshot()
        .set(bucket, team)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_duplicate_made_shot_recorded_once() {
    let mut agg = LiveAggregator::new();
    let event = decode_event(
        r#"{"event":"shooting_detected","data":{"success":true,"start_time":86000,"team":"A","video_id":1}}"#,
    )
    .unwrap();

    agg.handle(event.clone());
    agg.handle(event);

    let state = agg.snapshot();
    assert_eq!(state.scoring_a.len(), 1);
    assert_eq!(
        state.scoring_a.entries()[0],
        TimestampEntry::new(Timestamp::from_seconds(86), CameraAngle::One)
    );
    assert_eq!(state.scoring_a.entries()[0].timestamp.to_string(), "1:26");
}

#[test]
fn test_set_size_counts_distinct_keys() {
    let mut agg = LiveAggregator::new();
    let events = [
        detection(false, 12_400, None, None),
        detection(false, 12_999, Some("A"), Some(1)),
        detection(false, 12_000, None, Some(2)),
        detection(false, 12_400, None, None),
        detection(false, 13_000, None, None),
    ];
    for event in events {
        agg.handle(event);
    }

    // 12.4s and 12.999s floor to the same second on angle 1.
    assert_eq!(
        keys(&agg, Bucket::Shooting, Team::A),
        vec!["0:12@1", "0:12@2", "0:13@1"]
    );
}

#[test]
fn test_same_time_on_both_angles_is_distinct() {
    let mut agg = LiveAggregator::new();
    agg.handle(detection(true, 30_000, Some("B"), Some(1)));
    agg.handle(detection(true, 30_000, Some("B"), Some(2)));
    assert_eq!(agg.snapshot().scoring_b.len(), 2);
}

#[test]
fn test_reordering_changes_presentation_only() {
    let events = vec![
        detection(true, 5_000, Some("A"), None),
        detection(false, 1_000, Some("B"), None),
        detection(true, 90_000, Some("A"), Some(2)),
        detection(true, 3_000, Some("A"), None),
    ];

    let mut forward = LiveAggregator::new();
    for event in events.clone() {
        forward.handle(event);
    }
    let mut backward = LiveAggregator::new();
    for event in events.into_iter().rev() {
        backward.handle(event);
    }

    let fwd = keys(&forward, Bucket::Scoring, Team::A);
    let bwd = keys(&backward, Bucket::Scoring, Team::A);
    assert_eq!(fwd, vec!["0:05@1", "1:30@2", "0:03@1"]);
    assert_eq!(bwd, vec!["0:03@1", "1:30@2", "0:05@1"]);

    let mut fwd_sorted = fwd;
    fwd_sorted.sort();
    let mut bwd_sorted = bwd;
    bwd_sorted.sort();
    assert_eq!(fwd_sorted, bwd_sorted);
}

#[test]
fn test_unknown_team_defaults_to_a() {
    let mut agg = LiveAggregator::new();
    agg.handle(detection(true, 1_000, Some(""), None));
    agg.handle(detection(true, 2_000, Some("C"), None));
    agg.handle(detection(true, 3_000, Some("b"), None));

    let counts = agg.snapshot().counts();
    assert_eq!(counts.scoring_a, 3);
    assert_eq!(counts.scoring_b, 0);
}

#[test]
fn test_connection_errors_keep_moments() {
    let mut agg = LiveAggregator::new();
    agg.handle(StreamEvent::Connect);
    agg.handle(detection(true, 1_000, None, None));
    agg.handle(StreamEvent::ConnectError("xhr poll error".to_string()));

    assert_eq!(
        agg.status(),
        ConnectionStatus::Errored("xhr poll error".to_string())
    );
    assert_eq!(agg.snapshot().scoring_a.len(), 1);
    assert!(!agg.is_finalized());
}

#[test]
fn test_counts_and_attempts() {
    let mut agg = LiveAggregator::new();
    agg.handle(detection(true, 1_000, Some("A"), None));
    agg.handle(detection(false, 2_000, Some("A"), None));
    agg.handle(detection(false, 3_000, Some("A"), None));
    agg.handle(detection(true, 4_000, Some("B"), None));

    let counts = agg.snapshot().counts();
    assert_eq!(counts.attempts(Team::A), 3);
    assert_eq!(counts.attempts(Team::B), 1);
}

#[tokio::test]
async fn test_consume_stops_at_finalization() {
    let (tx, rx) = mpsc::channel(8);
    let mut agg = LiveAggregator::new();
    let mut updates = agg.subscribe();

    let producer = tokio::spawn(async move {
        tx.send(StreamEvent::Connect).await.unwrap();
        tx.send(detection(true, 86_000, Some("A"), Some(1))).await.unwrap();
        tx.send(detection(true, 86_000, Some("A"), Some(1))).await.unwrap();
        tx.send(StreamEvent::ProcessingComplete(FinalStatistics(
            serde_json::json!({"attempts": 1, "makes": 1}),
        )))
        .await
        .unwrap();
        // The consumer has torn the stream down by now or will shortly.
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(detection(true, 99_000, Some("A"), Some(1))).await.is_err()
    });

    agg.consume(rx).await;

    assert!(producer.await.unwrap(), "stream should be closed after finalization");
    assert!(agg.is_finalized());
    assert_eq!(agg.snapshot().scoring_a.len(), 1);
    assert_eq!(
        agg.summary().map(|s| s.0),
        Some(serde_json::json!({"attempts": 1, "makes": 1}))
    );

    assert!(updates.has_changed().unwrap());
    let view = updates.borrow_and_update();
    assert!(view.finalized);
    assert_eq!(view.state.scoring_a.len(), 1);
}

#[tokio::test]
async fn test_consume_returns_when_sender_drops() {
    let (tx, rx) = mpsc::channel(8);
    let mut agg = LiveAggregator::new();

    tx.send(detection(false, 7_000, Some("B"), None)).await.unwrap();
    tx.send(StreamEvent::Disconnect).await.unwrap();
    drop(tx);

    agg.consume(rx).await;

    assert!(!agg.is_finalized());
    assert_eq!(agg.status(), ConnectionStatus::Disconnected);
    assert_eq!(agg.snapshot().shooting_b.len(), 1);
}
