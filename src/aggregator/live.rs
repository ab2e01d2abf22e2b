//! Live aggregation of the detection stream.

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::AggregationState;
use crate::error::Error;
use crate::events::{DetectionEvent, FinalStatistics, StreamEvent, classify};

/// Liveness of the upstream stream, for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No connection has been reported yet.
    #[default]
    Pending,
    /// Stream is connected.
    Connected,
    /// Stream dropped; aggregated moments stay valid.
    Disconnected,
    /// Connection attempt failed; the transport retries.
    Errored(String),
}

impl ConnectionStatus {
    /// The non-fatal stream error this status reports, if any.
    pub fn error(&self) -> Option<Error> {
        match self {
            Self::Disconnected => Some(Error::StreamDisconnected),
            Self::Errored(message) => Some(Error::Upstream {
                message: message.clone(),
            }),
            Self::Pending | Self::Connected => None,
        }
    }
}

/// What happened to a delivered detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A new moment was recorded.
    Inserted,
    /// The `(timestamp, angle)` key was already present.
    Duplicate,
    /// Delivered after finalization and dropped.
    Ignored,
}

/// Everything an observer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatorView {
    /// The four moment collections.
    pub state: AggregationState,
    /// Whether processing has completed.
    pub finalized: bool,
    /// Upstream liveness.
    pub status: ConnectionStatus,
    /// Final statistics, once delivered.
    pub summary: Option<FinalStatistics>,
}

/// Owns the aggregation state and applies stream events in delivery order.
///
/// The current view lives in the watch channel itself; mutations edit it in
/// place and only notify subscribers when something changed.
pub struct LiveAggregator {
    publisher: watch::Sender<AggregatorView>,
}

impl Default for LiveAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveAggregator {
    /// Create an aggregator with empty collections.
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(AggregatorView::default());
        Self { publisher }
    }

    /// Subscribe to snapshots. Each change is published to every receiver.
    pub fn subscribe(&self) -> watch::Receiver<AggregatorView> {
        self.publisher.subscribe()
    }

    /// Current collections, in first-detected order.
    pub fn snapshot(&self) -> AggregationState {
        self.publisher.borrow().state.clone()
    }

    /// Copy of the current full view.
    pub fn view(&self) -> AggregatorView {
        self.publisher.borrow().clone()
    }

    /// Whether processing has completed.
    pub fn is_finalized(&self) -> bool {
        self.publisher.borrow().finalized
    }

    /// Upstream liveness.
    pub fn status(&self) -> ConnectionStatus {
        self.publisher.borrow().status.clone()
    }

    /// Final statistics, if delivered.
    pub fn summary(&self) -> Option<FinalStatistics> {
        self.publisher.borrow().summary.clone()
    }

    /// Apply one stream message.
    pub fn handle(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Connect => self.set_status(ConnectionStatus::Connected),
            StreamEvent::Disconnect => {
                info!("Event stream disconnected; keeping {} moments", self.total());
                self.set_status(ConnectionStatus::Disconnected);
            }
            StreamEvent::ConnectError(message) => {
                warn!("Event stream connection error: {message}");
                self.set_status(ConnectionStatus::Errored(message));
            }
            StreamEvent::ShootingDetected(detection) => {
                self.on_event(&detection);
            }
            StreamEvent::ProcessingComplete(summary) => self.on_finalized(summary),
        }
    }

    /// Classify a detection and record it unless its key is already present.
    pub fn on_event(&mut self, event: &DetectionEvent) -> EventOutcome {
        if self.is_finalized() {
            warn!(
                "Ignoring detection at {}ms after processing completed",
                event.start_time
            );
            return EventOutcome::Ignored;
        }

        let classified = classify(event);
        if self
            .publisher
            .send_if_modified(|view| view.state.insert(&classified))
        {
            debug!(
                "Recorded {:?} moment for team {} at {}",
                classified.bucket, classified.team, classified.entry
            );
            EventOutcome::Inserted
        } else {
            debug!("Absorbed duplicate delivery of {}", classified.entry);
            EventOutcome::Duplicate
        }
    }

    /// Mark processing complete and store the statistics payload verbatim.
    pub fn on_finalized(&mut self, summary: FinalStatistics) {
        let total = self.total();
        let applied = self.publisher.send_if_modified(|view| {
            if view.finalized {
                return false;
            }
            view.finalized = true;
            view.summary = Some(summary);
            true
        });

        if applied {
            info!("Processing complete with {total} moments");
        } else {
            warn!("Ignoring repeated processing_complete");
        }
    }

    /// Drive the aggregator from a channel until processing completes or the
    /// sender side goes away. The receiver is dropped on return, tearing the
    /// stream down.
    pub async fn consume(&mut self, mut events: mpsc::Receiver<StreamEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
            if self.is_finalized() {
                break;
            }
        }
        events.close();
        debug!("Event stream consumer stopped");
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        self.publisher.send_if_modified(|view| {
            if view.status == status {
                return false;
            }
            view.status = status;
            true
        });
    }

    fn total(&self) -> usize {
        let counts = self.publisher.borrow().state.counts();
        counts.scoring_a + counts.scoring_b + counts.shooting_a + counts.shooting_b
    }
}
