//! Live detection event aggregation.
//!
//! A single owner applies stream events in delivery order to four
//! deduplicated collections (scoring/shooting for team A/B). Observers receive
//! immutable snapshots through a watch channel.

mod live;
mod state;

pub use live::{AggregatorView, ConnectionStatus, EventOutcome, LiveAggregator};
pub use state::{AggregationState, BucketCounts, OrderedEntrySet};
