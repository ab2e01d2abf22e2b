//! Deduplicated, insertion-ordered moment collections.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::events::{Bucket, ClassifiedEntry, Team, TimestampEntry};

/// An insertion-ordered set of entries keyed on `(timestamp, angle)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedEntrySet {
    entries: Vec<TimestampEntry>,
    seen: HashSet<TimestampEntry>,
}

impl OrderedEntrySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` unless its key is already present. Returns `true` when
    /// the entry was inserted.
    pub fn insert_if_absent(&mut self, entry: TimestampEntry) -> bool {
        if self.seen.insert(entry) {
            self.entries.push(entry);
            true
        } else {
            false
        }
    }

    /// Whether the key is present.
    pub fn contains(&self, entry: &TimestampEntry) -> bool {
        self.seen.contains(entry)
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[TimestampEntry] {
        &self.entries
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimestampEntry> {
        self.entries.iter()
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for OrderedEntrySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a OrderedEntrySet {
    type Item = &'a TimestampEntry;
    type IntoIter = std::slice::Iter<'a, TimestampEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The four moment collections, partitioned by bucket and team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationState {
    /// Made shots by team A.
    pub scoring_a: OrderedEntrySet,
    /// Made shots by team B.
    pub scoring_b: OrderedEntrySet,
    /// Missed attempts by team A.
    pub shooting_a: OrderedEntrySet,
    /// Missed attempts by team B.
    pub shooting_b: OrderedEntrySet,
}

/// Per-collection sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    /// Team A made shots.
    pub scoring_a: usize,
    /// Team B made shots.
    pub scoring_b: usize,
    /// Team A missed attempts.
    pub shooting_a: usize,
    /// Team B missed attempts.
    pub shooting_b: usize,
}

impl BucketCounts {
    /// Attempts by a team: made plus missed.
    pub const fn attempts(&self, team: Team) -> usize {
        match team {
            Team::A => self.scoring_a + self.shooting_a,
            Team::B => self.scoring_b + self.shooting_b,
        }
    }
}

impl AggregationState {
    /// Create empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collection for a bucket and team.
    pub const fn set(&self, bucket: Bucket, team: Team) -> &OrderedEntrySet {
        match (bucket, team) {
            (Bucket::Scoring, Team::A) => &self.scoring_a,
            (Bucket::Scoring, Team::B) => &self.scoring_b,
            (Bucket::Shooting, Team::A) => &self.shooting_a,
            (Bucket::Shooting, Team::B) => &self.shooting_b,
        }
    }

    const fn set_mut(&mut self, bucket: Bucket, team: Team) -> &mut OrderedEntrySet {
        match (bucket, team) {
            (Bucket::Scoring, Team::A) => &mut self.scoring_a,
            (Bucket::Scoring, Team::B) => &mut self.scoring_b,
            (Bucket::Shooting, Team::A) => &mut self.shooting_a,
            (Bucket::Shooting, Team::B) => &mut self.shooting_b,
        }
    }

    /// Insert a classified entry into its collection unless already present.
    pub fn insert(&mut self, classified: &ClassifiedEntry) -> bool {
        self.set_mut(classified.bucket, classified.team)
            .insert_if_absent(classified.entry)
    }

    /// Whether any collection holds the key.
    pub fn contains(&self, entry: &TimestampEntry) -> bool {
        [&self.scoring_a, &self.scoring_b, &self.shooting_a, &self.shooting_b]
            .iter()
            .any(|set| set.contains(entry))
    }

    /// Collection sizes.
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            scoring_a: self.scoring_a.len(),
            scoring_b: self.scoring_b.len(),
            shooting_a: self.shooting_a.len(),
            shooting_b: self.shooting_b.len(),
        }
    }

    /// Whether all collections are empty.
    pub fn is_empty(&self) -> bool {
        self.scoring_a.is_empty()
            && self.scoring_b.is_empty()
            && self.shooting_a.is_empty()
            && self.shooting_b.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CameraAngle;
    use crate::timestamp::Timestamp;

    fn entry(secs: u64, angle: CameraAngle) -> TimestampEntry {
        TimestampEntry::new(Timestamp::from_seconds(secs), angle)
    }

    #[test]
    fn test_insert_if_absent_keeps_first_order() {
        let mut set = OrderedEntrySet::new();
        assert!(set.insert_if_absent(entry(30, CameraAngle::One)));
        assert!(set.insert_if_absent(entry(10, CameraAngle::One)));
        assert!(!set.insert_if_absent(entry(30, CameraAngle::One)));
        let secs: Vec<u64> = set.iter().map(|e| e.timestamp.to_seconds()).collect();
        assert_eq!(secs, vec![30, 10]);
    }

    #[test]
    fn test_same_time_on_both_angles_is_distinct() {
        let mut set = OrderedEntrySet::new();
        assert!(set.insert_if_absent(entry(30, CameraAngle::One)));
        assert!(set.insert_if_absent(entry(30, CameraAngle::Two)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_counts_and_attempts() {
        let mut state = AggregationState::new();
        state.insert(&ClassifiedEntry {
            bucket: Bucket::Scoring,
            team: Team::A,
            entry: entry(1, CameraAngle::One),
        });
        state.insert(&ClassifiedEntry {
            bucket: Bucket::Shooting,
            team: Team::A,
            entry: entry(2, CameraAngle::One),
        });
        let counts = state.counts();
        assert_eq!(counts.scoring_a, 1);
        assert_eq!(counts.attempts(Team::A), 2);
        assert_eq!(counts.attempts(Team::B), 0);
    }
}
