//! Game-clock timestamp codec.
//!
//! Timestamps are whole-second offsets into a recording. They are displayed in
//! a compact elapsed form (`M:SS`, or `H:MM:SS` once an hour has passed) and
//! two timestamps are equal exactly when that rendered form is equal, which
//! makes the second count the canonical key.
//!
//! Two parsers exist on purpose:
//! - [`Timestamp::parse`] validates clock-style user input (`HH:MM:SS` with
//!   hours 00-23, or `MM:SS`), always zero padded.
//! - [`Timestamp::parse_elapsed`] accepts the displayed elapsed form produced
//!   by [`Timestamp::from_millis`], where hours are unbounded and unpadded.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;

/// Maximum hour accepted from clock-style user input.
const MAX_CLOCK_HOUR: u64 = 23;

/// A whole-second offset into a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: u64,
}

impl Timestamp {
    /// Build a timestamp from a whole-second offset.
    pub const fn from_seconds(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Build a timestamp from a millisecond offset, flooring to whole seconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self {
            seconds: ms / 1000,
        }
    }

    /// Parse clock-style user input.
    ///
    /// Accepts `HH:MM:SS` (00-23 : 00-59 : 00-59) or `MM:SS` (00-59 : 00-59).
    /// Every field must be exactly two digits.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidTimestamp {
            value: raw.to_string(),
        };

        let fields: Vec<&str> = raw.split(':').collect();
        let values = fields
            .iter()
            .map(|f| two_digit_field(f))
            .collect::<Option<Vec<u64>>>()
            .ok_or_else(invalid)?;

        match values.as_slice() {
            [h, m, s] if *h <= MAX_CLOCK_HOUR && *m < 60 && *s < 60 => {
                Ok(Self::from_seconds(h * SECS_PER_HOUR + m * SECS_PER_MINUTE + s))
            }
            [m, s] if *m < 60 && *s < 60 => Ok(Self::from_seconds(m * SECS_PER_MINUTE + s)),
            _ => Err(invalid()),
        }
    }

    /// Parse the displayed elapsed form (`M:SS` or `H:MM:SS`).
    ///
    /// The leading field may have any number of digits; trailing fields are two
    /// digits below 60. Clock-style input such as `05:30` or `01:02:03` is
    /// accepted as well, so any string [`Timestamp::parse`] accepts is also
    /// accepted here.
    pub fn parse_elapsed(raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidTimestamp {
            value: raw.to_string(),
        };

        let fields: Vec<&str> = raw.split(':').collect();
        let (lead, rest) = fields.split_first().ok_or_else(invalid)?;
        if lead.is_empty() || !lead.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let lead: u64 = lead.parse().map_err(|_| invalid())?;
        let rest = rest
            .iter()
            .map(|f| two_digit_field(f).filter(|v| *v < 60))
            .collect::<Option<Vec<u64>>>()
            .ok_or_else(invalid)?;

        let seconds = match rest.as_slice() {
            [m, s] => lead
                .checked_mul(SECS_PER_HOUR)
                .and_then(|h| h.checked_add(m * SECS_PER_MINUTE + s)),
            [s] if lead < 60 => Some(lead * SECS_PER_MINUTE + s),
            _ => None,
        };

        seconds.map(Self::from_seconds).ok_or_else(invalid)
    }

    /// Total whole seconds.
    pub const fn to_seconds(self) -> u64 {
        self.seconds
    }

    /// Hour-bearing form `HH:MM:SS`, used where a uniform representation is
    /// required (boundary configuration), never as an aggregation key.
    pub fn normalize_to_full(self) -> String {
        let (h, m, s) = self.split();
        format!("{h:02}:{m:02}:{s:02}")
    }

    /// Compare by elapsed seconds.
    pub fn compare(self, other: Self) -> Ordering {
        self.seconds.cmp(&other.seconds)
    }

    const fn split(self) -> (u64, u64, u64) {
        (
            self.seconds / SECS_PER_HOUR,
            (self.seconds % SECS_PER_HOUR) / SECS_PER_MINUTE,
            self.seconds % SECS_PER_MINUTE,
        )
    }
}

/// Parse a field of exactly two ASCII digits.
fn two_digit_field(field: &str) -> Option<u64> {
    if field.len() == 2 && field.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.split();
        if h > 0 {
            write!(f, "{h}:{m:02}:{s:02}")
        } else {
            write!(f, "{m}:{s:02}")
        }
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_elapsed(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_elapsed(&raw).map_err(serde::de::Error::custom)
    }
}
