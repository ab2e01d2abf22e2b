//! Match setup: court layout and period boundaries.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::timestamp::Timestamp;

/// Start of the first quarter when none is given.
const DEFAULT_FIRST_QUARTER: &str = "00:00";

/// Answers describing how a game was recorded, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSetup {
    /// Both half courts were filmed, one recording each.
    pub full_court: bool,
    /// Teams changed sides during the game.
    pub sides_switched: bool,
    /// When the sides changed (clock form).
    pub switch_time: Option<String>,
    /// Start of each quarter (clock form). Blank entries are skipped.
    pub quarter_starts: Vec<String>,
}

/// Validated setup with boundaries in full `HH:MM:SS` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSetup {
    /// Both half courts were filmed.
    pub full_court: bool,
    /// A second camera angle must be supplied before compiling.
    pub requires_second_angle: bool,
    /// Switch boundary, when sides changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_time: Option<String>,
    /// Quarter boundaries in input order.
    pub quarter_starts: Vec<String>,
}

impl MatchSetup {
    /// Whether compilation needs the other half court's recording.
    pub const fn requires_second_angle(&self) -> bool {
        self.full_court
    }

    /// Check every boundary against the strict clock format.
    pub fn validate(&self) -> Result<()> {
        self.parse_boundaries().map(|_| ())
    }

    /// Validate and render boundaries for downstream configuration.
    pub fn normalized(&self) -> Result<NormalizedSetup> {
        let (switch_time, quarters) = self.parse_boundaries()?;
        Ok(NormalizedSetup {
            full_court: self.full_court,
            requires_second_angle: self.requires_second_angle(),
            switch_time: switch_time.map(Timestamp::normalize_to_full),
            quarter_starts: quarters.into_iter().map(Timestamp::normalize_to_full).collect(),
        })
    }

    fn parse_boundaries(&self) -> Result<(Option<Timestamp>, Vec<Timestamp>)> {
        let switch_time = if self.sides_switched {
            let raw = self
                .switch_time
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::InvalidMatchSetup {
                    message: "a switch time is required when teams switched sides".to_string(),
                })?;
            Some(Timestamp::parse(raw)?)
        } else {
            None
        };

        let mut quarters = self
            .quarter_starts
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(Timestamp::parse)
            .collect::<Result<Vec<_>>>()?;
        if quarters.is_empty() {
            quarters.push(Timestamp::parse(DEFAULT_FIRST_QUARTER)?);
        }

        Ok((switch_time, quarters))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn setup(quarters: &[&str]) -> MatchSetup {
        MatchSetup {
            quarter_starts: quarters.iter().map(ToString::to_string).collect(),
            ..MatchSetup::default()
        }
    }

    #[test]
    fn test_normalized_promotes_short_form() {
        let normalized = setup(&["00:00", "12:30", "01:05:00"]).normalized().unwrap();
        assert_eq!(
            normalized.quarter_starts,
            vec!["00:00:00", "00:12:30", "01:05:00"]
        );
        assert!(normalized.switch_time.is_none());
    }

    #[test]
    fn test_blank_quarters_skipped() {
        let normalized = setup(&["", "10:00", "  "]).normalized().unwrap();
        assert_eq!(normalized.quarter_starts, vec!["00:10:00"]);
    }

    #[test]
    fn test_default_first_quarter() {
        let normalized = setup(&[]).normalized().unwrap();
        assert_eq!(normalized.quarter_starts, vec!["00:00:00"]);
    }

    #[test]
    fn test_rejects_unpadded_quarter() {
        let result = setup(&["1:00"]).validate();
        assert!(matches!(result, Err(Error::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_rejects_clock_hour_over_23() {
        assert!(setup(&["24:00:00"]).validate().is_err());
    }

    #[test]
    fn test_switched_requires_switch_time() {
        let mut s = setup(&["00:00"]);
        s.sides_switched = true;
        assert!(matches!(s.validate(), Err(Error::InvalidMatchSetup { .. })));

        s.switch_time = Some("20:00".to_string());
        let normalized = s.normalized().unwrap();
        assert_eq!(normalized.switch_time.as_deref(), Some("00:20:00"));
    }

    #[test]
    fn test_switch_time_ignored_when_not_switched() {
        let mut s = setup(&["00:00"]);
        s.switch_time = Some("garbage".to_string());
        assert!(s.normalized().unwrap().switch_time.is_none());
    }

    #[test]
    fn test_full_court_requires_second_angle() {
        let mut s = setup(&["00:00"]);
        s.full_court = true;
        assert!(s.normalized().unwrap().requires_second_angle);
    }
}
