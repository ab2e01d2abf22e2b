//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::config::check_clip_duration;
use crate::events::TimestampEntry;
use crate::report::RunId;
use crate::selection::parse_entry_arg;

/// Parse and validate a clip duration in seconds.
pub fn parse_clip_duration(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number of seconds"))?;

    check_clip_duration(value).map_err(|e| e.to_string())?;
    Ok(value)
}

/// Parse a worker count (at least 1).
pub fn parse_parallelism(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("parallelism must be at least 1".to_string());
    }

    Ok(value)
}

/// Parse a `M:SS[@angle]` selection entry.
pub fn parse_entry(s: &str) -> Result<TimestampEntry, String> {
    parse_entry_arg(s).map_err(|e| e.to_string())
}

/// Parse a run identifier.
pub fn parse_run_id(s: &str) -> Result<RunId, String> {
    RunId::new(s).map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::events::CameraAngle;

    #[test]
    fn test_parse_clip_duration_valid() {
        assert_eq!(parse_clip_duration("5").ok(), Some(5));
        assert_eq!(parse_clip_duration("1").ok(), Some(1));
        assert_eq!(parse_clip_duration("60").ok(), Some(60));
    }

    #[test]
    fn test_parse_clip_duration_invalid() {
        assert!(parse_clip_duration("0").is_err());
        assert!(parse_clip_duration("61").is_err());
        let err = parse_clip_duration("abc").unwrap_err();
        assert!(err.contains("not a valid number"));
    }

    #[test]
    fn test_parse_parallelism() {
        assert_eq!(parse_parallelism("4").ok(), Some(4));
        assert!(parse_parallelism("0").is_err());
    }

    #[test]
    fn test_parse_entry() {
        let entry = parse_entry("1:26@2").unwrap();
        assert_eq!(entry.timestamp.to_seconds(), 86);
        assert_eq!(entry.angle, CameraAngle::Two);
        assert!(parse_entry("1:26@3").is_err());
    }

    #[test]
    fn test_parse_run_id() {
        assert!(parse_run_id("abc").is_ok());
        assert!(parse_run_id(" ").is_err());
    }
}
