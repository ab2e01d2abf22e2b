//! Configuration validation.

use crate::config::{Config, HighlightConfig, ServerConfig};
use crate::constants::highlight::{MAX_CLIP_DURATION_SECS, MIN_CLIP_DURATION_SECS};
use crate::error::{Error, Result};
use crate::report::endpoint_url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server(&config.server)?;
    validate_highlight(&config.highlight)?;
    Ok(())
}

/// Validate service endpoints.
fn validate_server(server: &ServerConfig) -> Result<()> {
    let url = endpoint_url(&server.base_url, &server.report_path)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            message: format!("base_url must use http or https, got '{}'", server.base_url),
        });
    }
    endpoint_url(&server.base_url, &server.upload_check_path)?;

    if server.connect_timeout_secs == 0 || server.request_timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            message: "server timeouts must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

/// Validate compilation settings.
fn validate_highlight(highlight: &HighlightConfig) -> Result<()> {
    check_clip_duration(highlight.clip_duration_secs)?;

    if highlight.max_parallel_extractions == 0 {
        return Err(Error::ConfigValidation {
            message: "max_parallel_extractions must be at least 1".to_string(),
        });
    }

    if highlight.ffmpeg_path.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            message: "ffmpeg_path must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Check a clip duration against the allowed range.
pub fn check_clip_duration(secs: u32) -> Result<()> {
    if !(MIN_CLIP_DURATION_SECS..=MAX_CLIP_DURATION_SECS).contains(&secs) {
        return Err(Error::ConfigValidation {
            message: format!(
                "clip_duration_secs must be between {MIN_CLIP_DURATION_SECS} and {MAX_CLIP_DURATION_SECS}, got {secs}"
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_duration() {
        let mut config = Config::default();
        config.highlight.clip_duration_secs = 0;
        assert!(validate_config(&config).is_err());

        config.highlight.clip_duration_secs = 61;
        assert!(validate_config(&config).is_err());

        config.highlight.clip_duration_secs = 60;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_zero_parallelism() {
        let mut config = Config::default();
        config.highlight.max_parallel_extractions = 0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = Config::default();
        config.server.base_url = "localhost 5000".to_string();
        assert!(validate_config(&config).is_err());

        config.server.base_url = "ftp://localhost".to_string();
        assert!(validate_config(&config).is_err());
    }
}
