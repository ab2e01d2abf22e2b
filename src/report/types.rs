//! Report service request and response types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Correlation token issued when footage is uploaded.
///
/// Opaque to this crate; assigned once per session and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Wrap a token, rejecting blank input.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidRunId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RunId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Body of a report rendering request.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest<'a> {
    /// Session the report belongs to.
    pub run_id: &'a RunId,
}

/// Response of the upload precondition check.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UploadCheckResponse {
    /// The file is already stored server-side.
    pub exists: bool,
}
