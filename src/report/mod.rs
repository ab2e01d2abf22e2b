//! Report service boundary.
//!
//! The analysis service renders the statistics report for a run and answers
//! whether an upload already exists. Both are plain HTTP requests against the
//! `[server]` endpoints from the configuration.

mod client;
mod types;

pub use client::{ReportClient, endpoint_url};
pub use types::{ReportRequest, RunId, UploadCheckResponse};
