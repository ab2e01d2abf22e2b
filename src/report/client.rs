//! HTTP client for the analysis service's report endpoints.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Url};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::{ReportRequest, RunId, UploadCheckResponse};
use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Client for report rendering and upload precondition checks.
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: Client,
    report_url: Url,
    upload_check_url: Url,
}

impl ReportClient {
    /// Build a client from the `[server]` configuration.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Internal {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            report_url: endpoint_url(&config.base_url, &config.report_path)?,
            upload_check_url: endpoint_url(&config.base_url, &config.upload_check_path)?,
        })
    }

    /// Report rendering endpoint.
    pub const fn report_url(&self) -> &Url {
        &self.report_url
    }

    /// Upload check endpoint for `filename`.
    pub fn upload_check_url(&self, filename: &str) -> Url {
        let mut url = self.upload_check_url.clone();
        url.query_pairs_mut().append_pair("filename", filename);
        url
    }

    /// Ask the service to render the report for `run_id` and return the
    /// document bytes.
    pub async fn request_report(&self, run_id: &RunId) -> Result<Vec<u8>> {
        let response = self.send_report_request(run_id).await?;
        let url = self.report_url.as_str();

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| report_error(url, e))?;
            body.extend_from_slice(&chunk);
        }

        info!("Received report for run {run_id} ({} bytes)", body.len());
        Ok(body)
    }

    /// Like [`ReportClient::request_report`], streaming the document to
    /// `dest`. Returns the number of bytes written.
    pub async fn download_report(&self, run_id: &RunId, dest: &Path) -> Result<u64> {
        let response = self.send_report_request(run_id).await?;
        let url = self.report_url.as_str();

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| report_error(url, e))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!(
            "Saved report for run {run_id} to {} ({written} bytes)",
            dest.display()
        );
        Ok(written)
    }

    /// Whether `filename` is already stored server-side.
    pub async fn upload_exists(&self, filename: &str) -> Result<bool> {
        let url = self.upload_check_url(filename);
        debug!("GET {url}");

        let upload_error = |e: reqwest::Error| Error::UploadCheckFailed {
            url: url.to_string(),
            source: Box::new(e),
        };

        let response = self.http.get(url.clone()).send().await.map_err(upload_error)?;
        if !response.status().is_success() {
            return Err(Error::UploadCheckFailed {
                url: url.to_string(),
                source: format!("HTTP {}", response.status()).into(),
            });
        }

        let check: UploadCheckResponse = response.json().await.map_err(upload_error)?;
        Ok(check.exists)
    }

    async fn send_report_request(&self, run_id: &RunId) -> Result<reqwest::Response> {
        let url = self.report_url.as_str();
        debug!("POST {url} for run {run_id}");

        let response = self
            .http
            .post(self.report_url.clone())
            .json(&ReportRequest { run_id })
            .send()
            .await
            .map_err(|e| report_error(url, e))?;

        if !response.status().is_success() {
            return Err(Error::ReportRequestFailed {
                url: url.to_string(),
                source: format!("HTTP {}", response.status()).into(),
            });
        }

        Ok(response)
    }
}

fn report_error(url: &str, e: reqwest::Error) -> Error {
    Error::ReportRequestFailed {
        url: url.to_string(),
        source: Box::new(e),
    }
}

/// Join a base URL and an endpoint path.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| Error::ConfigValidation {
        message: format!("invalid server URL '{joined}': {e}"),
    })
}
