//! Google Sheets values client with timeout and retry handling.
//!
//! # Responsibilities
//! - Build the values URL for the configured spreadsheet and range
//! - Attach credentials (API key or bearer token)
//! - Enforce a per-attempt deadline and retry transient failures
//! - Convert the JSON value grid into raw rows

use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use tokio::time::timeout;
use url::Url;

use crate::config::{RedirectorConfig, SheetConfig};
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::sheets::source::{RowSource, SourceError, SourceResult};
use crate::shortcuts::cell::{row_from_json, RawRow};

/// Response body of `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    range: Option<String>,
    /// Omitted entirely when the range is empty.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Client for reading a single range of a spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    url: Url,
    bearer_token: Option<String>,
    attempt_timeout: Duration,
    retry: RetryPolicy,
}

impl SheetsClient {
    /// Create a client from the validated configuration.
    pub fn new(config: &RedirectorConfig) -> SourceResult<Self> {
        let url = values_url(&config.sheet)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("sheet-redirect/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url,
            bearer_token: config.sheet.bearer_token.clone(),
            attempt_timeout: Duration::from_secs(config.timeouts.fetch_secs),
            retry: RetryPolicy::from(&config.retries),
        })
    }

    /// Fetch the configured range, retrying transient failures.
    pub async fn fetch(&self) -> SourceResult<Vec<RawRow>> {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(rows) => {
                    metrics::record_fetch("ok", started);
                    return Ok(rows);
                }
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay(attempt);
                    tracing::warn!(attempt, delay = ?delay, error = %e, "Sheet fetch failed, retrying");
                    metrics::record_fetch_retry();
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Sheet fetch failed");
                    metrics::record_fetch("error", started);
                    return Err(e);
                }
            }
        }
    }

    async fn fetch_once(&self) -> SourceResult<Vec<RawRow>> {
        let mut request = self.http.get(self.url.clone());
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let secs = self.attempt_timeout.as_secs();
        let response = timeout(self.attempt_timeout, request.send())
            .await
            .map_err(|_| SourceError::Timeout(secs))??;

        let status = response.status();
        let body = timeout(self.attempt_timeout, response.text())
            .await
            .map_err(|_| SourceError::Timeout(secs))??;

        if !status.is_success() {
            return Err(SourceError::Status { status, body });
        }

        let range: ValueRange =
            serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        if range.values.is_empty() {
            tracing::info!(range = ?range.range, "No data found in sheet range");
        } else {
            tracing::debug!(range = ?range.range, rows = range.values.len(), "Sheet rows fetched");
        }

        Ok(range.values.into_iter().map(row_from_json).collect())
    }

    /// The values URL, with any API key redacted.
    pub fn display_url(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "key" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }
}

impl RowSource for SheetsClient {
    fn fetch_rows(&self) -> BoxFuture<'_, SourceResult<Vec<RawRow>>> {
        self.fetch().boxed()
    }

    fn describe(&self) -> String {
        self.display_url()
    }
}

/// `{endpoint}/v4/spreadsheets/{id}/values/{range}?key=...`
fn values_url(sheet: &SheetConfig) -> SourceResult<Url> {
    let mut url = Url::parse(&sheet.endpoint)
        .map_err(|e| SourceError::Config(format!("endpoint '{}': {}", sheet.endpoint, e)))?;

    url.path_segments_mut()
        .map_err(|_| SourceError::Config(format!("endpoint '{}' cannot be a base", sheet.endpoint)))?
        .pop_if_empty()
        .extend(["v4", "spreadsheets", sheet.spreadsheet_id.as_str(), "values", sheet.range.as_str()]);

    url.query_pairs_mut().append_pair("majorDimension", "ROWS");
    if let Some(key) = &sheet.api_key {
        url.query_pairs_mut().append_pair("key", key);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(endpoint: &str) -> SheetConfig {
        SheetConfig {
            spreadsheet_id: "abc123".into(),
            range: "Links!A:B".into(),
            api_key: Some("secret".into()),
            endpoint: endpoint.into(),
            ..SheetConfig::default()
        }
    }

    #[test]
    fn test_values_url() {
        let url = values_url(&sheet("https://sheets.googleapis.com")).unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc123/values/Links!A:B");
        assert!(url.query().unwrap().contains("key=secret"));
    }

    #[test]
    fn test_values_url_encodes_range_and_keeps_prefix() {
        let mut config = sheet("http://127.0.0.1:9999/proxy/");
        config.range = "My Sheet!A:B".into();
        let url = values_url(&config).unwrap();
        assert_eq!(url.path(), "/proxy/v4/spreadsheets/abc123/values/My%20Sheet!A:B");
    }

    #[test]
    fn test_display_url_redacts_key() {
        let mut config = RedirectorConfig::default();
        config.sheet = sheet("https://sheets.googleapis.com");
        let client = SheetsClient::new(&config).unwrap();
        let shown = client.display_url();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("key=***") || shown.contains("key=%2A%2A%2A"));
    }

    #[test]
    fn test_value_range_without_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range":"Sheet1!A1:B1000","majorDimension":"ROWS"}"#).unwrap();
        assert!(range.values.is_empty());
    }
}
