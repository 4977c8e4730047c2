//! Row source abstraction and error types.

use futures_util::future::{self, BoxFuture, FutureExt};
use thiserror::Error;

use crate::resilience::retries::is_retryable_status;
use crate::shortcuts::RawRow;

/// Errors raised while fetching rows from the data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or protocol failure talking to the source.
    #[error("sheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("sheet source returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A single attempt exceeded its deadline.
    #[error("sheet fetch timed out after {0} seconds")]
    Timeout(u64),

    /// The response body was not a values range.
    #[error("invalid sheet response: {0}")]
    Decode(String),

    /// The client could not be built from configuration.
    #[error("invalid sheet configuration: {0}")]
    Config(String),
}

impl SourceError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Http(e) => !e.is_builder() && !e.is_decode(),
            SourceError::Status { status, .. } => is_retryable_status(*status),
            SourceError::Timeout(_) => true,
            SourceError::Decode(_) | SourceError::Config(_) => false,
        }
    }
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Anything that can produce the raw rows of a shortcut sheet.
pub trait RowSource: Send + Sync {
    /// Fetch the current rows. Called once per resolution.
    fn fetch_rows(&self) -> BoxFuture<'_, SourceResult<Vec<RawRow>>>;

    /// Human-readable identity for logs.
    fn describe(&self) -> String;
}

/// Fixed in-memory rows.
#[derive(Debug, Clone, Default)]
pub struct StaticRows {
    rows: Vec<RawRow>,
}

impl StaticRows {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl RowSource for StaticRows {
    fn fetch_rows(&self) -> BoxFuture<'_, SourceResult<Vec<RawRow>>> {
        future::ready(Ok(self.rows.clone())).boxed()
    }

    fn describe(&self) -> String {
        format!("static ({} rows)", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::Cell;

    #[tokio::test]
    async fn test_static_rows() {
        let source = StaticRows::new(vec![vec![Cell::from("a"), Cell::from("/b")]]);
        let rows = source.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(source.describe(), "static (1 rows)");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(SourceError::Timeout(5).is_retryable());
        assert!(SourceError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        }
        .is_retryable());
        assert!(!SourceError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: String::new(),
        }
        .is_retryable());
        assert!(!SourceError::Decode("bad".into()).is_retryable());
    }
}
