//! Tabular data source for the shortcut table.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → RowSource::fetch_rows (fresh read on every request)
//!         → client.rs: GET /v4/spreadsheets/{id}/values/{range}
//!         → timeout + retry with backoff on transient failures
//!     → Vec<RawRow> handed to the table builder
//! ```
//!
//! # Design Decisions
//! - No caching: every resolution sees the sheet as it is now
//! - Credentials are passed in pre-issued (API key or bearer token);
//!   obtaining them is outside this crate
//! - `RowSource` is a trait object so tests can swap in static rows

pub mod client;
pub mod source;

pub use client::SheetsClient;
pub use source::{RowSource, SourceError, SourceResult, StaticRows};
