//! Spreadsheet-backed shortcut redirector.
//!
//! Requests such as `GET /team/docs` are resolved against a two-column
//! sheet (key, target URL) and answered with a redirect.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod sheets;
pub mod shortcuts;

pub use config::schema::RedirectorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use shortcuts::{PathResolver, RedirectTarget, Resolution, ShortcutTable};
