//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides)
//!     → validation.rs (semantic checks)
//!     → RedirectorConfig (validated, immutable)
//!     → passed by reference to the server and the sheet client
//! ```
//!
//! # Design Decisions
//! - Config is built once at startup; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::RedirectorConfig;
pub use schema::ListenerConfig;
pub use schema::SheetConfig;
pub use schema::ResolverConfig;
pub use schema::TimeoutConfig;
pub use schema::RetryConfig;
pub use schema::ObservabilityConfig;
