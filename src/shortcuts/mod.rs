//! Shortcut resolution engine.
//!
//! # Data Flow
//! ```text
//! Sheet rows (cell[0] = key, cell[1] = target)
//!     → cell.rs (type-checked cell values)
//!     → table.rs (fold keys, parse targets, last write wins)
//!     → ShortcutTable (immutable, per request)
//!     → resolver.rs (longest-prefix match on path segments)
//!     → Return: RedirectTarget or NotFound
//! ```
//!
//! # Design Decisions
//! - Tables are rebuilt for every request and never shared
//! - Row problems are diagnostics, never errors
//! - NotFound is a normal result, not an error

pub mod cell;
pub mod resolver;
pub mod table;
pub mod target;

pub use cell::{Cell, RawRow};
pub use resolver::{resolve, MatchOptions, PathResolver, Resolution};
pub use table::{build, BuildReport, Diagnostic, ShortcutTable, TableBuilder};
pub use target::{RedirectTarget, TargetError};
