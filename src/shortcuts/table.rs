//! Shortcut table construction.
//!
//! # Responsibilities
//! - Turn raw sheet rows into a key → target map
//! - Fold keys to lowercase
//! - Parse targets once, at build time
//! - Report malformed targets and duplicate keys as diagnostics
//!
//! # Design Decisions
//! - A bad row never fails the build; it is skipped
//! - Duplicate keys: last write wins
//! - Immutable after `finish()`

use std::collections::HashMap;
use std::fmt;

use crate::shortcuts::cell::RawRow;
use crate::shortcuts::target::{RedirectTarget, TargetError};

/// Non-fatal findings collected while building a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The target cell did not parse as a URL reference; the row was skipped.
    InvalidTarget {
        row: usize,
        key: String,
        value: String,
        error: TargetError,
    },
    /// A later row replaced the target of an earlier one.
    DuplicateKey {
        row: usize,
        key: String,
        previous: RedirectTarget,
        replacement: RedirectTarget,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidTarget { row, key, value, error } => write!(
                f,
                "row {}: skipping shortcut '{}': cannot parse '{}' ({})",
                row, key, value, error
            ),
            Diagnostic::DuplicateKey { row, key, previous, replacement } => write!(
                f,
                "row {}: shortcut '{}' redefined, '{}' replaces '{}'",
                row, key, replacement, previous
            ),
        }
    }
}

/// Normalized mapping from shortcut key to redirect target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutTable {
    entries: HashMap<String, RedirectTarget>,
}

impl ShortcutTable {
    /// Build a table from rows, discarding diagnostics after logging them.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRow>,
    {
        build(rows).table
    }

    /// Exact lookup. Callers are responsible for case folding.
    pub fn get(&self, key: &str) -> Option<&RedirectTarget> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RedirectTarget)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Result of a full build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub table: ShortcutTable,
    pub diagnostics: Vec<Diagnostic>,
    /// Rows dropped for structural reasons (short row, non-string or empty cell)
    /// or an unparsable target.
    pub skipped: usize,
}

/// Incremental table builder.
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: HashMap<String, RedirectTarget>,
    diagnostics: Vec<Diagnostic>,
    skipped: usize,
    rows_seen: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next row. Row numbers in diagnostics are 1-based, matching
    /// what a person sees in the spreadsheet.
    pub fn push_row(&mut self, row: &RawRow) {
        self.rows_seen += 1;
        let row_number = self.rows_seen;

        if row.len() < 2 {
            self.skipped += 1;
            return;
        }

        let (Some(key), Some(value)) = (row[0].as_non_empty_str(), row[1].as_non_empty_str()) else {
            tracing::debug!(
                row = row_number,
                key_kind = row[0].kind(),
                value_kind = row[1].kind(),
                "Skipping row without string key and target"
            );
            self.skipped += 1;
            return;
        };

        let key = key.to_lowercase();

        let target = match RedirectTarget::parse(value) {
            Ok(target) => target,
            Err(error) => {
                self.skipped += 1;
                self.emit(Diagnostic::InvalidTarget {
                    row: row_number,
                    key,
                    value: value.to_string(),
                    error,
                });
                return;
            }
        };

        if let Some(previous) = self.entries.insert(key.clone(), target.clone()) {
            self.emit(Diagnostic::DuplicateKey {
                row: row_number,
                key,
                previous,
                replacement: target,
            });
        }
    }

    /// Freeze the table.
    pub fn finish(self) -> BuildReport {
        tracing::debug!(
            rows = self.rows_seen,
            entries = self.entries.len(),
            skipped = self.skipped,
            diagnostics = self.diagnostics.len(),
            "Shortcut table built"
        );

        BuildReport {
            table: ShortcutTable { entries: self.entries },
            diagnostics: self.diagnostics,
            skipped: self.skipped,
        }
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Build a shortcut table from rows in input order.
pub fn build<I>(rows: I) -> BuildReport
where
    I: IntoIterator<Item = RawRow>,
{
    let mut builder = TableBuilder::new();
    for row in rows {
        builder.push_row(&row);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::cell::Cell;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn test_valid_rows_fold_keys() {
        let report = build(vec![
            row(&["Docs", "https://example.com/docs"]),
            row(&["team/Sub", "/wiki/team"]),
        ]);

        assert_eq!(report.table.len(), 2);
        assert_eq!(
            report.table.get("docs").map(|t| t.as_str()),
            Some("https://example.com/docs")
        );
        assert_eq!(report.table.get("team/sub").map(|t| t.as_str()), Some("/wiki/team"));
        assert!(report.table.get("Docs").is_none());
        assert!(report.diagnostics.is_empty());

        let mut keys: Vec<&str> = report.table.iter().map(|(key, _)| key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["docs", "team/sub"]);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let report = build(vec![vec![], row(&["lonely"]), row(&["ok", "https://ok.example"])]);
        assert_eq!(report.table.len(), 1);
        assert_eq!(report.skipped, 2);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_non_string_cells_are_skipped() {
        let report = build(vec![
            vec![Cell::Number(7.0), Cell::from("https://example.com")],
            vec![Cell::from("flag"), Cell::Bool(true)],
            vec![Cell::from(""), Cell::from("https://example.com")],
            vec![Cell::from("empty"), Cell::from("")],
            vec![Cell::Null, Cell::Other],
        ]);
        assert!(report.table.is_empty());
        assert_eq!(report.skipped, 5);
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let report = build(vec![vec![
            Cell::from("wiki"),
            Cell::from("https://wiki.example"),
            Cell::Number(3.0),
        ]]);
        assert!(report.table.contains_key("wiki"));
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let report = build(vec![
            row(&["Docs", "https://example.com/docs"]),
            row(&["docs", "https://example.com/docs2"]),
        ]);

        assert_eq!(report.table.len(), 1);
        assert_eq!(
            report.table.get("docs").map(|t| t.as_str()),
            Some("https://example.com/docs2")
        );
        assert_eq!(report.diagnostics.len(), 1);
        match &report.diagnostics[0] {
            Diagnostic::DuplicateKey { row, key, .. } => {
                assert_eq!(*row, 2);
                assert_eq!(key, "docs");
            }
            other => panic!("unexpected diagnostic: {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_target_is_skipped_with_diagnostic() {
        let report = build(vec![row(&["x", "not a url with spaces and no scheme???"])]);
        assert!(!report.table.contains_key("x"));
        assert_eq!(report.skipped, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].to_string().contains("'x'"));
    }

    #[test]
    fn test_bad_row_does_not_shadow_earlier_entry() {
        let report = build(vec![
            row(&["x", "https://good.example"]),
            row(&["X", "not a url with spaces"]),
        ]);
        assert_eq!(report.table.get("x").map(|t| t.as_str()), Some("https://good.example/"));
    }
}
