//! Longest-prefix path resolution.
//!
//! # Responsibilities
//! - Strip one leading separator from the request path
//! - Try the full path, then drop trailing segments one at a time
//! - Return the first hit, or an explicit `NotFound`
//!
//! # Design Decisions
//! - A flat table serves hierarchical routing: `team` catches
//!   `team/anything/else` unless a longer key is registered
//! - The empty path is looked up literally as key `""`
//! - Case folding of the request path is opt-in via `MatchOptions`

use crate::shortcuts::table::ShortcutTable;
use crate::shortcuts::target::RedirectTarget;

const SEPARATOR: char = '/';

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found {
        /// The table key that matched.
        key: String,
        target: &'a RedirectTarget,
    },
    NotFound,
}

impl<'a> Resolution<'a> {
    pub fn target(&self) -> Option<&'a RedirectTarget> {
        match self {
            Resolution::Found { target, .. } => Some(target),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }
}

/// Matching behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Lowercase the request path before lookup, mirroring the folding
    /// applied to table keys.
    pub fold_case: bool,
}

/// Resolves request paths against a shortcut table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver {
    options: MatchOptions,
}

impl PathResolver {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// Resolve `path` against `table`.
    pub fn resolve<'a>(&self, table: &'a ShortcutTable, path: &str) -> Resolution<'a> {
        if self.options.fold_case {
            resolve(table, &path.to_lowercase())
        } else {
            resolve(table, path)
        }
    }
}

/// Case-sensitive longest-prefix match.
pub fn resolve<'a>(table: &'a ShortcutTable, path: &str) -> Resolution<'a> {
    let path = path.strip_prefix(SEPARATOR).unwrap_or(path);
    let mut segments: Vec<&str> = path.split(SEPARATOR).collect();

    while !segments.is_empty() {
        let candidate = segments.join("/");
        if let Some(target) = table.get(&candidate) {
            tracing::trace!(path = %path, key = %candidate, "Shortcut matched");
            return Resolution::Found {
                key: candidate,
                target,
            };
        }
        segments.pop();
    }

    Resolution::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::cell::Cell;

    fn table(pairs: &[(&str, &str)]) -> ShortcutTable {
        ShortcutTable::from_rows(
            pairs
                .iter()
                .map(|(k, v)| vec![Cell::from(*k), Cell::from(*v)]),
        )
    }

    fn hierarchy() -> ShortcutTable {
        table(&[
            ("team/subteam", "https://example.com/t1"),
            ("team", "https://example.com/t2"),
        ])
    }

    #[test]
    fn test_exact_match() {
        let table = hierarchy();
        let res = resolve(&table, "team/subteam");
        assert_eq!(res.target().map(|t| t.as_str()), Some("https://example.com/t1"));
    }

    #[test]
    fn test_falls_back_to_shorter_prefix() {
        let table = hierarchy();
        let res = resolve(&table, "team/subteam/extra");
        assert_eq!(res.target().map(|t| t.as_str()), Some("https://example.com/t1"));

        let res = resolve(&table, "team/other/extra");
        match res {
            Resolution::Found { key, target } => {
                assert_eq!(key, "team");
                assert_eq!(target.as_str(), "https://example.com/t2");
            }
            Resolution::NotFound => panic!("expected fallback to 'team'"),
        }
    }

    #[test]
    fn test_unknown_path() {
        let table = hierarchy();
        assert_eq!(resolve(&table, "other"), Resolution::NotFound);
        assert_eq!(resolve(&table, "/other/team"), Resolution::NotFound);
    }

    #[test]
    fn test_strips_single_leading_separator() {
        let table = hierarchy();
        assert!(resolve(&table, "/team/subteam").is_found());
        // Only one separator is stripped; "//team" leaves an empty first segment.
        assert!(!resolve(&table, "//team").is_found());
    }

    #[test]
    fn test_empty_path_on_empty_table() {
        let table = ShortcutTable::default();
        assert_eq!(resolve(&table, ""), Resolution::NotFound);
        assert_eq!(resolve(&table, "/"), Resolution::NotFound);
    }

    #[test]
    fn test_trailing_separator_falls_back() {
        let table = hierarchy();
        let res = resolve(&table, "team/");
        assert_eq!(res.target().map(|t| t.as_str()), Some("https://example.com/t2"));
    }

    #[test]
    fn test_case_handling() {
        let table = hierarchy();
        assert!(!resolve(&table, "TEAM/SubTeam").is_found());

        let folding = PathResolver::new(MatchOptions { fold_case: true });
        let res = folding.resolve(&table, "TEAM/SubTeam");
        assert_eq!(res.target().map(|t| t.as_str()), Some("https://example.com/t1"));

        let literal = PathResolver::default();
        assert!(!literal.resolve(&table, "TEAM").is_found());
    }
}
