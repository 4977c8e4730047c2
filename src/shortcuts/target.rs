//! Redirect target parsing.
//!
//! Targets are parsed once when the table is built. Absolute references go
//! through the `url` crate; anything without a scheme must be a valid HTTP
//! path-and-query to be accepted as a relative reference.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::PathAndQuery;
use serde::Serialize;
use thiserror::Error;

/// A parsed redirect destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Fully qualified URL, e.g. `https://example.com/docs`.
    Absolute(url::Url),
    /// Reference without a scheme, e.g. `/wiki/home` or `docs?tab=2`.
    Relative(String),
}

/// Why a cell could not be turned into a redirect target.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("invalid absolute URL: {0}")]
    Absolute(url::ParseError),

    #[error("invalid relative reference: {0}")]
    Relative(String),
}

impl RedirectTarget {
    /// Parse a URL reference.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        match url::Url::parse(input) {
            Ok(url) => Ok(RedirectTarget::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let (reference, fragment) = match input.split_once('#') {
                    Some((reference, fragment)) => (reference, Some(fragment)),
                    None => (input, None),
                };
                if !reference.is_empty() {
                    PathAndQuery::from_str(reference)
                        .map_err(|e| TargetError::Relative(e.to_string()))?;
                }
                if let Some(fragment) = fragment {
                    if fragment.chars().any(|c| !c.is_ascii_graphic()) {
                        return Err(TargetError::Relative("invalid fragment".to_string()));
                    }
                }
                Ok(RedirectTarget::Relative(input.to_string()))
            }
            Err(e) => Err(TargetError::Absolute(e)),
        }
    }

    /// The serialized form, suitable for a `Location` header.
    pub fn as_str(&self) -> &str {
        match self {
            RedirectTarget::Absolute(url) => url.as_str(),
            RedirectTarget::Relative(s) => s,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, RedirectTarget::Absolute(_))
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedirectTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RedirectTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_target() {
        let target = RedirectTarget::parse("https://example.com/docs").unwrap();
        assert!(target.is_absolute());
        assert_eq!(target.as_str(), "https://example.com/docs");
    }

    #[test]
    fn test_relative_target() {
        let target = RedirectTarget::parse("/wiki/home?tab=1").unwrap();
        assert!(!target.is_absolute());
        assert_eq!(target.to_string(), "/wiki/home?tab=1");
    }

    #[test]
    fn test_relative_target_keeps_fragment() {
        let target = RedirectTarget::parse("handbook#onboarding").unwrap();
        assert_eq!(target.as_str(), "handbook#onboarding");
        assert!(RedirectTarget::parse("#top").is_ok());
        assert!(RedirectTarget::parse("page#two words").is_err());
    }

    #[test]
    fn test_rejects_spaces_without_scheme() {
        let err = RedirectTarget::parse("not a url with spaces and no scheme???").unwrap_err();
        assert!(matches!(err, TargetError::Relative(_)));
    }

    #[test]
    fn test_rejects_bad_absolute() {
        let err = RedirectTarget::parse("https://exa mple.com").unwrap_err();
        assert!(matches!(err, TargetError::Absolute(_)));
    }
}
