//! Type-safe issue identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when an identifier string is not a valid [`IssueId`]
#[derive(Debug, Error)]
#[error("malformed issue id: {0}")]
pub struct ParseIdError(pub String);

/// Type-safe wrapper for issue IDs
///
/// Backed by a UUID v4. The distinction between a malformed id and a
/// well-formed id with no matching record drives two different API error
/// shapes, so parsing is fallible and explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(Uuid);

impl IssueId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form
    ///
    /// # Errors
    /// Returns [`ParseIdError`] when the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, ParseIdError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IssueId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = IssueId::generate();
        let b = IssueId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = IssueId::generate();
        let parsed = IssueId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(IssueId::parse("not-a-uuid").is_err());
        assert!(IssueId::parse("").is_err());
        assert!(IssueId::parse("12345").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = IssueId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
