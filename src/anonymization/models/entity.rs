//! Entity type and match models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity types anonymized when the caller does not request any explicitly
pub const DEFAULT_ENTITY_TYPES: [&str; 4] = ["DEFENDANT", "VICTIM", "WITNESS", "MINOR"];

/// Document fields treated as free text when the caller does not name any
pub const DEFAULT_TEXT_FIELDS: [&str; 6] = [
    "content",
    "text",
    "description",
    "notes",
    "statement",
    "testimony",
];

/// Sensitivity class pinned to every entity type at registry load time
///
/// The ordering is meaningful: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Contact details and similar identifiers (phone, email)
    Low,
    /// Locations and secondary participants
    Medium,
    /// Parties to the case, minors, national identifiers
    High,
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "Unknown sensitivity '{other}'. Must be one of: low, medium, high"
            )),
        }
    }
}

/// Public description of a registered entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeInfo {
    /// Identifier, e.g. `DEFENDANT`
    pub id: String,
    /// Sensitivity class used by the reveal policy
    pub sensitivity: Sensitivity,
    /// Human-readable description
    pub description: String,
}

/// A resolved detection in a piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Entity type that claimed the span
    pub entity_type: String,
    /// Byte offset of the first matched byte
    pub start: usize,
    /// Byte offset one past the last matched byte
    pub end: usize,
    /// Matched text exactly as it appears in the source
    pub literal: String,
}

impl Match {
    /// Length of the matched span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Check that an entity type identifier is usable inside a redaction token
///
/// Identifiers are upper-case ASCII letters, digits and underscores, starting
/// with a letter. Hyphens are excluded because they separate the type from the
/// ordinal in `[REDACTED-<TYPE>-<n>]`.
pub fn is_valid_entity_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Normalize a literal for consistency comparison
///
/// Trims, collapses internal whitespace runs to a single space and lower-cases.
pub fn normalize_literal(literal: &str) -> String {
    literal
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_ordering() {
        assert!(Sensitivity::Low < Sensitivity::Medium);
        assert!(Sensitivity::Medium < Sensitivity::High);
    }

    #[test]
    fn test_sensitivity_parse() {
        assert_eq!("HIGH".parse::<Sensitivity>().unwrap(), Sensitivity::High);
        assert_eq!(" low ".parse::<Sensitivity>().unwrap(), Sensitivity::Low);
        assert!("secret".parse::<Sensitivity>().is_err());
    }

    #[test]
    fn test_sensitivity_serde() {
        let json = serde_json::to_string(&Sensitivity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_valid_entity_ids() {
        assert!(is_valid_entity_id("DEFENDANT"));
        assert!(is_valid_entity_id("COURT_REF2"));
        assert!(!is_valid_entity_id("defendant"));
        assert!(!is_valid_entity_id("2FA"));
        assert!(!is_valid_entity_id("CASE-NO"));
        assert!(!is_valid_entity_id(""));
    }

    #[test]
    fn test_normalize_literal() {
        assert_eq!(normalize_literal("  Chukwu  "), "chukwu");
        assert_eq!(normalize_literal("12  Unity\tRoad"), "12 unity road");
        assert_eq!(normalize_literal("INJURED party"), "injured party");
    }
}
