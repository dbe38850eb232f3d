//! Call results and non-fatal warnings

use super::record::ReplacementRecord;
use crate::anonymization::policy::AccessTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal condition encountered during a call
///
/// Warnings are attached to the call result and logged; they never abort the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineWarning {
    /// A requested entity type is not in the registry and was skipped
    UnknownEntityType { entity_type: String },
    /// A token in the artifact has no entry in the supplied record
    UnknownToken { token: String },
    /// The requested tier may not see this token's entity type; left redacted
    InsufficientTier {
        token: String,
        entity_type: String,
        tier: AccessTier,
    },
    /// An expected text field was absent; nothing was redacted there
    MissingField { field: String },
    /// The record attributes the token to a different type than the token names
    RecordMismatch { token: String, recorded_type: String },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntityType { entity_type } => {
                write!(f, "unknown entity type '{entity_type}' ignored")
            }
            Self::UnknownToken { token } => {
                write!(f, "token {token} not present in replacement record")
            }
            Self::InsufficientTier {
                token,
                entity_type,
                tier,
            } => write!(
                f,
                "tier '{tier}' may not reveal {entity_type}; {token} left redacted"
            ),
            Self::MissingField { field } => write!(f, "field '{field}' missing"),
            Self::RecordMismatch {
                token,
                recorded_type,
            } => write!(
                f,
                "record attributes {token} to {recorded_type}; left redacted"
            ),
        }
    }
}

/// Result of an anonymization call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anonymized<T> {
    /// Redacted artifact
    pub value: T,
    /// Token → original literal mapping for this call
    pub record: ReplacementRecord,
    /// Number of spans replaced
    pub replacements: usize,
    /// Non-fatal diagnostics
    pub warnings: Vec<EngineWarning>,
}

impl<T> Anonymized<T> {
    /// Whether any span was redacted
    pub fn has_redactions(&self) -> bool {
        self.replacements > 0
    }
}

/// Result of a deanonymization call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revealed<T> {
    /// Artifact with permitted tokens restored
    pub value: T,
    /// Number of token occurrences restored
    pub revealed: usize,
    /// Number of token occurrences left redacted
    pub withheld: usize,
    /// Non-fatal diagnostics
    pub warnings: Vec<EngineWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_serialization_is_tagged() {
        let warning = EngineWarning::UnknownEntityType {
            entity_type: "JUDGE".to_string(),
        };
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["kind"], "unknown_entity_type");
        assert_eq!(value["entity_type"], "JUDGE");
    }

    #[test]
    fn test_insufficient_tier_display() {
        let warning = EngineWarning::InsufficientTier {
            token: "[REDACTED-MINOR-1]".to_string(),
            entity_type: "MINOR".to_string(),
            tier: AccessTier::Standard,
        };
        assert_eq!(
            warning.to_string(),
            "tier 'standard' may not reveal MINOR; [REDACTED-MINOR-1] left redacted"
        );
    }
}
