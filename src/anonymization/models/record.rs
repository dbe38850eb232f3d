//! Replacement record
//!
//! The record is the only artifact that makes reversal possible. The engine never
//! retains it; callers persist it (or hand it back) and pass it to the
//! deanonymizer later. Its JSON form is a flat object keyed by token:
//!
//! ```json
//! {
//!   "[REDACTED-DEFENDANT-1]": { "literal": "Chukwu", "entity_type": "DEFENDANT" },
//!   "[REDACTED-PHONE-1]": { "literal": "+2348012345678", "entity_type": "PHONE" }
//! }
//! ```

use super::token::is_token;
use crate::domain::{LexguardError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Original value behind one redaction token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Literal as it first appeared in the anonymized artifact
    pub literal: String,
    /// Entity type the literal was attributed to
    pub entity_type: String,
}

impl RecordEntry {
    /// Create a new record entry
    pub fn new(literal: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            entity_type: entity_type.into(),
        }
    }
}

/// Mapping token → original literal produced by one anonymization call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementRecord {
    entries: BTreeMap<String, RecordEntry>,
}

impl ReplacementRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous entry for the token if any
    pub fn insert(&mut self, token: impl Into<String>, entry: RecordEntry) -> Option<RecordEntry> {
        self.entries.insert(token.into(), entry)
    }

    /// Look up a token
    pub fn get(&self, token: &str) -> Option<&RecordEntry> {
        self.entries.get(token)
    }

    /// Number of tokens in the record
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(token, entry)` pairs sorted by token
    pub fn iter(&self) -> btree_map::Iter<'_, String, RecordEntry> {
        self.entries.iter()
    }

    /// Number of tokens per entity type
    pub fn counts_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.entity_type.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Fold in the record of another call over the same artifact
    ///
    /// Both records must agree on every token they share.
    pub fn merge(&mut self, other: ReplacementRecord) -> Result<()> {
        for (token, entry) in other.entries {
            match self.entries.get(&token) {
                Some(existing) if *existing != entry => {
                    return Err(LexguardError::validation(
                        "record",
                        format!("conflicting entries for {token}"),
                    ));
                }
                Some(_) => {}
                None => {
                    self.entries.insert(token, entry);
                }
            }
        }
        Ok(())
    }

    /// Parse a record from its JSON wire form
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            LexguardError::validation("record", format!("invalid replacement record: {e}"))
        })?;
        Self::from_value(value)
    }

    /// Build a record from parsed JSON; every key must be a well-formed token
    pub fn from_value(value: Value) -> Result<Self> {
        let record: Self = serde_json::from_value(value).map_err(|e| {
            LexguardError::validation("record", format!("invalid replacement record: {e}"))
        })?;
        if let Some(bad) = record.entries.keys().find(|token| !is_token(token)) {
            return Err(LexguardError::validation(
                "record",
                format!("'{bad}' is not a redaction token"),
            ));
        }
        Ok(record)
    }

    /// Serialize the record to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a ReplacementRecord {
    type Item = (&'a String, &'a RecordEntry);
    type IntoIter = btree_map::Iter<'a, String, RecordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> ReplacementRecord {
        let mut record = ReplacementRecord::new();
        record.insert(
            "[REDACTED-DEFENDANT-1]",
            RecordEntry::new("Chukwu", "DEFENDANT"),
        );
        record.insert(
            "[REDACTED-PHONE-1]",
            RecordEntry::new("+2348012345678", "PHONE"),
        );
        record
    }

    #[test]
    fn test_wire_form_is_flat_map() {
        let value = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(
            value,
            json!({
                "[REDACTED-DEFENDANT-1]": {"literal": "Chukwu", "entity_type": "DEFENDANT"},
                "[REDACTED-PHONE-1]": {"literal": "+2348012345678", "entity_type": "PHONE"}
            })
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"[REDACTED-VICTIM-1]": {"literal": "Chioma", "entity_type": "VICTIM"}}"#;
        let record = ReplacementRecord::from_json(json).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(
            record.get("[REDACTED-VICTIM-1]").unwrap().literal,
            "Chioma"
        );
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let err = ReplacementRecord::from_json(r#"{"[REDACTED-VICTIM-1]": "Chioma"}"#).unwrap_err();
        assert!(matches!(err, LexguardError::Validation { ref field, .. } if field == "record"));
    }

    #[test]
    fn test_from_json_rejects_non_token_keys() {
        let err = ReplacementRecord::from_json(
            r#"{"Chukwu": {"literal": "Chukwu", "entity_type": "DEFENDANT"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not a redaction token"));
    }

    #[test]
    fn test_merge_records_from_separate_calls() {
        let mut record = sample_record();
        let mut later = ReplacementRecord::new();
        later.insert(
            "[REDACTED-DEFENDANT-2]",
            RecordEntry::new("Adebayo", "DEFENDANT"),
        );
        later.insert(
            "[REDACTED-PHONE-1]",
            RecordEntry::new("+2348012345678", "PHONE"),
        );

        record.merge(later).unwrap();
        assert_eq!(record.len(), 3);

        let mut conflicting = ReplacementRecord::new();
        conflicting.insert(
            "[REDACTED-DEFENDANT-1]",
            RecordEntry::new("suspect", "DEFENDANT"),
        );
        assert!(record.merge(conflicting).is_err());
        assert_eq!(
            record.get("[REDACTED-DEFENDANT-1]").unwrap().literal,
            "Chukwu"
        );
    }

    #[test]
    fn test_counts_by_type() {
        let counts = sample_record().counts_by_type();
        assert_eq!(counts.get("DEFENDANT"), Some(&1));
        assert_eq!(counts.get("PHONE"), Some(&1));
    }
}
