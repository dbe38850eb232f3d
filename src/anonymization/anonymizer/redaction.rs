//! Redaction of text, documents and transcripts
//!
//! A [`RedactionPass`] holds everything one anonymization call needs: the matcher,
//! the requested entity types, the call's [`TokenMapper`] and the warnings raised
//! so far. Sharing one pass across a whole document or transcript is what keeps
//! tokens consistent wherever a literal recurs.

use super::token_mapper::TokenMapper;
use crate::anonymization::detector::EntityMatcher;
use crate::anonymization::models::{Anonymized, EngineWarning};
use crate::domain::{LexguardError, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Field holding a transcript's ordered utterance entries
pub const TRANSCRIPT_ENTRIES_FIELD: &str = "entries";

/// State of one anonymization call
pub struct RedactionPass<'a> {
    matcher: &'a dyn EntityMatcher,
    entity_types: Vec<String>,
    mapper: TokenMapper,
    replacements: usize,
    warnings: Vec<EngineWarning>,
}

impl<'a> RedactionPass<'a> {
    /// Start a pass for the given entity types, in caller order
    pub fn new(matcher: &'a dyn EntityMatcher, entity_types: Vec<String>) -> Self {
        Self {
            matcher,
            entity_types,
            mapper: TokenMapper::new(),
            replacements: 0,
            warnings: Vec::new(),
        }
    }

    /// Reserve the ordinals of tokens already present in `text`
    ///
    /// Call this for every string of the artifact before redacting any of it.
    pub fn reserve_text(&mut self, text: &str) {
        self.mapper.reserve_existing(text);
    }

    /// Reserve the ordinals of tokens in every string leaf of `value`
    pub fn reserve_tree(&mut self, value: &Value) {
        match value {
            Value::String(text) => self.reserve_text(text),
            Value::Array(items) => items.iter().for_each(|item| self.reserve_tree(item)),
            Value::Object(map) => map.values().for_each(|child| self.reserve_tree(child)),
            _ => {}
        }
    }

    /// Redact one piece of text
    ///
    /// Tokens are minted left to right so ordinals follow reading order; spans are
    /// then spliced right to left so earlier offsets stay valid.
    pub fn redact_text(&mut self, text: &str) -> String {
        let set = self.matcher.find_matches(text, &self.entity_types);
        for warning in set.warnings {
            self.warn(warning);
        }
        if set.matches.is_empty() {
            return text.to_string();
        }

        let tokens: Vec<String> = set
            .matches
            .iter()
            .map(|m| self.mapper.token_for(&m.literal, &m.entity_type))
            .collect();

        let mut redacted = text.to_string();
        for (m, token) in set.matches.iter().zip(tokens.iter()).rev() {
            redacted.replace_range(m.start..m.end, token);
        }

        self.replacements += set.matches.len();
        redacted
    }

    /// Redact every string under a configured text field, at any depth
    ///
    /// The caller's document is never modified; a redacted copy is returned.
    /// `report_missing` lists text fields that should be reported when absent.
    pub fn redact_document(
        &mut self,
        document: &Value,
        text_fields: &HashSet<String>,
        report_missing: &[String],
    ) -> Result<Value> {
        if !matches!(document, Value::Object(_) | Value::Array(_)) {
            return Err(LexguardError::validation(
                "document",
                format!("expected an object or array, found {}", kind_of(document)),
            ));
        }

        self.reserve_tree(document);
        let mut redacted = document.clone();
        let mut seen = HashSet::new();
        self.walk(&mut redacted, text_fields, false, &mut seen);

        for field in report_missing {
            if !seen.contains(field.as_str()) {
                self.warn(EngineWarning::MissingField {
                    field: field.clone(),
                });
            }
        }

        Ok(redacted)
    }

    /// Redact the text fields of each transcript entry
    ///
    /// The transcript is either an array of entry objects or an object whose
    /// `entries` field holds that array. Structure is validated before anything
    /// is redacted.
    pub fn redact_transcript(&mut self, transcript: &Value, entry_fields: &[String]) -> Result<Value> {
        let prefix = validate_transcript(transcript, entry_fields)?;
        self.reserve_tree(transcript);

        let mut redacted = transcript.clone();
        let entries = match &mut redacted {
            Value::Array(entries) => entries,
            Value::Object(root) => match root.get_mut(TRANSCRIPT_ENTRIES_FIELD) {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(LexguardError::validation(
                        TRANSCRIPT_ENTRIES_FIELD,
                        "required array field missing",
                    ))
                }
            },
            other => {
                return Err(LexguardError::validation(
                    "transcript",
                    format!("expected an object or array, found {}", kind_of(other)),
                ))
            }
        };

        for (idx, entry) in entries.iter_mut().enumerate() {
            let Value::Object(fields) = entry else {
                continue;
            };
            for field in entry_fields {
                match fields.get_mut(field) {
                    Some(Value::String(text)) => {
                        let replaced = self.redact_text(text);
                        *text = replaced;
                    }
                    _ => {
                        self.warn(EngineWarning::MissingField {
                            field: format!("{prefix}[{idx}].{field}"),
                        });
                    }
                }
            }
        }

        Ok(redacted)
    }

    /// Close the pass, packaging the artifact with its record and warnings
    pub fn finish<T>(self, value: T) -> Anonymized<T> {
        Anonymized {
            value,
            record: self.mapper.into_record(),
            replacements: self.replacements,
            warnings: self.warnings,
        }
    }

    fn walk(
        &mut self,
        value: &mut Value,
        text_fields: &HashSet<String>,
        in_text_field: bool,
        seen: &mut HashSet<String>,
    ) {
        match value {
            Value::String(text) if in_text_field => {
                let replaced = self.redact_text(text);
                *text = replaced;
            }
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    let is_text_field = text_fields.contains(key);
                    if is_text_field {
                        seen.insert(key.clone());
                    }
                    self.walk(child, text_fields, is_text_field, seen);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, text_fields, in_text_field, seen);
                }
            }
            _ => {}
        }
    }

    fn warn(&mut self, warning: EngineWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

/// Check transcript structure; returns the path prefix used to name entries
fn validate_transcript(transcript: &Value, entry_fields: &[String]) -> Result<&'static str> {
    let (entries, prefix) = match transcript {
        Value::Array(entries) => (entries, ""),
        Value::Object(root) => match root.get(TRANSCRIPT_ENTRIES_FIELD) {
            Some(Value::Array(entries)) => (entries, TRANSCRIPT_ENTRIES_FIELD),
            Some(other) => {
                return Err(LexguardError::validation(
                    TRANSCRIPT_ENTRIES_FIELD,
                    format!("expected an array, found {}", kind_of(other)),
                ))
            }
            None => {
                return Err(LexguardError::validation(
                    TRANSCRIPT_ENTRIES_FIELD,
                    "required array field missing",
                ))
            }
        },
        other => {
            return Err(LexguardError::validation(
                "transcript",
                format!("expected an object or array, found {}", kind_of(other)),
            ))
        }
    };

    for (idx, entry) in entries.iter().enumerate() {
        let Value::Object(fields) = entry else {
            return Err(LexguardError::validation(
                format!("{prefix}[{idx}]"),
                format!("expected an object, found {}", kind_of(entry)),
            ));
        };
        for field in entry_fields {
            match fields.get(field) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(LexguardError::validation(
                        format!("{prefix}[{idx}].{field}"),
                        format!("expected a string, found {}", kind_of(other)),
                    ))
                }
            }
        }
    }

    Ok(prefix)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
