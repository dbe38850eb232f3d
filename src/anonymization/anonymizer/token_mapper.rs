//! Call-scoped token assignment
//!
//! One mapper lives for exactly one anonymization call and is discarded
//! afterwards; only the replacement record it accumulated leaves the call.
//!
//! Ordinals of tokens already present in the input are reserved before minting,
//! so a new literal never reuses a token from an earlier call.

use crate::anonymization::models::{
    find_tokens, format_token, normalize_literal, RecordEntry, ReplacementRecord,
};
use std::collections::HashMap;

/// Assigns one stable token per distinct normalized literal
#[derive(Debug, Default)]
pub struct TokenMapper {
    /// Normalized literal → assigned token
    assigned: HashMap<String, String>,
    /// Last ordinal minted per entity type
    counters: HashMap<String, u64>,
    record: ReplacementRecord,
}

impl TokenMapper {
    /// Create an empty mapper
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the ordinals of every token already present in `text`
    pub fn reserve_existing(&mut self, text: &str) {
        for occurrence in find_tokens(text) {
            let Some(ordinal) = occurrence.ordinal else {
                continue;
            };
            let counter = self
                .counters
                .entry(occurrence.entity_type.to_string())
                .or_insert(0);
            *counter = (*counter).max(ordinal);
        }
    }

    /// Token for a literal, minting one on first sight
    ///
    /// Attribution is first-match-wins: once a literal has a token, later matches
    /// under a different entity type reuse it.
    pub fn token_for(&mut self, literal: &str, entity_type: &str) -> String {
        let key = normalize_literal(literal);
        if let Some(token) = self.assigned.get(&key) {
            return token.clone();
        }

        let counter = self.counters.entry(entity_type.to_string()).or_insert(0);
        *counter = counter.saturating_add(1);
        let token = format_token(entity_type, *counter);

        self.record
            .insert(token.clone(), RecordEntry::new(literal, entity_type));
        self.assigned.insert(key, token.clone());
        token
    }

    /// Number of distinct literals seen
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Whether no literal has been seen
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Surrender the record at the end of the call
    pub fn into_record(self) -> ReplacementRecord {
        self.record
    }
}
