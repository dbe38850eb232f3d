//! Data models for the anonymization engine

pub mod entity;
pub mod outcome;
pub mod record;
pub mod token;

pub use entity::{
    is_valid_entity_id, normalize_literal, EntityTypeInfo, Match, Sensitivity,
    DEFAULT_ENTITY_TYPES, DEFAULT_TEXT_FIELDS,
};
pub use outcome::{Anonymized, EngineWarning, Revealed};
pub use record::{RecordEntry, ReplacementRecord};
pub use token::{find_tokens, format_token, is_token, TokenOccurrence};
