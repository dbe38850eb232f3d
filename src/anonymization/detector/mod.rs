//! Entity detection module
//!
//! Provides the trait-based matching interface and its regex implementation for
//! finding configured entity types in free text.

pub mod matcher;
pub mod patterns;

use crate::anonymization::models::{EngineWarning, Match};
use patterns::PatternRegistry;

/// Non-overlapping matches for one piece of text, sorted by start offset
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    /// Resolved matches
    pub matches: Vec<Match>,
    /// Warnings raised while resolving requested entity types
    pub warnings: Vec<EngineWarning>,
}

/// Trait for entity matcher implementations
pub trait EntityMatcher: Send + Sync {
    /// Find all non-overlapping matches for the requested entity types
    ///
    /// Caller order of `requested` breaks ties between equally long matches.
    fn find_matches(&self, text: &str, requested: &[String]) -> MatchSet;

    /// Registry the matcher consults
    fn registry(&self) -> &PatternRegistry;
}
