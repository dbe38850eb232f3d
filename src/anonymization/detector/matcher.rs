//! Regex-based entity matcher
//!
//! Overlaps are resolved leftmost-longest: candidates are ordered by start
//! position, then by length (longer first), then by the caller's entity type
//! order, then by registry rule order. Each accepted match claims its span.

use super::{patterns::PatternRegistry, EntityMatcher, MatchSet};
use crate::anonymization::models::{find_tokens, EngineWarning, Match};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

/// Regex-based entity matcher backed by a shared registry
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    registry: Arc<PatternRegistry>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    type_rank: usize,
    rule_rank: usize,
}

impl RegexMatcher {
    /// Create a matcher over a shared registry
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    /// Split requested types into known ids (deduplicated, caller order kept) and warnings
    fn resolve_types<'r>(&self, requested: &'r [String]) -> (Vec<&'r str>, Vec<EngineWarning>) {
        let mut seen = HashSet::new();
        let mut known = Vec::new();
        let mut warnings = Vec::new();

        for entity_type in requested {
            let entity_type = entity_type.as_str();
            if !seen.insert(entity_type) {
                continue;
            }
            if self.registry.contains(entity_type) {
                known.push(entity_type);
            } else {
                warnings.push(EngineWarning::UnknownEntityType {
                    entity_type: entity_type.to_string(),
                });
            }
        }

        (known, warnings)
    }

    fn collect_candidates(&self, text: &str, types: &[&str]) -> Vec<Candidate> {
        let segments = unclaimed_segments(text);
        let mut candidates = Vec::new();

        for (type_rank, entity_type) in types.iter().enumerate() {
            let Some(rules) = self.registry.rules_for(entity_type) else {
                continue;
            };
            for (rule_rank, rule) in rules.iter().enumerate() {
                for segment in &segments {
                    let haystack = &text[segment.clone()];
                    for found in rule.regex.find_iter(haystack) {
                        if found.is_empty() {
                            continue;
                        }
                        candidates.push(Candidate {
                            start: segment.start + found.start(),
                            end: segment.start + found.end(),
                            type_rank,
                            rule_rank,
                        });
                    }
                }
            }
        }

        candidates
    }
}

impl EntityMatcher for RegexMatcher {
    fn find_matches(&self, text: &str, requested: &[String]) -> MatchSet {
        let (types, warnings) = self.resolve_types(requested);
        if text.is_empty() || types.is_empty() {
            return MatchSet {
                matches: Vec::new(),
                warnings,
            };
        }

        let mut candidates = self.collect_candidates(text, &types);
        candidates.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
                .then_with(|| a.type_rank.cmp(&b.type_rank))
                .then_with(|| a.rule_rank.cmp(&b.rule_rank))
        });

        let mut matches = Vec::new();
        let mut claimed_until = 0;
        for candidate in candidates {
            if candidate.start < claimed_until {
                continue;
            }
            claimed_until = candidate.end;
            matches.push(Match {
                entity_type: types[candidate.type_rank].to_string(),
                start: candidate.start,
                end: candidate.end,
                literal: text[candidate.start..candidate.end].to_string(),
            });
        }

        MatchSet { matches, warnings }
    }

    fn registry(&self) -> &PatternRegistry {
        &self.registry
    }
}

/// Byte ranges of `text` not covered by existing redaction tokens
fn unclaimed_segments(text: &str) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for token in find_tokens(text) {
        if token.span.start > cursor {
            segments.push(cursor..token.span.start);
        }
        cursor = token.span.end;
    }
    if cursor < text.len() {
        segments.push(cursor..text.len());
    }
    segments
}
