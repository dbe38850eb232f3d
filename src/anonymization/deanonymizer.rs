//! Tier-gated reversal of redaction tokens

use crate::anonymization::detector::patterns::PatternRegistry;
use crate::anonymization::models::{find_tokens, EngineWarning, ReplacementRecord, Revealed};
use crate::anonymization::policy::{AccessTier, RevealPolicy};
use serde_json::Value;

/// Restores tokens the requested tier is allowed to see
pub struct Deanonymizer<'a> {
    registry: &'a PatternRegistry,
    policy: &'a RevealPolicy,
}

#[derive(Default)]
struct RevealTally {
    revealed: usize,
    withheld: usize,
    warnings: Vec<EngineWarning>,
}

impl RevealTally {
    fn withhold(&mut self, warning: EngineWarning) {
        self.withheld += 1;
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

impl<'a> Deanonymizer<'a> {
    pub fn new(registry: &'a PatternRegistry, policy: &'a RevealPolicy) -> Self {
        Self { registry, policy }
    }

    /// Reveal permitted tokens in every string leaf of `artifact`
    ///
    /// The caller's artifact is left untouched. Tokens that cannot be revealed
    /// stay exactly as they were, so running this again is harmless.
    pub fn reveal(
        &self,
        artifact: &Value,
        record: &ReplacementRecord,
        tier: AccessTier,
    ) -> Revealed<Value> {
        let mut value = artifact.clone();
        let mut tally = RevealTally::default();
        self.walk(&mut value, record, tier, &mut tally);

        Revealed {
            value,
            revealed: tally.revealed,
            withheld: tally.withheld,
            warnings: tally.warnings,
        }
    }

    fn walk(
        &self,
        value: &mut Value,
        record: &ReplacementRecord,
        tier: AccessTier,
        tally: &mut RevealTally,
    ) {
        match value {
            Value::String(text) => {
                if let Some(replaced) = self.reveal_text(text, record, tier, tally) {
                    *text = replaced;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, record, tier, tally);
                }
            }
            Value::Object(map) => {
                for child in map.values_mut() {
                    self.walk(child, record, tier, tally);
                }
            }
            _ => {}
        }
    }

    /// Rewritten text, or `None` when no token was revealed
    fn reveal_text(
        &self,
        text: &str,
        record: &ReplacementRecord,
        tier: AccessTier,
        tally: &mut RevealTally,
    ) -> Option<String> {
        let tokens = find_tokens(text);
        if tokens.is_empty() {
            return None;
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut changed = false;

        for occurrence in tokens {
            out.push_str(&text[cursor..occurrence.span.start]);
            cursor = occurrence.span.end;

            let Some(entry) = record.get(occurrence.token) else {
                tally.withhold(EngineWarning::UnknownToken {
                    token: occurrence.token.to_string(),
                });
                out.push_str(occurrence.token);
                continue;
            };

            if entry.entity_type != occurrence.entity_type {
                tally.withhold(EngineWarning::RecordMismatch {
                    token: occurrence.token.to_string(),
                    recorded_type: entry.entity_type.clone(),
                });
                out.push_str(occurrence.token);
                continue;
            }

            if !self.policy.permits(tier, occurrence.entity_type, self.registry) {
                tally.withhold(EngineWarning::InsufficientTier {
                    token: occurrence.token.to_string(),
                    entity_type: occurrence.entity_type.to_string(),
                    tier,
                });
                out.push_str(occurrence.token);
                continue;
            }

            out.push_str(&entry.literal);
            tally.revealed += 1;
            changed = true;
        }

        out.push_str(&text[cursor..]);
        changed.then_some(out)
    }
}
