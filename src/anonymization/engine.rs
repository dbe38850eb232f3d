//! Redaction engine facade
//!
//! This module provides the [`RedactionEngine`] that ties the pattern registry,
//! the matcher and the reveal policy together behind the public operations.
//!
//! # Architecture
//!
//! The engine coordinates three components:
//! - **Matcher**: finds non-overlapping entity spans using the registry's rules
//! - **Redaction pass**: replaces spans with tokens and builds the replacement record
//! - **Deanonymizer**: restores the tokens a given access tier may see
//!
//! The engine holds no per-call state. Every anonymization call gets its own
//! token mapper, so one engine can be shared across threads.
//!
//! # Examples
//!
//! ```no_run
//! use lexguard::anonymization::{AccessTier, RedactionEngine};
//! use serde_json::json;
//!
//! # fn example() -> lexguard::domain::Result<()> {
//! let engine = RedactionEngine::with_defaults()?;
//!
//! let result = engine.anonymize_text("The accused, Chukwu, was present.", None)?;
//! println!("{}", result.value);
//!
//! let revealed = engine.deanonymize(&json!(result.value), &result.record, AccessTier::Full);
//! println!("{}", revealed.value);
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::RedactionPass,
    config::EngineConfig,
    deanonymizer::Deanonymizer,
    detector::{matcher::RegexMatcher, patterns::PatternRegistry, EntityMatcher},
    models::{Anonymized, EntityTypeInfo, ReplacementRecord, Revealed},
    policy::{AccessTier, RevealPolicy},
    report::DetectionReport,
};
use crate::domain::{LexguardError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Main redaction engine
///
/// # Thread Safety
///
/// The registry and policy are immutable after construction and shared through
/// `Arc`; cloning the engine is cheap and clones share them.
#[derive(Clone)]
pub struct RedactionEngine {
    registry: Arc<PatternRegistry>,
    matcher: Arc<dyn EntityMatcher>,
    policy: Arc<RevealPolicy>,
    default_entity_types: Vec<String>,
    default_text_fields: Vec<String>,
    transcript_text_fields: Vec<String>,
}

impl RedactionEngine {
    /// Create an engine from configuration
    ///
    /// # Errors
    ///
    /// Returns [`LexguardError::Configuration`] if:
    /// - the engine configuration or the policy is invalid
    /// - the pattern library cannot be read or compiled
    /// - a sensitivity override names an unknown entity type
    pub fn new(config: &EngineConfig, policy: RevealPolicy) -> Result<Self> {
        config.validate().map_err(|e| {
            LexguardError::Configuration(format!("Invalid engine configuration: {e}"))
        })?;
        policy.validate()?;

        let registry = match config.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path)?,
            None => PatternRegistry::default_patterns()?,
        };
        let registry = registry.with_sensitivity_overrides(&config.sensitivity)?;

        for entity_type in &config.default_entity_types {
            if !registry.contains(entity_type) {
                return Err(LexguardError::Configuration(format!(
                    "Default entity type '{entity_type}' is not defined in the pattern library"
                )));
            }
        }

        tracing::info!(
            entity_types = registry.entity_types().len(),
            rules = registry.rule_count(),
            custom_library = config.pattern_library.is_some(),
            "Redaction engine initialized"
        );

        let registry = Arc::new(registry);
        Ok(Self {
            matcher: Arc::new(RegexMatcher::new(Arc::clone(&registry))),
            registry,
            policy: Arc::new(policy),
            default_entity_types: config.default_entity_types.clone(),
            default_text_fields: config.default_text_fields.clone(),
            transcript_text_fields: config.transcript_text_fields.clone(),
        })
    }

    /// Create an engine with the built-in library and default policy
    pub fn with_defaults() -> Result<Self> {
        Self::new(&EngineConfig::default(), RevealPolicy::default())
    }

    /// Anonymize free text
    ///
    /// `entity_types` of `None` (or an empty slice) selects the configured
    /// defaults. Unknown types are skipped with a warning.
    pub fn anonymize_text(
        &self,
        text: &str,
        entity_types: Option<&[String]>,
    ) -> Result<Anonymized<String>> {
        let start = Instant::now();
        let mut pass = RedactionPass::new(self.matcher.as_ref(), self.resolve_types(entity_types));
        pass.reserve_text(text);
        let redacted = pass.redact_text(text);
        let result = pass.finish(redacted);

        crate::log_anonymization_complete!("text", &result, start.elapsed().as_millis() as u64);
        Ok(result)
    }

    /// Anonymize the text fields of a JSON document
    ///
    /// Strings at any depth under a key named in `text_fields` (default: the
    /// configured document fields) are redacted, including strings inside arrays
    /// under such keys. One mapper covers the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`LexguardError::Validation`] when the document root is not an
    /// object or array.
    pub fn anonymize_document(
        &self,
        document: &Value,
        entity_types: Option<&[String]>,
        text_fields: Option<&[String]>,
    ) -> Result<Anonymized<Value>> {
        let start = Instant::now();

        let (fields, report_missing): (HashSet<String>, &[String]) = match text_fields {
            Some(fields) if !fields.is_empty() => (fields.iter().cloned().collect(), fields),
            _ => (self.default_text_fields.iter().cloned().collect(), &[]),
        };

        let mut pass = RedactionPass::new(self.matcher.as_ref(), self.resolve_types(entity_types));
        let redacted = pass.redact_document(document, &fields, report_missing)?;
        let result = pass.finish(redacted);

        crate::log_anonymization_complete!("document", &result, start.elapsed().as_millis() as u64);
        Ok(result)
    }

    /// Anonymize every entry of a court transcript
    ///
    /// The transcript is an object whose `entries` array holds utterance objects;
    /// the configured transcript text fields of each entry are redacted with one
    /// mapper shared across all entries.
    ///
    /// # Errors
    ///
    /// Returns [`LexguardError::Validation`] when `entries` is missing, is not an
    /// array, or holds a non-object entry.
    pub fn anonymize_transcript(
        &self,
        transcript: &Value,
        entity_types: Option<&[String]>,
    ) -> Result<Anonymized<Value>> {
        let start = Instant::now();
        let mut pass = RedactionPass::new(self.matcher.as_ref(), self.resolve_types(entity_types));
        let redacted = pass.redact_transcript(transcript, &self.transcript_text_fields)?;
        let result = pass.finish(redacted);

        crate::log_anonymization_complete!(
            "transcript",
            &result,
            start.elapsed().as_millis() as u64
        );
        Ok(result)
    }

    /// Reveal the tokens `tier` may see
    ///
    /// A bare string artifact is passed as [`Value::String`].
    pub fn deanonymize(
        &self,
        artifact: &Value,
        record: &ReplacementRecord,
        tier: AccessTier,
    ) -> Revealed<Value> {
        let result = Deanonymizer::new(&self.registry, &self.policy).reveal(artifact, record, tier);

        tracing::info!(
            tier = %tier,
            revealed = result.revealed,
            withheld = result.withheld,
            warnings = result.warnings.len(),
            "Deanonymization complete"
        );
        for warning in &result.warnings {
            crate::log_engine_warning!(warning);
        }

        result
    }

    /// Report what `anonymize_text` would redact, without minting tokens
    pub fn detect(&self, text: &str, entity_types: Option<&[String]>) -> DetectionReport {
        let requested = self.resolve_types(entity_types);
        let set = self.matcher.find_matches(text, &requested);
        for warning in &set.warnings {
            crate::log_engine_warning!(warning);
        }
        DetectionReport::new(requested, &set.matches, set.warnings)
    }

    /// Every registered entity type with its sensitivity and description
    pub fn list_entity_types(&self) -> Vec<EntityTypeInfo> {
        self.registry.describe()
    }

    /// Entity types used when a call names none
    pub fn default_entity_types(&self) -> Vec<String> {
        self.default_entity_types.clone()
    }

    /// Registry backing this engine
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Reveal policy backing this engine
    pub fn policy(&self) -> &RevealPolicy {
        &self.policy
    }

    fn resolve_types(&self, entity_types: Option<&[String]>) -> Vec<String> {
        match entity_types {
            Some(types) if !types.is_empty() => types.to_vec(),
            _ => self.default_entity_types.clone(),
        }
    }
}
