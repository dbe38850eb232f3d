//! Pattern registry for entity detection
//!
//! The registry is loaded once at startup and is immutable afterwards, so it can be
//! shared behind an `Arc` by any number of concurrent callers.

use crate::anonymization::models::{is_valid_entity_id, EntityTypeInfo, Sensitivity};
use crate::domain::{LexguardError, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Where to load a pattern library from
#[derive(Debug, Clone, Copy)]
pub enum PatternSource<'a> {
    /// The library embedded in the binary
    Builtin,
    /// A `.toml` or `.json` file on disk
    File(&'a Path),
    /// TOML content held in memory
    Toml(&'a str),
}

/// Entity definition as written in the library file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDefinition {
    /// Entity type identifier
    pub id: String,
    /// Sensitivity class
    pub sensitivity: Sensitivity,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Literal keywords, matched on word boundaries
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Raw regular expressions
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Applies to `keywords` and `patterns`
    #[serde(default)]
    pub case_sensitive: bool,
    /// Rules with their own case-sensitivity flag
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// Single rule as written in the library file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    /// Regular expression
    pub pattern: String,
    /// Match case exactly
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternLibrary {
    entities: Vec<EntityDefinition>,
}

/// Compiled detection rule
#[derive(Debug, Clone)]
pub struct DetectionRule {
    /// Entity type this rule detects
    pub entity_type: String,
    /// Compiled regex
    pub regex: Regex,
    /// Whether the regex was compiled case-sensitively
    pub case_sensitive: bool,
}

#[derive(Debug)]
struct RegisteredEntity {
    id: String,
    sensitivity: Sensitivity,
    description: String,
    rules: Vec<DetectionRule>,
}

/// Immutable table of entity type → ordered detection rules
#[derive(Debug)]
pub struct PatternRegistry {
    entities: Vec<RegisteredEntity>,
    index: HashMap<String, usize>,
}

impl PatternRegistry {
    /// Load a registry from the given source
    pub fn load(source: PatternSource<'_>) -> Result<Self> {
        match source {
            PatternSource::Builtin => Self::default_patterns(),
            PatternSource::File(path) => Self::from_file(path),
            PatternSource::Toml(content) => Self::from_toml(content),
        }
    }

    /// Create a registry from a `.toml` or `.json` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LexguardError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.display()
            ))
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(LexguardError::Configuration(format!(
                "Pattern library must be a .toml or .json file: {}",
                path.display()
            ))),
        }
    }

    /// Create a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            LexguardError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })?;
        Self::from_definitions(library.entities)
    }

    /// Create a registry from JSON content with the same schema as the TOML form
    pub fn from_json(content: &str) -> Result<Self> {
        let library: PatternLibrary = serde_json::from_str(content).map_err(|e| {
            LexguardError::Configuration(format!("Failed to parse pattern library JSON: {e}"))
        })?;
        Self::from_definitions(library.entities)
    }

    /// Create the built-in registry
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/entity_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Compile entity definitions, preserving their order
    pub fn from_definitions(definitions: Vec<EntityDefinition>) -> Result<Self> {
        let mut entities = Vec::with_capacity(definitions.len());
        let mut index = HashMap::new();

        for def in definitions {
            if !is_valid_entity_id(&def.id) {
                return Err(LexguardError::Configuration(format!(
                    "Invalid entity type id '{}': use upper-case letters, digits and underscores",
                    def.id
                )));
            }
            if index.contains_key(&def.id) {
                return Err(LexguardError::Configuration(format!(
                    "Duplicate entity type '{}' in pattern library",
                    def.id
                )));
            }

            let rules = compile_rules(&def)?;
            if rules.is_empty() {
                return Err(LexguardError::Configuration(format!(
                    "Entity type '{}' defines no detection rules",
                    def.id
                )));
            }

            index.insert(def.id.clone(), entities.len());
            entities.push(RegisteredEntity {
                id: def.id,
                sensitivity: def.sensitivity,
                description: def.description,
                rules,
            });
        }

        tracing::debug!(entity_types = entities.len(), "Pattern registry loaded");

        Ok(Self { entities, index })
    }

    /// Re-pin sensitivity classes; every overridden id must exist
    pub fn with_sensitivity_overrides(
        mut self,
        overrides: &BTreeMap<String, Sensitivity>,
    ) -> Result<Self> {
        for (id, sensitivity) in overrides {
            let idx = *self.index.get(id).ok_or_else(|| {
                LexguardError::Configuration(format!(
                    "Sensitivity override for unknown entity type '{id}'"
                ))
            })?;
            self.entities[idx].sensitivity = *sensitivity;
        }
        Ok(self)
    }

    /// Entity type ids in registry order
    pub fn entity_types(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.id.as_str()).collect()
    }

    /// Whether an entity type is registered
    pub fn contains(&self, entity_type: &str) -> bool {
        self.index.contains_key(entity_type)
    }

    /// Rules for an entity type, in registry order
    pub fn rules_for(&self, entity_type: &str) -> Option<&[DetectionRule]> {
        self.entity(entity_type).map(|e| e.rules.as_slice())
    }

    /// Sensitivity class pinned to an entity type
    pub fn sensitivity_of(&self, entity_type: &str) -> Option<Sensitivity> {
        self.entity(entity_type).map(|e| e.sensitivity)
    }

    /// Describe every registered entity type
    pub fn describe(&self) -> Vec<EntityTypeInfo> {
        self.entities
            .iter()
            .map(|e| EntityTypeInfo {
                id: e.id.clone(),
                sensitivity: e.sensitivity,
                description: e.description.clone(),
            })
            .collect()
    }

    /// Total number of compiled rules
    pub fn rule_count(&self) -> usize {
        self.entities.iter().map(|e| e.rules.len()).sum()
    }

    fn entity(&self, entity_type: &str) -> Option<&RegisteredEntity> {
        self.index.get(entity_type).map(|&idx| &self.entities[idx])
    }
}

fn compile_rules(def: &EntityDefinition) -> Result<Vec<DetectionRule>> {
    let mut rules = Vec::new();

    let keywords: Vec<&str> = def
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        let pattern = keyword_pattern(&keywords);
        rules.push(compile_rule(&def.id, &pattern, def.case_sensitive)?);
    }

    for pattern in &def.patterns {
        rules.push(compile_rule(&def.id, pattern, def.case_sensitive)?);
    }

    for rule in &def.rules {
        rules.push(compile_rule(&def.id, &rule.pattern, rule.case_sensitive)?);
    }

    Ok(rules)
}

fn compile_rule(entity_type: &str, pattern: &str, case_sensitive: bool) -> Result<DetectionRule> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| {
            LexguardError::Configuration(format!(
                "Invalid regex for entity type '{entity_type}': {pattern}: {e}"
            ))
        })?;

    Ok(DetectionRule {
        entity_type: entity_type.to_string(),
        regex,
        case_sensitive,
    })
}

/// Build a word-bounded alternation of escaped keywords
///
/// Longer keywords come first so "injured party" wins over a shorter prefix, and
/// whitespace inside a keyword matches any whitespace run.
fn keyword_pattern(keywords: &[&str]) -> String {
    let mut sorted = keywords.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted.dedup();

    let alternatives: Vec<String> = sorted
        .iter()
        .map(|k| {
            k.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    format!(r"\b(?:{})\b", alternatives.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_patterns() {
        let registry = PatternRegistry::load(PatternSource::Builtin).unwrap();
        assert_eq!(
            registry.entity_types(),
            vec![
                "DEFENDANT", "VICTIM", "WITNESS", "MINOR", "ADDRESS", "PHONE", "EMAIL", "NIN",
                "PASSPORT"
            ]
        );
        assert!(registry.rule_count() >= registry.entity_types().len());
    }

    #[test]
    fn test_default_sensitivities() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert_eq!(registry.sensitivity_of("DEFENDANT"), Some(Sensitivity::High));
        assert_eq!(registry.sensitivity_of("WITNESS"), Some(Sensitivity::Medium));
        assert_eq!(registry.sensitivity_of("PHONE"), Some(Sensitivity::Low));
        assert_eq!(registry.sensitivity_of("JUDGE"), None);
    }

    #[test]
    fn test_email_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rules = registry.rules_for("EMAIL").unwrap();
        assert!(rules[0].regex.is_match("test@example.com"));
        assert!(!rules[0].regex.is_match("not-an-email"));
    }

    #[test]
    fn test_phone_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rules = registry.rules_for("PHONE").unwrap();
        let text = "Call me on +2348012345678 tonight";
        assert!(rules.iter().any(|r| r.regex.is_match(text)));
    }

    #[test]
    fn test_passport_rule_is_case_sensitive() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rule = &registry.rules_for("PASSPORT").unwrap()[0];
        assert!(rule.case_sensitive);
        assert!(rule.regex.is_match("A12345678"));
        assert!(!rule.regex.is_match("a12345678"));
    }

    #[test]
    fn test_keyword_rules_are_case_insensitive() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rule = &registry.rules_for("MINOR").unwrap()[0];
        assert!(rule.regex.is_match("The JUVENILE was present"));
        assert!(!rule.regex.is_match("childhood"));
    }

    #[test]
    fn test_keyword_pattern_prefers_longer_and_escapes() {
        let pattern = keyword_pattern(&["party", "injured party", "a.b"]);
        assert_eq!(pattern, r"\b(?:injured\s+party|party|a\.b)\b");
    }

    #[test]
    fn test_from_toml_preserves_rule_order() {
        let toml = r#"
[[entities]]
id = "COURT_REF"
sensitivity = "low"
patterns = ['CR-\d+', 'SUIT/\d+']

[[entities.rules]]
pattern = 'FHC/[A-Z]+'
case_sensitive = true
"#;
        let registry = PatternRegistry::from_toml(toml).unwrap();
        let rules = registry.rules_for("COURT_REF").unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].regex.as_str(), r"CR-\d+");
        assert_eq!(rules[2].regex.as_str(), "FHC/[A-Z]+");
        assert!(rules[2].case_sensitive);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"entities": [{"id": "CASE_NO", "sensitivity": "medium", "patterns": ["\\bCASE\\d+\\b"]}]}"#;
        let registry = PatternRegistry::from_json(json).unwrap();
        assert!(registry.contains("CASE_NO"));
    }

    #[test]
    fn test_invalid_regex_is_config_error() {
        let toml = r#"
[[entities]]
id = "BROKEN"
sensitivity = "low"
patterns = ['(unclosed']
"#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        assert!(matches!(err, LexguardError::Configuration(_)));
        assert!(err.to_string().contains("BROKEN"));
    }

    #[test]
    fn test_invalid_entity_id_is_config_error() {
        let toml = r#"
[[entities]]
id = "case-no"
sensitivity = "low"
patterns = ['x']
"#;
        assert!(matches!(
            PatternRegistry::from_toml(toml),
            Err(LexguardError::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_and_empty_entities_rejected() {
        let duplicate = r#"
[[entities]]
id = "A"
sensitivity = "low"
patterns = ['a']

[[entities]]
id = "A"
sensitivity = "low"
patterns = ['b']
"#;
        assert!(PatternRegistry::from_toml(duplicate).is_err());

        let empty = r#"
[[entities]]
id = "EMPTY"
sensitivity = "low"
keywords = ["  "]
"#;
        let err = PatternRegistry::from_toml(empty).unwrap_err();
        assert!(err.to_string().contains("no detection rules"));
    }

    #[test]
    fn test_unknown_sensitivity_rejected() {
        let toml = r#"
[[entities]]
id = "A"
sensitivity = "secret"
patterns = ['a']
"#;
        assert!(PatternRegistry::from_toml(toml).is_err());
    }

    #[test]
    fn test_sensitivity_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("NIN".to_string(), Sensitivity::Medium);
        let registry = PatternRegistry::default_patterns()
            .unwrap()
            .with_sensitivity_overrides(&overrides)
            .unwrap();
        assert_eq!(registry.sensitivity_of("NIN"), Some(Sensitivity::Medium));

        overrides.insert("JUDGE".to_string(), Sensitivity::High);
        let err = PatternRegistry::default_patterns()
            .unwrap()
            .with_sensitivity_overrides(&overrides)
            .unwrap_err();
        assert!(err.to_string().contains("JUDGE"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = PatternRegistry::from_file("/nonexistent/patterns.toml").unwrap_err();
        assert!(matches!(err, LexguardError::Configuration(_)));
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.yaml");
        std::fs::write(&path, "entities: []").unwrap();
        let err = PatternRegistry::from_file(&path).unwrap_err();
        assert!(err.to_string().contains(".toml or .json"));
    }
}
