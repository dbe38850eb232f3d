//! Engine and audit configuration

use crate::anonymization::models::{
    is_valid_entity_id, Sensitivity, DEFAULT_ENTITY_TYPES, DEFAULT_TEXT_FIELDS,
};
use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Redaction engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pattern library file (TOML or JSON); the built-in library when unset
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Entity types anonymized when a call does not name any
    #[serde(default = "default_entity_types")]
    pub default_entity_types: Vec<String>,

    /// Document fields treated as free text when a call does not name any
    #[serde(default = "default_text_fields")]
    pub default_text_fields: Vec<String>,

    /// Fields of each transcript entry that hold utterance text
    #[serde(default = "default_transcript_text_fields")]
    pub transcript_text_fields: Vec<String>,

    /// Per-type sensitivity overrides applied after the library loads
    #[serde(default)]
    pub sensitivity: BTreeMap<String, Sensitivity>,
}

fn default_entity_types() -> Vec<String> {
    DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_text_fields() -> Vec<String> {
    DEFAULT_TEXT_FIELDS.iter().map(|s| s.to_string()).collect()
}

fn default_transcript_text_fields() -> Vec<String> {
    vec!["text".to_string()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pattern_library: None,
            default_entity_types: default_entity_types(),
            default_text_fields: default_text_fields(),
            transcript_text_fields: default_transcript_text_fields(),
            sensitivity: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(format!("Pattern library file not found: {}", path.display()));
            }
            let extension = path.extension().and_then(|s| s.to_str());
            if !matches!(extension, Some("toml") | Some("json")) {
                return Err(format!(
                    "Pattern library must be a TOML or JSON file: {}",
                    path.display()
                ));
            }
        }

        for id in self.default_entity_types.iter().chain(self.sensitivity.keys()) {
            if !is_valid_entity_id(id) {
                return Err(format!(
                    "Invalid entity type id '{id}'. Use uppercase letters, digits and underscores"
                ));
            }
        }

        if self.default_text_fields.iter().any(|f| f.trim().is_empty()) {
            return Err("engine.default_text_fields cannot contain empty names".to_string());
        }
        if self.transcript_text_fields.is_empty() {
            return Err("engine.transcript_text_fields cannot be empty".to_string());
        }
        if self.transcript_text_fields.iter().any(|f| f.trim().is_empty()) {
            return Err("engine.transcript_text_fields cannot contain empty names".to_string());
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON lines instead of plain text
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,

    /// HMAC key for literal digests; entries carry no digests without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<SecretString>,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/lexguard-audit.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
            hash_key: None,
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        if self
            .hash_key
            .as_ref()
            .is_some_and(|key| key.expose_secret().is_empty())
        {
            return Err("audit.hash_key cannot be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(
            config.default_entity_types,
            vec!["DEFENDANT", "VICTIM", "WITNESS", "MINOR"]
        );
        assert_eq!(config.transcript_text_fields, vec!["text"]);
        assert!(config.pattern_library.is_none());
        assert!(config.validate().is_ok());

        let audit = AuditConfig::default();
        assert!(!audit.enabled);
        assert!(audit.json_format);
    }

    #[test]
    fn test_missing_pattern_library_rejected() {
        let config = EngineConfig {
            pattern_library: Some(PathBuf::from("/nonexistent/patterns.toml")),
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_wrong_library_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let config = EngineConfig {
            pattern_library: Some(file.path().to_path_buf()),
            ..EngineConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("TOML or JSON"));
    }

    #[test]
    fn test_invalid_entity_id_rejected() {
        let config = EngineConfig {
            default_entity_types: vec!["defendant".to_string()],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_section_from_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            default_entity_types = ["DEFENDANT", "PHONE"]
            transcript_text_fields = ["text", "utterance"]

            [sensitivity]
            PHONE = "medium"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_text_fields.len(), 6);
        assert_eq!(config.sensitivity["PHONE"], Sensitivity::Medium);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_audit_hash_key() {
        let audit: AuditConfig = toml::from_str("enabled = true\nhash_key = \"\"").unwrap();
        assert!(audit.validate().unwrap_err().contains("hash_key"));

        let audit: AuditConfig = toml::from_str("hash_key = \"court-7\"").unwrap();
        assert!(audit.validate().is_ok());
        assert!(!format!("{audit:?}").contains("court-7"));
    }
}
