//! Configuration schema types
//!
//! This module defines the configuration structure for Lexguard. Every section
//! has defaults, so an empty file is a valid configuration.

use crate::anonymization::config::{AuditConfig, EngineConfig};
use crate::anonymization::policy::RevealPolicy;
use serde::{Deserialize, Serialize};

/// Main Lexguard configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexguardConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Redaction engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Access tiers and role ceilings
    #[serde(default)]
    pub policy: RevealPolicy,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LexguardConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.engine.validate()?;
        self.policy.validate().map_err(|e| e.to_string())?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in log and audit output
    #[serde(default = "default_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_name() -> String {
    "lexguard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_document_is_valid() {
        let config: LexguardConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.name, "lexguard");
        assert_eq!(config.engine.default_entity_types.len(), 4);
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_policy_section_is_validated() {
        let config: LexguardConfig = toml::from_str(
            r#"
[policy.tiers]
standard = ["low", "medium"]
elevated = ["low"]
full = ["low", "medium", "high"]
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("elevated"));
    }
}
