//! Configuration management for Lexguard.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Lexguard uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LEXGUARD_<SECTION>_<KEY>` environment overrides
//! - Default values for every section
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lexguard::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("lexguard.toml")?;
//! println!("Default entity types: {:?}", config.engine.default_entity_types);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (name, log level)
//! - [`EngineConfig`] - Pattern library, default types and fields, sensitivity overrides
//! - [`RevealPolicy`] - Tier → sensitivity classes, role ceilings
//! - [`AuditConfig`] - Audit trail settings
//! - [`LoggingConfig`] - Logging configuration
//! - [`SecretString`] - Wrapper for the audit hash key
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [engine]
//! pattern_library = "${LEXGUARD_PATTERNS}"
//! default_entity_types = ["DEFENDANT", "VICTIM", "WITNESS", "MINOR"]
//!
//! [engine.sensitivity]
//! ADDRESS = "high"
//!
//! [policy.tiers]
//! standard = ["low"]
//! elevated = ["low", "medium"]
//! full = ["low", "medium", "high"]
//!
//! [policy.roles]
//! judge = "full"
//! clerk = "elevated"
//!
//! [audit]
//! enabled = true
//! hash_key = "${LEXGUARD_AUDIT_HASH_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use crate::anonymization::config::{AuditConfig, EngineConfig};
pub use crate::anonymization::policy::RevealPolicy;
pub use loader::{default_config, load_config};
pub use schema::{ApplicationConfig, LexguardConfig, LoggingConfig};
pub use secret::{secret_string, SecretString, SecretValue};
