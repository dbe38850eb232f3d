//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use lexguard::anonymization::{AccessTier, RedactionEngine, Sensitivity};
use lexguard::config::{load_config, LexguardConfig};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::{tempdir, NamedTempFile};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("LEXGUARD_APPLICATION_LOG_LEVEL");
    std::env::remove_var("LEXGUARD_AUDIT_ENABLED");
    std::env::remove_var("LEXGUARD_AUDIT_HASH_KEY");
    std::env::remove_var("LEXGUARD_ENGINE_DEFAULT_ENTITY_TYPES");
    std::env::remove_var("LEXGUARD_ENGINE_SENSITIVITY_ADDRESS");
    std::env::remove_var("TEST_LEXGUARD_AUDIT_DIR");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn engine_for(config: &LexguardConfig) -> RedactionEngine {
    RedactionEngine::new(&config.engine, config.policy.clone()).unwrap()
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
name = "lexguard"
log_level = "debug"

[engine]
default_entity_types = ["DEFENDANT", "PHONE"]
default_text_fields = ["body"]
transcript_text_fields = ["text", "translation"]

[engine.sensitivity]
PHONE = "medium"

[policy.tiers]
standard = ["low"]
elevated = ["low", "medium"]
full = ["low", "medium", "high"]

[policy.roles]
registrar = "elevated"

[audit]
enabled = true
log_path = "/var/log/lexguard/audit.log"
json_format = false

[logging]
local_enabled = true
local_path = "/var/log/lexguard"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.engine.default_entity_types, vec!["DEFENDANT", "PHONE"]);
    assert_eq!(config.engine.transcript_text_fields.len(), 2);
    assert_eq!(config.engine.sensitivity["PHONE"], Sensitivity::Medium);
    assert_eq!(config.policy.roles.len(), 1);
    assert_eq!(config.policy.ceiling_for("Registrar"), AccessTier::Elevated);
    assert!(config.audit.enabled);
    assert!(!config.audit.json_format);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.name, "lexguard");
    assert_eq!(
        config.engine.default_entity_types,
        vec!["DEFENDANT", "VICTIM", "WITNESS", "MINOR"]
    );
    assert_eq!(
        config.engine.default_text_fields,
        vec!["content", "text", "description", "notes", "statement", "testimony"]
    );
    assert!(!config.audit.enabled);
    assert_eq!(config.policy.ceiling_for("judge"), AccessTier::Full);
    assert_eq!(config.policy.ceiling_for("visitor"), AccessTier::Standard);
}

#[test]
fn test_env_substitution_and_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_LEXGUARD_AUDIT_DIR", "/srv/audit");
    std::env::set_var("LEXGUARD_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("LEXGUARD_ENGINE_DEFAULT_ENTITY_TYPES", "VICTIM, ADDRESS");
    std::env::set_var("LEXGUARD_ENGINE_SENSITIVITY_ADDRESS", "high");
    std::env::set_var("LEXGUARD_AUDIT_HASH_KEY", "registry-secret");

    let file = write_config(
        r#"
[audit]
log_path = "${TEST_LEXGUARD_AUDIT_DIR}/lexguard.log"
"#,
    );
    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(
        config.audit.log_path.to_string_lossy(),
        "/srv/audit/lexguard.log"
    );
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.engine.default_entity_types, vec!["VICTIM", "ADDRESS"]);
    assert_eq!(config.engine.sensitivity["ADDRESS"], Sensitivity::High);
    let key = config.audit.hash_key.as_ref().unwrap();
    assert_eq!(key.expose_secret().as_ref(), "registry-secret");
}

#[test]
fn test_missing_env_var_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[engine]
pattern_library = "${TEST_LEXGUARD_AUDIT_DIR}/patterns.toml"
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_LEXGUARD_AUDIT_DIR"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_non_nested_tiers_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[policy.tiers]
standard = ["low", "high"]
elevated = ["low", "medium"]
full = ["low", "medium", "high"]
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("elevated"));
}

#[test]
fn test_invalid_values_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    for content in [
        "[application]\nlog_level = \"verbose\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
        "[engine]\ndefault_entity_types = [\"lower-case\"]\n",
        "[policy.roles]\nclerk = \"supreme\"\n",
        "[engine.sensitivity]\nPHONE = \"secret\"\n",
    ] {
        let file = write_config(content);
        assert!(load_config(file.path()).is_err(), "accepted: {content}");
    }
}

#[test]
fn test_custom_pattern_library() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let dir = tempdir().unwrap();
    let library = dir.path().join("court.json");
    std::fs::write(
        &library,
        r#"{
  "entities": [
    {
      "id": "CASE_OFFICER",
      "sensitivity": "medium",
      "description": "Investigating police officers",
      "patterns": ["\\bInspector\\s+[A-Z][a-z]+\\b"],
      "case_sensitive": true
    }
  ]
}"#,
    )
    .unwrap();

    let file = write_config(&format!(
        "[engine]\npattern_library = \"{}\"\ndefault_entity_types = [\"CASE_OFFICER\"]\n",
        library.display()
    ));
    let config = load_config(file.path()).unwrap();
    let engine = engine_for(&config);

    let result = engine
        .anonymize_text("Inspector Bello took the statement.", None)
        .unwrap();
    assert_eq!(result.value, "[REDACTED-CASE_OFFICER-1] took the statement.");

    let listed = engine.list_entity_types();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].sensitivity, Sensitivity::Medium);
}

#[test]
fn test_unknown_default_entity_type_is_fatal() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[engine]\ndefault_entity_types = [\"JUDGE\"]\n");
    let config = load_config(file.path()).unwrap();
    let err = RedactionEngine::new(&config.engine, config.policy.clone())
        .err()
        .unwrap();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_config_file() {
    let err = load_config("/nonexistent/lexguard.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}
