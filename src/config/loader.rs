//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LexguardConfig;
use super::secret::secret_string;
use crate::anonymization::models::Sensitivity;
use crate::domain::errors::LexguardError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LexguardConfig
/// 4. Applies environment variable overrides (LEXGUARD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`LexguardError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use lexguard::config::loader::load_config;
///
/// let config = load_config("lexguard.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LexguardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LexguardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LexguardError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Builds configuration from defaults plus environment overrides, without a file
pub fn default_config() -> Result<LexguardConfig> {
    parse_config("")
}

fn parse_config(contents: &str) -> Result<LexguardConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: LexguardConfig = toml::from_str(&contents)
        .map_err(|e| LexguardError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        LexguardError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_regex() -> &'static Regex {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported at once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_regex();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LexguardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_bool(name: &str, val: &str) -> Result<bool> {
    val.trim().parse().map_err(|_| {
        LexguardError::Configuration(format!("Invalid {name} value '{val}': expected true or false"))
    })
}

fn parse_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Applies environment variable overrides using LEXGUARD_* prefix
///
/// Environment variables follow the pattern: LEXGUARD_<SECTION>_<KEY>
/// For example: LEXGUARD_ENGINE_PATTERN_LIBRARY, LEXGUARD_AUDIT_ENABLED.
/// List values are comma-separated. Sensitivity overrides use
/// LEXGUARD_ENGINE_SENSITIVITY_<ENTITY_TYPE>.
fn apply_env_overrides(config: &mut LexguardConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("LEXGUARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Engine overrides
    if let Ok(val) = std::env::var("LEXGUARD_ENGINE_PATTERN_LIBRARY") {
        config.engine.pattern_library = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("LEXGUARD_ENGINE_DEFAULT_ENTITY_TYPES") {
        config.engine.default_entity_types = parse_list(&val);
    }
    if let Ok(val) = std::env::var("LEXGUARD_ENGINE_DEFAULT_TEXT_FIELDS") {
        config.engine.default_text_fields = parse_list(&val);
    }
    if let Ok(val) = std::env::var("LEXGUARD_ENGINE_TRANSCRIPT_TEXT_FIELDS") {
        config.engine.transcript_text_fields = parse_list(&val);
    }
    for (key, val) in std::env::vars() {
        if let Some(entity_type) = key.strip_prefix("LEXGUARD_ENGINE_SENSITIVITY_") {
            let sensitivity: Sensitivity = val
                .parse()
                .map_err(|e| LexguardError::Configuration(format!("Invalid {key}: {e}")))?;
            config
                .engine
                .sensitivity
                .insert(entity_type.to_string(), sensitivity);
        }
    }

    // Audit overrides
    if let Ok(val) = std::env::var("LEXGUARD_AUDIT_ENABLED") {
        config.audit.enabled = parse_bool("LEXGUARD_AUDIT_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("LEXGUARD_AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("LEXGUARD_AUDIT_JSON_FORMAT") {
        config.audit.json_format = parse_bool("LEXGUARD_AUDIT_JSON_FORMAT", &val)?;
    }
    if let Ok(val) = std::env::var("LEXGUARD_AUDIT_HASH_KEY") {
        config.audit.hash_key = Some(secret_string(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LEXGUARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("LEXGUARD_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("LEXGUARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("LEXGUARD_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LEXGUARD_TEST_AUDIT_DIR", "/var/audit");
        let input = "log_path = \"${LEXGUARD_TEST_AUDIT_DIR}/audit.log\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "log_path = \"/var/audit/audit.log\"\n");
        std::env::remove_var("LEXGUARD_TEST_AUDIT_DIR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LEXGUARD_TEST_MISSING_A");
        std::env::remove_var("LEXGUARD_TEST_MISSING_B");
        let input = "a = \"${LEXGUARD_TEST_MISSING_A}\"\nb = \"${LEXGUARD_TEST_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("LEXGUARD_TEST_MISSING_A"));
        assert!(err.contains("LEXGUARD_TEST_MISSING_B"));
    }

    #[test]
    fn test_comments_are_not_substituted() {
        std::env::remove_var("LEXGUARD_TEST_COMMENTED");
        let input = "# path = \"${LEXGUARD_TEST_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("DEFENDANT, WITNESS,,"), vec!["DEFENDANT", "WITNESS"]);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-lexguard.toml");
        assert!(matches!(result, Err(LexguardError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
name = "lexguard"
log_level = "debug"

[engine]
default_entity_types = ["DEFENDANT", "WITNESS"]
default_text_fields = ["notes"]

[engine.sensitivity]
WITNESS = "high"

[policy.roles]
registrar = "elevated"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.engine.default_entity_types, vec!["DEFENDANT", "WITNESS"]);
        assert_eq!(config.engine.sensitivity["WITNESS"], Sensitivity::High);
        assert!(config.policy.roles.contains_key("registrar"));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[engine\nbroken").unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
