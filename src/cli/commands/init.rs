//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "lexguard.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Lexguard configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Review [policy.roles] for your court's roles");
                println!("  3. Validate configuration: lexguard validate-config");
                println!("  4. Try it: lexguard anonymize-text \"The accused, Chukwu, was present.\"");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Lexguard Configuration File

[application]
name = "lexguard"
log_level = "info"

[engine]
default_entity_types = ["DEFENDANT", "VICTIM", "WITNESS", "MINOR"]
default_text_fields = ["content", "text", "description", "notes", "statement", "testimony"]
transcript_text_fields = ["text"]

[policy.tiers]
standard = ["low"]
elevated = ["low", "medium"]
full = ["low", "medium", "high"]

[policy.roles]
judge = "full"
admin = "full"
prosecutor = "elevated"
clerk = "elevated"

[audit]
enabled = false
log_path = "./audit/lexguard-audit.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Lexguard Configuration File
#
# Every section is optional; omitted settings take the defaults shown here.
# Values may reference environment variables with ${VAR_NAME}, and any
# setting can be overridden with LEXGUARD_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Application name (used in logging)
name = "lexguard"

# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Redaction Engine
# ============================================================================
[engine]
# Custom pattern library (TOML or JSON). The built-in library is used when unset.
# pattern_library = "${LEXGUARD_PATTERNS}"

# Entity types redacted when a request does not name any
default_entity_types = ["DEFENDANT", "VICTIM", "WITNESS", "MINOR"]

# Document fields treated as free text when a request does not name any
default_text_fields = ["content", "text", "description", "notes", "statement", "testimony"]

# Fields of each transcript entry that hold utterance text
transcript_text_fields = ["text"]

# Re-pin the sensitivity class of an entity type (low, medium, high)
[engine.sensitivity]
# ADDRESS = "high"

# ============================================================================
# Reveal Policy
# ============================================================================
# Sensitivity classes each access tier may see in clear.
# Tiers must be nested: standard within elevated within full.
[policy.tiers]
standard = ["low"]
elevated = ["low", "medium"]
full = ["low", "medium", "high"]

# Highest tier each role may request. Unlisted roles get "standard".
[policy.roles]
judge = "full"
admin = "full"
prosecutor = "elevated"
clerk = "elevated"

# ============================================================================
# Audit Trail
# ============================================================================
# Entries record counts, tiers and HMAC digests of literals (with hash_key), never plaintext.
[audit]
enabled = false
log_path = "./audit/lexguard-audit.log"
# JSON lines (true) or plain text (false)
json_format = true
# HMAC key for literal digests; leave unset to record tokens without digests
# hash_key = "${LEXGUARD_AUDIT_HASH_KEY}"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LexguardConfig;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "lexguard.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "lexguard.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse_and_validate() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: LexguardConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config.policy.roles.len(), 4);
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = InitArgs {
            output: file.path().to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
    }
}
