//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Beyond parsing, it
//! compiles the configured pattern library so broken rules surface here.

use super::build_engine;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded and validated");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let engine = match build_engine(&config) {
            Ok(engine) => {
                println!("✅ Pattern library compiled");
                engine
            }
            Err(e) => {
                println!("❌ Pattern library rejected");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let library = config
            .engine
            .pattern_library
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string());

        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Pattern Library: {library}");
        println!(
            "  Entity Types: {} ({} rules)",
            engine.registry().entity_types().len(),
            engine.registry().rule_count()
        );
        println!(
            "  Default Entity Types: {}",
            config.engine.default_entity_types.join(", ")
        );
        println!(
            "  Default Text Fields: {}",
            config.engine.default_text_fields.join(", ")
        );
        println!(
            "  Transcript Text Fields: {}",
            config.engine.transcript_text_fields.join(", ")
        );
        for tier in crate::anonymization::AccessTier::ALL {
            let classes: Vec<String> = engine
                .policy()
                .visible_at(tier)
                .iter()
                .map(|s| s.to_string())
                .collect();
            println!("  Tier {tier}: [{}]", classes.join(", "));
        }
        println!("  Roles Configured: {}", config.policy.roles.len());
        println!(
            "  Audit: {}",
            if config.audit.enabled {
                config.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}
