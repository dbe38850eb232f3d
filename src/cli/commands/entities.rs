//! Entity catalogue commands

use super::{build_engine, report_error};
use crate::config::LexguardConfig;
use clap::Args;

/// Arguments for the entity-types command
#[derive(Args, Debug)]
pub struct EntityTypesArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl EntityTypesArgs {
    /// Execute the entity-types command
    pub async fn execute(&self, config: &LexguardConfig) -> anyhow::Result<i32> {
        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to load pattern library", &e)),
        };
        let entity_types = engine.list_entity_types();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entity_types)?);
            return Ok(0);
        }

        println!("{:<12} {:<12} DESCRIPTION", "ENTITY TYPE", "SENSITIVITY");
        for info in &entity_types {
            println!("{:<12} {:<12} {}", info.id, info.sensitivity, info.description);
        }
        Ok(0)
    }
}

/// Arguments for the default-entities command
#[derive(Args, Debug)]
pub struct DefaultEntitiesArgs {
    /// Print JSON instead of one id per line
    #[arg(long)]
    pub json: bool,
}

impl DefaultEntitiesArgs {
    /// Execute the default-entities command
    pub async fn execute(&self, config: &LexguardConfig) -> anyhow::Result<i32> {
        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to load pattern library", &e)),
        };
        let defaults = engine.default_entity_types();

        if self.json {
            println!("{}", serde_json::to_string(&defaults)?);
        } else {
            for id in defaults {
                println!("{id}");
            }
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entity_commands_succeed_with_defaults() {
        let config = LexguardConfig::default();
        assert_eq!(EntityTypesArgs { json: true }.execute(&config).await.unwrap(), 0);
        assert_eq!(DefaultEntitiesArgs { json: false }.execute(&config).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bad_pattern_library_exit_code() {
        let mut config = LexguardConfig::default();
        config.engine.pattern_library = Some("/nonexistent/patterns.toml".into());
        assert_eq!(EntityTypesArgs { json: false }.execute(&config).await.unwrap(), 2);
    }
}
