//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Lexguard using clap.

pub mod commands;

use crate::config::{default_config, load_config, LexguardConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "lexguard.toml";

/// Lexguard - PII redaction for legal documents and court transcripts
#[derive(Parser, Debug)]
#[command(name = "lexguard")]
#[command(version, about, long_about = None)]
#[command(author = "Lexguard Contributors")]
pub struct Cli {
    /// Path to configuration file [default: lexguard.toml]
    #[arg(short, long, env = "LEXGUARD_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LEXGUARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize free text from an argument, a file, or stdin
    AnonymizeText(commands::anonymize::AnonymizeTextArgs),

    /// Anonymize one or more JSON documents concurrently
    AnonymizeDocument(commands::anonymize::AnonymizeDocumentArgs),

    /// Anonymize a court transcript
    AnonymizeTranscript(commands::anonymize::AnonymizeTranscriptArgs),

    /// Restore the tokens an access tier may see
    Deanonymize(commands::deanonymize::DeanonymizeArgs),

    /// List registered entity types
    EntityTypes(commands::entities::EntityTypesArgs),

    /// Show the default entity types
    DefaultEntities(commands::entities::DefaultEntitiesArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Configuration path in effect
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration
    ///
    /// A missing default file falls back to built-in defaults; a missing file that
    /// was named explicitly is a configuration error.
    pub fn resolve_config(&self) -> Result<LexguardConfig> {
        match self.config.as_deref() {
            Some(path) => load_config(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
            None => default_config(),
        }
    }
}
