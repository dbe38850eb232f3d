// Lexguard - PII redaction for legal documents and court transcripts
// Copyright (c) 2025 Lexguard Contributors
// Licensed under the MIT License

use clap::Parser;
use lexguard::cli::commands::report_error;
use lexguard::cli::{Cli, Commands};
use lexguard::config::{LexguardConfig, LoggingConfig};
use lexguard::domain::Result;
use lexguard::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Configuration errors are reported after logging is up
    let loaded = cli.resolve_config();

    let (log_level, logging_config) = match &loaded {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Lexguard - PII redaction for legal documents"
    );

    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: Result<LexguardConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::ValidateConfig(args) => return args.execute(cli.config_path()).await,
        Commands::Init(args) => return args.execute().await,
        _ => {}
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => return Ok(report_error("Failed to load configuration", &e)),
    };

    match &cli.command {
        Commands::AnonymizeText(args) => args.execute(&config).await,
        Commands::AnonymizeDocument(args) => args.execute(&config).await,
        Commands::AnonymizeTranscript(args) => args.execute(&config).await,
        Commands::Deanonymize(args) => args.execute(&config).await,
        Commands::EntityTypes(args) => args.execute(&config).await,
        Commands::DefaultEntities(args) => args.execute(&config).await,
        Commands::ValidateConfig(_) | Commands::Init(_) => Ok(0),
    }
}
