//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output
//! - Local JSON file logging with rotation
//!
//! Log events carry counts, entity type ids, tiers and timings. Matched literals
//! are never logged.
//!
//! # Example
//!
//! ```no_run
//! use lexguard::logging::init_logging;
//! use lexguard::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of an anonymization call
///
/// Emits one summary event, then one warning event per engine warning.
///
/// # Example
///
/// ```no_run
/// use lexguard::anonymization::RedactionEngine;
/// use lexguard::log_anonymization_complete;
///
/// let engine = RedactionEngine::with_defaults().unwrap();
/// let result = engine.anonymize_text("the accused", None).unwrap();
/// log_anonymization_complete!("text", &result, 3u64);
/// ```
#[macro_export]
macro_rules! log_anonymization_complete {
    ($artifact:expr, $result:expr, $duration_ms:expr) => {{
        let result = $result;
        tracing::info!(
            artifact = $artifact,
            replacements = result.replacements,
            distinct_literals = result.record.len(),
            warnings = result.warnings.len(),
            duration_ms = $duration_ms,
            "Anonymization complete"
        );
        for warning in &result.warnings {
            $crate::log_engine_warning!(warning);
        }
    }};
}

/// Log one engine warning
///
/// # Example
///
/// ```no_run
/// use lexguard::anonymization::models::EngineWarning;
/// use lexguard::log_engine_warning;
///
/// let warning = EngineWarning::MissingField { field: "notes".to_string() };
/// log_engine_warning!(&warning);
/// ```
#[macro_export]
macro_rules! log_engine_warning {
    ($warning:expr) => {
        tracing::warn!(warning = %$warning, "Engine warning");
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use lexguard::log_error_with_context;
/// use lexguard::domain::LexguardError;
///
/// let error = LexguardError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log progress through a batch of documents
///
/// # Example
///
/// ```no_run
/// use lexguard::log_batch_progress;
///
/// log_batch_progress!(3, 10);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing batch"
        );
    };
}
