// Lexguard - PII redaction for legal documents and court transcripts
// Copyright (c) 2025 Lexguard Contributors
// Licensed under the MIT License

//! # Lexguard - PII redaction for legal text
//!
//! Lexguard replaces the names, identifiers and contact details of people in
//! legal documents and court transcripts with reversible placeholder tokens,
//! and restores them later for readers whose access tier allows it.
//!
//! ## Overview
//!
//! - **Anonymize** free text, JSON documents and transcripts. Each call mints
//!   tokens such as `[REDACTED-DEFENDANT-1]` and returns a replacement record
//!   mapping every token to its original literal.
//! - **Deanonymize** a redacted artifact at an access tier (`standard`,
//!   `elevated`, `full`). Tokens whose entity type is too sensitive for the
//!   tier stay redacted.
//! - **Detect** what would be redacted without minting tokens.
//!
//! ## Architecture
//!
//! - [`anonymization`] - Pattern library, matcher, redaction engine, reveal policy, audit trail
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration management
//! - [`domain`] - Error and result types
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use lexguard::anonymization::{AccessTier, RedactionEngine};
//!
//! # fn main() -> lexguard::domain::Result<()> {
//! let engine = RedactionEngine::with_defaults()?;
//!
//! let types = vec!["DEFENDANT".to_string()];
//! let result = engine.anonymize_text("The accused, Chukwu, was present.", Some(&types))?;
//! assert_eq!(
//!     result.value,
//!     "The [REDACTED-DEFENDANT-1], [REDACTED-DEFENDANT-2], was present."
//! );
//!
//! // DEFENDANT is high sensitivity: only the full tier sees it
//! let value = serde_json::Value::String(result.value.clone());
//! let revealed = engine.deanonymize(&value, &result.record, AccessTier::Full);
//! assert_eq!(revealed.value, "The accused, Chukwu, was present.");
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing an engine
//!
//! [`anonymization::RedactionEngine`] is cheap to clone and `Send + Sync`.
//! Every call builds its own token mapper, so concurrent calls never share
//! ordinals or replacement records.
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], carrying a
//! [`domain::LexguardError`] whose variant maps to a CLI exit code.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
