//! Anonymization module for Lexguard
//!
//! This module detects personally identifying spans in legal text, replaces them
//! with reversible tokens, and later restores them for callers whose access tier
//! permits it.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: a pattern registry of entity types and a regex matcher with
//!   leftmost-longest overlap resolution
//! - **Anonymization**: call-scoped token minting over text, documents and transcripts
//! - **Policy**: access tiers mapped to sensitivity classes, plus role ceilings
//! - **Deanonymization**: tier-gated token reversal against a replacement record
//! - **Audit**: append-only log with hashed literals
//!
//! # Usage
//!
//! ```rust,no_run
//! use lexguard::anonymization::{AccessTier, RedactionEngine};
//! use serde_json::json;
//!
//! # fn example() -> lexguard::domain::Result<()> {
//! let engine = RedactionEngine::with_defaults()?;
//! let types = vec!["DEFENDANT".to_string(), "WITNESS".to_string()];
//! let result = engine.anonymize_text(
//!     "The defendant Chukwu spoke to the witness Ibrahim.",
//!     Some(&types),
//! )?;
//! let revealed = engine.deanonymize(&json!(result.value), &result.record, AccessTier::Elevated);
//! # Ok(())
//! # }
//! ```

pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod deanonymizer;
pub mod detector;
pub mod engine;
pub mod models;
pub mod policy;
pub mod report;

// Re-export main types
pub use config::{AuditConfig, EngineConfig};
pub use engine::RedactionEngine;
pub use models::{Anonymized, EngineWarning, EntityTypeInfo, ReplacementRecord, Revealed, Sensitivity};
pub use policy::{AccessTier, RevealPolicy};
pub use report::DetectionReport;
