//! Audit logger for anonymization and deanonymization calls
//!
//! Literals are recorded only as HMAC-SHA256 digests under the configured
//! `audit.hash_key`. Without a key, token entries carry no digest at all.

use crate::anonymization::config::AuditConfig;
use crate::anonymization::models::{Anonymized, Revealed};
use crate::anonymization::policy::AccessTier;
use crate::domain::{LexguardError, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::Serialize;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    call_id: String,
    operation: String,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<AccessTier>,
    replacements: usize,
    withheld: usize,
    warnings: usize,
    entity_counts: BTreeMap<String, usize>,
    tokens: Vec<AuditToken>,
}

/// One minted token, with its literal hashed
#[derive(Debug, Serialize)]
struct AuditToken {
    token: String,
    entity_type: String,
    /// Keyed digest of the original value (never log plaintext PII)
    #[serde(skip_serializing_if = "Option::is_none")]
    literal_hash: Option<String>,
}

/// Audit logger for redaction calls
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
    mac: Option<HmacSha256>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LexguardError::Io(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
            mac: None,
        })
    }

    /// Digest literals with HMAC-SHA256 under `key`
    pub fn with_hash_key(mut self, key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(LexguardError::Configuration(
                "audit hash key cannot be empty".to_string(),
            ));
        }
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| LexguardError::Configuration(format!("Invalid audit hash key: {e}")))?;
        self.mac = Some(mac);
        Ok(self)
    }

    /// Create a logger from the `[audit]` section
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        let logger = Self::new(config.log_path.clone(), config.json_format, config.enabled)?;
        match &config.hash_key {
            Some(key) => logger.with_hash_key(key.expose_secret().as_bytes()),
            None => Ok(logger),
        }
    }

    /// Whether entries are written
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Path entries are appended to
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Record an anonymization call; returns the call id when written
    pub fn log_anonymization<T>(
        &self,
        operation: &str,
        source: &str,
        result: &Anonymized<T>,
    ) -> Result<Option<Uuid>> {
        if !self.enabled {
            return Ok(None);
        }

        let call_id = Uuid::new_v4();
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            call_id: call_id.to_string(),
            operation: operation.to_string(),
            source: source.to_string(),
            role: None,
            tier: None,
            replacements: result.replacements,
            withheld: 0,
            warnings: result.warnings.len(),
            entity_counts: result.record.counts_by_type(),
            tokens: result
                .record
                .iter()
                .map(|(token, entry)| AuditToken {
                    token: token.clone(),
                    entity_type: entry.entity_type.clone(),
                    literal_hash: self.digest(&entry.literal),
                })
                .collect(),
        };

        self.write_entry(&entry)?;
        Ok(Some(call_id))
    }

    /// Record a deanonymization call; returns the call id when written
    pub fn log_deanonymization<T>(
        &self,
        source: &str,
        role: Option<&str>,
        tier: AccessTier,
        result: &Revealed<T>,
    ) -> Result<Option<Uuid>> {
        if !self.enabled {
            return Ok(None);
        }

        let call_id = Uuid::new_v4();
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            call_id: call_id.to_string(),
            operation: "deanonymize".to_string(),
            source: source.to_string(),
            role: role.map(str::to_string),
            tier: Some(tier),
            replacements: result.revealed,
            withheld: result.withheld,
            warnings: result.warnings.len(),
            entity_counts: BTreeMap::new(),
            tokens: Vec::new(),
        };

        self.write_entry(&entry)?;
        Ok(Some(call_id))
    }

    fn digest(&self, literal: &str) -> Option<String> {
        let mut mac = self.mac.clone()?;
        mac.update(literal.as_bytes());
        Some(format!("{:x}", mac.finalize().into_bytes()))
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                LexguardError::Io(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        if self.json_format {
            let json_line = serde_json::to_string(entry)?;
            writeln!(file, "{json_line}")?;
        } else {
            let tier = entry
                .tier
                .map(|t| format!(" | Tier: {t}"))
                .unwrap_or_default();
            writeln!(
                file,
                "[{}] {} {} | Source: {} | Replacements: {} | Withheld: {} | Warnings: {}{}",
                entry.timestamp,
                entry.call_id,
                entry.operation,
                entry.source,
                entry.replacements,
                entry.withheld,
                entry.warnings,
                tier
            )?;
        }

        tracing::debug!(call_id = %entry.call_id, operation = %entry.operation, "Audit entry written");
        Ok(())
    }
}
