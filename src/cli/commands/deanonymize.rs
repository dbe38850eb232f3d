//! Deanonymize command implementation
//!
//! Accepts either the JSON written by an anonymize command (an object holding
//! `value` and `record`), or any redacted artifact together with `--record`.
//! `--record` may be repeated for artifacts redacted over several calls.

use super::{build_engine, parse_json, read_input, report_error, write_json};
use crate::anonymization::audit::AuditLogger;
use crate::anonymization::models::ReplacementRecord;
use crate::anonymization::policy::AccessTier;
use crate::config::LexguardConfig;
use crate::domain::{LexguardError, Result};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the deanonymize command
#[derive(Args, Debug)]
pub struct DeanonymizeArgs {
    /// Redacted artifact (JSON); stdin when omitted
    pub file: Option<PathBuf>,

    /// Replacement record file, repeatable; required unless the input carries its own record
    #[arg(short, long)]
    pub record: Vec<PathBuf>,

    /// Access tier to reveal at (standard, elevated, full)
    #[arg(short, long, default_value = "standard")]
    pub tier: AccessTier,

    /// Caller role; must be allowed to use the requested tier
    #[arg(long, env = "LEXGUARD_ROLE")]
    pub role: String,

    /// Write the revealed artifact to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DeanonymizeArgs {
    /// Execute the deanonymize command
    pub async fn execute(&self, config: &LexguardConfig) -> anyhow::Result<i32> {
        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to initialize redaction engine", &e)),
        };

        if let Err(e) = engine.policy().authorize(&self.role, self.tier) {
            return Ok(report_error("Access tier not permitted for role", &e));
        }

        let source = self
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string());

        let (artifact, record) = match self.load(&source) {
            Ok(loaded) => loaded,
            Err(e) => return Ok(report_error("Failed to read redacted artifact", &e)),
        };

        let result = engine.deanonymize(&artifact, &record, self.tier);

        let audited = AuditLogger::from_config(&config.audit).and_then(|audit| {
            audit.log_deanonymization(&source, Some(&self.role), self.tier, &result)
        });
        if let Err(e) = audited {
            return Ok(report_error("Failed to write audit entry", &e));
        }

        if let Err(e) = write_json(self.output.as_deref(), &result.value) {
            return Ok(report_error("Failed to write result", &e));
        }

        eprintln!(
            "✅ Revealed {} token(s) at tier '{}', {} left redacted",
            result.revealed, self.tier, result.withheld
        );
        for warning in &result.warnings {
            eprintln!("⚠️  {warning}");
        }

        Ok(0)
    }

    fn load(&self, source: &str) -> Result<(Value, ReplacementRecord)> {
        let input = parse_json(&read_input(self.file.as_deref())?, source)?;

        if !self.record.is_empty() {
            let mut record = ReplacementRecord::new();
            for record_path in &self.record {
                record.merge(ReplacementRecord::from_json(&read_input(Some(record_path))?)?)?;
            }
            return Ok((input, record));
        }

        split_envelope(input)
    }
}

/// Split anonymize-command output into artifact and record
fn split_envelope(input: Value) -> Result<(Value, ReplacementRecord)> {
    let Value::Object(mut envelope) = input else {
        return Err(missing_record());
    };
    let (Some(value), Some(record)) = (envelope.remove("value"), envelope.remove("record")) else {
        return Err(missing_record());
    };
    Ok((value, ReplacementRecord::from_value(record)?))
}

fn missing_record() -> LexguardError {
    LexguardError::validation(
        "record",
        "no replacement record supplied; pass --record or the output of an anonymize command",
    )
}
