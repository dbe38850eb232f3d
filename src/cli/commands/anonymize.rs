//! Anonymize command implementations
//!
//! `anonymize-text`, `anonymize-document` and `anonymize-transcript` all write the
//! full call result as JSON: the redacted `value`, its replacement `record`, the
//! replacement count and any warnings. Keep the record; it is the only way back.

use super::{build_engine, parse_json, read_input, report_error, write_json, write_text};
use crate::anonymization::audit::AuditLogger;
use crate::anonymization::models::Anonymized;
use crate::anonymization::RedactionEngine;
use crate::config::LexguardConfig;
use crate::domain::Result;
use clap::Args;
use futures::future::try_join_all;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the anonymize-text command
#[derive(Args, Debug)]
pub struct AnonymizeTextArgs {
    /// Text to anonymize; read from --input or stdin when omitted
    pub text: Option<String>,

    /// Read text from this file
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Entity types to redact (comma-separated); configured defaults when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub entity_types: Vec<String>,

    /// Report what would be redacted without producing tokens
    #[arg(long)]
    pub dry_run: bool,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl AnonymizeTextArgs {
    /// Execute the anonymize-text command
    pub async fn execute(&self, config: &LexguardConfig) -> anyhow::Result<i32> {
        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to initialize redaction engine", &e)),
        };

        let text = match &self.text {
            Some(text) => text.clone(),
            None => match read_input(self.input.as_deref()) {
                Ok(text) => text,
                Err(e) => return Ok(report_error("Failed to read input text", &e)),
            },
        };
        let entity_types = requested_types(&self.entity_types);

        if self.dry_run {
            let report = engine.detect(&text, entity_types);
            if let Err(e) = write_text(self.output.as_deref(), &report.format_console()) {
                return Ok(report_error("Failed to write dry-run report", &e));
            }
            return Ok(0);
        }

        let result = match engine.anonymize_text(&text, entity_types) {
            Ok(result) => result,
            Err(e) => return Ok(report_error("Anonymization failed", &e)),
        };

        let source = self
            .input
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "inline".to_string());
        Ok(finish(config, "anonymize-text", &source, &result, self.output.as_deref()))
    }
}

/// Arguments for the anonymize-document command
#[derive(Args, Debug)]
pub struct AnonymizeDocumentArgs {
    /// JSON documents to anonymize
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Entity types to redact (comma-separated); configured defaults when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub entity_types: Vec<String>,

    /// Document fields holding free text (comma-separated); configured defaults when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub text_fields: Vec<String>,

    /// Directory for results; defaults to `<name>.anonymized.json` next to each input
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Outcome of one document processed on a worker thread
struct DocumentOutcome {
    input: PathBuf,
    output: PathBuf,
    result: Anonymized<Value>,
}

impl AnonymizeDocumentArgs {
    /// Execute the anonymize-document command
    ///
    /// Each document is anonymized on its own blocking worker; the engine is
    /// shared between them.
    pub async fn execute(&self, config: &LexguardConfig) -> anyhow::Result<i32> {
        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to initialize redaction engine", &e)),
        };

        let start = Instant::now();
        let entity_types = Arc::new(self.entity_types.clone());
        let text_fields = Arc::new(self.text_fields.clone());
        let total = self.files.len();

        let handles = self.files.iter().map(|input| {
            let engine = engine.clone();
            let entity_types = Arc::clone(&entity_types);
            let text_fields = Arc::clone(&text_fields);
            let input = input.clone();
            let output = self.output_path_for(&input);

            tokio::task::spawn_blocking(move || {
                let outcome = anonymize_file(
                    &engine,
                    &input,
                    output,
                    requested_types(&entity_types),
                    requested_types(&text_fields),
                );
                (input, outcome)
            })
        });

        let outcomes = try_join_all(handles).await?;

        let audit = match AuditLogger::from_config(&config.audit) {
            Ok(audit) => audit,
            Err(e) => return Ok(report_error("Failed to open audit log", &e)),
        };

        let mut exit_code = 0;
        for (idx, (input, outcome)) in outcomes.into_iter().enumerate() {
            crate::log_batch_progress!(idx + 1, total);
            match outcome {
                Ok(done) => {
                    eprintln!(
                        "✅ {} → {} ({} replacement(s), {} token(s))",
                        done.input.display(),
                        done.output.display(),
                        done.result.replacements,
                        done.result.record.len()
                    );
                    print_warnings(&done.result);
                    let source = done.input.display().to_string();
                    if let Err(e) = audit.log_anonymization("anonymize-document", &source, &done.result)
                    {
                        exit_code = exit_code.max(report_error("Failed to write audit entry", &e));
                    }
                }
                Err(e) => {
                    let context = format!("Failed to anonymize {}", input.display());
                    exit_code = exit_code.max(report_error(&context, &e));
                }
            }
        }

        tracing::info!(
            documents = total,
            duration_ms = start.elapsed().as_millis() as u64,
            exit_code,
            "Document batch finished"
        );

        Ok(exit_code)
    }

    fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let file_name = format!("{stem}.anonymized.json");
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => input.with_file_name(file_name),
        }
    }
}

/// Arguments for the anonymize-transcript command
#[derive(Args, Debug)]
pub struct AnonymizeTranscriptArgs {
    /// Transcript JSON file; stdin when omitted
    pub file: Option<PathBuf>,

    /// Entity types to redact (comma-separated); configured defaults when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub entity_types: Vec<String>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl AnonymizeTranscriptArgs {
    /// Execute the anonymize-transcript command
    pub async fn execute(&self, config: &LexguardConfig) -> anyhow::Result<i32> {
        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to initialize redaction engine", &e)),
        };

        let source = self
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string());

        let transcript = match read_input(self.file.as_deref())
            .and_then(|content| parse_json(&content, &source))
        {
            Ok(value) => value,
            Err(e) => return Ok(report_error("Failed to read transcript", &e)),
        };

        let result =
            match engine.anonymize_transcript(&transcript, requested_types(&self.entity_types)) {
                Ok(result) => result,
                Err(e) => return Ok(report_error("Transcript anonymization failed", &e)),
            };

        Ok(finish(config, "anonymize-transcript", &source, &result, self.output.as_deref()))
    }
}

fn anonymize_file(
    engine: &RedactionEngine,
    input: &Path,
    output: PathBuf,
    entity_types: Option<&[String]>,
    text_fields: Option<&[String]>,
) -> Result<DocumentOutcome> {
    let content = read_input(Some(input))?;
    let document = parse_json(&content, &input.display().to_string())?;
    let result = engine.anonymize_document(&document, entity_types, text_fields)?;
    write_json(Some(&output), &result)?;
    Ok(DocumentOutcome {
        input: input.to_path_buf(),
        output,
        result,
    })
}

fn requested_types(values: &[String]) -> Option<&[String]> {
    (!values.is_empty()).then_some(values)
}

fn print_warnings<T>(result: &Anonymized<T>) {
    for warning in &result.warnings {
        eprintln!("⚠️  {warning}");
    }
}

/// Write the result, audit the call and print a summary; returns the exit code
fn finish<T: serde::Serialize>(
    config: &LexguardConfig,
    operation: &str,
    source: &str,
    result: &Anonymized<T>,
    output: Option<&Path>,
) -> i32 {
    let audited = AuditLogger::from_config(&config.audit)
        .and_then(|audit| audit.log_anonymization(operation, source, result));
    if let Err(e) = audited {
        return report_error("Failed to write audit entry", &e);
    }

    if let Err(e) = write_json(output, result) {
        return report_error("Failed to write result", &e);
    }

    if result.has_redactions() {
        eprintln!(
            "✅ {} replacement(s), {} token(s) in record",
            result.replacements,
            result.record.len()
        );
    } else {
        eprintln!("ℹ️  Nothing matched the requested entity types");
    }
    print_warnings(result);
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_requested_types() {
        assert!(requested_types(&[]).is_none());
        let types = vec!["DEFENDANT".to_string()];
        assert_eq!(requested_types(&types).unwrap().len(), 1);
    }

    #[test]
    fn test_output_path_for() {
        let args = AnonymizeDocumentArgs {
            files: vec![],
            entity_types: vec![],
            text_fields: vec![],
            output_dir: None,
        };
        assert_eq!(
            args.output_path_for(Path::new("cases/case-1.json")),
            PathBuf::from("cases/case-1.anonymized.json")
        );

        let args = AnonymizeDocumentArgs {
            output_dir: Some(PathBuf::from("out")),
            ..args
        };
        assert_eq!(
            args.output_path_for(Path::new("cases/case-1.json")),
            PathBuf::from("out/case-1.anonymized.json")
        );
    }

    #[tokio::test]
    async fn test_anonymize_documents_concurrently() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        std::fs::write(&first, json!({"notes": "Victim Chioma lives at 12 Unity Road."}).to_string())
            .unwrap();
        std::fs::write(&second, json!({"statement": "The accused was seen."}).to_string()).unwrap();

        let args = AnonymizeDocumentArgs {
            files: vec![first, second],
            entity_types: vec!["VICTIM".into(), "ADDRESS".into(), "DEFENDANT".into()],
            text_fields: vec![],
            output_dir: Some(dir.path().join("out")),
        };
        let code = args.execute(&LexguardConfig::default()).await.unwrap();
        assert_eq!(code, 0);

        let written: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out/first.anonymized.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            written["value"]["notes"],
            "Victim [REDACTED-VICTIM-1] lives at [REDACTED-ADDRESS-1]."
        );
        assert_eq!(written["record"].as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bad_document_sets_validation_exit_code() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "\"just a string\"").unwrap();

        let args = AnonymizeDocumentArgs {
            files: vec![bad],
            entity_types: vec![],
            text_fields: vec![],
            output_dir: Some(dir.path().join("out")),
        };
        let code = args.execute(&LexguardConfig::default()).await.unwrap();
        assert_eq!(code, 3);
    }
}
