//! CLI command implementations
//!
//! This module contains all CLI command implementations and the small I/O
//! helpers they share. Artifacts go to stdout or `--output`; status lines go to
//! stderr so output stays pipeable.

pub mod anonymize;
pub mod deanonymize;
pub mod entities;
pub mod init;
pub mod validate;

use crate::anonymization::RedactionEngine;
use crate::config::LexguardConfig;
use crate::domain::{LexguardError, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Build the engine described by the loaded configuration
pub(crate) fn build_engine(config: &LexguardConfig) -> Result<RedactionEngine> {
    RedactionEngine::new(&config.engine, config.policy.clone())
}

/// Print an error and map it to the process exit code
pub fn report_error(context: &str, err: &LexguardError) -> i32 {
    crate::log_error_with_context!(err, context);
    eprintln!("❌ {context}");
    eprintln!("   Error: {err}");
    err.exit_code()
}

/// Read a file, or stdin when no path is given
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            LexguardError::Io(format!("Failed to read {}: {e}", path.display()))
        }),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Parse JSON input, naming the offending source on failure
pub(crate) fn parse_json(content: &str, source: &str) -> Result<Value> {
    serde_json::from_str(content)
        .map_err(|e| LexguardError::validation(source, format!("invalid JSON: {e}")))
}

/// Write pretty JSON to a file, or stdout when no path is given
pub(crate) fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

/// Write text to a file, or stdout when no path is given
pub(crate) fn write_text(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, format!("{content}\n")).map_err(|e| {
                LexguardError::Io(format!("Failed to write {}: {e}", path.display()))
            })
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_parse_json_error_is_validation() {
        let err = parse_json("{not json", "case.json").unwrap_err();
        assert!(matches!(err, LexguardError::Validation { ref field, .. } if field == "case.json"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("doc.json");
        write_json(Some(&path), &json!({"a": 1})).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["a"], 1);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = read_input(Some(Path::new("/nonexistent/input.txt"))).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
