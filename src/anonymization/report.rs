//! Detection dry-run reporting
//!
//! A [`DetectionReport`] summarizes what a call would redact without minting
//! tokens. It carries offsets and counts only; matched literals never appear in it.

use crate::anonymization::models::{EngineWarning, Match};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One span that would be redacted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSpan {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
}

/// Dry-run report for one piece of text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Entity types the call asked for, in caller order
    pub requested_types: Vec<String>,

    /// Total spans that would be redacted
    pub total_matches: usize,

    /// Spans per entity type
    pub matches_by_type: BTreeMap<String, usize>,

    /// Span offsets in position order
    pub spans: Vec<DetectedSpan>,

    /// Non-fatal diagnostics
    pub warnings: Vec<EngineWarning>,
}

impl DetectionReport {
    /// Build a report from resolved matches
    pub fn new(requested_types: Vec<String>, matches: &[Match], warnings: Vec<EngineWarning>) -> Self {
        let mut matches_by_type = BTreeMap::new();
        for m in matches {
            *matches_by_type.entry(m.entity_type.clone()).or_insert(0) += 1;
        }

        Self {
            requested_types,
            total_matches: matches.len(),
            matches_by_type,
            spans: matches
                .iter()
                .map(|m| DetectedSpan {
                    entity_type: m.entity_type.clone(),
                    start: m.start,
                    end: m.end,
                })
                .collect(),
            warnings,
        }
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                  REDACTION DRY-RUN REPORT                     \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Entity Types Requested:      {}\n",
            self.requested_types.join(", ")
        ));
        output.push_str(&format!(
            "  Spans To Redact:             {}\n",
            self.total_matches
        ));
        output.push('\n');

        if !self.matches_by_type.is_empty() {
            output.push_str("🔍 SPANS BY ENTITY TYPE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut types: Vec<_> = self.matches_by_type.iter().collect();
            types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (entity_type, count) in types {
                output.push_str(&format!("  {:30} {:>5}\n", entity_type, count));
            }
            output.push('\n');

            output.push_str("📍 SPAN OFFSETS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for span in &self.spans {
                output.push_str(&format!(
                    "  {:30} {:>6}..{:<6}\n",
                    span.entity_type, span.start, span.end
                ));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matches() -> Vec<Match> {
        vec![
            Match {
                entity_type: "DEFENDANT".to_string(),
                start: 4,
                end: 13,
                literal: "defendant".to_string(),
            },
            Match {
                entity_type: "DEFENDANT".to_string(),
                start: 14,
                end: 20,
                literal: "Chukwu".to_string(),
            },
            Match {
                entity_type: "WITNESS".to_string(),
                start: 34,
                end: 41,
                literal: "witness".to_string(),
            },
        ]
    }

    #[test]
    fn test_counts_by_type() {
        let report = DetectionReport::new(vec!["DEFENDANT".to_string()], &sample_matches(), vec![]);
        assert_eq!(report.total_matches, 3);
        assert_eq!(report.matches_by_type["DEFENDANT"], 2);
        assert_eq!(report.matches_by_type["WITNESS"], 1);
        assert_eq!(report.spans[1].start, 14);
    }

    #[test]
    fn test_report_never_contains_literals() {
        let report = DetectionReport::new(
            vec!["DEFENDANT".to_string(), "WITNESS".to_string()],
            &sample_matches(),
            vec![],
        );
        let console = report.format_console();
        let json = serde_json::to_string(&report).unwrap();
        for text in [console, json] {
            assert!(!text.contains("Chukwu"));
        }
    }

    #[test]
    fn test_console_lists_warnings() {
        let report = DetectionReport::new(
            vec!["JUDGE".to_string()],
            &[],
            vec![EngineWarning::UnknownEntityType {
                entity_type: "JUDGE".to_string(),
            }],
        );
        let console = report.format_console();
        assert!(console.contains("WARNINGS"));
        assert!(console.contains("unknown entity type 'JUDGE' ignored"));
        assert!(!console.contains("SPANS BY ENTITY TYPE"));
    }
}
