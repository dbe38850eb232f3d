//! Redaction token format
//!
//! Tokens look like `[REDACTED-DEFENDANT-3]`. The format is reserved: the matcher
//! pre-claims every token span before applying detection rules, so no rule can
//! match inside a token and re-anonymizing redacted text changes nothing.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

const TOKEN_PATTERN: &str = r"\[REDACTED-([A-Z][A-Z0-9_]*)-([1-9][0-9]*)\]";

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

/// Build the token for an entity type and ordinal
pub fn format_token(entity_type: &str, ordinal: u64) -> String {
    format!("[REDACTED-{entity_type}-{ordinal}]")
}

/// A token found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOccurrence<'t> {
    /// Byte span of the whole token
    pub span: Range<usize>,
    /// Full token text
    pub token: &'t str,
    /// Entity type embedded in the token
    pub entity_type: &'t str,
    /// Ordinal embedded in the token; `None` if it does not fit in a `u64`
    pub ordinal: Option<u64>,
}

/// Find every well-formed token in `text`, in position order
pub fn find_tokens(text: &str) -> Vec<TokenOccurrence<'_>> {
    token_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let entity_type = caps.get(1)?;
            let ordinal = caps.get(2)?;
            Some(TokenOccurrence {
                span: whole.range(),
                token: whole.as_str(),
                entity_type: entity_type.as_str(),
                ordinal: ordinal.as_str().parse().ok(),
            })
        })
        .collect()
}

/// Whether `candidate` is exactly one well-formed token
pub fn is_token(candidate: &str) -> bool {
    token_regex()
        .find(candidate)
        .is_some_and(|m| m.start() == 0 && m.end() == candidate.len())
}
