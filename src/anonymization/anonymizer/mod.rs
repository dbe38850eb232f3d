//! Token minting and redaction passes

pub mod redaction;
pub mod token_mapper;

pub use redaction::{RedactionPass, TRANSCRIPT_ENTRIES_FIELD};
pub use token_mapper::TokenMapper;
