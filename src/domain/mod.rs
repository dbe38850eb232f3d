//! Domain types shared across Lexguard.
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, LexguardError>`]:
//!
//! ```rust
//! use lexguard::domain::{LexguardError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = lexguard::config::load_config("lexguard.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::LexguardError;
pub use result::Result;
