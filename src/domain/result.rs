//! Result type alias for Lexguard

use super::errors::LexguardError;

/// Result type alias for Lexguard operations
///
/// # Examples
///
/// ```
/// use lexguard::domain::result::Result;
/// use lexguard::domain::errors::LexguardError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LexguardError::validation("document", "must be an object"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LexguardError>;
