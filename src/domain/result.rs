//! Result type alias
//!
//! Fallible operations that can abort a whole command return this alias.

use super::errors::AppError;

/// Result type alias using [`AppError`] as the error type
///
/// # Examples
///
/// ```
/// use remarkable_dayone::domain::result::Result;
/// use remarkable_dayone::domain::errors::AppError;
///
/// fn failing_function() -> Result<()> {
///     Err(AppError::Configuration("no notebook selected".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, AppError>;
