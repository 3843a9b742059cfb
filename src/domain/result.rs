//! Result type alias for lastseen

use super::errors::SyncError;

/// Result type alias for lastseen operations
///
/// # Examples
///
/// ```
/// use lastseen::domain::result::Result;
/// use lastseen::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
