pub mod bin;
pub mod forum;
pub mod log;
pub mod profile;
pub mod task;
pub mod tip;

use crate::error::CompostServiceError;

/// Trim a required text field and enforce its maximum length in characters.
pub(crate) fn required_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> Result<String, CompostServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CompostServiceError::validation(format!(
            "{field} is required"
        )));
    }
    if value.chars().count() > max_len {
        return Err(CompostServiceError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_owned())
}
