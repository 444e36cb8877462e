//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a keyword has at least one visible character and no control characters.
///
/// Length limits depend on configuration and are enforced by the services.
///
/// # Examples
///
/// ```ignore
/// validate_keyword("tin hoc") // Ok
/// validate_keyword("   ")     // Err - blank
/// validate_keyword("ab\u{7}") // Err - control character
/// ```
pub fn validate_keyword(keyword: &str) -> Result<(), ValidationError> {
    if keyword.chars().all(char::is_whitespace) {
        let mut err = ValidationError::new("keyword_blank");
        err.message = Some("Keyword must contain at least one letter".into());
        return Err(err);
    }

    if keyword
        .chars()
        .any(|c| c.is_control() && !c.is_whitespace())
    {
        let mut err = ValidationError::new("keyword_format");
        err.message = Some("Keyword must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that an attached document declares a MIME type of the form `type/subtype`.
pub fn validate_mime_type(mime_type: &str) -> Result<(), ValidationError> {
    match mime_type.split_once('/') {
        Some((kind, subtype)) if !kind.trim().is_empty() && !subtype.trim().is_empty() => Ok(()),
        _ => {
            let mut err = ValidationError::new("mime_type_format");
            err.message = Some(format!("`{mime_type}` is not a MIME type").into());
            Err(err)
        }
    }
}
