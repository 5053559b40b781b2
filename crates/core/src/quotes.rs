//! Field validation for quote creation and customer input.

use std::collections::HashMap;

use crate::error::CoreError;

/// Maximum length of the customer free-text notes.
pub const MAX_CUSTOMER_NOTES_LEN: usize = 2000;

/// Maximum number of color selections a single merge may carry.
pub const MAX_COLOR_SELECTIONS: usize = 50;

/// Validate the staff-supplied fields of a new or updated quote.
pub fn validate_quote_fields(
    title: &str,
    customer_name: &str,
    customer_email: &str,
) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if customer_name.trim().is_empty() {
        return Err(CoreError::Validation("customer_name is required".into()));
    }
    validate_email(customer_email)
}

/// Minimal e-mail shape check: one `@` with non-empty local and domain parts.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate customer notes attached to a response.
pub fn validate_customer_notes(notes: &str) -> Result<(), CoreError> {
    if notes.len() > MAX_CUSTOMER_NOTES_LEN {
        return Err(CoreError::Validation(format!(
            "notes must be at most {MAX_CUSTOMER_NOTES_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a paint/material color-selection mapping before merging.
///
/// Keys identify a surface or material ("walls", "trim"); values are the
/// chosen color. Insertion order is irrelevant, so a plain map suffices.
pub fn validate_color_selections(colors: &HashMap<String, String>) -> Result<(), CoreError> {
    if colors.is_empty() {
        return Err(CoreError::Validation(
            "paintColors must contain at least one selection".into(),
        ));
    }
    if colors.len() > MAX_COLOR_SELECTIONS {
        return Err(CoreError::Validation(format!(
            "paintColors must contain at most {MAX_COLOR_SELECTIONS} selections"
        )));
    }
    for (key, value) in colors {
        if key.trim().is_empty() {
            return Err(CoreError::Validation(
                "paintColors keys must not be empty".into(),
            ));
        }
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "paintColors value for '{key}' must not be empty"
            )));
        }
    }
    Ok(())
}
