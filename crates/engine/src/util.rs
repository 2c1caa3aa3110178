//! Internal helpers for payload validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every service enforces the same rules.

use crate::{EngineError, ResultEngine};

/// Max length of a username, in characters.
pub(crate) const USERNAME_MAX_LEN: usize = 25;

/// Trim a required name and reject it when empty.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Usernames are stored and matched exactly, so surrounding whitespace is
/// rejected instead of trimmed.
pub(crate) fn validate_username(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }
    if trimmed.len() != value.len() {
        return Err(EngineError::InvalidInput(
            "username must not start or end with whitespace".to_string(),
        ));
    }
    if value.chars().count() > USERNAME_MAX_LEN {
        return Err(EngineError::InvalidInput(format!(
            "username must be at most {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(value.to_string())
}

/// Loose `local@domain.tld` check used on login.
///
/// Deliverability is not checked.
pub(crate) fn is_email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut labels = domain.split('.');
    let valid_labels = labels.clone().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    // At least two labels: `domain.tld`.
    valid_labels && labels.next().is_some() && labels.next().is_some()
}

/// Reject non-positive quantities.
pub(crate) fn validate_quantity(quantity: i64) -> ResultEngine<i64> {
    if quantity <= 0 {
        return Err(EngineError::InvalidInput(
            "quantity must be > 0".to_string(),
        ));
    }
    Ok(quantity)
}
