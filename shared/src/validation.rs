//! Input validation functions
//!
//! Request bodies are validated with the `validator` derive macros; this
//! module turns their reports into a single user-facing message and holds
//! the checks used when provisioning accounts.

use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Validate password strength for newly provisioned accounts
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Normalize a role name: trimmed and lowercase
pub fn normalize_role(role: &str) -> Option<String> {
    let role = role.trim();
    if role.is_empty() {
        return None;
    }
    Some(role.to_lowercase())
}

/// Validation error with field context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Collapse a `validator` report into the first failing field
    ///
    /// Fields are visited in name order so the reported error is stable.
    pub fn from_report(errors: &ValidationErrors) -> Option<Self> {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields.into_iter().find_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                ValidationError::new(&field[..], &message)
            })
        })
    }
}

/// Run derive-based validation and return the first failing field
pub fn validate_request<T: Validate>(value: &T) -> Result<(), ValidationError> {
    value.validate().map_err(|errors| {
        ValidationError::from_report(&errors)
            .unwrap_or_else(|| ValidationError::new("body", "request body is invalid"))
    })
}
