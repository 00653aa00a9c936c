//! Structural checks on inbound user payloads, run before any storage access.

use thiserror::Error;

use crate::auth::dto::UserPayload;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: "is required",
        }
    }

    pub fn forbidden(field: &'static str) -> Self {
        Self {
            field,
            reason: "must not be set",
        }
    }
}

/// Registration payload: username, email and password present; id and
/// hashed password left to the server. Fields are checked in that order and
/// the first violation is reported.
pub fn validate_for_create(user: &UserPayload) -> Result<(), ValidationError> {
    if user.username.is_empty() {
        return Err(ValidationError::missing("username"));
    }
    if user.email.is_empty() {
        return Err(ValidationError::missing("email"));
    }
    if user.password.is_empty() {
        return Err(ValidationError::missing("password"));
    }
    if !user.id.is_empty() {
        return Err(ValidationError::forbidden("id"));
    }
    if user.hashed_password.as_deref().is_some_and(|h| !h.is_empty()) {
        return Err(ValidationError::forbidden("hashedPassword"));
    }
    Ok(())
}

/// Login payload: only email and password are looked at.
pub fn validate_for_login(user: &UserPayload) -> Result<(), ValidationError> {
    if user.email.is_empty() {
        return Err(ValidationError::missing("email"));
    }
    if user.password.is_empty() {
        return Err(ValidationError::missing("password"));
    }
    Ok(())
}
