//! Input validation shared by the route handlers

use crate::error::ApiError;

/// Minimum length of person names and course labels
pub const MIN_NAME_LENGTH: usize = 3;
/// Maximum allowed length of any free-text field
pub const MAX_FIELD_LENGTH: usize = 128;
/// Minimum allowed password length
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Validate a required text field has at least `min` characters
pub fn validate_text(field: &str, value: &str, min: usize) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    if len < min {
        return Err(ApiError::Validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > MAX_FIELD_LENGTH {
        return Err(ApiError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_FIELD_LENGTH
        )));
    }
    Ok(())
}

/// Validate an email address has a non-empty local part and domain
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }
    if email.len() > MAX_FIELD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Email exceeds maximum length of {} characters",
            MAX_FIELD_LENGTH
        )));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::Validation(format!("Invalid email address: {}", email)));
    }
    Ok(())
}

/// Validate a new password's length
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Validate a numeric course field is not negative
pub fn validate_non_negative(field: &str, value: i64) -> Result<(), ApiError> {
    if value < 0 {
        return Err(ApiError::Validation(format!("{} cannot be negative", field)));
    }
    Ok(())
}
