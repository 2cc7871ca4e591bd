//! Client-facing failures of the user endpoints.
//!
//! Each constructor yields a [`ValidationError`] whose code stays fixed no
//! matter which check detects the condition.

use crate::utils::error::{ErrorCode, ValidationError};

pub fn invalid_body() -> ValidationError {
  ValidationError::new(
    ErrorCode::InvalidBody,
    "Request body must be a JSON object with string fields \"email\" and \"password\"",
  )
}

pub fn password_too_short(min_length: usize) -> ValidationError {
  ValidationError::new(
    ErrorCode::PasswordTooShort,
    format!("Password must be at least {} characters long", min_length),
  )
}

pub fn email_already_exists(email: &str) -> ValidationError {
  ValidationError::new(
    ErrorCode::EmailAlreadyExists,
    format!("A user with email {} already exists", email),
  )
  .with_email(email)
}
