use serde::{Deserialize, Serialize};

/// Stable identifiers clients can match on across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ErrorCode {
  InvalidBody,
  PasswordTooShort,
  EmailAlreadyExists,
}

impl ErrorCode {
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorCode::InvalidBody => "InvalidBody",
      ErrorCode::PasswordTooShort => "PasswordTooShort",
      ErrorCode::EmailAlreadyExists => "EmailAlreadyExists",
    }
  }
}

/// A single client-facing failure. Compared structurally, so two errors built
/// by the same catalog constructor with the same input are equal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationError {
  pub code: ErrorCode,
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

impl ValidationError {
  pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
      email: None,
    }
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }
}
