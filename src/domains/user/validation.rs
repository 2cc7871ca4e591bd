//! Ordered checks for `POST /api/users`.
//!
//! 1. body well-formedness ([`parse_body`]), which short-circuits everything else
//! 2. password length ([`check_password`])
//! 3. email uniqueness ([`check_email_available`])
//!
//! Rules 2 and 3 are always both evaluated so one response can report every
//! violation.

use std::borrow::Cow;

use validator::ValidateLength;

use super::{errors, model::CreateUserRequest, repository::RepositoryError, repository::UserRepository};
use crate::utils::error::ValidationError;

pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
  pub password_min_length: usize,
  /// When false, emails are lower-cased before lookup and storage.
  pub email_case_sensitive: bool,
}

impl Default for ValidationPolicy {
  fn default() -> Self {
    Self {
      password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
      email_case_sensitive: true,
    }
  }
}

impl ValidationPolicy {
  /// The form of `email` used as the storage key.
  pub fn normalize_email<'a>(&self, email: &'a str) -> Cow<'a, str> {
    if self.email_case_sensitive {
      Cow::Borrowed(email)
    } else {
      Cow::Owned(email.to_lowercase())
    }
  }
}

pub fn parse_body(body: &[u8]) -> Result<CreateUserRequest, ValidationError> {
  serde_json::from_slice(body).map_err(|e| {
    tracing::debug!(error = %e, "Rejecting unparseable request body");
    errors::invalid_body()
  })
}

pub fn check_password(req: &CreateUserRequest, policy: &ValidationPolicy) -> Option<ValidationError> {
  let min = policy.password_min_length as u64;
  if req.password.validate_length(Some(min), None, None) {
    None
  } else {
    Some(errors::password_too_short(policy.password_min_length))
  }
}

pub async fn check_email_available<R>(
  repository: &R,
  req: &CreateUserRequest,
  policy: &ValidationPolicy,
) -> Result<Option<ValidationError>, RepositoryError>
where
  R: UserRepository + ?Sized,
{
  let email = policy.normalize_email(&req.email);
  let existing = repository.find_by_email(&email).await?;
  Ok(existing.map(|_| errors::email_already_exists(&req.email)))
}

/// Runs rules 2 and 3 and returns every violation in rule order. A storage
/// failure is returned as `Err`, never as an empty error list.
pub async fn validate_create_user<R>(
  repository: &R,
  req: &CreateUserRequest,
  policy: &ValidationPolicy,
) -> Result<Vec<ValidationError>, RepositoryError>
where
  R: UserRepository + ?Sized,
{
  let password = check_password(req, policy);
  let email = check_email_available(repository, req, policy).await?;

  Ok(password.into_iter().chain(email).collect())
}
