use async_trait::async_trait;
use std::{error::Error, time::Duration};

use super::{
  errors,
  model::{CreateUserRequest, User},
  repository::{RepositoryError, UserRepository},
  validation::{validate_create_user, ValidationPolicy},
};
use crate::{impl_service_error_conversions, utils::error::ValidationError};

#[derive(Debug)]
pub enum UserServiceError {
  /// Client input was rejected; never empty.
  ValidationError(Vec<ValidationError>),
  InternalServerError(String),
}

impl Error for UserServiceError {}

impl std::fmt::Display for UserServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UserServiceError::ValidationError(errors) => {
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        write!(f, "Validation Error: {}", codes.join(", "))
      }
      UserServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(UserServiceError, InternalServerError);

#[async_trait]
pub trait UserService: Send + Sync {
  async fn create_user(&self, req: CreateUserRequest) -> Result<User, UserServiceError>;
}

pub struct UserServiceImpl<U> {
  user_repository: U,
  policy: ValidationPolicy,
  storage_timeout: Duration,
}

impl<U> UserServiceImpl<U>
where
  U: UserRepository,
{
  pub fn new(user_repository: U, policy: ValidationPolicy, storage_timeout: Duration) -> Self {
    Self {
      user_repository,
      policy,
      storage_timeout,
    }
  }

  fn deadline_exceeded(&self, operation: &str) -> UserServiceError {
    UserServiceError::InternalServerError(format!("{} timed out after {:?}", operation, self.storage_timeout))
  }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
  U: UserRepository,
{
  async fn create_user(&self, req: CreateUserRequest) -> Result<User, UserServiceError> {
    let violations = tokio::time::timeout(
      self.storage_timeout,
      validate_create_user(&self.user_repository, &req, &self.policy),
    )
    .await
    .map_err(|_| self.deadline_exceeded("User validation"))??;

    if !violations.is_empty() {
      return Err(UserServiceError::ValidationError(violations));
    }

    let email = self.policy.normalize_email(&req.email);
    let credential = crate::utils::hash_password(&req.password);

    let created = tokio::time::timeout(self.storage_timeout, self.user_repository.create(&email, &credential))
      .await
      .map_err(|_| self.deadline_exceeded("User insert"))?;

    match created {
      Ok(user) => {
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
      }
      // Another request stored the same email after our lookup.
      Err(RepositoryError::Conflict(constraint)) => {
        tracing::info!(%constraint, "Email claimed concurrently, reporting duplicate");
        Err(UserServiceError::ValidationError(vec![errors::email_already_exists(&req.email)]))
      }
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domains::user::repository::InMemoryUserRepository;

  const TIMEOUT: Duration = Duration::from_secs(5);

  fn request(email: &str, password: &str) -> CreateUserRequest {
    CreateUserRequest {
      email: email.to_string(),
      password: password.to_string(),
    }
  }

  struct SlowRepository;

  #[async_trait]
  impl UserRepository for SlowRepository {
    async fn create(&self, _email: &str, _credential: &str) -> Result<User, RepositoryError> {
      tokio::time::sleep(Duration::from_secs(60)).await;
      Err(RepositoryError::DatabaseError("unreachable".to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, RepositoryError> {
      tokio::time::sleep(Duration::from_secs(60)).await;
      Ok(None)
    }
  }

  #[tokio::test]
  async fn test_create_user_stores_hashed_credential() -> Result<(), Box<dyn std::error::Error>> {
    let repo = InMemoryUserRepository::new();
    let service = UserServiceImpl::new(repo.clone(), ValidationPolicy::default(), TIMEOUT);

    let user = service.create_user(request("test@example.com", "password123")).await?;

    assert_ne!(user.id, 0);
    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.password, crate::utils::hash_password("password123"));
    assert_eq!(repo.find_by_email("test@example.com").await?, Some(user));
    Ok(())
  }

  #[tokio::test]
  async fn test_create_user_twice_reports_duplicate() -> Result<(), Box<dyn std::error::Error>> {
    let service = UserServiceImpl::new(InMemoryUserRepository::new(), ValidationPolicy::default(), TIMEOUT);
    service.create_user(request("twice@example.com", "password123")).await?;

    let result = service.create_user(request("twice@example.com", "password123")).await;
    match result {
      Err(UserServiceError::ValidationError(found)) => {
        assert_eq!(found, vec![errors::email_already_exists("twice@example.com")])
      }
      other => panic!("Expected duplicate email error, got {:?}", other),
    }
    Ok(())
  }

  #[tokio::test]
  async fn test_case_insensitive_policy_stores_lowercase() -> Result<(), Box<dyn std::error::Error>> {
    let repo = InMemoryUserRepository::new();
    let policy = ValidationPolicy {
      email_case_sensitive: false,
      ..ValidationPolicy::default()
    };
    let service = UserServiceImpl::new(repo.clone(), policy, TIMEOUT);

    let user = service.create_user(request("Mixed@Example.com", "password123")).await?;
    assert_eq!(user.email, "mixed@example.com");

    let result = service.create_user(request("MIXED@example.com", "password123")).await;
    assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    assert_eq!(repo.len().await, 1);
    Ok(())
  }

  #[tokio::test(start_paused = true)]
  async fn test_slow_storage_times_out() {
    let service = UserServiceImpl::new(SlowRepository, ValidationPolicy::default(), TIMEOUT);

    let result = service.create_user(request("slow@example.com", "password123")).await;
    match result {
      Err(UserServiceError::InternalServerError(msg)) => assert!(msg.contains("timed out")),
      other => panic!("Expected timeout, got {:?}", other),
    }
  }

  #[test]
  fn test_display_lists_codes() {
    let err = UserServiceError::ValidationError(vec![
      errors::password_too_short(6),
      errors::email_already_exists("a@example.com"),
    ]);
    assert_eq!(err.to_string(), "Validation Error: PasswordTooShort, EmailAlreadyExists");
  }

  #[test]
  fn test_unexpected_conflict_is_internal() {
    let err: UserServiceError = RepositoryError::Conflict("some_other_key".to_string()).into();
    assert!(matches!(err, UserServiceError::InternalServerError(_)));
  }
}
