use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::Mutex;

use super::model::User;

#[derive(Debug)]
pub enum RepositoryError {
  DatabaseError(String),
  /// A uniqueness constraint rejected the write.
  Conflict(String),
}

impl std::error::Error for RepositoryError {}

impl std::fmt::Display for RepositoryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
      RepositoryError::Conflict(msg) => write!(f, "Conflict: {}", msg),
    }
  }
}

impl From<sqlx::Error> for RepositoryError {
  fn from(err: sqlx::Error) -> Self {
    match err {
      sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
        RepositoryError::Conflict(db_err.constraint().unwrap_or("unique constraint").to_string())
      }
      other => RepositoryError::DatabaseError(other.to_string()),
    }
  }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Stores a new user. Returns [`RepositoryError::Conflict`] when the email
  /// is already taken.
  async fn create(&self, email: &str, credential: &str) -> Result<User, RepositoryError>;
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

pub struct SqlxUserRepository {
  pub pool: PgPool,
}

impl SqlxUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
  async fn create(&self, email: &str, credential: &str) -> Result<User, RepositoryError> {
    Ok(User::create_with_executor(&self.pool, email, credential).await?)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
    Ok(User::find_by_email(&self.pool, email).await?)
  }
}

#[derive(Default)]
struct MemoryStore {
  users: HashMap<String, User>,
  last_id: i32,
}

/// Process-local store with the same uniqueness guarantee as the `users`
/// table. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
  store: Arc<Mutex<MemoryStore>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn len(&self) -> usize {
    self.store.lock().await.users.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, email: &str, credential: &str) -> Result<User, RepositoryError> {
    let mut store = self.store.lock().await;
    if store.users.contains_key(email) {
      return Err(RepositoryError::Conflict("users_email_key".to_string()));
    }

    store.last_id += 1;
    let user = User {
      id: store.last_id,
      email: email.to_string(),
      password: credential.to_string(),
      created_at: Some(Utc::now()),
    };
    store.users.insert(user.email.clone(), user.clone());

    Ok(user)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
    Ok(self.store.lock().await.users.get(email).cloned())
  }
}
