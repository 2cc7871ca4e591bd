use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
  pub id: i32,
  pub email: String,
  pub password: String,
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
  pub email: String,
  pub password: String,
}

/// Success payload of `POST /api/users`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreatedUser {
  pub id: i32,
}

impl From<&User> for CreatedUser {
  fn from(user: &User) -> Self {
    Self { id: user.id }
  }
}

impl User {
  /// Inserts a user with an already derived credential. Relies on the
  /// `users_email_key` constraint to reject duplicates.
  pub async fn create_with_executor<'e, E>(executor: E, email: &str, credential: &str) -> Result<User, sqlx::Error>
  where
    E: PgExecutor<'e>,
  {
    sqlx::query_as::<_, User>(
      r#"
            INSERT INTO users (email, password)
            VALUES ($1, $2)
            RETURNING id, email, password, created_at
            "#,
    )
    .bind(email)
    .bind(credential)
    .fetch_one(executor)
    .await
  }

  pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
  where
    E: PgExecutor<'e>,
  {
    sqlx::query_as::<_, User>(r#"SELECT id, email, password, created_at FROM users WHERE email = $1"#)
      .bind(email)
      .fetch_optional(executor)
      .await
  }
}
