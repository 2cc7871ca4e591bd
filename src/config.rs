use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, Result};

use crate::domains::user::validation::{ValidationPolicy, DEFAULT_PASSWORD_MIN_LENGTH};

#[derive(Debug, Clone)]
pub struct Config {
  pub bind_addr: String,
  /// Without a database URL the service keeps users in memory.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub storage_timeout: Duration,
  pub password_min_length: usize,
  pub email_case_sensitive: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      bind_addr: "0.0.0.0:8000".to_string(),
      database_url: None,
      database_max_connections: 5,
      storage_timeout: Duration::from_millis(5000),
      password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
      email_case_sensitive: true,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let defaults = Self::default();

    Ok(Self {
      bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
      database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
      database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections)?,
      storage_timeout: Duration::from_millis(parse_var("STORAGE_TIMEOUT_MS", 5000u64)?),
      password_min_length: parse_var("PASSWORD_MIN_LENGTH", defaults.password_min_length)?,
      email_case_sensitive: parse_var("EMAIL_CASE_SENSITIVE", defaults.email_case_sensitive)?,
    })
  }

  pub fn validation_policy(&self) -> ValidationPolicy {
    ValidationPolicy {
      password_min_length: self.password_min_length,
      email_case_sensitive: self.email_case_sensitive,
    }
  }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
    Err(_) => Ok(default),
  }
}
