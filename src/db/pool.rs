use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;

pub async fn create_pool(database_url: &str, config: &Config) -> anyhow::Result<PgPool> {
  PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .acquire_timeout(config.storage_timeout)
    .connect(database_url)
    .await
    .context("Failed to connect to Postgres")
}
