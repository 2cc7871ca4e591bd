use anyhow::Context;
use prometheus::Registry;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use dotenvy::dotenv;

use user_signup_api::app::create_app;
use user_signup_api::config::Config;
use user_signup_api::db::pool::create_pool;
use user_signup_api::domains::user::repository::InMemoryUserRepository;
use user_signup_api::metrics::ApiMetrics;
use user_signup_api::state::SharedAppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = Config::from_env()?;
  let metrics = ApiMetrics::new(Registry::new()).context("Failed to register metrics")?;

  let app_state = match config.database_url.as_deref() {
    Some(database_url) => {
      let pool = create_pool(database_url, &config).await?;
      sqlx::migrate!("./migrations").run(&pool).await?;
      tracing::info!("Database migrations applied successfully");
      SharedAppState::new(pool, &config, metrics)
    }
    None => {
      tracing::warn!("DATABASE_URL is not set, users are kept in memory and lost on restart");
      SharedAppState::with_repository(
        InMemoryUserRepository::new(),
        config.validation_policy(),
        config.storage_timeout,
        metrics,
      )
    }
  };
  let app = create_app(app_state);

  let listener = tokio::net::TcpListener::bind(&config.bind_addr)
    .await
    .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

  tracing::info!("Server running on http://{}", config.bind_addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("Failed to install signal handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
