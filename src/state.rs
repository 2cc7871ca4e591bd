use std::{sync::Arc, time::Duration};

use sqlx::PgPool;

use crate::{
  config::Config,
  domains::user::{
    model::{CreateUserRequest, User},
    repository::{SqlxUserRepository, UserRepository},
    service::{UserService, UserServiceError, UserServiceImpl},
    validation::ValidationPolicy,
  },
  metrics::ApiMetrics,
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn create_user(
    &self,
    req: CreateUserRequest,
  ) -> impl std::future::Future<Output = Result<User, UserServiceError>> + Send;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub user_service: Arc<dyn UserService>,
  pub metrics: ApiMetrics,
}

impl SharedAppState {
  pub fn new(pool: PgPool, config: &Config, metrics: ApiMetrics) -> Self {
    Self::with_repository(
      SqlxUserRepository::new(pool),
      config.validation_policy(),
      config.storage_timeout,
      metrics,
    )
  }

  pub fn with_repository<U>(
    user_repository: U,
    policy: ValidationPolicy,
    storage_timeout: Duration,
    metrics: ApiMetrics,
  ) -> Self
  where
    U: UserRepository + 'static,
  {
    let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(user_repository, policy, storage_timeout));

    Self { user_service, metrics }
  }
}

impl AppState for SharedAppState {
  async fn create_user(&self, req: CreateUserRequest) -> Result<User, UserServiceError> {
    self.user_service.create_user(req).await
  }
}
