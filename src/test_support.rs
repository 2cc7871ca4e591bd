use std::time::Duration;

use axum::{
  body::{Body, Bytes},
  http::{Method, Request, StatusCode},
  Router,
};
use prometheus::Registry;
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceExt;

use crate::{
  app::create_app,
  domains::user::{
    repository::{InMemoryUserRepository, UserRepository},
    validation::ValidationPolicy,
  },
  metrics::ApiMetrics,
  state::SharedAppState,
  utils::{error::ValidationError, render::Envelope},
};

pub struct TestApp {
  pub router: Router,
  pub metrics: ApiMetrics,
}

/// Builds an app over a fresh store owned by the calling test. Dropping the
/// returned values discards everything the test wrote.
pub fn app_with_memory_store() -> (TestApp, InMemoryUserRepository) {
  let store = InMemoryUserRepository::new();
  let app = app_with_repository(store.clone(), Duration::from_secs(5));
  (app, store)
}

pub fn app_with_repository<U>(repository: U, storage_timeout: Duration) -> TestApp
where
  U: UserRepository + 'static,
{
  let metrics = ApiMetrics::new(Registry::new()).expect("register metrics");
  let state = SharedAppState::with_repository(
    repository,
    ValidationPolicy::default(),
    storage_timeout,
    metrics.clone(),
  );

  TestApp {
    router: create_app(state),
    metrics,
  }
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let body = serde_json::to_string(body).expect("serialize request body");
  send(app, Method::POST, uri, &body).await
}

pub async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .expect("build request");

  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}

pub fn read_success<T: DeserializeOwned>(body: &Bytes) -> T {
  match serde_json::from_slice::<Envelope<T>>(body).expect("deserialize envelope") {
    Envelope::Data(data) => data,
    Envelope::Errors(errors) => panic!("expected success envelope, got errors: {:?}", errors),
  }
}

pub fn read_errors(body: &Bytes) -> Vec<ValidationError> {
  match serde_json::from_slice::<Envelope<serde_json::Value>>(body).expect("deserialize envelope") {
    Envelope::Errors(errors) => errors,
    Envelope::Data(data) => panic!("expected error envelope, got data: {}", data),
  }
}
