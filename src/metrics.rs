//! Prometheus counters for rendered API responses.

use axum::{
  extract::State,
  http::{header, StatusCode},
  response::{IntoResponse, Response},
};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::state::SharedAppState;

/// Counts every response rendered through the envelope, labelled by endpoint
/// name and HTTP status code.
///
/// - **Name**: `api_responses_total`
/// - **Labels**: `endpoint_name`, `code`
#[derive(Clone)]
pub struct ApiMetrics {
  registry: Registry,
  responses_total: IntCounterVec,
}

impl ApiMetrics {
  pub fn new(registry: Registry) -> Result<Self, prometheus::Error> {
    let responses_total = IntCounterVec::new(
      Opts::new("api_responses_total", "Total API responses by endpoint and status code"),
      &["endpoint_name", "code"],
    )?;
    registry.register(Box::new(responses_total.clone()))?;

    Ok(Self {
      registry,
      responses_total,
    })
  }

  pub fn record_response(&self, endpoint_name: &str, status: StatusCode) {
    self
      .responses_total
      .with_label_values(&[endpoint_name, status.as_str()])
      .inc();
  }

  pub fn response_count(&self, endpoint_name: &str, status: StatusCode) -> u64 {
    self
      .responses_total
      .with_label_values(&[endpoint_name, status.as_str()])
      .get()
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }
}

pub async fn metrics_handler(State(state): State<SharedAppState>) -> Response {
  let encoder = TextEncoder::new();
  let mut buffer = Vec::new();

  if let Err(e) = encoder.encode(&state.metrics.registry().gather(), &mut buffer) {
    tracing::error!(error = %e, "Failed to encode metrics");
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  }

  ([(header::CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response()
}
