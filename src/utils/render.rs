use axum::{
  body::Body,
  http::{header, StatusCode},
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::metrics::ApiMetrics;

/// Wire envelope shared by every endpoint: `{"data": ...}` on success,
/// `{"errors": [...]}` otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope<T> {
  Data(T),
  Errors(Vec<ValidationError>),
}

pub fn render_success<T: Serialize>(metrics: &ApiMetrics, endpoint_name: &str, payload: T) -> Response {
  render(metrics, endpoint_name, StatusCode::OK, &Envelope::Data(payload))
}

pub fn render_error(
  metrics: &ApiMetrics,
  endpoint_name: &str,
  status_code: StatusCode,
  errors: Vec<ValidationError>,
) -> Response {
  debug_assert!(!errors.is_empty(), "error envelope rendered without errors");
  render::<()>(metrics, endpoint_name, status_code, &Envelope::Errors(errors))
}

/// Renders a bodiless response, used where no envelope applies (method
/// mismatch, storage faults).
pub fn render_status(metrics: &ApiMetrics, endpoint_name: &str, status_code: StatusCode) -> Response {
  metrics.record_response(endpoint_name, status_code);
  status_code.into_response()
}

fn render<T: Serialize>(
  metrics: &ApiMetrics,
  endpoint_name: &str,
  status_code: StatusCode,
  envelope: &Envelope<T>,
) -> Response {
  let body = match serde_json::to_vec(envelope) {
    Ok(body) => body,
    Err(e) => {
      // The payload is always built by handler code, never by the client.
      tracing::error!(
        endpoint_name,
        status = status_code.as_u16(),
        error = %e,
        "Response passed to render was not serializable"
      );
      return render_status(metrics, endpoint_name, StatusCode::INTERNAL_SERVER_ERROR);
    }
  };

  metrics.record_response(endpoint_name, status_code);

  // The body is written by hyper after the handler returns; a client that
  // disconnects mid-write fails inside the `axum::serve` connection task and
  // never reaches the handler.
  let mut response = Response::new(Body::from(body));
  *response.status_mut() = status_code;
  response
    .headers_mut()
    .insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
  response
}
