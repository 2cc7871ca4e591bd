use axum::{
  body::Bytes,
  extract::{rejection::BytesRejection, State},
  http::StatusCode,
  response::Response,
  routing::{post, Router},
};

use super::{errors, model::CreatedUser, service::UserServiceError, validation};
use crate::{
  state::{AppState, SharedAppState},
  utils::render::{render_error, render_status, render_success},
};

pub const CREATE_USER_ENDPOINT: &str = "users#create";

/// Binds `POST /users`. Any other method on the path gets an empty `405`.
pub fn user_routes() -> Router<SharedAppState> {
  Router::new().route(
    "/users",
    post(create_user_handler).fallback(create_user_method_not_allowed),
  )
}

pub async fn create_user_handler(
  State(state): State<SharedAppState>,
  body: Result<Bytes, BytesRejection>,
) -> Response {
  // Bodies the extractor refuses to buffer (e.g. over the size limit) are
  // reported like any other unparseable body.
  let body = match body {
    Ok(body) => body,
    Err(rejection) => {
      tracing::debug!(error = %rejection, "Rejecting unreadable request body");
      return render_error(
        &state.metrics,
        CREATE_USER_ENDPOINT,
        StatusCode::BAD_REQUEST,
        vec![errors::invalid_body()],
      );
    }
  };

  let payload = match validation::parse_body(&body) {
    Ok(payload) => payload,
    Err(err) => return render_error(&state.metrics, CREATE_USER_ENDPOINT, StatusCode::BAD_REQUEST, vec![err]),
  };

  match state.create_user(payload).await {
    Ok(user) => render_success(&state.metrics, CREATE_USER_ENDPOINT, CreatedUser::from(&user)),
    Err(UserServiceError::ValidationError(violations)) => {
      tracing::debug!(?violations, "Rejected user creation");
      render_error(&state.metrics, CREATE_USER_ENDPOINT, StatusCode::BAD_REQUEST, violations)
    }
    Err(UserServiceError::InternalServerError(msg)) => {
      tracing::error!(error = %msg, "Failed to create user");
      render_status(&state.metrics, CREATE_USER_ENDPOINT, StatusCode::INTERNAL_SERVER_ERROR)
    }
  }
}

async fn create_user_method_not_allowed(State(state): State<SharedAppState>) -> Response {
  render_status(&state.metrics, CREATE_USER_ENDPOINT, StatusCode::METHOD_NOT_ALLOWED)
}
