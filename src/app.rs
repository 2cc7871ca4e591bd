use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{domains::user::rest::user_routes, metrics::metrics_handler, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .route("/metrics", get(metrics_handler))
    .nest("/api", user_routes())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
