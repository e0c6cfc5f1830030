use axum::{Json, Router, middleware, routing::get};
use serde::Serialize;

use super::{AppState, routes};
use crate::presentation::middleware::auth::jwt_identify_middleware;

pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_identify_middleware,
        ))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
