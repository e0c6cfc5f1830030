use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::infrastructure::settings::Settings;

pub(crate) fn apply_body_limit(router: Router, settings: &Settings) -> Router {
    router.layer(RequestBodyLimitLayer::new(
        settings.http_request_body_limit_bytes,
    ))
}
