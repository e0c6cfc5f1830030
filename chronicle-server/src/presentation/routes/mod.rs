use axum::Router;

use super::AppState;

pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod posts;
pub(crate) mod profiles;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router())
        .merge(posts::router(state.clone()))
        .merge(comments::router(state.clone()))
        .merge(profiles::router(state))
}
