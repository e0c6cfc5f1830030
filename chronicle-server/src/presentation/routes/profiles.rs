use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::handlers::profiles::{edit_profile, edit_profile_form, profile};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/profile/{username}/", get(profile));

    let protected = Router::new()
        .route(
            "/profile/edit/{username}/",
            get(edit_profile_form).post(edit_profile),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
