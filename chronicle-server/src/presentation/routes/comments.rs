use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{
    add_comment, delete_comment, delete_comment_form, edit_comment, edit_comment_form,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/posts/{id}/comment/", post(add_comment))
        .route(
            "/posts/{id}/edit_comment/{cid}/",
            get(edit_comment_form).post(edit_comment),
        )
        .route(
            "/posts/{id}/delete_comment/{cid}/",
            get(delete_comment_form).post(delete_comment),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ))
}
