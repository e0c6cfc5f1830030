use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    category_posts, create_post, create_post_form, delete_post, delete_post_form, edit_post,
    edit_post_form, home, post_detail,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(home))
        .route("/posts/{id}/", get(post_detail))
        .route("/category/{slug}/", get(category_posts));

    let protected = Router::new()
        .route("/posts/create/", get(create_post_form).post(create_post))
        .route("/posts/{id}/edit/", get(edit_post_form).post(edit_post))
        .route(
            "/posts/{id}/delete/",
            get(delete_post_form).post(delete_post),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
