use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::comment::{Comment, CommentRequest, CommentWithAuthor};
use crate::domain::error::DomainError;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) author: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentDto {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.comment.id,
            text: comment.comment.text,
            author: comment.author_username,
            created_at: comment.comment.created_at,
        }
    }
}

/// Blank text is rejected by the domain `validate()`, after access to
/// the target comment or post has been resolved.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CommentFormDto {
    pub(crate) text: String,
}

impl From<CommentFormDto> for CommentRequest {
    fn from(dto: CommentFormDto) -> Self {
        Self { text: dto.text }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentFormValuesDto {
    pub(crate) id: i64,
    pub(crate) text: String,
}

impl From<Comment> for CommentFormValuesDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
        }
    }
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<i64>,
    axum::Form(dto): axum::Form<CommentFormDto>,
) -> AppResult<Redirect> {
    state
        .comment_service
        .add_comment(auth.user_id, post_id, dto.into())
        .await?;

    Ok(redirect_to_post(post_id))
}

pub(crate) async fn edit_comment_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Json<CommentFormValuesDto>> {
    let comment = state
        .comment_service
        .comment_for_edit(auth.user_id, post_id, comment_id)
        .await?;
    Ok(Json(comment.into()))
}

pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    axum::Form(dto): axum::Form<CommentFormDto>,
) -> AppResult<Redirect> {
    state
        .comment_service
        .update_comment(auth.user_id, post_id, comment_id, dto.into())
        .await?;

    Ok(redirect_to_post(post_id))
}

pub(crate) async fn delete_comment_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Response> {
    match state
        .comment_service
        .comment_for_delete(auth.user_id, post_id, comment_id)
        .await
    {
        Ok(comment) => Ok(Json(CommentFormValuesDto::from(comment)).into_response()),
        Err(DomainError::Forbidden) => Ok(redirect_to_post(post_id).into_response()),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Response> {
    match state
        .comment_service
        .delete_comment(auth.user_id, post_id, comment_id)
        .await
    {
        Ok(()) => Ok(redirect_to_post(post_id).into_response()),
        Err(DomainError::Forbidden) => Ok(redirect_to_post(post_id).into_response()),
        Err(err) => Err(err.into()),
    }
}

fn redirect_to_post(post_id: i64) -> Redirect {
    Redirect::to(&format!("/posts/{post_id}/"))
}
