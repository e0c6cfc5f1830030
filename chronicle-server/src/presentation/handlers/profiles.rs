use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::pagination::parse_page_param;
use crate::domain::user::{ProfileUpdateRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::posts::{PageDto, PageQuery, PostCardDto};
use crate::presentation::middleware::auth::{AuthenticatedUser, Viewer};

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    /// Present only when the profile owner is looking at their own page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl ProfileDto {
    fn from_user(user: User, include_email: bool) -> Self {
        Self {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: include_email.then_some(user.email),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfilePageDto {
    pub(crate) profile: ProfileDto,
    pub(crate) posts: Vec<PostCardDto>,
    pub(crate) page: PageDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ProfileFormDto {
    #[serde(default)]
    pub(crate) first_name: String,
    #[serde(default)]
    pub(crate) last_name: String,
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
}

impl From<ProfileFormDto> for ProfileUpdateRequest {
    fn from(dto: ProfileFormDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            username: dto.username,
            email: dto.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileFormValuesDto {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) email: String,
}

impl From<User> for ProfileFormValuesDto {
    fn from(user: User) -> Self {
        Self {
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            email: user.email,
        }
    }
}

#[utoipa::path(
    get,
    path = "/profile/{username}/",
    tag = "profiles",
    params(
        ("username" = String, Path, description = "Profile owner's username"),
        ("page" = Option<String>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Profile with the user's posts", body = ProfilePageDto),
        (status = 404, description = "No such user"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ProfilePageDto>> {
    let page = parse_page_param(query.page.as_deref());
    let (user, listing) = state
        .profile_service
        .profile_listing(viewer.user_id(), &username, state.page_size, page)
        .await?;

    let is_owner = viewer.user_id() == Some(user.id);
    Ok(Json(ProfilePageDto {
        profile: ProfileDto::from_user(user, is_owner),
        posts: listing.posts.into_iter().map(PostCardDto::from).collect(),
        page: listing.page.into(),
    }))
}

pub(crate) async fn edit_profile_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<Response> {
    // Only your own edit form exists; another user's is just their page.
    if username != auth.username {
        return Ok(redirect_to_profile(&username).into_response());
    }

    let user = state.profile_service.profile(&auth.username).await?;
    Ok(Json(ProfileFormValuesDto::from(user)).into_response())
}

pub(crate) async fn edit_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(username): Path<String>,
    axum::Form(dto): axum::Form<ProfileFormDto>,
) -> AppResult<Response> {
    if username != auth.username {
        return Ok(redirect_to_profile(&username).into_response());
    }

    dto.validate()?;
    let user = state
        .profile_service
        .update_profile(auth.user_id, dto.into())
        .await?;

    Ok(redirect_to_profile(&user.username).into_response())
}

fn redirect_to_profile(username: &str) -> Redirect {
    Redirect::to(&format!("/profile/{username}/"))
}
