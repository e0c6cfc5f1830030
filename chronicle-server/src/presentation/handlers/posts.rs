use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::blog_service::PostListing;
use crate::application::pagination::{Page, parse_page_param};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{CreatePostRequest, Post, PostWithRelations, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::comments::CommentDto;
use crate::presentation::handlers::form_fields::empty_string_as_none;
use crate::presentation::middleware::auth::{AuthenticatedUser, Viewer};

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PageQuery {
    /// 1-based page number; anything unparseable falls back to page 1.
    pub(crate) page: Option<String>,
}

/// The post form as submitted. Author and published state are
/// server-assigned and deliberately absent.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PostFormDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    /// Calendar date; publication happens at midnight UTC of that day.
    pub(crate) pub_date: NaiveDate,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) category_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) location_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) image: Option<String>,
}

impl PostFormDto {
    fn into_create_request(self) -> CreatePostRequest {
        CreatePostRequest {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date.and_time(NaiveTime::MIN).and_utc(),
            category_id: self.category_id,
            location_id: self.location_id,
            image: self.image,
        }
    }

    fn into_update_request(self) -> UpdatePostRequest {
        UpdatePostRequest {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date.and_time(NaiveTime::MIN).and_utc(),
            category_id: self.category_id,
            location_id: self.location_id,
            image: self.image,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PageDto {
    pub(crate) number: u32,
    pub(crate) total_pages: u32,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

impl From<Page> for PageDto {
    fn from(page: Page) -> Self {
        Self {
            number: page.number,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_previous: page.has_previous,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryRefDto {
    pub(crate) title: String,
    pub(crate) slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostCardDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) image: Option<String>,
    pub(crate) author: String,
    pub(crate) category: Option<CategoryRefDto>,
    pub(crate) location: Option<String>,
    pub(crate) comment_count: i64,
    pub(crate) url: String,
}

impl From<PostWithRelations> for PostCardDto {
    fn from(post: PostWithRelations) -> Self {
        let url = post.post.detail_path();
        Self {
            id: post.post.id,
            title: post.post.title,
            text: post.post.text,
            pub_date: post.post.pub_date,
            is_published: post.post.is_published,
            image: post.post.image,
            author: post.author.username,
            category: post.category.map(|category| CategoryRefDto {
                title: category.title,
                slug: category.slug,
            }),
            location: post.location.map(|location| location.name),
            comment_count: post.comment_count,
            url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostListPageDto {
    pub(crate) posts: Vec<PostCardDto>,
    pub(crate) page: PageDto,
}

impl From<PostListing> for PostListPageDto {
    fn from(listing: PostListing) -> Self {
        Self {
            posts: listing.posts.into_iter().map(PostCardDto::from).collect(),
            page: listing.page.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) slug: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            title: category.title,
            description: category.description,
            slug: category.slug,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryPageDto {
    pub(crate) category: CategoryDto,
    pub(crate) posts: Vec<PostCardDto>,
    pub(crate) page: PageDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    #[serde(flatten)]
    pub(crate) post: PostCardDto,
    pub(crate) comments: Vec<CommentDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ChoiceDto {
    pub(crate) id: i64,
    pub(crate) label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostFormValuesDto {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: NaiveDate,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
    pub(crate) image: Option<String>,
}

impl From<Post> for PostFormValuesDto {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            text: post.text,
            pub_date: post.pub_date.date_naive(),
            category_id: post.category_id,
            location_id: post.location_id,
            image: post.image,
        }
    }
}

/// The create/edit form document: current values (absent on a blank
/// form) plus the published category and location choices.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostFormPageDto {
    pub(crate) values: Option<PostFormValuesDto>,
    pub(crate) categories: Vec<ChoiceDto>,
    pub(crate) locations: Vec<ChoiceDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DeletePostConfirmDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) url: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "posts",
    params(
        ("page" = Option<String>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Publicly visible posts, newest first", body = PostListPageDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PostListPageDto>> {
    let page = parse_page_param(query.page.as_deref());
    let listing = state.blog_service.home_listing(state.page_size, page).await?;
    Ok(Json(PostListPageDto::from(listing)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailDto),
        (status = 404, description = "Post missing or not visible to this viewer"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn post_detail(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDetailDto>> {
    let post = state.blog_service.post_detail(viewer.user_id(), id).await?;
    let comments = state.comment_service.comments_for_post(id).await?;

    Ok(Json(PostDetailDto {
        post: PostCardDto::from(post),
        comments: comments.into_iter().map(CommentDto::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/category/{slug}/",
    tag = "posts",
    params(
        ("slug" = String, Path, description = "Category slug"),
        ("page" = Option<String>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Visible posts in the category", body = CategoryPageDto),
        (status = 404, description = "Category missing or unpublished"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn category_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CategoryPageDto>> {
    let page = parse_page_param(query.page.as_deref());
    let (category, listing) = state
        .blog_service
        .category_listing(&slug, state.page_size, page)
        .await?;

    Ok(Json(CategoryPageDto {
        category: category.into(),
        posts: listing.posts.into_iter().map(PostCardDto::from).collect(),
        page: listing.page.into(),
    }))
}

pub(crate) async fn create_post_form(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<PostFormPageDto>> {
    let (categories, locations) = state.blog_service.form_choices().await?;
    Ok(Json(form_page(None, categories, locations)))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    axum::Form(dto): axum::Form<PostFormDto>,
) -> AppResult<Redirect> {
    dto.validate()?;
    state
        .blog_service
        .create_post(auth.user_id, dto.into_create_request())
        .await?;

    Ok(Redirect::to(&format!("/profile/{}/", auth.username)))
}

pub(crate) async fn edit_post_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.blog_service.post_for_owner(auth.user_id, id).await {
        Ok(post) => {
            let (categories, locations) = state.blog_service.form_choices().await?;
            let page = form_page(Some(post.into()), categories, locations);
            Ok(Json(page).into_response())
        }
        // Someone else's post: no error, just back to the detail page.
        Err(DomainError::Forbidden) => Ok(redirect_to_detail(id).into_response()),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn edit_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    axum::Form(dto): axum::Form<PostFormDto>,
) -> AppResult<Response> {
    // No up-front validation here: the service resolves ownership first,
    // so a non-owner is redirected before the form is inspected.
    match state
        .blog_service
        .update_post(auth.user_id, id, dto.into_update_request())
        .await
    {
        Ok(post) => Ok(Redirect::to(&post.detail_path()).into_response()),
        Err(DomainError::Forbidden) => Ok(redirect_to_detail(id).into_response()),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn delete_post_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.blog_service.post_for_owner(auth.user_id, id).await {
        Ok(post) => Ok(Json(DeletePostConfirmDto {
            id: post.id,
            url: post.detail_path(),
            title: post.title,
        })
        .into_response()),
        Err(DomainError::Forbidden) => Ok(redirect_to_detail(id).into_response()),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.blog_service.delete_post(auth.user_id, id).await {
        Ok(()) => Ok(Redirect::to("/").into_response()),
        Err(DomainError::Forbidden) => Ok(redirect_to_detail(id).into_response()),
        Err(err) => Err(err.into()),
    }
}

fn redirect_to_detail(post_id: i64) -> Redirect {
    Redirect::to(&format!("/posts/{post_id}/"))
}

fn form_page(
    values: Option<PostFormValuesDto>,
    categories: Vec<Category>,
    locations: Vec<Location>,
) -> PostFormPageDto {
    PostFormPageDto {
        values,
        categories: categories
            .into_iter()
            .map(|category| ChoiceDto {
                id: category.id,
                label: category.title,
            })
            .collect(),
        locations: locations
            .into_iter()
            .map(|location| ChoiceDto {
                id: location.id,
                label: location.name,
            })
            .collect(),
    }
}
