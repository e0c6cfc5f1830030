use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::application::profile_service::ProfileService;
use crate::data::repositories::postgres::category_repository::PostgresCategoryRepository;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::location_repository::PostgresLocationRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type PgBlogService =
    BlogService<PostgresPostRepository, PostgresCategoryRepository, PostgresLocationRepository>;
pub(crate) type PgCommentService =
    CommentService<PostgresCommentRepository, PostgresPostRepository>;
pub(crate) type PgProfileService = ProfileService<PostgresUserRepository, PostgresPostRepository>;
pub(crate) type PgAuthService = AuthService<PostgresUserRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) blog_service: Arc<PgBlogService>,
    pub(crate) comment_service: Arc<PgCommentService>,
    pub(crate) profile_service: Arc<PgProfileService>,
    pub(crate) auth_service: Arc<PgAuthService>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) page_size: u32,
}

impl AppState {
    pub(crate) fn new(
        blog_service: Arc<PgBlogService>,
        comment_service: Arc<PgCommentService>,
        profile_service: Arc<PgProfileService>,
        auth_service: Arc<PgAuthService>,
        jwt: Arc<JwtService>,
        page_size: u32,
    ) -> Self {
        Self {
            blog_service,
            comment_service,
            profile_service,
            auth_service,
            jwt,
            page_size,
        }
    }
}
