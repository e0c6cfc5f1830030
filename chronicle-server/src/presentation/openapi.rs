use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::presentation::handlers::comments::CommentDto;
use crate::presentation::handlers::posts::{
    CategoryDto, CategoryPageDto, CategoryRefDto, PageDto, PostCardDto, PostDetailDto,
    PostListPageDto,
};
use crate::presentation::handlers::profiles::{ProfileDto, ProfilePageDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::posts::home,
        crate::presentation::handlers::posts::post_detail,
        crate::presentation::handlers::posts::category_posts,
        crate::presentation::handlers::profiles::profile
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            PageDto,
            PostCardDto,
            PostListPageDto,
            PostDetailDto,
            CategoryDto,
            CategoryRefDto,
            CategoryPageDto,
            CommentDto,
            ProfileDto,
            ProfilePageDto
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "posts", description = "Post listing and detail endpoints"),
        (name = "profiles", description = "User profile endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
