use std::sync::Arc;

use crate::application::blog_service::PostListing;
use crate::application::pagination::paginate;
use crate::data::post_repository::{PostFilter, PostRepository};
use crate::data::user_repository::{ProfilePatch, UserRepository};
use crate::domain::clock::Clock;
use crate::domain::error::DomainError;
use crate::domain::user::{ProfileUpdateRequest, User};

pub(crate) struct ProfileService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    users: U,
    posts: P,
    clock: Arc<dyn Clock>,
}

impl<U, P> ProfileService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    pub(crate) fn new(users: U, posts: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            posts,
            clock,
        }
    }

    /// The profile owner sees every post they wrote, drafts and scheduled
    /// ones included; everyone else gets the public filter.
    pub(crate) async fn profile_listing(
        &self,
        viewer_id: Option<i64>,
        username: &str,
        page_size: u32,
        requested_page: u32,
    ) -> Result<(User, PostListing), DomainError> {
        let user = self
            .users
            .find_profile(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        let filter = if viewer_id == Some(user.id) {
            PostFilter::authored_by(user.id)
        } else {
            PostFilter::with_relations()
                .visible_before(self.clock.now())
                .by_author(user.id)
        };

        let total = self.posts.count_posts(filter).await?;
        let (page, slice) = paginate(total, page_size, requested_page);
        let posts = self.posts.list_posts(filter, slice).await?;

        Ok((user, PostListing { posts, page }))
    }

    pub(crate) async fn profile(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_profile(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))
    }

    pub(crate) async fn update_profile(
        &self,
        actor_user_id: i64,
        req: ProfileUpdateRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;

        let patch = ProfilePatch {
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            email: req.email,
        };
        self.users
            .update_profile(actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {actor_user_id}")))
    }
}
