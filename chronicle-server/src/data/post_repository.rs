use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostWithRelations};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
    pub(crate) image: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
    pub(crate) image: Option<String>,
}

/// A limit/offset window produced by the pagination helper.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageSlice {
    pub(crate) limit: i64,
    pub(crate) offset: i64,
}

/// Explicit query shape for post listings. Every clause is data, so the
/// same repository call serves the home page, category pages and both
/// profile variants; `now` arrives from the caller's clock, never from
/// the repository.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PostFilter {
    /// Restrict to posts whose category exists and is published. Posts
    /// without a category never match when this is set.
    pub(crate) published_category_only: bool,
    /// Restrict to published posts whose pub_date precedes this instant.
    pub(crate) visible_before: Option<DateTime<Utc>>,
    pub(crate) category_id: Option<i64>,
    pub(crate) author_id: Option<i64>,
}

impl PostFilter {
    /// Base shape for public listings: relations joined, category
    /// published.
    pub(crate) fn with_relations() -> Self {
        Self {
            published_category_only: true,
            ..Self::default()
        }
    }

    /// Everything an author ever wrote, any state.
    pub(crate) fn authored_by(author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    pub(crate) fn visible_before(mut self, now: DateTime<Utc>) -> Self {
        self.visible_before = Some(now);
        self
    }

    pub(crate) fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub(crate) fn by_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    /// Bare row, no joins. Used for ownership checks before mutation.
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// Detail-page shape: relations and comment count, no visibility
    /// filtering (the service decides per viewer).
    async fn get_post_with_relations(
        &self,
        id: i64,
    ) -> Result<Option<PostWithRelations>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    /// Filtered listing ordered by pub_date descending with comment
    /// counts.
    async fn list_posts(
        &self,
        filter: PostFilter,
        slice: PageSlice,
    ) -> Result<Vec<PostWithRelations>, DomainError>;
    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError>;
}
