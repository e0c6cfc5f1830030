use chrono::{DateTime, Utc};

use super::post::PostWithRelations;

/// The public-readability predicate: published flag set, publication
/// instant passed, and the category present and itself published.
pub(crate) fn is_publicly_visible(post: &PostWithRelations, now: DateTime<Utc>) -> bool {
    post.post.is_published
        && post.post.pub_date < now
        && post
            .category
            .as_ref()
            .is_some_and(|category| category.is_published)
}

/// The author always sees their own post; everyone else is held to the
/// public predicate.
pub(crate) fn is_visible_to(
    post: &PostWithRelations,
    viewer_id: Option<i64>,
    now: DateTime<Utc>,
) -> bool {
    viewer_id == Some(post.author.id) || is_publicly_visible(post, now)
}
