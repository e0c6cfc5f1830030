use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A publication rubric. Unpublishing a category hides every post filed
/// under it from public listings and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) slug: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}
