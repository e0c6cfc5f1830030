use async_trait::async_trait;

use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    /// Choices offered on the post form.
    async fn list_published(&self) -> Result<Vec<Category>, DomainError>;
}
