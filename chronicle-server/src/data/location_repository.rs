use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::location::Location;

#[async_trait]
pub(crate) trait LocationRepository: Send + Sync {
    /// Choices offered on the post form.
    async fn list_published(&self) -> Result<Vec<Location>, DomainError>;
}
