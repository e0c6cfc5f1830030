use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::location_repository::LocationRepository;
use crate::domain::error::DomainError;
use crate::domain::location::Location;

#[derive(Debug, Clone)]
pub(crate) struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    id: i64,
    name: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_published(&self) -> Result<Vec<Location>, DomainError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, is_published, created_at \
             FROM locations WHERE is_published = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| Location {
                id: row.id,
                name: row.name,
                is_published: row.is_published,
                created_at: row.created_at,
            })
            .collect())
    }
}
