use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::{Comment, CommentWithAuthor};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COMMENT_COLUMNS: &str = "id, text, post_id, author_id, created_at";

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    text: String,
    post_id: i64,
    author_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CommentAuthorRow {
    id: i64,
    text: String,
    post_id: i64,
    author_id: i64,
    created_at: DateTime<Utc>,
    author_username: String,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let sql = format!(
            "INSERT INTO comments (text, post_id, author_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COMMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(&input.text)
            .bind(input.post_id)
            .bind(input.author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(map_row(row))
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(row.map(map_row))
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, DomainError> {
        // Oldest first: the rendering contract for comment threads.
        let rows = sqlx::query_as::<_, CommentAuthorRow>(
            "SELECT cm.id, cm.text, cm.post_id, cm.author_id, cm.created_at, \
                    u.username AS author_username \
             FROM comments cm \
             JOIN users u ON u.id = cm.author_id \
             WHERE cm.post_id = $1 \
             ORDER BY cm.created_at ASC, cm.id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CommentWithAuthor {
                comment: Comment {
                    id: row.id,
                    text: row.text,
                    post_id: row.post_id,
                    author_id: row.author_id,
                    created_at: row.created_at,
                },
                author_username: row.author_username,
            })
            .collect())
    }

    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let sql = format!(
            "UPDATE comments SET text = $3 \
             WHERE id = $1 AND author_id = $2 \
             RETURNING {COMMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(comment_id)
            .bind(owner_id)
            .bind(&text)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(row.map(map_row))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_row(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        text: row.text,
        post_id: row.post_id,
        author_id: row.author_id,
        created_at: row.created_at,
    }
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("comments_post_id_fkey") => "post",
            Some("comments_author_id_fkey") => "author",
            _ => "related resource",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
