use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::data::post_repository::{NewPost, PageSlice, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostAuthor, PostCategory, PostLocation, PostWithRelations};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "id, title, text, pub_date, is_published, image, \
                            author_id, category_id, location_id, created_at";

/// Joined select shared by listings and the detail lookup. The category
/// and location joins are LEFT so the detail page can still load a post
/// whose category was deleted; public filters narrow on top of this.
const RELATIONS_SELECT: &str = r#"
SELECT
    p.id, p.title, p.text, p.pub_date, p.is_published, p.image,
    p.author_id, p.category_id, p.location_id, p.created_at,
    u.username AS author_username,
    c.title AS category_title,
    c.slug AS category_slug,
    c.is_published AS category_is_published,
    l.name AS location_name,
    (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
FROM posts p
JOIN users u ON u.id = p.author_id
LEFT JOIN categories c ON c.id = p.category_id
LEFT JOIN locations l ON l.id = p.location_id
"#;

const RELATIONS_COUNT: &str = r#"
SELECT COUNT(*)
FROM posts p
JOIN users u ON u.id = p.author_id
LEFT JOIN categories c ON c.id = p.category_id
LEFT JOIN locations l ON l.id = p.location_id
"#;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    is_published: bool,
    image: Option<String>,
    author_id: i64,
    category_id: Option<i64>,
    location_id: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PostRelationsRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    is_published: bool,
    image: Option<String>,
    author_id: i64,
    category_id: Option<i64>,
    location_id: Option<i64>,
    created_at: DateTime<Utc>,
    author_username: String,
    category_title: Option<String>,
    category_slug: Option<String>,
    category_is_published: Option<bool>,
    location_name: Option<String>,
    comment_count: i64,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let sql = format!(
            "INSERT INTO posts (title, text, pub_date, author_id, category_id, location_id, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&input.title)
            .bind(&input.text)
            .bind(input.pub_date)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(input.location_id)
            .bind(&input.image)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(map_row_to_post(row))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(row.map(map_row_to_post))
    }

    async fn get_post_with_relations(
        &self,
        id: i64,
    ) -> Result<Option<PostWithRelations>, DomainError> {
        let sql = format!("{RELATIONS_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRelationsRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(row.map(map_row_to_post_with_relations))
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let sql = format!(
            "UPDATE posts \
             SET title = $3, text = $4, pub_date = $5, category_id = $6, \
                 location_id = $7, image = $8 \
             WHERE id = $1 AND author_id = $2 \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id)
            .bind(owner_id)
            .bind(&patch.title)
            .bind(&patch.text)
            .bind(patch.pub_date)
            .bind(patch.category_id)
            .bind(patch.location_id)
            .bind(&patch.image)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(row.map(map_row_to_post))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        slice: PageSlice,
    ) -> Result<Vec<PostWithRelations>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(RELATIONS_SELECT);
        push_filter(&mut builder, &filter);
        builder.push(" ORDER BY p.pub_date DESC, p.id DESC LIMIT ");
        builder.push_bind(slice.limit);
        builder.push(" OFFSET ");
        builder.push_bind(slice.offset);

        let rows = builder
            .build_query_as::<PostRelationsRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(rows.into_iter().map(map_row_to_post_with_relations).collect())
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(RELATIONS_COUNT);
        push_filter(&mut builder, &filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    builder.push(" WHERE TRUE");
    if filter.published_category_only {
        builder.push(" AND c.is_published = TRUE");
    }
    if let Some(now) = filter.visible_before {
        builder.push(" AND p.is_published = TRUE AND p.pub_date < ");
        builder.push_bind(now);
    }
    if let Some(category_id) = filter.category_id {
        builder.push(" AND p.category_id = ");
        builder.push_bind(category_id);
    }
    if let Some(author_id) = filter.author_id {
        builder.push(" AND p.author_id = ");
        builder.push_bind(author_id);
    }
}

fn map_row_to_post(row: PostRow) -> Post {
    Post {
        id: row.id,
        title: row.title,
        text: row.text,
        pub_date: row.pub_date,
        is_published: row.is_published,
        image: row.image,
        author_id: row.author_id,
        category_id: row.category_id,
        location_id: row.location_id,
        created_at: row.created_at,
    }
}

fn map_row_to_post_with_relations(row: PostRelationsRow) -> PostWithRelations {
    let category = match (
        row.category_id,
        row.category_title,
        row.category_slug,
        row.category_is_published,
    ) {
        (Some(id), Some(title), Some(slug), Some(is_published)) => Some(PostCategory {
            id,
            title,
            slug,
            is_published,
        }),
        _ => None,
    };
    let location = match (row.location_id, row.location_name) {
        (Some(id), Some(name)) => Some(PostLocation { id, name }),
        _ => None,
    };

    PostWithRelations {
        post: Post {
            id: row.id,
            title: row.title,
            text: row.text,
            pub_date: row.pub_date,
            is_published: row.is_published,
            image: row.image,
            author_id: row.author_id,
            category_id: row.category_id,
            location_id: row.location_id,
            created_at: row.created_at,
        },
        author: PostAuthor {
            id: row.author_id,
            username: row.author_username,
        },
        category,
        location,
        comment_count: row.comment_count,
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return DomainError::AlreadyExists("post title for this author".to_string());
        }
        if db_err.code().as_deref() == Some("23503") {
            let resource = match db_err.constraint() {
                Some("posts_category_id_fkey") => "category",
                Some("posts_location_id_fkey") => "location",
                Some("posts_author_id_fkey") => "author",
                _ => "related resource",
            };
            return DomainError::NotFound(resource.to_string());
        }
    }
    DomainError::Unexpected(err.to_string())
}
