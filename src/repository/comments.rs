//! Comments repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::comment::Comment};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsRepository: Send + Sync {
    async fn create(
        &self,
        item_id: i64,
        author_id: i64,
        text: &str,
        created: DateTime<Utc>,
    ) -> AppResult<Comment>;

    /// Comments on any of the given items, oldest first
    async fn list_by_items(&self, item_ids: Vec<i64>) -> AppResult<Vec<Comment>>;
}

#[derive(Clone)]
pub struct PgCommentsRepository {
    pool: Pool<Postgres>,
}

impl PgCommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentsRepository for PgCommentsRepository {
    async fn create(
        &self,
        item_id: i64,
        author_id: i64,
        text: &str,
        created: DateTime<Utc>,
    ) -> AppResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                INSERT INTO comments (text, item_id, author_id, created)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT c.id, c.text, c.item_id, c.author_id, u.name AS author_name, c.created
            FROM c
            JOIN users u ON c.author_id = u.id
            "#,
        )
        .bind(text)
        .bind(item_id)
        .bind(author_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_by_items(&self, item_ids: Vec<i64>) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.text, c.item_id, c.author_id, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = ANY($1)
            ORDER BY c.created, c.id
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
