//! Item requests repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{request::ItemRequest, Page},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestsRepository: Send + Sync {
    async fn create(
        &self,
        requestor_id: i64,
        description: &str,
        created: DateTime<Utc>,
    ) -> AppResult<ItemRequest>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<ItemRequest>>;

    /// Requests authored by `requestor_id`, newest first
    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>>;

    /// Requests authored by anyone but `user_id`, newest first
    async fn list_by_others(&self, user_id: i64, page: Page) -> AppResult<Vec<ItemRequest>>;
}

#[derive(Clone)]
pub struct PgRequestsRepository {
    pool: Pool<Postgres>,
}

impl PgRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestsRepository for PgRequestsRepository {
    async fn create(
        &self,
        requestor_id: i64,
        description: &str,
        created: DateTime<Utc>,
    ) -> AppResult<ItemRequest> {
        let request = sqlx::query_as::<_, ItemRequest>(
            r#"
            INSERT INTO requests (description, requestor_id, created)
            VALUES ($1, $2, $3)
            RETURNING id, description, requestor_id, created
            "#,
        )
        .bind(description)
        .bind(requestor_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<ItemRequest>> {
        let request = sqlx::query_as::<_, ItemRequest>(
            "SELECT id, description, requestor_id, created FROM requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requestor_id, created FROM requests
            WHERE requestor_id = $1
            ORDER BY created DESC, id DESC
            "#,
        )
        .bind(requestor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn list_by_others(&self, user_id: i64, page: Page) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requestor_id, created FROM requests
            WHERE requestor_id <> $1
            ORDER BY created DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
