//! Items repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        item::{Item, NewItem},
        Page,
    },
};

const ITEM_COLUMNS: &str = "id, name, description, is_available, owner_id, request_id";

/// `ILIKE` pattern matching `text` literally anywhere in the value
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsRepository: Send + Sync {
    async fn create(&self, item: &NewItem) -> AppResult<Item>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Item>>;

    /// Persist name, description and availability of an existing item
    async fn update(&self, item: &Item) -> AppResult<Item>;

    /// Items of one owner, ascending by id
    async fn list_by_owner(&self, owner_id: i64, page: Page) -> AppResult<Vec<Item>>;

    /// Available items whose name or description contains `text`, ignoring case
    async fn search(&self, text: &str, page: Page) -> AppResult<Vec<Item>>;

    /// Items listed against any of the given requests
    async fn list_by_request_ids(&self, request_ids: Vec<i64>) -> AppResult<Vec<Item>>;
}

#[derive(Clone)]
pub struct PgItemsRepository {
    pool: Pool<Postgres>,
}

impl PgItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemsRepository for PgItemsRepository {
    async fn create(&self, item: &NewItem) -> AppResult<Item> {
        let created = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (name, description, is_available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(item.owner_id)
        .bind(item.request_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update(&self, item: &Item) -> AppResult<Item> {
        let updated = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET name = $1, description = $2, is_available = $3
            WHERE id = $4
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(item.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn list_by_owner(&self, owner_id: i64, page: Page) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE owner_id = $1 ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn search(&self, text: &str, page: Page) -> AppResult<Vec<Item>> {
        let pattern = like_pattern(text);
        let items = sqlx::query_as::<_, Item>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM items
            WHERE is_available
              AND (name ILIKE $1 ESCAPE '\' OR description ILIKE $1 ESCAPE '\')
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(pattern)
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn list_by_request_ids(&self, request_ids: Vec<i64>) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE request_id = ANY($1) ORDER BY id"
        ))
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("drill"), "%drill%");
        assert_eq!(like_pattern("50%_"), "%50\\%\\_%");
        assert_eq!(like_pattern("D_ill"), "%D\\_ill%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
