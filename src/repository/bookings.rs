//! Bookings repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        booking::{Booking, BookingRow, BookingStatus},
        Page,
    },
};

/// Whose bookings a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    /// Bookings made by this user
    Booker(i64),
    /// Bookings of items owned by this user
    Owner(i64),
}

impl BookingScope {
    fn condition(&self) -> &'static str {
        match self {
            BookingScope::Booker(_) => "b.booker_id = $1",
            BookingScope::Owner(_) => "i.owner_id = $1",
        }
    }

    fn user_id(&self) -> i64 {
        match self {
            BookingScope::Booker(id) | BookingScope::Owner(id) => *id,
        }
    }
}

/// Sort order for per-item booking scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOrder {
    /// Latest end first
    EndDesc,
    /// Earliest start first
    StartAsc,
}

impl BookingOrder {
    fn clause(&self) -> &'static str {
        match self {
            BookingOrder::EndDesc => "b.end_date DESC, b.id DESC",
            BookingOrder::StartAsc => "b.start_date ASC, b.id ASC",
        }
    }
}

const SELECT_BOOKING: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           i.id AS item_id, i.name AS item_name, i.description AS item_description,
           i.is_available AS item_available, i.owner_id AS item_owner_id,
           i.request_id AS item_request_id,
           u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
    FROM bookings b
    JOIN items i ON b.item_id = i.id
    JOIN users u ON b.booker_id = u.id
"#;

const NEWEST_FIRST: &str = "b.start_date DESC, b.id DESC";

/// Time-relative listing filters; `$2` is the reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timeline {
    /// `start <= now <= end`, oldest start first
    Current,
    /// `end < now`, newest first
    Past,
    /// `start > now`, newest first
    Future,
}

impl Timeline {
    fn predicate(&self) -> &'static str {
        match self {
            Timeline::Current => "b.start_date <= $2 AND b.end_date >= $2",
            Timeline::Past => "b.end_date < $2",
            Timeline::Future => "b.start_date > $2",
        }
    }

    fn order(&self) -> &'static str {
        match self {
            Timeline::Current => "b.start_date ASC, b.id ASC",
            Timeline::Past | Timeline::Future => NEWEST_FIRST,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsRepository: Send + Sync {
    /// Insert a new booking in `WAITING` status
    async fn create(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Booking>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Booking>>;

    /// Booking `id` only if its item is owned by `owner_id`
    async fn get_by_id_and_owner(&self, id: i64, owner_id: i64) -> AppResult<Option<Booking>>;

    /// Set `status` only if the booking is still `WAITING`.
    /// Returns whether a row was changed.
    async fn update_status_if_waiting(&self, id: i64, status: BookingStatus) -> AppResult<bool>;

    /// Every booking in scope, newest start first
    async fn list_all(&self, scope: BookingScope, page: Page) -> AppResult<Vec<Booking>>;

    /// `start <= now <= end`, oldest first
    async fn list_current(
        &self,
        scope: BookingScope,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<Booking>>;

    /// `end < now`, newest start first
    async fn list_past(
        &self,
        scope: BookingScope,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<Booking>>;

    /// `start > now`, newest start first
    async fn list_future(
        &self,
        scope: BookingScope,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<Booking>>;

    /// Bookings with the given status, newest start first
    async fn list_by_status(
        &self,
        scope: BookingScope,
        status: BookingStatus,
        page: Page,
    ) -> AppResult<Vec<Booking>>;

    /// All bookings of the given items in the given order, unpaginated
    async fn list_by_items(
        &self,
        item_ids: Vec<i64>,
        order: BookingOrder,
    ) -> AppResult<Vec<Booking>>;

    /// Whether `booker_id` has an approved booking of `item_id` that ended before `now`
    async fn exists_finished_approved(
        &self,
        booker_id: i64,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgBookingsRepository {
    pool: Pool<Postgres>,
}

impl PgBookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Scoped listing SQL: `$1` is the scope user, `$2` the optional extra
    /// parameter, then limit and offset.
    fn scoped_sql(scope: BookingScope, extra: Option<&str>, order: &str) -> String {
        let (filter, limit, offset) = match extra {
            Some(extra) => (format!(" AND {}", extra), "$3", "$4"),
            None => (String::new(), "$2", "$3"),
        };
        format!(
            "{SELECT_BOOKING} WHERE {}{} ORDER BY {} LIMIT {} OFFSET {}",
            scope.condition(),
            filter,
            order,
            limit,
            offset
        )
    }

    async fn fetch(&self, sql: &str, user_id: i64, page: Page) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(sql)
            .bind(user_id)
            .bind(page.size)
            .bind(page.from)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    fn timeline_sql(timeline: Timeline, scope: BookingScope) -> String {
        Self::scoped_sql(scope, Some(timeline.predicate()), timeline.order())
    }

    async fn fetch_at(
        &self,
        timeline: Timeline,
        scope: BookingScope,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        let sql = Self::timeline_sql(timeline, scope);
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(scope.user_id())
            .bind(now)
            .bind(page.size)
            .bind(page.from)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }
}

#[async_trait]
impl BookingsRepository for PgBookingsRepository {
    async fn create(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            WITH b AS (
                INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT b.id, b.start_date, b.end_date, b.status,
                   i.id AS item_id, i.name AS item_name, i.description AS item_description,
                   i.is_available AS item_available, i.owner_id AS item_owner_id,
                   i.request_id AS item_request_id,
                   u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
            FROM b
            JOIN items i ON b.item_id = i.id
            JOIN users u ON b.booker_id = u.id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(item_id)
        .bind(booker_id)
        .bind(BookingStatus::Waiting)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Booking::from))
    }

    async fn get_by_id_and_owner(&self, id: i64, owner_id: i64) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE b.id = $1 AND i.owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Booking::from))
    }

    async fn update_status_if_waiting(&self, id: i64, status: BookingStatus) -> AppResult<bool> {
        let result = sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2 AND status = $3")
            .bind(status)
            .bind(id)
            .bind(BookingStatus::Waiting)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_all(&self, scope: BookingScope, page: Page) -> AppResult<Vec<Booking>> {
        let sql = Self::scoped_sql(scope, None, NEWEST_FIRST);
        self.fetch(&sql, scope.user_id(), page).await
    }

    async fn list_current(
        &self,
        scope: BookingScope,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        self.fetch_at(Timeline::Current, scope, now, page).await
    }

    async fn list_past(
        &self,
        scope: BookingScope,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        self.fetch_at(Timeline::Past, scope, now, page).await
    }

    async fn list_future(
        &self,
        scope: BookingScope,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        self.fetch_at(Timeline::Future, scope, now, page).await
    }

    async fn list_by_status(
        &self,
        scope: BookingScope,
        status: BookingStatus,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        let sql = Self::scoped_sql(scope, Some("b.status = $2"), NEWEST_FIRST);
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(scope.user_id())
            .bind(status)
            .bind(page.size)
            .bind(page.from)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn list_by_items(
        &self,
        item_ids: Vec<i64>,
        order: BookingOrder,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE b.item_id = ANY($1) ORDER BY {}",
            order.clause()
        ))
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn exists_finished_approved(
        &self,
        booker_id: i64,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booker_id = $1 AND item_id = $2 AND status = $3 AND end_date < $4
            )
            "#,
        )
        .bind(booker_id)
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_sql_placeholders() {
        let sql = PgBookingsRepository::scoped_sql(BookingScope::Owner(3), None, NEWEST_FIRST);
        assert!(sql.contains("i.owner_id = $1"));
        assert!(sql.contains("LIMIT $2 OFFSET $3"));

        let sql = PgBookingsRepository::scoped_sql(
            BookingScope::Booker(3),
            Some("b.end_date < $2"),
            NEWEST_FIRST,
        );
        assert!(sql.contains("b.booker_id = $1 AND b.end_date < $2"));
        assert!(sql.contains("LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn test_current_includes_both_boundaries() {
        let sql = PgBookingsRepository::timeline_sql(Timeline::Current, BookingScope::Booker(3));
        assert!(sql.contains(
            "WHERE b.booker_id = $1 AND b.start_date <= $2 AND b.end_date >= $2 \
             ORDER BY b.start_date ASC, b.id ASC LIMIT $3 OFFSET $4"
        ));
    }

    #[test]
    fn test_past_excludes_booking_ending_now() {
        let sql = PgBookingsRepository::timeline_sql(Timeline::Past, BookingScope::Owner(3));
        assert!(sql.contains(
            "WHERE i.owner_id = $1 AND b.end_date < $2 \
             ORDER BY b.start_date DESC, b.id DESC LIMIT $3 OFFSET $4"
        ));
    }

    #[test]
    fn test_future_excludes_booking_starting_now() {
        let sql = PgBookingsRepository::timeline_sql(Timeline::Future, BookingScope::Booker(3));
        assert!(sql.contains(
            "WHERE b.booker_id = $1 AND b.start_date > $2 \
             ORDER BY b.start_date DESC, b.id DESC LIMIT $3 OFFSET $4"
        ));
    }
}
