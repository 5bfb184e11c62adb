//! Repository layer for database operations

pub mod bookings;
pub mod comments;
pub mod items;
pub mod requests;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

pub use bookings::{BookingOrder, BookingScope, BookingsRepository};
pub use comments::CommentsRepository;
pub use items::ItemsRepository;
pub use requests::RequestsRepository;
pub use users::UsersRepository;

/// Main repository struct bundling one store per entity
#[derive(Clone)]
pub struct Repository {
    /// Absent when the stores are not backed by PostgreSQL (tests)
    pub pool: Option<Pool<Postgres>>,
    pub users: Arc<dyn UsersRepository>,
    pub items: Arc<dyn ItemsRepository>,
    pub bookings: Arc<dyn BookingsRepository>,
    pub requests: Arc<dyn RequestsRepository>,
    pub comments: Arc<dyn CommentsRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::PgUsersRepository::new(pool.clone())),
            items: Arc::new(items::PgItemsRepository::new(pool.clone())),
            bookings: Arc::new(bookings::PgBookingsRepository::new(pool.clone())),
            requests: Arc::new(requests::PgRequestsRepository::new(pool.clone())),
            comments: Arc::new(comments::PgCommentsRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Round-trip to the database, if there is one
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::Conflict(message())
        }
        _ => AppError::Database(e),
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Mocked stores, configured per test then frozen into a `Repository`
    #[derive(Default)]
    pub struct MockStores {
        pub users: users::MockUsersRepository,
        pub items: items::MockItemsRepository,
        pub bookings: bookings::MockBookingsRepository,
        pub requests: requests::MockRequestsRepository,
        pub comments: comments::MockCommentsRepository,
    }

    impl MockStores {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn into_repository(self) -> Repository {
            Repository {
                pool: None,
                users: Arc::new(self.users),
                items: Arc::new(self.items),
                bookings: Arc::new(self.bookings),
                requests: Arc::new(self.requests),
                comments: Arc::new(self.comments),
            }
        }
    }
}
