//! Business logic services

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

use crate::{
    error::{AppError, AppResult},
    models::{Item, User},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub items: items::ItemsService,
    pub bookings: bookings::BookingsService,
    pub requests: requests::RequestsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            users: users::UsersService::new(repository.clone()),
            items: items::ItemsService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone()),
            repository,
        }
    }

    /// Whether the backing store answers
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

/// Load a user or fail with `NotFound`
pub(crate) async fn find_user(repository: &Repository, id: i64) -> AppResult<User> {
    repository
        .users
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
}

/// Load an item or fail with `NotFound`
pub(crate) async fn find_item(repository: &Repository, id: i64) -> AppResult<Item> {
    repository
        .items
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::models::{Booking, BookingStatus, Item, User};

    pub fn user(id: i64) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
        }
    }

    pub fn item(id: i64, owner_id: i64, available: bool) -> Item {
        Item {
            id,
            name: format!("item {}", id),
            description: "Cordless drill".to_string(),
            available,
            owner_id,
            request_id: None,
        }
    }

    pub fn booking(
        id: i64,
        item: Item,
        booker_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id,
            start,
            end,
            status,
            item,
            booker: user(booker_id),
        }
    }
}
