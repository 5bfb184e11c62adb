//! Booking service: reservation lifecycle and listing

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingState, BookingStatus, CreateBooking},
        Page,
    },
    repository::{BookingScope, Repository},
};

use super::{find_item, find_user};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book an available item owned by someone else. New bookings wait for
    /// the owner's decision.
    pub async fn add_booking(&self, request: CreateBooking, user_id: i64) -> AppResult<Booking> {
        let booker = find_user(&self.repository, user_id).await?;

        let item_id = request
            .item_id
            .ok_or_else(|| AppError::Validation("Item id must be set".to_string()))?;
        let item = find_item(&self.repository, item_id).await?;

        if item.owner_id == booker.id {
            return Err(AppError::NotFound(format!(
                "Item {} cannot be booked by its owner",
                item.id
            )));
        }

        let (start, end) = match (request.start, request.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::Validation("Booking start and end must be set".to_string()));
            }
        };
        if start >= end {
            return Err(AppError::Validation(
                "Booking start must be strictly before its end".to_string(),
            ));
        }

        if !item.available {
            return Err(AppError::Validation(format!(
                "Item {} is not available for booking",
                item.id
            )));
        }

        let booking = self
            .repository
            .bookings
            .create(booker.id, item.id, start, end)
            .await?;

        tracing::info!(
            booking_id = booking.id,
            item_id = item.id,
            booker_id = booker.id,
            "Booking created"
        );
        Ok(booking)
    }

    /// Owner's decision on a waiting booking
    pub async fn approve_booking(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> AppResult<Booking> {
        let booking = self
            .repository
            .bookings
            .get_by_id_and_owner(booking_id, owner_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Booking with id {} not found", booking_id))
            })?;

        if booking.status != BookingStatus::Waiting {
            return Err(status_locked());
        }

        let status = BookingStatus::from_decision(approved);
        // Lost a race against a concurrent decision
        if !self
            .repository
            .bookings
            .update_status_if_waiting(booking.id, status)
            .await?
        {
            return Err(status_locked());
        }

        tracing::info!(booking_id = booking.id, owner_id, %status, "Booking status changed");
        Ok(Booking { status, ..booking })
    }

    /// Visible to the booker and the item's owner only
    pub async fn get_booking(&self, user_id: i64, booking_id: i64) -> AppResult<Booking> {
        find_user(&self.repository, user_id).await?;

        let booking = self
            .repository
            .bookings
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Booking with id {} not found", booking_id))
            })?;

        if !booking.is_visible_to(user_id) {
            return Err(AppError::NotFound(format!(
                "Booking with id {} not found",
                booking_id
            )));
        }
        Ok(booking)
    }

    /// Bookings made by `user_id`, filtered by `state`
    pub async fn list_for_booker(
        &self,
        user_id: i64,
        state: &str,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        let state: BookingState = state.parse()?;
        find_user(&self.repository, user_id).await?;
        self.list(BookingScope::Booker(user_id), state, page).await
    }

    /// Bookings of items owned by `owner_id`, filtered by `state`
    pub async fn list_for_owner(
        &self,
        owner_id: i64,
        state: &str,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        let state: BookingState = state.parse()?;
        find_user(&self.repository, owner_id).await?;
        self.list(BookingScope::Owner(owner_id), state, page).await
    }

    async fn list(
        &self,
        scope: BookingScope,
        state: BookingState,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        let now = Utc::now();
        let bookings = &self.repository.bookings;

        match state {
            BookingState::All => bookings.list_all(scope, page).await,
            BookingState::Current => bookings.list_current(scope, now, page).await,
            BookingState::Past => bookings.list_past(scope, now, page).await,
            BookingState::Future => bookings.list_future(scope, now, page).await,
            BookingState::Waiting => {
                bookings
                    .list_by_status(scope, BookingStatus::Waiting, page)
                    .await
            }
            BookingState::Rejected => {
                bookings
                    .list_by_status(scope, BookingStatus::Rejected, page)
                    .await
            }
        }
    }
}

fn status_locked() -> AppError {
    AppError::Validation("Booking status cannot be changed".to_string())
}
