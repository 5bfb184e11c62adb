//! Booking model, its persisted status and the listing filter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use super::item::Item;
use super::user::User;
use crate::error::AppError;

/// Persisted booking status. `Waiting` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        }
    }

    /// Outcome of the owner's decision
    pub fn from_decision(approved: bool) -> Self {
        if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

// SQLx conversion for BookingStatus (stored as VARCHAR)
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Listing filter over a user's bookings. Derived from time and status,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    #[default]
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl std::str::FromStr for BookingState {
    type Err = AppError;

    /// Case-insensitive; unknown tokens yield `BadState` with the raw token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(AppError::BadState(s.to_string())),
        }
    }
}

/// Flat row produced by the booking queries (booking + item + booker)
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub item_id: i64,
    pub item_name: String,
    pub item_description: String,
    pub item_available: bool,
    pub item_owner_id: i64,
    pub item_request_id: Option<i64>,
    pub booker_id: i64,
    pub booker_name: String,
    pub booker_email: String,
}

/// Booking with its item and booker embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub item: Item,
    pub booker: User,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            start: row.start_date,
            end: row.end_date,
            status: row.status,
            item: Item {
                id: row.item_id,
                name: row.item_name,
                description: row.item_description,
                available: row.item_available,
                owner_id: row.item_owner_id,
                request_id: row.item_request_id,
            },
            booker: User {
                id: row.booker_id,
                name: row.booker_name,
                email: row.booker_email,
            },
        }
    }
}

impl Booking {
    /// Only the booker and the item's owner may see a booking
    pub fn is_visible_to(&self, user_id: i64) -> bool {
        self.booker.id == user_id || self.item.owner_id == user_id
    }
}

/// Compact booking reference used in item details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
}

impl From<&Booking> for BookingShort {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker.id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
        }
    }
}

/// Create booking request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(required(message = "Item id must be set"))]
    pub item_id: Option<i64>,
    #[validate(required(message = "Start must be set"))]
    pub start: Option<DateTime<Utc>>,
    #[validate(required(message = "End must be set"))]
    pub end: Option<DateTime<Utc>>,
}

impl CreateBooking {
    pub fn new(item_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            item_id: Some(item_id),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Checks applied at the gateway only: start not in the past, end in the future
    pub fn check_not_past(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if matches!(self.start, Some(start) if start < now) {
            return Err(AppError::Validation("Start must not be in the past".to_string()));
        }
        if matches!(self.end, Some(end) if end <= now) {
            return Err(AppError::Validation("End must be in the future".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row() -> BookingRow {
        let now = Utc::now();
        BookingRow {
            id: 11,
            start_date: now + Duration::days(1),
            end_date: now + Duration::days(3),
            status: BookingStatus::Waiting,
            item_id: 7,
            item_name: "Drill".to_string(),
            item_description: "Cordless drill".to_string(),
            item_available: true,
            item_owner_id: 1,
            item_request_id: None,
            booker_id: 2,
            booker_name: "Boris".to_string(),
            booker_email: "boris@example.com".to_string(),
        }
    }

    #[test]
    fn test_state_parsing_is_case_insensitive() {
        assert_eq!("current".parse::<BookingState>().unwrap(), BookingState::Current);
        assert_eq!("ALL".parse::<BookingState>().unwrap(), BookingState::All);
        assert_eq!("Rejected".parse::<BookingState>().unwrap(), BookingState::Rejected);
    }

    #[test]
    fn test_unknown_state_carries_token() {
        match "UNSUPPORTED_STATUS".parse::<BookingState>() {
            Err(AppError::BadState(token)) => assert_eq!(token, "UNSUPPORTED_STATUS"),
            other => panic!("expected BadState, got {:?}", other),
        }
        // APPROVED is a status, not a listing state
        assert!(matches!(
            "APPROVED".parse::<BookingState>(),
            Err(AppError::BadState(_))
        ));
    }

    #[test]
    fn test_row_maps_embedded_item_and_booker() {
        let r = row();
        let booking = Booking::from(r.clone());
        assert_eq!(booking.id, r.id);
        assert_eq!(booking.start, r.start_date);
        assert_eq!(booking.end, r.end_date);
        assert_eq!(booking.item.id, 7);
        assert_eq!(booking.item.owner_id, 1);
        assert_eq!(booking.booker.email, "boris@example.com");

        let short = BookingShort::from(&booking);
        assert_eq!(short.id, 11);
        assert_eq!(short.booker_id, 2);
        assert_eq!(short.start, booking.start);
        assert_eq!(short.status, BookingStatus::Waiting);
    }

    #[test]
    fn test_visibility() {
        let booking = Booking::from(row());
        assert!(booking.is_visible_to(1));
        assert!(booking.is_visible_to(2));
        assert!(!booking.is_visible_to(3));
    }

    #[test]
    fn test_status_json() {
        let json = serde_json::to_value(BookingStatus::Approved).unwrap();
        assert_eq!(json, "APPROVED");
        assert_eq!(BookingStatus::from_decision(false), BookingStatus::Rejected);
    }

    #[test]
    fn test_gateway_time_checks() {
        let now = Utc::now();
        let ok = CreateBooking::new(1, now + Duration::hours(1), now + Duration::hours(2));
        assert!(ok.check_not_past(now).is_ok());

        let past = CreateBooking::new(1, now - Duration::hours(1), now + Duration::hours(2));
        assert!(matches!(past.check_not_past(now), Err(AppError::Validation(_))));

        let missing = CreateBooking {
            item_id: Some(1),
            start: None,
            end: None,
        };
        assert!(missing.validate().is_err());
    }
}
