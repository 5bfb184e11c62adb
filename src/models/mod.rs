//! Data models for ShareIt

pub mod booking;
pub mod comment;
pub mod item;
pub mod request;
pub mod user;

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

// Re-export commonly used types
pub use booking::{Booking, BookingShort, BookingState, BookingStatus};
pub use comment::Comment;
pub use item::{Item, ItemDetails};
pub use request::{ItemRequest, ItemRequestWithItems};
pub use user::User;

fn default_size() -> i64 {
    10
}

/// Zero-based offset/limit pair shared by paginated listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Page {
    /// Offset of the first row (default: 0)
    #[serde(default)]
    #[validate(range(min = 0, message = "from must not be negative"))]
    pub from: i64,
    /// Maximum number of rows (default: 10)
    #[serde(default = "default_size")]
    #[validate(range(min = 1, message = "size must be positive"))]
    pub size: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_size(),
        }
    }
}

impl Page {
    pub fn new(from: i64, size: i64) -> Self {
        Self { from, size }
    }
}

/// Rejects empty and whitespace-only strings
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page, Page::new(0, 10));
    }

    #[test]
    fn test_page_validation() {
        assert!(Page::new(0, 1).validate().is_ok());
        assert!(Page::new(-1, 10).validate().is_err());
        assert!(Page::new(0, 0).validate().is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("drill").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
    }
}
