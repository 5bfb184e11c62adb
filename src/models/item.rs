//! Item (shareable object) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::booking::BookingShort;
use super::comment::Comment;

/// Item model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "is_available")]
    pub available: bool,
    pub owner_id: i64,
    /// Item request this item was listed in answer to
    pub request_id: Option<i64>,
}

/// Create item request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[validate(custom(function = "super::not_blank", message = "Name must not be blank"))]
    pub name: String,
    #[validate(custom(function = "super::not_blank", message = "Description must not be blank"))]
    pub description: String,
    #[validate(required(message = "Availability must be set"))]
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

/// Fully resolved item ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// Partial item update; only present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl UpdateItem {
    pub fn apply_to(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(available) = self.available {
            item.available = available;
        }
    }
}

/// Item with owner-only booking hints and its comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
    pub last_booking: Option<BookingShort>,
    pub next_booking: Option<BookingShort>,
    pub comments: Vec<Comment>,
}

impl ItemDetails {
    pub fn new(
        item: Item,
        last_booking: Option<BookingShort>,
        next_booking: Option<BookingShort>,
        comments: Vec<Comment>,
    ) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
            last_booking,
            next_booking,
            comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drill() -> Item {
        Item {
            id: 7,
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available: true,
            owner_id: 1,
            request_id: Some(3),
        }
    }

    #[test]
    fn test_create_item_requires_availability() {
        let create = CreateItem {
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available: None,
            request_id: None,
        };
        assert!(create.validate().is_err());

        let create = CreateItem {
            available: Some(false),
            ..create
        };
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut item = drill();
        UpdateItem {
            available: Some(false),
            ..Default::default()
        }
        .apply_to(&mut item);
        assert_eq!(item.name, "Drill");
        assert_eq!(item.description, "Cordless drill");
        assert!(!item.available);
    }

    #[test]
    fn test_details_preserve_scalar_fields() {
        let details = ItemDetails::new(drill(), None, None, Vec::new());
        assert_eq!(details.id, 7);
        assert_eq!(details.name, "Drill");
        assert_eq!(details.description, "Cordless drill");
        assert!(details.available);
        assert_eq!(details.request_id, Some(3));
    }

    #[test]
    fn test_item_json_uses_camel_case() {
        let json = serde_json::to_value(drill()).unwrap();
        assert_eq!(json["requestId"], 3);
        assert_eq!(json["ownerId"], 1);
        assert_eq!(json["available"], true);
    }
}
