//! Item request (unmet demand) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::item::Item;

/// Item request model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
}

/// Create item request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(custom(function = "super::not_blank", message = "Description must not be blank"))]
    pub description: String,
}

/// Item request together with the items listed against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestWithItems {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
    pub items: Vec<Item>,
}

impl ItemRequestWithItems {
    pub fn new(request: ItemRequest, items: Vec<Item>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            requestor_id: request.requestor_id,
            created: request.created,
            items,
        }
    }
}

/// Distribute `items` over `requests` by `request_id`, preserving request order.
///
/// Each item is handed to the first request that claims it and is not
/// considered again, so an item never appears under two requests.
pub fn attach_items(requests: Vec<ItemRequest>, mut items: Vec<Item>) -> Vec<ItemRequestWithItems> {
    requests
        .into_iter()
        .map(|request| {
            let (matched, rest): (Vec<Item>, Vec<Item>) = std::mem::take(&mut items)
                .into_iter()
                .partition(|item| item.request_id == Some(request.id));
            items = rest;
            ItemRequestWithItems::new(request, matched)
        })
        .collect()
}
