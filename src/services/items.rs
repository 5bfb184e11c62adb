//! Item catalog service: listing, search and comments

use std::collections::HashMap;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingShort, BookingStatus},
        comment::{Comment, CreateComment},
        item::{CreateItem, Item, ItemDetails, NewItem, UpdateItem},
        Page,
    },
    repository::{BookingOrder, Repository},
};

use super::{find_item, find_user};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List a new item, optionally in answer to an item request
    pub async fn add_item(&self, owner_id: i64, item: CreateItem) -> AppResult<Item> {
        let owner = find_user(&self.repository, owner_id).await?;

        let available = item
            .available
            .ok_or_else(|| AppError::Validation("Availability must be set".to_string()))?;

        if let Some(request_id) = item.request_id {
            self.repository
                .requests
                .get_by_id(request_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Item request with id {} not found", request_id))
                })?;
        }

        let created = self
            .repository
            .items
            .create(&NewItem {
                owner_id: owner.id,
                name: item.name,
                description: item.description,
                available,
                request_id: item.request_id,
            })
            .await?;

        tracing::info!(item_id = created.id, owner_id, "Item listed: {}", created.name);
        Ok(created)
    }

    /// Partial update by the item's owner; anyone else gets `NotFound`
    pub async fn update_item(
        &self,
        owner_id: i64,
        item_id: i64,
        patch: UpdateItem,
    ) -> AppResult<Item> {
        find_user(&self.repository, owner_id).await?;
        let mut item = find_item(&self.repository, item_id).await?;

        if item.owner_id != owner_id {
            return Err(AppError::NotFound(format!(
                "Item {} does not belong to user {}",
                item_id, owner_id
            )));
        }

        patch.apply_to(&mut item);
        let updated = self.repository.items.update(&item).await?;

        tracing::info!(item_id, owner_id, "Item updated");
        Ok(updated)
    }

    /// Item with comments; booking hints are only filled in for the owner
    pub async fn get_item(&self, item_id: i64, viewer_id: i64) -> AppResult<ItemDetails> {
        let item = find_item(&self.repository, item_id).await?;

        let (mut last, mut next) = if item.owner_id == viewer_id {
            self.booking_hints(vec![item.id], viewer_id).await?
        } else {
            (HashMap::new(), HashMap::new())
        };

        let comments = self.repository.comments.list_by_items(vec![item.id]).await?;

        Ok(ItemDetails::new(
            item,
            last.remove(&item_id),
            next.remove(&item_id),
            comments,
        ))
    }

    /// Owner's items, each with booking hints and comments, fetched in bulk
    pub async fn get_items_by_owner(
        &self,
        owner_id: i64,
        page: Page,
    ) -> AppResult<Vec<ItemDetails>> {
        find_user(&self.repository, owner_id).await?;

        let items = self.repository.items.list_by_owner(owner_id, page).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
        let (mut last, mut next) = self.booking_hints(ids.clone(), owner_id).await?;
        let mut comments = group_comments(self.repository.comments.list_by_items(ids).await?);

        Ok(items
            .into_iter()
            .map(|item| {
                let id = item.id;
                ItemDetails::new(
                    item,
                    last.remove(&id),
                    next.remove(&id),
                    comments.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    /// Available items matching `text` in name or description; blank text matches nothing
    pub async fn search(&self, text: &str, page: Page) -> AppResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.items.search(text, page).await
    }

    /// Feedback from a user whose approved booking of the item has ended
    pub async fn add_comment(
        &self,
        item_id: i64,
        user_id: i64,
        comment: CreateComment,
    ) -> AppResult<Comment> {
        let item = find_item(&self.repository, item_id).await?;
        let author = find_user(&self.repository, user_id).await?;
        let now = Utc::now();

        if !self
            .repository
            .bookings
            .exists_finished_approved(author.id, item.id, now)
            .await?
        {
            tracing::warn!(user_id, item_id, "Comment rejected: no finished booking");
            return Err(AppError::Validation(format!(
                "User {} has no finished booking of item {}",
                user_id, item_id
            )));
        }

        let created = self
            .repository
            .comments
            .create(item.id, author.id, &comment.text, now)
            .await?;

        tracing::info!(comment_id = created.id, item_id, user_id, "Comment added");
        Ok(created)
    }

    /// Last and next approved bookings per item, keyed by item id
    async fn booking_hints(
        &self,
        item_ids: Vec<i64>,
        owner_id: i64,
    ) -> AppResult<(HashMap<i64, BookingShort>, HashMap<i64, BookingShort>)> {
        let now = Utc::now();
        let by_end = self
            .repository
            .bookings
            .list_by_items(item_ids.clone(), BookingOrder::EndDesc)
            .await?;
        let by_start = self
            .repository
            .bookings
            .list_by_items(item_ids, BookingOrder::StartAsc)
            .await?;

        let last = first_per_item(&by_end, |b| is_owned_approved(b, owner_id) && b.end < now);
        let next = first_per_item(&by_start, |b| is_owned_approved(b, owner_id) && b.start > now);
        Ok((last, next))
    }
}

fn is_owned_approved(booking: &Booking, owner_id: i64) -> bool {
    booking.status == BookingStatus::Approved && booking.item.owner_id == owner_id
}

/// For each item keep the first booking, in slice order, accepted by `accept`
fn first_per_item(
    bookings: &[Booking],
    accept: impl Fn(&Booking) -> bool,
) -> HashMap<i64, BookingShort> {
    let mut picked = HashMap::new();
    for booking in bookings {
        if !picked.contains_key(&booking.item.id) && accept(booking) {
            picked.insert(booking.item.id, BookingShort::from(booking));
        }
    }
    picked
}

fn group_comments(comments: Vec<Comment>) -> HashMap<i64, Vec<Comment>> {
    let mut grouped: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in comments {
        grouped.entry(comment.item_id).or_default().push(comment);
    }
    grouped
}
