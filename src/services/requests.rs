//! Item requests service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        request::{attach_items, CreateItemRequest, ItemRequest, ItemRequestWithItems},
        Page,
    },
    repository::Repository,
};

use super::find_user;

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add_request(
        &self,
        user_id: i64,
        request: CreateItemRequest,
    ) -> AppResult<ItemRequest> {
        let requestor = find_user(&self.repository, user_id).await?;

        let created = self
            .repository
            .requests
            .create(requestor.id, &request.description, Utc::now())
            .await?;

        tracing::info!(request_id = created.id, user_id, "Item request created");
        Ok(created)
    }

    /// The caller's own requests, newest first, with the items offered in answer
    pub async fn list_own(&self, user_id: i64) -> AppResult<Vec<ItemRequestWithItems>> {
        find_user(&self.repository, user_id).await?;
        let requests = self.repository.requests.list_by_requestor(user_id).await?;
        self.with_items(requests).await
    }

    /// Requests by other users, newest first
    pub async fn list_others(
        &self,
        user_id: i64,
        page: Page,
    ) -> AppResult<Vec<ItemRequestWithItems>> {
        find_user(&self.repository, user_id).await?;
        let requests = self.repository.requests.list_by_others(user_id, page).await?;
        self.with_items(requests).await
    }

    /// Any existing user may read any request
    pub async fn get_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> AppResult<ItemRequestWithItems> {
        find_user(&self.repository, user_id).await?;

        let request = self
            .repository
            .requests
            .get_by_id(request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Item request with id {} not found", request_id))
            })?;

        let items = self
            .repository
            .items
            .list_by_request_ids(vec![request.id])
            .await?;
        Ok(ItemRequestWithItems::new(request, items))
    }

    async fn with_items(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestWithItems>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let ids = requests.iter().map(|r| r.id).collect();
        let items = self.repository.items.list_by_request_ids(ids).await?;
        Ok(attach_items(requests, items))
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::models::Item;
    use crate::repository::mock::MockStores;
    use crate::services::fixtures::user;

    fn request(id: i64, requestor_id: i64) -> ItemRequest {
        ItemRequest {
            id,
            description: format!("request {}", id),
            requestor_id,
            created: Utc::now(),
        }
    }

    fn answer(id: i64, request_id: i64) -> Item {
        Item {
            id,
            name: format!("item {}", id),
            description: "Offered".to_string(),
            available: true,
            owner_id: 9,
            request_id: Some(request_id),
        }
    }

    #[tokio::test]
    async fn test_add_request() {
        let mut stores = MockStores::new();
        stores.users.expect_get_by_id().returning(|id| Ok(Some(user(id))));
        stores
            .requests
            .expect_create()
            .times(1)
            .returning(|requestor_id, description, created| {
                Ok(ItemRequest {
                    id: 1,
                    description: description.to_string(),
                    requestor_id,
                    created,
                })
            });

        let service = RequestsService::new(stores.into_repository());
        let created = service
            .add_request(
                2,
                CreateItemRequest {
                    description: "Need a ladder".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.requestor_id, 2);
        assert_eq!(created.description, "Need a ladder");
    }

    #[tokio::test]
    async fn test_add_request_unknown_user() {
        let mut stores = MockStores::new();
        stores.users.expect_get_by_id().returning(|_| Ok(None));
        stores.requests.expect_create().never();

        let service = RequestsService::new(stores.into_repository());
        let result = service
            .add_request(
                42,
                CreateItemRequest {
                    description: "Need a ladder".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_own_attaches_items() {
        let mut stores = MockStores::new();
        stores.users.expect_get_by_id().returning(|id| Ok(Some(user(id))));
        stores
            .requests
            .expect_list_by_requestor()
            .with(eq(2))
            .returning(|id| Ok(vec![request(3, id), request(1, id)]));
        stores
            .items
            .expect_list_by_request_ids()
            .with(eq(vec![3, 1]))
            .times(1)
            .returning(|_| Ok(vec![answer(10, 1), answer(11, 3), answer(12, 1)]));

        let service = RequestsService::new(stores.into_repository());
        let own = service.list_own(2).await.unwrap();

        assert_eq!(own.len(), 2);
        assert_eq!(own[0].id, 3);
        assert_eq!(own[0].items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![11]);
        assert_eq!(own[1].items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![10, 12]);
    }

    #[tokio::test]
    async fn test_list_others_empty_skips_items() {
        let mut stores = MockStores::new();
        stores.users.expect_get_by_id().returning(|id| Ok(Some(user(id))));
        stores
            .requests
            .expect_list_by_others()
            .with(eq(2), eq(Page::new(5, 5)))
            .returning(|_, _| Ok(Vec::new()));
        stores.items.expect_list_by_request_ids().never();

        let service = RequestsService::new(stores.into_repository());
        assert!(service.list_others(2, Page::new(5, 5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_request_readable_by_any_user() {
        let mut stores = MockStores::new();
        stores.users.expect_get_by_id().returning(|id| Ok(Some(user(id))));
        stores
            .requests
            .expect_get_by_id()
            .returning(|id| Ok((id == 1).then(|| request(1, 2))));
        stores
            .items
            .expect_list_by_request_ids()
            .returning(|_| Ok(vec![answer(10, 1)]));

        let service = RequestsService::new(stores.into_repository());

        let found = service.get_request(7, 1).await.unwrap();
        assert_eq!(found.requestor_id, 2);
        assert_eq!(found.items.len(), 1);

        let missing = service.get_request(7, 99).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
