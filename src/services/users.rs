//! Users service

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

use super::find_user;

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let created = self.repository.users.create(&user).await?;
        tracing::info!(user_id = created.id, "User registered: {}", created.email);
        Ok(created)
    }

    /// Patch name and/or email; empty fields are left untouched
    pub async fn update_user(&self, id: i64, patch: UpdateUser) -> AppResult<User> {
        let mut user = find_user(&self.repository, id).await?;
        patch.apply_to(&mut user);
        let updated = self.repository.users.update(&user).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        find_user(&self.repository, id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Deleting an unknown user is a no-op
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
