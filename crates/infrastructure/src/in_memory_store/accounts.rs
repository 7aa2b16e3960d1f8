use async_trait::async_trait;
use sgi_application::{AreaRepository, UserRecord, UserRepository};
use sgi_core::{AppError, AppResult, UserId};
use sgi_domain::AreaName;

use super::InMemoryStore;
use crate::postgres_errors::missing_area_message;

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn list_users(&self, limit: usize, offset: usize) -> AppResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|left, right| left.email.cmp(&right.email));
        Ok(users.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn insert_user(&self, user: &UserRecord) -> AppResult<()> {
        self.ensure_area_exists(user.area.as_str()).await?;

        let mut users = self.users.write().await;
        if users
            .values()
            .any(|stored| stored.email.eq_ignore_ascii_case(user.email.as_str()))
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &UserRecord) -> AppResult<()> {
        self.ensure_area_exists(user.area.as_str()).await?;

        let mut users = self.users.write().await;
        if users.values().any(|stored| {
            stored.id != user.id && stored.email.eq_ignore_ascii_case(user.email.as_str())
        }) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let Some(stored) = users.get_mut(&user.id) else {
            return Err(AppError::NotFound(format!("user '{}' not found", user.id)));
        };
        *stored = user.clone();
        Ok(())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let Some(stored) = users.get_mut(&user_id) else {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        };
        password_hash.clone_into(&mut stored.password_hash);
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        if self.users.write().await.remove(&user_id).is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        }

        self.grants
            .write()
            .await
            .retain(|grant| grant.user_id != user_id);
        Ok(())
    }
}

impl InMemoryStore {
    pub(super) async fn ensure_area_exists(&self, name: &str) -> AppResult<()> {
        if self
            .areas
            .read()
            .await
            .iter()
            .any(|area| area.as_str() == name)
        {
            return Ok(());
        }

        Err(AppError::Validation(missing_area_message(name)))
    }
}

#[async_trait]
impl AreaRepository for InMemoryStore {
    async fn list_areas(&self) -> AppResult<Vec<AreaName>> {
        let mut areas = self.areas.read().await.clone();
        areas.sort_by_key(|area| area.as_str().to_lowercase());
        Ok(areas)
    }

    async fn find_area(&self, name: &str) -> AppResult<Option<AreaName>> {
        Ok(self
            .areas
            .read()
            .await
            .iter()
            .find(|area| area.same_entry(name))
            .cloned())
    }

    async fn create_area(&self, area: &AreaName) -> AppResult<()> {
        let mut areas = self.areas.write().await;
        if areas.iter().any(|stored| stored.same_entry(area.as_str())) {
            return Err(AppError::Conflict(format!("area '{area}' already exists")));
        }

        areas.push(area.clone());
        Ok(())
    }

    async fn rename_area(&self, current: &str, renamed: &AreaName) -> AppResult<()> {
        let mut areas = self.areas.write().await;
        let Some(position) = areas.iter().position(|area| area.same_entry(current)) else {
            return Err(AppError::NotFound(format!(
                "area '{}' does not exist",
                current.trim()
            )));
        };
        if areas
            .iter()
            .enumerate()
            .any(|(index, area)| index != position && area.same_entry(renamed.as_str()))
        {
            return Err(AppError::Conflict(format!("area '{renamed}' already exists")));
        }

        let previous = std::mem::replace(&mut areas[position], renamed.clone());
        let mut users = self.users.write().await;
        let mut records = self.records.write().await;
        for user in users.values_mut() {
            if user.area == previous.as_str() {
                renamed.as_str().clone_into(&mut user.area);
            }
        }
        for record in records.values_mut() {
            if record.area == previous.as_str() {
                renamed.as_str().clone_into(&mut record.area);
            }
        }

        Ok(())
    }

    async fn remove_area(&self, name: &str) -> AppResult<()> {
        let mut areas = self.areas.write().await;
        let Some(position) = areas.iter().position(|area| area.same_entry(name)) else {
            return Err(AppError::NotFound(format!(
                "area '{}' does not exist",
                name.trim()
            )));
        };

        let stored = areas[position].as_str().to_owned();
        let in_use = self
            .users
            .read()
            .await
            .values()
            .any(|user| user.area == stored)
            || self
                .records
                .read()
                .await
                .values()
                .any(|record| record.area == stored);
        if in_use {
            return Err(AppError::Conflict(format!(
                "area '{stored}' is still assigned to users or records"
            )));
        }

        areas.remove(position);
        Ok(())
    }
}
