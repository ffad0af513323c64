use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::backend::UserRepository;
use super::RecordNotFound;
use crate::models::user::User;

/// Process-local user store used when the database is disabled
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding only the demo user
    pub fn with_demo_user() -> Self {
        let demo = User::demo();
        Self {
            users: RwLock::new(HashMap::from([(demo.id, demo)])),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            bail!("user {} already exists", user.id);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<User> {
        self.users
            .read()
            .await
            .get(&id)
            .filter(|user| user.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| RecordNotFound.into())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|user| user.deleted_at.is_none())
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .filter(|user| user.deleted_at.is_none())
            .ok_or(RecordNotFound)?;
        user.name = name.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::DEMO_USER_ID;

    #[tokio::test]
    async fn test_demo_user_is_seeded() {
        let repo = MemoryUserRepository::with_demo_user();
        let user = repo.get_user(DEMO_USER_ID).await.unwrap();
        assert_eq!(user.name, "Bob");
        assert_eq!(repo.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_user_is_record_not_found() {
        let repo = MemoryUserRepository::new();
        let err = repo.get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is::<RecordNotFound>());

        let err = repo
            .update_user_name(Uuid::new_v4(), "Alice")
            .await
            .unwrap_err();
        assert!(err.is::<RecordNotFound>());
    }

    #[tokio::test]
    async fn test_create_and_rename() {
        let repo = MemoryUserRepository::new();
        let user = User::new("alice@example.com", "Alice");
        repo.create_user(&user).await.unwrap();
        assert!(repo.create_user(&user).await.is_err());

        let renamed = repo.update_user_name(user.id, "Alicia").await.unwrap();
        assert_eq!(renamed.name, "Alicia");
        assert_eq!(repo.get_user(user.id).await.unwrap().name, "Alicia");
    }

    #[tokio::test]
    async fn test_deleted_users_are_hidden() {
        let repo = MemoryUserRepository::new();
        let mut user = User::new("gone@example.com", "Gone");
        user.deleted_at = Some(Utc::now());
        repo.create_user(&user).await.unwrap();

        assert!(repo.get_user(user.id).await.unwrap_err().is::<RecordNotFound>());
        assert!(repo.list_users().await.unwrap().is_empty());
    }
}
