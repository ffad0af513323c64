use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::user::User;

/// Storage for users. Lookups that match nothing fail with
/// [`RecordNotFound`](super::RecordNotFound).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<User>;

    /// All users, oldest first
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Rename a user and return the updated row
    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<User>;

    /// Test database connection
    async fn test_connection(&self) -> Result<()>;

    /// Backend name for logs and the health endpoint
    fn backend_name(&self) -> &'static str;
}
