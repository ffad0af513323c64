pub mod connection;
pub mod queries;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::backend::UserRepository;
use crate::models::user::User;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: &User) -> Result<()> {
        queries::create_user(&self.pool, user).await
    }

    async fn get_user(&self, id: Uuid) -> Result<User> {
        queries::get_user(&self.pool, id).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        queries::list_users(&self.pool).await
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<User> {
        queries::update_user_name(&self.pool, id, name).await
    }

    async fn test_connection(&self) -> Result<()> {
        connection::test_connection(&self.pool).await
    }

    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}
