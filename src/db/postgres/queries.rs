use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::RecordNotFound;
use crate::models::user::User;

/// Insert a new user
pub async fn create_user(pool: &PgPool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (
            id, email, name, gender, profile_image_url, status,
            created_at, updated_at, deleted_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.gender)
    .bind(&user.profile_image_url)
    .bind(&user.status)
    .bind(user.created_at)
    .bind(user.updated_at)
    .bind(user.deleted_at)
    .execute(pool)
    .await
    .context("Failed to insert user")?;

    Ok(())
}

/// Get a live (not soft-deleted) user by ID
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, gender, profile_image_url, status,
               created_at, updated_at, deleted_at
        FROM users
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch user")?;

    user.ok_or_else(|| RecordNotFound.into())
}

/// All live users, oldest first
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, gender, profile_image_url, status,
               created_at, updated_at, deleted_at
        FROM users
        WHERE deleted_at IS NULL
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list users")
}

/// Rename a live user
pub async fn update_user_name(pool: &PgPool, id: Uuid, name: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = $2, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING id, email, name, gender, profile_image_url, status,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to update user")?;

    user.ok_or_else(|| RecordNotFound.into())
}
