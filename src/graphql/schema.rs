use async_graphql::*;
use axum::http::Method;
use uuid::Uuid;

use crate::api::context::RequestContext;
use crate::config::AuthConfig;
use crate::db::Users;
use crate::errors::AppError;
use crate::graphql::errors::{graphql_error, InvalidId};
use crate::graphql::types::*;
use crate::models::user::{validate_name, DEMO_USER_ID};

/// The request context attached by the HTTP handler, or a fresh one when the
/// schema is executed directly
fn request_context(ctx: &Context<'_>) -> RequestContext {
    ctx.data_opt::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| RequestContext::new(&Method::POST, "/graphql"))
}

/// GraphQL Query root
pub struct Query;

#[Object]
impl Query {
    /// All users
    async fn get_users(&self, ctx: &Context<'_>) -> Result<Vec<UserType>> {
        let request = request_context(ctx);
        let users = ctx.data::<Users>()?;

        let users = users
            .list_users()
            .await
            .map_err(|e| graphql_error(&request, e.into()))?;

        Ok(users.into_iter().map(UserType::from).collect())
    }

    /// Get a user by ID
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<UserType> {
        let request = request_context(ctx);
        let users = ctx.data::<Users>()?;

        let user_id = Uuid::parse_str(&id.0)
            .map_err(|_| graphql_error(&request, AppError::public(InvalidId(id.0.clone()))))?;

        let user = users
            .get_user(user_id)
            .await
            .map_err(|e| graphql_error(&request, e.into()))?;

        Ok(user.into())
    }
}

/// GraphQL Mutation root
pub struct Mutation;

#[Object]
impl Mutation {
    /// Rename the requesting user. Without auth this is the demo user.
    async fn update_user(&self, ctx: &Context<'_>, name: String) -> Result<UserType> {
        let request = request_context(ctx);
        let users = ctx.data::<Users>()?;
        let auth = ctx.data::<AuthConfig>()?;

        let user_id = if auth.enabled {
            // No HTTP response to attach a challenge to, so report it as public
            request
                .require_user()
                .map_err(|e| graphql_error(&request, AppError::public(e)))?
        } else {
            request.user_id.unwrap_or(DEMO_USER_ID)
        };

        validate_name(&name).map_err(|e| graphql_error(&request, e.into()))?;

        let user = users
            .update_user_name(user_id, name.trim())
            .await
            .map_err(|e| graphql_error(&request, e.into()))?;

        Ok(user.into())
    }
}

/// GraphQL schema type
pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create a new GraphQL schema backed by the given user store
pub fn create_schema(users: Users, auth: AuthConfig) -> GraphQLSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(users)
        .data(auth)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryUserRepository, UserRepository};
    use crate::models::user::User;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct BrokenRepository;

    #[async_trait]
    impl UserRepository for BrokenRepository {
        async fn create_user(&self, _user: &User) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }

        async fn get_user(&self, _id: Uuid) -> anyhow::Result<User> {
            anyhow::bail!("connection refused")
        }

        async fn list_users(&self) -> anyhow::Result<Vec<User>> {
            anyhow::bail!("connection refused")
        }

        async fn update_user_name(&self, _id: Uuid, _name: &str) -> anyhow::Result<User> {
            anyhow::bail!("connection refused")
        }

        async fn test_connection(&self) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    fn demo_schema() -> GraphQLSchema {
        create_schema(
            Arc::new(MemoryUserRepository::with_demo_user()),
            AuthConfig::default(),
        )
    }

    fn auth_schema() -> GraphQLSchema {
        create_schema(
            Arc::new(MemoryUserRepository::with_demo_user()),
            AuthConfig { enabled: true },
        )
    }

    async fn run(schema: &GraphQLSchema, query: &str) -> Value {
        serde_json::to_value(schema.execute(query).await).unwrap()
    }

    #[tokio::test]
    async fn test_get_users_returns_demo_user() {
        let body = run(&demo_schema(), "{ getUsers { id name } }").await;
        assert_eq!(
            body["data"]["getUsers"],
            json!([{"id": "123e4567-e89b-12d3-a456-426655440000", "name": "Bob"}])
        );
    }

    #[tokio::test]
    async fn test_unknown_user_is_record_not_found() {
        let query = format!(r#"{{ user(id: "{}") {{ name }} }}"#, Uuid::new_v4());
        let body = run(&demo_schema(), &query).await;

        assert_eq!(body["errors"][0]["message"], "record not found");
        assert_eq!(body["errors"][0]["extensions"]["code"], 404);
    }

    #[tokio::test]
    async fn test_malformed_id_is_public_error() {
        let body = run(&demo_schema(), r#"{ user(id: "nope") { name } }"#).await;

        assert_eq!(body["errors"][0]["message"], "invalid user id");
        assert_eq!(body["errors"][0]["extensions"]["code"], 400);
    }

    #[tokio::test]
    async fn test_update_user_renames_demo_user() {
        let schema = demo_schema();
        let body = run(&schema, r#"mutation { updateUser(name: "Alice") { id name } }"#).await;
        assert_eq!(
            body["data"]["updateUser"],
            json!({"id": "123e4567-e89b-12d3-a456-426655440000", "name": "Alice"})
        );

        let body = run(&schema, "{ getUsers { name } }").await;
        assert_eq!(body["data"]["getUsers"], json!([{"name": "Alice"}]));
    }

    #[tokio::test]
    async fn test_update_user_uses_request_user() {
        let schema = demo_schema();
        let mut ctx = RequestContext::new(&Method::POST, "/graphql");
        ctx.user_id = Some(Uuid::new_v4());

        let request = Request::new(r#"mutation { updateUser(name: "Alice") { id } }"#).data(ctx);
        let body = serde_json::to_value(schema.execute(request).await).unwrap();
        assert_eq!(body["errors"][0]["message"], "record not found");
    }

    #[tokio::test]
    async fn test_update_user_requires_user_when_auth_enabled() {
        let body = run(&auth_schema(), r#"mutation { updateUser(name: "Alice") { id } }"#).await;

        assert_eq!(body["errors"][0]["message"], "unauthorized");
        assert_eq!(body["errors"][0]["extensions"]["code"], 401);
        assert_eq!(
            body["errors"][0]["extensions"]["details"],
            json!(["missing bearer token"])
        );
    }

    #[tokio::test]
    async fn test_update_user_with_authenticated_user() {
        let schema = auth_schema();
        let mut ctx = RequestContext::new(&Method::POST, "/graphql");
        ctx.user_id = Some(DEMO_USER_ID);

        let request = Request::new(r#"mutation { updateUser(name: "Alice") { name } }"#).data(ctx);
        let body = serde_json::to_value(schema.execute(request).await).unwrap();
        assert_eq!(body["data"]["updateUser"], json!({"name": "Alice"}));
    }

    #[tokio::test]
    async fn test_update_user_rejects_empty_name() {
        let body = run(&demo_schema(), r#"mutation { updateUser(name: " ") { id } }"#).await;

        assert_eq!(body["errors"][0]["message"], "validation failed");
        assert_eq!(body["errors"][0]["extensions"]["code"], 4000);
        assert_eq!(
            body["errors"][0]["extensions"]["details"],
            json!(["name is required"])
        );
    }

    #[tokio::test]
    async fn test_internal_errors_are_masked() {
        let schema = create_schema(Arc::new(BrokenRepository), AuthConfig::default());
        let body = run(&schema, "{ getUsers { id } }").await;

        assert_eq!(body["errors"][0]["message"], "internal error");
        assert_eq!(body["errors"][0]["extensions"]["code"], 500);
        assert!(!body.to_string().contains("connection refused"));
    }
}
