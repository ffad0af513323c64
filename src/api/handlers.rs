use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{Html, IntoResponse, Json, Response},
};
use async_graphql::http::GraphiQLSource;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use utoipa::OpenApi;
use uuid::Uuid;

use super::context::RequestContext;
use super::openapi::ApiDoc;
use super::schema::{GetUserResponse, RegisterUserRequest, RegisterUserResponse};
use crate::config::Config;
use crate::db::Users;
use crate::errors::{render_error, render_response, AppError, ResponseError};
use crate::graphql::GraphQLSchema;

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub config: Config,
    pub users: Users,
    pub graphql_schema: GraphQLSchema,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gql-server",
        "version": env!("CARGO_PKG_VERSION"),
        "database": state.users.backend_name(),
        "auth_enabled": state.config.auth.enabled,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User created", body = RegisterUserResponse),
        (status = 400, description = "Malformed body", body = ResponseError),
        (status = 401, description = "Missing or invalid token", body = ResponseError),
        (status = 422, description = "Validation failed", body = ResponseError),
        (status = 500, description = "Internal error", body = ResponseError)
    )
)]
pub async fn register_user(
    ctx: RequestContext,
    State(state): State<AppState>,
    body: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Response {
    match create_user(&state, body).await {
        Ok(created) => render_response(&ctx, &created),
        Err(e) => render_error(&ctx, e),
    }
}

async fn create_user(
    state: &AppState,
    body: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<RegisterUserResponse, AppError> {
    let Json(request) = body?;
    request.validate()?;

    let user = request.into_user();
    state.users.create_user(&user).await?;
    info!(user_id = %user.id, "Registered user");

    Ok(RegisterUserResponse { user: user.into() })
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = GetUserResponse),
        (status = 400, description = "Invalid user ID", body = ResponseError),
        (status = 401, description = "Missing or invalid token", body = ResponseError),
        (status = 404, description = "User not found", body = ResponseError),
        (status = 500, description = "Internal error", body = ResponseError)
    )
)]
pub async fn get_user(
    ctx: RequestContext,
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    match fetch_user(&state, id).await {
        Ok(found) => render_response(&ctx, &found),
        Err(e) => render_error(&ctx, e),
    }
}

async fn fetch_user(
    state: &AppState,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<GetUserResponse, AppError> {
    let Path(id) = id?;
    let user = state.users.get_user(id).await?;
    Ok(GetUserResponse { user: user.into() })
}

/// GraphQL endpoint
pub async fn graphql_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    body: Result<Json<async_graphql::Request>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return render_error(&ctx, rejection.into()),
    };

    if state.config.graphql.log_queries {
        log_graphql_request(&ctx, &request);
    }

    let response = state.graphql_schema.execute(request.data(ctx)).await;
    Json(response).into_response()
}

fn log_graphql_request(ctx: &RequestContext, request: &async_graphql::Request) {
    let variables = match serde_json::to_string(&request.variables) {
        Ok(variables) => variables,
        Err(e) => {
            error!(parent: &ctx.span, error = %e, "Failed to serialize GraphQL variables");
            return;
        }
    };

    let extensions = match serde_json::to_string(&request.extensions) {
        Ok(extensions) => extensions,
        Err(e) => {
            error!(parent: &ctx.span, error = %e, "Failed to serialize GraphQL extensions");
            return;
        }
    };

    info!(
        parent: &ctx.span,
        query = %request.query,
        operation_name = ?request.operation_name,
        variables = %variables,
        extensions = %extensions,
        "gql"
    );
}

/// GraphiQL playground pointed at `/graphql`
pub async fn graphql_playground() -> Html<String> {
    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// OpenAPI document for the REST endpoints
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
