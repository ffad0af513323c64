use utoipa::OpenApi;

use crate::api::schema::{GetUserResponse, RegisterUserRequest, RegisterUserResponse, UserView};
use crate::errors::ResponseError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GraphQL Server",
        version = "0.1.0",
        description = "Demo GraphQL-over-HTTP server. GraphQL is served at /graphql; the REST endpoints below share its error envelope.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::register_user,
        crate::api::handlers::get_user,
    ),
    components(
        schemas(
            ResponseError,
            RegisterUserRequest,
            RegisterUserResponse,
            GetUserResponse,
            UserView,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User registration and lookup"),
    )
)]
pub struct ApiDoc;
