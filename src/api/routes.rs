use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::auth::auth_middleware;
use super::handlers::{
    get_user, graphql_handler, graphql_playground, health, openapi_json, register_user, AppState,
};
use super::middleware::logging_middleware;
use crate::config::CorsConfig;
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    // API routes sit behind the auth check when it is enabled
    let api = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/users", post(register_user))
        .route("/users/:id", get(get_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let mut router = Router::new()
        // Health check
        .route("/health", get(health))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api);

    if state.config.graphql.playground {
        router = router.route("/playground", get(graphql_playground));
    }

    // Add middleware (order matters: metrics -> logging -> cors -> trace)
    router = router
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(middleware::from_fn(logging_middleware));

    if let Some(cors) = cors_layer(&state.config.cors) {
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}

/// CORS policy from configuration, `None` when disabled
pub fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if !config.enabled {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let layer = if config.allowed_origins.is_empty()
        || config.allowed_origins.iter().any(|origin| origin == "*")
    {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    };

    if config.debug {
        info!(origins = ?config.allowed_origins, "CORS enabled");
    }

    Some(layer)
}
