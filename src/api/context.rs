use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, Method},
};
use std::convert::Infallible;
use tracing::Span;
use uuid::Uuid;

use crate::api::auth::AuthError;

/// Per-request values threaded through handlers and resolvers.
///
/// Created by the logging middleware and stored in the request extensions.
/// The auth middleware fills in `user_id`.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub method: Method,
    pub path: String,
    pub user_id: Option<Uuid>,
    /// Span every log line for this request is recorded under
    pub span: Span,
}

impl RequestContext {
    pub fn new(method: &Method, path: &str) -> Self {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
        );

        Self {
            request_id,
            method: method.clone(),
            path: path.to_string(),
            user_id: None,
            span,
        }
    }

    /// The authenticated user, or an auth error when the request has none
    pub fn require_user(&self) -> Result<Uuid, AuthError> {
        self.user_id.ok_or(AuthError::MissingToken)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::new(&parts.method, parts.uri.path())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_user() {
        let mut ctx = RequestContext::new(&Method::POST, "/graphql");
        assert!(matches!(ctx.require_user(), Err(AuthError::MissingToken)));

        let id = Uuid::new_v4();
        ctx.user_id = Some(id);
        assert_eq!(ctx.require_user().unwrap(), id);
    }

    #[tokio::test]
    async fn test_extractor_reuses_stored_context() {
        let stored = RequestContext::new(&Method::GET, "/users");
        let request = axum::http::Request::builder()
            .uri("/users")
            .extension(stored.clone())
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let extracted = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted.request_id, stored.request_id);
    }
}
