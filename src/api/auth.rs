use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::context::RequestContext;
use super::handlers::AppState;
use crate::errors::{
    render_error, AppError, ErrorCode, PublicApiError, Render, RenderError, ResponseError,
};
use crate::models::user::DEMO_USER_ID;

/// Authentication failures. These render themselves so the response can
/// carry a `WWW-Authenticate` challenge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed authorization header")]
    InvalidToken,
}

impl PublicApiError for AuthError {
    fn public_message(&self) -> String {
        "unauthorized".to_string()
    }

    fn error_code(&self) -> i32 {
        ErrorCode::Unauthorized.as_i32()
    }

    fn http_status_code(&self) -> StatusCode {
        ErrorCode::Unauthorized.status_code()
    }

    fn details(&self) -> Option<Vec<String>> {
        Some(vec![self.to_string()])
    }
}

impl Render for AuthError {
    fn render(&self, ctx: &RequestContext) -> Result<Response, RenderError> {
        let envelope = ResponseError::new(
            self.public_message(),
            self.error_code(),
            self.http_status_code(),
            self.details(),
            None,
        );
        let mut response = envelope.render(ctx)?;
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        Ok(response)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::rendered(err)
    }
}

/// Pull the user id out of a bearer token.
///
/// Signature and claim validation are not implemented; any well-formed
/// bearer token maps to the demo user.
pub fn check_jwt(headers: &HeaderMap) -> Result<Uuid, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)?;

    tracing::debug!(token_len = token.len(), "accepted bearer token");
    Ok(DEMO_USER_ID)
}

/// Require a bearer token on every request when auth is enabled
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.auth.enabled {
        return next.run(request).await;
    }

    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| RequestContext::new(request.method(), request.uri().path()));

    match check_jwt(request.headers()) {
        Ok(user_id) => {
            let mut ctx = ctx;
            ctx.user_id = Some(user_id);
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => render_error(&ctx, e.into()),
    }
}
