use async_graphql::{Error, ErrorExtensions};
use axum::http::StatusCode;
use tracing::error;

use crate::api::context::RequestContext;
use crate::errors::{AppError, ErrorCode, PublicApiError};

/// An ID argument that is not a UUID
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid user id: {0:?}")]
pub struct InvalidId(pub String);

impl PublicApiError for InvalidId {
    fn public_message(&self) -> String {
        "invalid user id".to_string()
    }

    fn error_code(&self) -> i32 {
        ErrorCode::BadRequest.as_i32()
    }

    fn http_status_code(&self) -> StatusCode {
        ErrorCode::BadRequest.status_code()
    }
}

/// Turn a resolver failure into the error shown in the GraphQL response.
///
/// Public errors keep their message, code and details; the not-found
/// sentinel becomes "record not found"; anything else is reported as
/// "internal error" and only logged.
pub fn graphql_error(ctx: &RequestContext, err: AppError) -> Error {
    error!(parent: &ctx.span, kind = err.kind(), error = %err, "GraphQL resolver failed");

    let (message, code, details) = match &err {
        AppError::Public(e) => (e.public_message(), e.error_code(), e.details()),
        AppError::NotFound => (
            "record not found".to_string(),
            ErrorCode::NotFound.as_i32(),
            None,
        ),
        AppError::Rendered(_) | AppError::Internal(_) => (
            "internal error".to_string(),
            ErrorCode::Internal.as_i32(),
            None,
        ),
    };

    Error::new(message).extend_with(|_, ext| {
        ext.set("code", code);
        if let Some(details) = details {
            ext.set("details", details);
        }
    })
}
