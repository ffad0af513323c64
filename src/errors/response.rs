use axum::{http::StatusCode, response::Response};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use super::codes::ErrorCode;
use super::render::{json_response, Render, RenderError};
use crate::api::context::RequestContext;

/// Error envelope written to clients
///
/// `code` and `error` are left out of the body when zero/empty. `details` is
/// always present and serializes as `[]` when nothing was supplied.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseError {
    /// Cause of the failure, never serialized
    #[serde(skip)]
    source: Option<anyhow::Error>,
    /// HTTP status for the response, never serialized
    #[serde(skip)]
    status: StatusCode,
    /// Application error code
    #[serde(rename = "code", skip_serializing_if = "is_zero")]
    pub error_code: i32,
    /// Human-readable error message
    #[serde(rename = "error", skip_serializing_if = "String::is_empty")]
    pub error_message: String,
    /// Extra details about the failure
    pub details: Vec<String>,
}

fn is_zero(code: &i32) -> bool {
    *code == 0
}

impl ResponseError {
    /// Create a new error envelope
    pub fn new(
        message: impl Into<String>,
        error_code: i32,
        status: StatusCode,
        details: Option<Vec<String>>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            source,
            status,
            error_code,
            error_message: message.into(),
            details: details.unwrap_or_default(),
        }
    }

    /// Generic internal error. The cause stays on the server.
    pub fn internal(source: anyhow::Error) -> Self {
        Self::new(
            "internal error",
            ErrorCode::Internal.as_i32(),
            ErrorCode::Internal.status_code(),
            None,
            Some(source),
        )
    }

    pub fn not_found() -> Self {
        Self::new(
            "record not found",
            ErrorCode::NotFound.as_i32(),
            ErrorCode::NotFound.status_code(),
            None,
            None,
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn source(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }
}

impl Render for ResponseError {
    fn render(&self, ctx: &RequestContext) -> Result<Response, RenderError> {
        if let Some(source) = self.source() {
            error!(parent: &ctx.span, error = %format!("{source:#}"), "internal error");
        }
        json_response(self.status, self)
    }
}
