//! Turning handler results into HTTP responses.
//!
//! [`render_error`] is the single place where a failed request becomes a
//! response. Public errors pass their message through verbatim, internal
//! errors are replaced with a generic envelope and only logged.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, info};

use super::app::AppError;
use super::response::ResponseError;
use crate::api::context::RequestContext;
use crate::metrics::registry::HTTP_ERROR_RESPONSES_TOTAL;

/// A value that knows how to write itself as an HTTP response
pub trait Render {
    fn render(&self, ctx: &RequestContext) -> Result<Response, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build response: {0}")]
    Http(#[from] axum::http::Error),
}

/// Serialize `body` as the JSON payload of a response with `status`
pub fn json_response<T>(status: StatusCode, body: &T) -> Result<Response, RenderError>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(body)?;
    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))?;
    Ok(response)
}

/// Classify `err` and write the matching response
pub fn render_error(ctx: &RequestContext, err: AppError) -> Response {
    HTTP_ERROR_RESPONSES_TOTAL
        .with_label_values(&[err.kind()])
        .inc();

    let rendered = match err {
        AppError::Rendered(err) => {
            info!(parent: &ctx.span, error = %err, "rendering error");
            err.render(ctx)
        }
        AppError::Public(err) => {
            let response = ResponseError::new(
                err.public_message(),
                err.error_code(),
                err.http_status_code(),
                err.details(),
                None,
            );
            info!(
                parent: &ctx.span,
                error = %err,
                code = response.error_code,
                status = response.status().as_u16(),
                "rendering public error"
            );
            response.render(ctx)
        }
        AppError::NotFound => {
            info!(parent: &ctx.span, "rendering record not found");
            ResponseError::not_found().render(ctx)
        }
        AppError::Internal(err) => {
            info!(parent: &ctx.span, "masking internal error");
            ResponseError::internal(err).render(ctx)
        }
    };

    finish(ctx, rendered)
}

/// Write a successful response
pub fn render_response<R>(ctx: &RequestContext, value: &R) -> Response
where
    R: Render + ?Sized,
{
    finish(ctx, value.render(ctx))
}

// Once rendering has failed nothing more can be sent, so the client only
// gets a bare status.
fn finish(ctx: &RequestContext, rendered: Result<Response, RenderError>) -> Response {
    match rendered {
        Ok(response) => response,
        Err(e) => {
            error!(parent: &ctx.span, error = %e, "failed to render response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
