use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;

use super::render::Render;
use crate::db::RecordNotFound;

/// An error whose message, code and status are safe to show to clients
pub trait PublicApiError: std::error::Error + Send + Sync + 'static {
    /// Public facing error message
    fn public_message(&self) -> String;

    /// Application error code
    fn error_code(&self) -> i32;

    /// HTTP status to respond with
    fn http_status_code(&self) -> StatusCode;

    /// Extra details to include in the envelope
    fn details(&self) -> Option<Vec<String>> {
        None
    }
}

/// An error that writes its own HTTP response
pub trait RenderableError: Render + std::error::Error + Send + Sync + 'static {}

impl<T> RenderableError for T where T: Render + std::error::Error + Send + Sync + 'static {}

/// Every failure a handler can hand to the responder.
///
/// The variant is chosen when the error is converted, in this order:
/// self-rendering errors first, then public errors, then the
/// [`RecordNotFound`] sentinel, and everything else is internal. A type that
/// both renders itself and declares a public error must convert into
/// [`AppError::Rendered`].
///
/// Error types opt in through their own `From<T> for AppError`. Use
/// [`AppError::rendered`] when `T` implements [`Render`], otherwise
/// [`AppError::public`]. Plain `anyhow` errors go through the `From` impl
/// below, which only recognises the sentinel.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Rendered(Box<dyn RenderableError>),

    #[error("{0}")]
    Public(Box<dyn PublicApiError>),

    #[error("record not found")]
    NotFound,

    #[error("{0:#}")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn rendered(err: impl RenderableError) -> Self {
        Self::Rendered(Box::new(err))
    }

    pub fn public(err: impl PublicApiError) -> Self {
        Self::Public(Box::new(err))
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rendered(_) => "rendered",
            Self::Public(_) => "public",
            Self::NotFound => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if err.is::<RecordNotFound>() {
            Self::NotFound
        } else {
            Self::Internal(err)
        }
    }
}

impl From<RecordNotFound> for AppError {
    fn from(_: RecordNotFound) -> Self {
        Self::NotFound
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::public(rejection)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::public(rejection)
    }
}

// Extractor rejections carry messages written for clients.

impl PublicApiError for JsonRejection {
    fn public_message(&self) -> String {
        self.body_text()
    }

    fn error_code(&self) -> i32 {
        i32::from(self.status().as_u16())
    }

    fn http_status_code(&self) -> StatusCode {
        self.status()
    }
}

impl PublicApiError for PathRejection {
    fn public_message(&self) -> String {
        self.body_text()
    }

    fn error_code(&self) -> i32 {
        i32::from(self.status().as_u16())
    }

    fn http_status_code(&self) -> StatusCode {
        self.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_sentinel_converts_to_not_found() {
        let err: AppError = anyhow::Error::from(RecordNotFound).into();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_sentinel_is_found_through_context() {
        let result: anyhow::Result<()> = Err(RecordNotFound).context("loading user");
        let err: AppError = result.unwrap_err().into();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err: AppError = anyhow!("connection refused").into();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.kind(), "internal");
    }
}
