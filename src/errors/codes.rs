use axum::http::StatusCode;
use std::fmt;

/// Application error codes carried in the `code` field of error envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed request (bad JSON, bad path parameter)
    BadRequest,

    /// Missing or invalid credentials
    Unauthorized,

    /// Record not found
    NotFound,

    /// Internal server error
    Internal,

    /// One or more request fields failed validation
    Validation,

    /// Email address is not valid
    InvalidEmail,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

impl ErrorCode {
    /// Numeric code as it appears on the wire
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::Internal => 500,
            Self::Validation => 4000,
            Self::InvalidEmail => 4001,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation | Self::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
