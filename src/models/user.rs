use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "postgres")]
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::{AppError, ErrorCode, PublicApiError};

/// The demo account every stubbed token resolves to
pub const DEMO_USER_ID: Uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426655440000);

pub const MIN_PASSWORD_LEN: usize = 8;

/// A user row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(FromRow))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub gender: Option<String>,
    pub profile_image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// A fresh, active user with a new id
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            gender: None,
            profile_image_url: None,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// The seeded demo account
    pub fn demo() -> Self {
        Self {
            id: DEMO_USER_ID,
            ..Self::new("bob@example.com", "Bob")
        }
    }
}

/// User input problems that are safe to report back
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("invalid email: {0:?}")]
    InvalidEmail(String),

    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

impl PublicApiError for UserError {
    fn public_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "invalid email".to_string(),
            Self::Validation(_) => "validation failed".to_string(),
        }
    }

    fn error_code(&self) -> i32 {
        match self {
            Self::InvalidEmail(_) => ErrorCode::InvalidEmail.as_i32(),
            Self::Validation(_) => ErrorCode::Validation.as_i32(),
        }
    }

    fn http_status_code(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) => ErrorCode::InvalidEmail.status_code(),
            Self::Validation(_) => ErrorCode::Validation.status_code(),
        }
    }

    fn details(&self) -> Option<Vec<String>> {
        match self {
            Self::InvalidEmail(_) => None,
            Self::Validation(problems) => Some(problems.clone()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        AppError::public(err)
    }
}

/// Loose shape check: something before and after a single `@`, and a dot in
/// the domain
pub fn validate_email(email: &str) -> Result<(), UserError> {
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(UserError::InvalidEmail(email.to_string()))
    }
}

pub fn validate_name(name: &str) -> Result<(), UserError> {
    if name.trim().is_empty() {
        return Err(UserError::Validation(vec!["name is required".to_string()]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("bob@example.com").is_ok());
        assert!(validate_email(" bob@example.com ").is_ok());
        assert!(validate_email("bob").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("bob@localhost").is_err());
        assert!(validate_email("bob@@example.com").is_err());
        assert!(validate_email("bob@example.").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Bob").is_ok());
        assert_eq!(
            validate_name("  "),
            Err(UserError::Validation(vec!["name is required".to_string()]))
        );
    }

    #[test]
    fn test_user_error_public_values() {
        let err = UserError::InvalidEmail("bob".to_string());
        assert_eq!(err.public_message(), "invalid email");
        assert_eq!(err.error_code(), 4001);
        assert_eq!(err.http_status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details(), None);

        let err = UserError::Validation(vec!["name is required".to_string()]);
        assert_eq!(err.error_code(), 4000);
        assert_eq!(err.details(), Some(vec!["name is required".to_string()]));
    }

    #[test]
    fn test_demo_user() {
        let user = User::demo();
        assert_eq!(user.id.to_string(), "123e4567-e89b-12d3-a456-426655440000");
        assert_eq!(user.name, "Bob");
        assert_eq!(user.status, "active");
    }
}
