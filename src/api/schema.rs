use axum::{http::StatusCode, response::Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::context::RequestContext;
use crate::errors::{json_response, Render, RenderError};
use crate::models::user::{validate_email, User, UserError, MIN_PASSWORD_LEN};

/// Timestamps on the wire are second precision UTC, e.g. `2019-03-04T05:06:07Z`
mod json_time {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

/// Request to create a new user
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub gender: Option<String>,
    pub profile_image_url: Option<String>,
}

impl RegisterUserRequest {
    /// Email problems are reported on their own; everything else is collected
    /// into one validation error, in field order.
    pub fn validate(&self) -> Result<(), UserError> {
        validate_email(&self.email)?;

        let mut problems = Vec::new();
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            problems.push(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }
        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(UserError::Validation(problems))
        }
    }

    pub fn into_user(self) -> User {
        User {
            gender: self.gender,
            profile_image_url: self.profile_image_url,
            ..User::new(self.email.trim(), self.name.trim())
        }
    }
}

/// Public representation of a user
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub status: String,
    #[serde(serialize_with = "json_time::serialize")]
    #[schema(value_type = String, example = "2019-03-04T05:06:07Z")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "json_time::serialize")]
    #[schema(value_type = String, example = "2019-03-04T05:06:07Z")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            gender: user.gender,
            profile_image_url: user.profile_image_url,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response with the newly registered user
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterUserResponse {
    pub user: UserView,
}

impl Render for RegisterUserResponse {
    fn render(&self, _ctx: &RequestContext) -> Result<Response, RenderError> {
        json_response(StatusCode::CREATED, self)
    }
}

/// Response with a single user
#[derive(Debug, Serialize, ToSchema)]
pub struct GetUserResponse {
    pub user: UserView,
}

impl Render for GetUserResponse {
    fn render(&self, _ctx: &RequestContext) -> Result<Response, RenderError> {
        json_response(StatusCode::OK, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> RegisterUserRequest {
        RegisterUserRequest {
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
            name: "Alice".to_string(),
            gender: None,
            profile_image_url: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_bad_email_wins_over_other_problems() {
        let req = RegisterUserRequest {
            email: "alice".to_string(),
            name: String::new(),
            ..request()
        };
        assert_eq!(
            req.validate(),
            Err(UserError::InvalidEmail("alice".to_string()))
        );
    }

    #[test]
    fn test_problems_are_collected_in_field_order() {
        let req = RegisterUserRequest {
            password: "short".to_string(),
            name: " ".to_string(),
            ..request()
        };
        assert_eq!(
            req.validate(),
            Err(UserError::Validation(vec![
                "password must be at least 8 characters".to_string(),
                "name is required".to_string(),
            ]))
        );
    }

    #[test]
    fn test_user_view_time_format() {
        let mut user = User::demo();
        user.created_at = Utc.with_ymd_and_hms(2019, 3, 4, 5, 6, 7).unwrap();
        user.updated_at = user.created_at;

        let value = serde_json::to_value(UserView::from(user)).unwrap();
        assert_eq!(value["created_at"], "2019-03-04T05:06:07Z");
        assert_eq!(value["updated_at"], "2019-03-04T05:06:07Z");
        assert!(value.get("gender").is_none());
        assert!(value.get("deleted_at").is_none());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: RegisterUserRequest = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert_eq!(req.email, "");
        assert!(matches!(req.validate(), Err(UserError::InvalidEmail(_))));
    }
}
