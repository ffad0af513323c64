use async_graphql::*;

use crate::models::user::User;

/// GraphQL representation of a user
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserType {
    /// Unique user ID
    pub id: ID,

    /// The user's name
    pub name: String,
}

impl From<User> for UserType {
    fn from(user: User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            name: user.name,
        }
    }
}
