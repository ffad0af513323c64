pub mod errors;
pub mod schema;
pub mod types;

pub use errors::graphql_error;
pub use schema::{create_schema, GraphQLSchema};
