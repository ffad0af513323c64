pub mod auth;
pub mod context;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod schema;
