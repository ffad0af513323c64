//! Error classification and HTTP error responses

pub mod app;
pub mod codes;
pub mod render;
pub mod response;

pub use app::{AppError, PublicApiError, RenderableError};
pub use codes::ErrorCode;
pub use render::{json_response, render_error, render_response, Render, RenderError};
pub use response::ResponseError;
