use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn, Instrument};

use crate::api::context::RequestContext;

/// Create the request context and log every request and response with
/// structured data
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let ctx = RequestContext::new(request.method(), request.uri().path());
    let span = ctx.span.clone();

    // Extract request information
    let query = request.uri().query().unwrap_or("").to_string();
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // Log incoming request
    info!(
        parent: &span,
        query = %sanitize_query(&query),
        user_agent = %user_agent,
        "Incoming request"
    );

    request.extensions_mut().insert(ctx);

    // Process request
    let response = next.run(request).instrument(span.clone()).await;

    // Calculate duration
    let duration = start.elapsed();
    let status = response.status();

    // Log response
    if status.is_success() || status.is_redirection() {
        info!(
            parent: &span,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    } else if status.is_client_error() {
        warn!(
            parent: &span,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed (client error)"
        );
    } else {
        warn!(
            parent: &span,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed (server error)"
        );
    }

    response
}

/// Sanitize query parameters to hide sensitive data
fn sanitize_query(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    query
        .split('&')
        .map(|pair| {
            let key = pair.split('=').next().unwrap_or("");
            let sensitive = ["api_key", "token", "password", "secret"]
                .iter()
                .any(|s| key.eq_ignore_ascii_case(s));
            if sensitive {
                format!("{}=***", key)
            } else {
                pair.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
