use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    pub static ref HTTP_ERROR_RESPONSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_error_responses_total",
        "Total error responses by classification",
        &["kind"]  // kind: rendered, public, not_found, internal
    )
    .unwrap();

    // Database Metrics
    pub static ref DATABASE_QUERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "database_queries_total",
        "Total database queries",
        &["query_type"]  // query_type: select, insert, update
    )
    .unwrap();

    pub static ref DATABASE_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "database_query_duration_seconds",
        "Database query duration in seconds",
        &["query_type"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&HTTP_ERROR_RESPONSES_TOTAL);
    lazy_static::initialize(&DATABASE_QUERIES_TOTAL);
    lazy_static::initialize(&DATABASE_QUERY_DURATION_SECONDS);
}
