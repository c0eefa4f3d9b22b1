//! Per-request HTTP metrics

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Records `users_http_requests_total` (labels `method`, `path`, `status`)
/// and `users_http_request_duration_seconds` (labels `method`, `path`).
///
/// The path label is the matched route template, so `/api/users/{id}` is a
/// single series regardless of the id.
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => "unmatched".to_string(),
    };

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "users_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("users_http_request_duration_seconds", "method" => method, "path" => path)
        .record(elapsed);

    response
}
