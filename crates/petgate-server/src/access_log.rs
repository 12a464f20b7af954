// Per-group access log
// Decision: Installed outside the credential gate so rejected requests are recorded too

use axum::{
    extract::{OriginalUri, Request},
    http::header,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Middleware recording method, host, path, status and latency
pub async fn log_access(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    // Nested routers see a stripped URI; the original keeps the group prefix
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    tracing::info!(
        target: "petgate::access",
        method = %method,
        host = %host,
        path = %path,
        status = response.status().as_u16(),
        latency = ?started.elapsed(),
        "request"
    );

    response
}
