//! Request correlation and access logging

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use snipcat_core_types::RequestId;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Adopt or mint a request id, expose it to handlers and echo it back
///
/// Also logs method, path, status and latency for every request.
pub async fn request_context(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(RequestId::from_header)
        .unwrap_or_default();
    request.extensions_mut().insert(request_id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    if status >= 500 {
        tracing::error!(%method, %path, status, latency_ms, request_id = %request_id, "request");
    } else if status >= 400 {
        tracing::warn!(%method, %path, status, latency_ms, request_id = %request_id, "request");
    } else {
        tracing::info!(%method, %path, status, latency_ms, request_id = %request_id, "request");
    }

    response
}
