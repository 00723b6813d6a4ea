//! Security headers applied to every response.

use axum::http::header::{self, HeaderName};
use axum::http::HeaderValue;
use axum::response::Response;

/// JSON and WebSocket only: no scripts, styles or framing.
const CSP: &str = "default-src 'none'; connect-src 'self' ws: wss:; frame-ancestors 'none'";

static SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (header::CONTENT_SECURITY_POLICY, CSP),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
];

/// Overwrite the security headers on `response`.
///
/// Installed with [`axum::middleware::map_response`].
pub(crate) async fn security_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in &SECURITY_HEADERS {
        headers.insert(name.clone(), HeaderValue::from_static(value));
    }
    response
}
