//! Request middleware: security headers, access logging, duration tracking,
//! and the terminal panic catcher.

use std::any::Any;
use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{error, info};

use super::handlers::ErrorResponse;
use crate::metrics::record_request_duration;

/// Set defensive security response headers on every response.
///
/// Equivalent header set to helmet's defaults, minus CSP (no HTML is served).
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    headers.insert(header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off"));
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        HeaderName::from_static("x-download-options"),
        HeaderValue::from_static("noopen"),
    );
    headers.insert(
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        HeaderValue::from_static("none"),
    );
    response
}

/// Write a combined-format access log line for every request.
///
/// `10.0.0.1 - - [31/Aug/2026:12:00:00 +0000] "GET /health HTTP/1.1" 200 62 "-" "kube-probe/1.29"`
pub async fn access_log(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Response {
    let remote = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = req.method().clone();
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let version = req.version();
    let referer = header_or_dash(req.headers().get(header::REFERER));
    let user_agent = header_or_dash(req.headers().get(header::USER_AGENT));

    let response = next.run(req).await;

    let length = header_or_dash(response.headers().get(header::CONTENT_LENGTH));
    info!(
        target: "access",
        "{} - - [{}] \"{} {} {:?}\" {} {} \"{}\" \"{}\"",
        remote,
        Utc::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        target,
        version,
        response.status().as_u16(),
        length,
        referer,
        user_agent,
    );

    response
}

fn header_or_dash(value: Option<&HeaderValue>) -> String {
    value
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

/// Observe each request's wall-clock duration into the duration histogram,
/// labeled by method, matched route pattern (raw path when nothing matched),
/// and response status code.
pub async fn track_request_duration(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |p| p.as_str().to_string());

    let response = next.run(req).await;

    record_request_duration(&method, &route, response.status(), start);
    response
}

/// Convert a handler panic into a generic 500 response, logging the detail.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal Server Error",
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payload_string_is_extracted() {
        let response = handle_panic(Box::new("boom".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn panic_payload_str_is_extracted() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_header_renders_dash() {
        assert_eq!(header_or_dash(None), "-");
    }
}
