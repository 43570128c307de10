//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use super::handlers::{health, info, metrics, not_found, ready, root, AppState};
use super::middleware::{access_log, handle_panic, security_headers, track_request_duration};

/// Create the API router with the full middleware chain applied.
pub fn create_router(state: AppState) -> Router {
    with_middleware(
        Router::new()
            .route("/", get(root))
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/metrics", get(metrics))
            .route("/api/v1/info", get(info))
            .fallback(not_found),
    )
    .with_state(state)
}

/// Apply the middleware chain: security headers, access log, duration
/// tracking, panic catcher (outermost to innermost).
fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(track_request_duration))
        .layer(middleware::from_fn(access_log))
        .layer(middleware::from_fn(security_headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use crate::config::Config;

    fn test_state() -> AppState {
        AppState::new(Config::default(), None)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_healthy_with_uptime() {
        let app = create_router(test_state());

        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn ready_returns_ready() {
        let app = create_router(test_state());

        let response = app.oneshot(get_request("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ready");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let app = create_router(test_state());

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Welcome to DevOps Demo Application");
        assert_eq!(body["version"], "1.0.0");
        assert_eq!(body["environment"], "development");
        assert_eq!(body["endpoints"]["health"], "/health");
        assert_eq!(body["endpoints"]["ready"], "/ready");
        assert_eq!(body["endpoints"]["metrics"], "/metrics");
        assert_eq!(body["endpoints"]["api"], "/api/v1");
    }

    #[tokio::test]
    async fn info_reports_kubernetes_placeholders() {
        let app = create_router(test_state());

        let response = app.oneshot(get_request("/api/v1/info")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["app"], "devops-demo-app");
        assert_eq!(body["version"], "1.0.0");
        assert_eq!(body["kubernetes"]["namespace"], "default");
        assert_eq!(body["kubernetes"]["podName"], "unknown");
        assert_eq!(body["kubernetes"]["nodeName"], "unknown");
    }

    #[tokio::test]
    async fn unknown_path_returns_404_json() {
        let app = create_router(test_state());

        let response = app.oneshot(get_request("/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Not Found" }));
    }

    #[tokio::test]
    async fn security_headers_present_on_every_response() {
        let app = create_router(test_state());

        // Including responses from the fallback.
        let response = app.oneshot(get_request("/nonexistent")).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
        assert_eq!(headers[header::X_XSS_PROTECTION], "0");
        assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
        assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    }

    #[tokio::test]
    async fn metrics_without_recorder_returns_500() {
        let app = create_router(test_state());

        let response = app.oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn metrics_exposes_request_duration_histogram() {
        // Sole test that installs the global recorder; other tests record
        // into the no-op recorder and stay independent.
        let handle = crate::metrics::install_recorder().expect("recorder install");
        let app = create_router(AppState::new(Config::default(), Some(handle)));

        let response = app.clone().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let exposition = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(exposition.contains("http_request_duration_seconds"));
        assert!(exposition.contains("method=\"GET\""));
        assert!(exposition.contains("route=\"/\""));
        assert!(exposition.contains("status_code=\"200\""));
    }

    #[tokio::test]
    async fn concurrent_health_requests_are_independent() {
        let app = create_router(test_state());

        let (a, b, c) = tokio::join!(
            app.clone().oneshot(get_request("/health")),
            app.clone().oneshot(get_request("/health")),
            app.oneshot(get_request("/health")),
        );

        for response in [a.unwrap(), b.unwrap(), c.unwrap()] {
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["status"], "healthy");
        }
    }

    #[tokio::test]
    async fn panicking_handler_returns_500_json() {
        async fn boom() -> &'static str {
            panic!("handler exploded")
        }

        let app = with_middleware(Router::new().route("/boom", get(boom)))
            .with_state(test_state());

        let response = app.oneshot(get_request("/boom")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Internal Server Error" }));
    }
}
