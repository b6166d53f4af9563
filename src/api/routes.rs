//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{greet, health, hello, metrics, upload_file, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Greeting endpoints
        .route("/api/python", get(hello))
        .route("/api/python/:name", get(greet))
        // Preview endpoint
        .route("/api/upload_file", post(upload_file))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fetch::{HttpFetcher, MockFetcher, MockResponse};
    use crate::preview::{PreviewService, DEFAULT_PREVIEW_ROWS};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tower::ServiceExt;

    const CSV_URL: &str = "http://data.test/rows.csv";

    fn app(mock: MockFetcher) -> Router {
        let service = PreviewService::new(Arc::new(mock), DEFAULT_PREVIEW_ROWS);
        create_router(AppState::new(service))
    }

    fn upload(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/upload_file")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn hello_returns_static_json() {
        let response = app(MockFetcher::new())
            .oneshot(Request::builder().uri("/api/python").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"message":"Hello, World!","test":"hello"}"#
        );
    }

    #[tokio::test]
    async fn greet_echoes_name_as_text() {
        let response = app(MockFetcher::new())
            .oneshot(
                Request::builder()
                    .uri("/api/python/Ada")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body_string(response).await, "Hello Ada");
    }

    #[tokio::test]
    async fn greet_does_not_escape_name() {
        let response = app(MockFetcher::new())
            .oneshot(
                Request::builder()
                    .uri("/api/python/%3Cb%3E")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "Hello <b>");
    }

    #[tokio::test]
    async fn upload_returns_row_array() {
        let mock = MockFetcher::new().with_body(CSV_URL, "a,b\n1,2\n3,4\n5,6\n7,8\n9,10\n11,12\n");

        let response = app(mock)
            .oneshot(upload("file_url=http%3A%2F%2Fdata.test%2Frows.csv"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"[{"a":1,"b":2},{"a":3,"b":4},{"a":5,"b":6},{"a":7,"b":8},{"a":9,"b":10}]"#
        );
    }

    #[tokio::test]
    async fn upload_without_field_is_400() {
        let response = app(MockFetcher::new()).oneshot(upload("other=1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn upload_with_wrong_content_type_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload_file")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"file_url":"http://data.test/rows.csv"}"#))
            .unwrap();

        let response = app(MockFetcher::new()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_404_is_502() {
        let mock = MockFetcher::new().with_response(CSV_URL, MockResponse::Status(404));

        let response = app(mock)
            .oneshot(upload("file_url=http://data.test/rows.csv"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "fetch");
        assert!(body["message"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn binary_upstream_is_422() {
        let mock = MockFetcher::new().with_response(CSV_URL, MockResponse::Body(vec![0xc3, 0x28]));

        let response = app(mock)
            .oneshot(upload("file_url=http://data.test/rows.csv"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unresolvable_host_yields_error_not_rows() {
        let config = Config {
            fetch_timeout_ms: 3_000,
            connect_timeout_ms: 2_000,
            ..Config::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let service = PreviewService::new(Arc::new(fetcher), DEFAULT_PREVIEW_ROWS);
        let app = create_router(AppState::new(service));

        let response = app
            .oneshot(upload("file_url=http://nonexistent.invalid/x.csv"))
            .await
            .unwrap();

        assert!(!response.status().is_success());
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!body.is_array());
        assert_eq!(body["error"], "fetch");
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let response = app(MockFetcher::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_503_without_recorder() {
        let response = app(MockFetcher::new())
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
