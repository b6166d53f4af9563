//! End-to-end tests: a local CSV origin, the real HTTP fetcher, and the
//! service router bound to a real socket.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;

use csv_preview::api::{create_router, AppState};
use csv_preview::config::Config;
use csv_preview::fetch::HttpFetcher;
use csv_preview::preview::PreviewService;

const PEOPLE_CSV: &str = "name,age,member,notes\n\
Ada,36,true,\n\
Grace,85,false,\"Navy, retired\"\n\
Linus,,TRUE,kernel\n\
Ken,80,false\n\
Dennis,70,true,C\n\
Barbara,,false,late row\n";

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

async fn spawn_origin() -> SocketAddr {
    serve(
        Router::new()
            .route("/people.csv", get(|| async { PEOPLE_CSV }))
            .route("/short.csv", get(|| async { "a,b\n1,2\n3,4\n" }))
            .route(
                "/image.png",
                get(|| async { vec![0x89_u8, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff] }),
            ),
    )
    .await
}

async fn spawn_service() -> SocketAddr {
    let config = Config::default();
    let fetcher = HttpFetcher::new(&config).unwrap();
    let service = PreviewService::new(Arc::new(fetcher), config.preview_rows);
    serve(create_router(AppState::new(service))).await
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn post_upload(service: SocketAddr, file_url: &str) -> reqwest::Response {
    client()
        .post(format!("http://{service}/api/upload_file"))
        .form(&[("file_url", file_url)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn previews_remote_csv_end_to_end() {
    let origin = spawn_origin().await;
    let service = spawn_service().await;

    let response = post_upload(service, &format!("http://{origin}/people.csv")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        concat!(
            r#"[{"name":"Ada","age":36,"member":true,"notes":null},"#,
            r#"{"name":"Grace","age":85,"member":false,"notes":"Navy, retired"},"#,
            r#"{"name":"Linus","age":null,"member":true,"notes":"kernel"},"#,
            r#"{"name":"Ken","age":80,"member":false,"notes":null},"#,
            r#"{"name":"Dennis","age":70,"member":true,"notes":"C"}]"#
        )
    );
}

#[tokio::test]
async fn short_csv_returns_all_rows() {
    let origin = spawn_origin().await;
    let service = spawn_service().await;

    let response = post_upload(service, &format!("http://{origin}/short.csv")).await;
    let rows: Vec<serde_json::Value> = response.json().await.unwrap();

    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let origin = spawn_origin().await;
    let service = spawn_service().await;
    let url = format!("http://{origin}/people.csv");

    let first = post_upload(service, &url).await.bytes().await.unwrap();
    let second = post_upload(service, &url).await.bytes().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn binary_resource_is_unprocessable() {
    let origin = spawn_origin().await;
    let service = spawn_service().await;

    let response = post_upload(service, &format!("http://{origin}/image.png")).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "parse");
}

#[tokio::test]
async fn missing_resource_is_bad_gateway() {
    let origin = spawn_origin().await;
    let service = spawn_service().await;

    let response = post_upload(service, &format!("http://{origin}/nope.csv")).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "fetch");
}

#[tokio::test]
async fn greeting_routes_are_served() {
    let service = spawn_service().await;
    let client = client();

    let text = client
        .get(format!("http://{service}/api/python/Ada"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "Hello Ada");

    let json: serde_json::Value = client
        .get(format!("http://{service}/api/python"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["message"], "Hello, World!");
    assert_eq!(json["test"], "hello");
}
