use super::*;
use crate::HttpMetadataClient;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod system;

const METADATA_PATH: &str = "/auth/get-user-metadata";
const BOUNDARY: &str = "----uid-metadata-test-boundary";

/// Config pointing the metadata client at `server`
fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.metadata.base_url = format!("{}{}", server.uri(), METADATA_PATH);
    config.metadata.timeout = Duration::from_secs(2);
    config
}

/// Router wired to a real HTTP client talking to `server`
fn test_router(config: Config) -> Router {
    let client = HttpMetadataClient::new(&config.metadata).unwrap();
    let tabulator = Arc::new(MetadataTabulator::new(Arc::new(client)));
    create_router(tabulator, Arc::new(config))
}

/// A multipart/form-data POST with one file field
fn upload(uri: &str, field: &str, csv: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"ids.csv\"\r\n\
         Content-Type: text/csv\r\n\
         \r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Mount a 200 response with a display name derived from the user ID
async fn mount_profile(server: &MockServer, user_id: &str) {
    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .and(wiremock::matchers::query_param("userId", user_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {
                "displayName": format!("User {user_id}"),
                "first_name": "Test",
                "last_name": user_id,
                "dob": { "day": "1", "month": "1", "year": "2000" }
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_api_server_serves_and_shuts_down() {
    let server = MockServer::start().await;
    let config = Arc::new(test_config(&server));
    let client = HttpMetadataClient::new(&config.metadata).unwrap();
    let tabulator = Arc::new(MetadataTabulator::new(Arc::new(client)));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(serve(listener, tabulator, config, async move {
        stop_rx.await.ok();
    }));

    let response = reqwest::get(format!("http://{address}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    stop_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_headers_present_when_enabled() {
    let server = MockServer::start().await;
    let app = test_router(test_config(&server));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_absent_when_disabled() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.server.api.cors_enabled = false;

    let response = test_router(config)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_api_key_guards_metadata_routes() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.server.api.api_key = Some("key-123".into());
    let app = test_router(config);

    let response = app
        .clone()
        .oneshot(upload("/metadata/preview", "file", "UID\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = upload("/metadata/preview", "file", "UID\n");
    request
        .headers_mut()
        .insert("x-api-key", "key-123".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.server.api.max_upload_bytes = 64;

    let csv = format!("UID\n{}", "1234567890\n".repeat(50));
    let response = test_router(config)
        .oneshot(upload("/metadata/preview", "file", &csv))
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "oversized upload returned {}",
        response.status()
    );
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
