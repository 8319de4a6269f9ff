use super::*;

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let response = get(test_router(test_config(&server)), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_check_skips_api_key() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.server.api.api_key = Some("secret".into());

    let response = get(test_router(config), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_spec() {
    let server = MockServer::start().await;
    let response = get(test_router(test_config(&server)), "/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let spec: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(spec["info"]["title"], "uid-metadata REST API");
    assert!(spec["paths"]["/metadata/export"]["post"].is_object());
    assert!(spec["paths"]["/metadata/preview"]["post"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_enabled() {
    let server = MockServer::start().await;
    let response = get(test_router(test_config(&server)), "/swagger-ui/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.server.api.swagger_ui = false;

    let response = get(test_router(config), "/swagger-ui/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = MockServer::start().await;
    let response = get(test_router(test_config(&server)), "/downloads").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
