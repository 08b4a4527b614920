mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::{spawn_app, spawn_app_with_config, test_config};
use tower::ServiceExt;

#[tokio::test]
async fn request_id_is_generated_and_echoed() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let generated = response.headers().get("x-request-id").unwrap();
    assert_eq!(generated.to_str().unwrap().len(), 36);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-42");
}

#[tokio::test]
async fn preflight_is_answered_for_allowed_origin() {
    let mut config = test_config();
    config.cors_allowed_origins = "https://certify.example".to_string();
    let app = spawn_app_with_config(config).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/certificates")
                .header(header::ORIGIN, "https://certify.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://certify.example"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn swagger_is_served_when_enabled() {
    let mut config = test_config();
    config.swagger_enabled = true;
    let app = spawn_app_with_config(config).await;

    let (status, doc) = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/certificates"].is_object());
    assert!(doc["paths"]["/api/verify/{id}"].is_object());

    let disabled = spawn_app().await;
    let (status, _) = disabled.get("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
