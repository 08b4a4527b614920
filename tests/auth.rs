mod common;

use axum::http::StatusCode;
use certify::entities::sea_orm_active_enums::RoleEnum;
use common::{PASSWORD, spawn_app, spawn_app_with_config, test_config};
use serde_json::json;

#[tokio::test]
async fn company_registration_is_pending_without_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .register("hr@acme.io", "Company", "Grace Hopper", Some("Acme"))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["pending"], true);
    assert!(body.get("token").is_none());
    assert_eq!(body["user"]["verified"], false);
    assert_eq!(body["user"]["role"], "Company");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn student_registration_returns_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .register("Ada@Example.com", "student", "Ada Lovelace", None)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["pending"], false);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"], "ada@example.com");

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.get("/api/auth/me", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn unverified_account_cannot_login_until_approved() {
    let app = spawn_app().await;
    let (_, body) = app
        .register("dean@ferris.edu", "Institute", "Dean", Some("Ferris Academy"))
        .await;
    let user_id = body["user"]["user_id"].as_str().unwrap().to_string();

    let (status, body) = app.login("dean@ferris.edu").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("approval"));

    let admin = app.admin().await;
    let (status, approved) = app
        .put(&format!("/api/admin/users/{user_id}/approve"), Some(&admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["verified"], true);

    let (status, body) = app.login("dean@ferris.edu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["expires_in"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn login_token_authenticates_requests() {
    let app = spawn_app().await;
    app.seed_user("grace@example.com", RoleEnum::Student, "Grace", None)
        .await;

    let (status, body) = app.login("grace@example.com").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "grace@example.com");
    assert_eq!(me["role"], "Student");
}

#[tokio::test]
async fn registration_validation() {
    let app = spawn_app().await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "not-an-email", "password": PASSWORD, "fullName": "X", "role": "Student" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "x@example.com", "password": "short", "fullName": "X", "role": "Student" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("8"));

    app.register("dup@example.com", "Student", "Dup", None).await;
    let (status, _) = app
        .register("DUP@example.com", "Student", "Dup", None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_self_signup_is_gated() {
    let app = spawn_app().await;
    let (status, _) = app.register("root@example.com", "Admin", "Root", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut config = test_config();
    config.allow_admin_signup = true;
    let app = spawn_app_with_config(config).await;
    let (status, body) = app.register("root@example.com", "Admin", "Root", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn login_rejects_wrong_password_and_bad_tokens() {
    let app = spawn_app().await;
    app.register("ada@example.com", "Student", "Ada", None).await;

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_flow() {
    let app = spawn_app().await;
    let (_, body) = app.register("ada@example.com", "Student", "Ada", None).await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            "/api/auth/change-password",
            Some(&token),
            json!({ "oldPassword": "not-it-at-all", "newPassword": "brandnew123" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/auth/change-password",
            Some(&token),
            json!({ "oldPassword": PASSWORD, "newPassword": "brandnew123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.login("ada@example.com").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "brandnew123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = spawn_app().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
