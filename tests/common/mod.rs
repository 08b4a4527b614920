#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use certify::app::create_app;
use certify::blockchain::{Notarizer, Notary, OnChainRecord};
use certify::config::Config;
use certify::db::connect_database;
use certify::entities::sea_orm_active_enums::RoleEnum;
use certify::repositories::{NewUser, UserRepository};
use certify::state::AppState;
use clap::Parser;
use futures::future::BoxFuture;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

/// In-process stand-in for the registry contract.
#[derive(Default)]
pub struct MockNotary {
    pub fail: Mutex<bool>,
    pub stored: Mutex<Vec<(String, String)>>,
}

impl Notary for MockNotary {
    fn store_certificate<'a>(
        &'a self,
        certificate_id: &'a str,
        certificate_hash: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(async move {
            if *self.fail.lock().unwrap() {
                return Err(anyhow!("connection refused"));
            }
            let mut stored = self.stored.lock().unwrap();
            stored.push((certificate_id.to_string(), certificate_hash.to_string()));
            Ok(format!("0x{:064x}", stored.len()))
        })
    }

    fn verify_certificate<'a>(
        &'a self,
        certificate_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<OnChainRecord>> {
        Box::pin(async move {
            let certificate_hash = self
                .stored
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(id, _)| id == certificate_id)
                .map(|(_, hash)| hash.clone())
                .unwrap_or_default();
            Ok(OnChainRecord {
                certificate_hash,
                timestamp: 1_714_521_600,
                issuer: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
            })
        })
    }

    fn contract_address(&self) -> String {
        "0x5fbdb2315678afecb367f032d93f642f64180aa3".to_string()
    }

    fn chain_id(&self) -> u64 {
        31337
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub notary: Option<Arc<MockNotary>>,
}

pub fn test_config() -> Config {
    let mut config = Config::parse_from(["certify"]);
    config.database_url = "sqlite::memory:".to_string();
    config.jwt_secret = Some("integration-test-secret".to_string());
    config.bcrypt_cost = 4;
    config.swagger_enabled = false;
    config.allow_admin_signup = false;
    config.public_base_url = "http://localhost:3000".to_string();
    config
}

async fn build(config: Config, with_chain: bool) -> TestApp {
    let db = connect_database(&config.database_url).await.unwrap();

    let (notary, notarizer) = if with_chain {
        let mock = Arc::new(MockNotary::default());
        let as_notary: Arc<dyn Notary> = mock.clone();
        let (notarizer, _handle) = Notarizer::spawn(db.clone(), as_notary);
        (Some(mock), Some(notarizer))
    } else {
        (None, None)
    };

    let state = AppState::new(
        db.clone(),
        config,
        notary.clone().map(|n| n as Arc<dyn Notary>),
        notarizer,
    );

    TestApp {
        router: create_app(state),
        db,
        notary,
    }
}

/// App without a chain: certificates are stored as `disabled`.
pub async fn spawn_app() -> TestApp {
    build(test_config(), false).await
}

/// App whose notarizer talks to a [`MockNotary`].
pub async fn spawn_app_with_chain() -> TestApp {
    build(test_config(), true).await
}

pub async fn spawn_app_with_config(config: Config) -> TestApp {
    build(config, false).await
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn register(
        &self,
        email: &str,
        role: &str,
        full_name: &str,
        organization: Option<&str>,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/auth/register",
            None,
            json!({
                "email": email,
                "password": PASSWORD,
                "fullName": full_name,
                "role": role,
                "organization": organization,
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": PASSWORD }),
        )
        .await
    }

    /// Seeds a verified account straight into the database and logs in.
    pub async fn seed_user(
        &self,
        email: &str,
        role: RoleEnum,
        full_name: &str,
        organization: Option<&str>,
    ) -> (String, String) {
        let user = UserRepository::new(&self.db)
            .create(NewUser {
                email: email.to_string(),
                password: bcrypt::hash(PASSWORD, 4).unwrap(),
                role,
                full_name: full_name.to_string(),
                organization: organization.map(str::to_string),
                phone: None,
                verified: true,
            })
            .await
            .unwrap();

        let (status, body) = self.login(email).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        (
            user.user_id.to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn admin(&self) -> String {
        self.seed_user("admin@certify.dev", RoleEnum::Admin, "Admin", None)
            .await
            .1
    }

    pub async fn institute(&self, email: &str, organization: &str) -> String {
        self.seed_user(email, RoleEnum::Institute, "Registrar", Some(organization))
            .await
            .1
    }

    pub async fn company(&self, email: &str, organization: &str) -> String {
        self.seed_user(email, RoleEnum::Company, "Recruiter", Some(organization))
            .await
            .1
    }

    pub async fn student(&self, email: &str, full_name: &str) -> (String, String) {
        self.seed_user(email, RoleEnum::Student, full_name, None).await
    }

    pub async fn issue(&self, token: &str, learner_name: &str, learner_email: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/certificates",
                Some(token),
                json!({
                    "learnerName": learner_name,
                    "learnerEmail": learner_email,
                    "courseName": "Systems Programming in Rust",
                    "issueDate": "2024-05-01",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    /// Polls the public verify endpoint until the certificate leaves
    /// `pending`.
    pub async fn wait_for_chain_status(&self, certificate_id: &str) -> String {
        for _ in 0..100 {
            let (_, body) = self.get(&format!("/api/verify/{certificate_id}"), None).await;
            let status = body["blockchain"]["status"].as_str().unwrap_or_default().to_string();
            if status != "pending" {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("certificate {certificate_id} stayed pending");
    }
}
