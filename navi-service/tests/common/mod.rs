//! Test helper module for navi-service integration tests.
//!
//! Builds the real router over an in-memory SQLite pool and a temporary
//! upload directory, and drives it without binding a socket.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use navi_service::{
    build_router,
    config::{
        DatabaseConfig, Environment, JwtConfig, NaviConfig, RegistrationConfig, SecurityConfig,
        UploadConfig, DEFAULT_MAX_UPLOAD_BYTES,
    },
    db,
    services::{DocumentStorage, LocalStorage},
    AppState,
};
use secrecy::SecretString;
use serde_json::Value;
use service_core::config::Config;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_JWT_SECRET: &str = "navi-test-secret-key-0123456789abcdef";
pub const TEST_PASSWORD: &str = "depot-pass-123";
const BOUNDARY: &str = "navi-test-boundary";

pub fn test_config(upload_dir: &std::path::Path) -> NaviConfig {
    NaviConfig {
        common: Config { port: 0 },
        environment: Environment::Dev,
        service_name: "navi-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        document_store: None,
        jwt: JwtConfig {
            secret: SecretString::new(TEST_JWT_SECRET.to_string()),
            token_expiry_hours: 8,
        },
        upload: UploadConfig {
            dir: upload_dir.to_path_buf(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        },
        registration: RegistrationConfig { auto_verify: true },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a tweaked configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut NaviConfig)) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let mut config = test_config(upload_dir.path());
        configure(&mut config);

        let pool = db::create_pool(&config.database)
            .await
            .expect("Failed to open in-memory database");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let storage: Arc<dyn DocumentStorage> = Arc::new(
            LocalStorage::new(&config.upload.dir)
                .await
                .expect("Failed to prepare storage"),
        );

        let state = AppState::new(config, pool, storage, None);
        let router = build_router(state.clone()).expect("Failed to build router");

        Self {
            router,
            state,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();
        (status, headers, body)
    }

    /// Send a JSON request (or an empty one) and parse the JSON reply.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let (status, _, bytes) = self.send(request).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.json(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.json(Method::PUT, uri, token, Some(body)).await
    }

    /// POST /api/register with the given text fields and optional file part.
    pub async fn register_form(
        &self,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> (StatusCode, Value) {
        let body = multipart_body(fields, file);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/register")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap();

        let (status, _, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Register an authority with a small PDF document.
    pub async fn register(&self, username: &str, email: &str) -> (StatusCode, Value) {
        self.register_form(
            &[
                ("username", username),
                ("email", email),
                ("department", "Transport"),
                ("password", TEST_PASSWORD),
            ],
            Some(("staff id.pdf", b"%PDF-1.4 test document")),
        )
        .await
    }

    pub async fn login(&self, identifier: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/login",
            None,
            serde_json::json!({ "identifier": identifier, "password": password }),
        )
        .await
    }

    /// Register a fresh authority and return a bearer token for it.
    pub async fn authority_token(&self) -> String {
        let (status, _) = self.register("depot_admin", "admin@transit.example").await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self.login("depot_admin", TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }

    /// Create a bus and return its id.
    pub async fn create_bus(&self, token: &str, name: &str, route: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/buses",
                Some(token),
                serde_json::json!({ "name": name, "route": route }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["bus"]["id"].as_i64().expect("bus id missing")
    }
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((filename, data)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
