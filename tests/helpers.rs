//! Shared test helpers for integration tests.
//!
//! These tests exercise the full HTTP stack against a real PostgreSQL
//! instance pointed to by `config/test.toml` (overridable with
//! `NIMBUS__DATABASE__URL`). They are ignored by default.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use nimbus_core::config::AppConfig;

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Database pool for direct queries.
    pub db_pool: PgPool,
}

/// A captured test response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application against a clean database.
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db = nimbus_database::connection::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();

        nimbus_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let cors = config.server.cors.clone();
        let state = nimbus_api::build_state(config, db_pool.clone())
            .await
            .expect("Failed to build app state");
        let router = nimbus_api::build_app(state, &cors);

        Self { router, db_pool }
    }

    async fn clean_database(pool: &PgPool) {
        sqlx::query("TRUNCATE share_access_log, shares, files, users CASCADE")
            .execute(pool)
            .await
            .expect("Failed to clean test database");
    }

    /// Issue a JSON request against the app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Issue a multipart file upload.
    pub async fn upload(
        &self,
        name: &str,
        content_type: &str,
        data: &[u8],
        bearer: &str,
    ) -> TestResponse {
        let boundary = "nimbus-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header("authorization", format!("Bearer {bearer}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("Failed to build upload request");

        self.send(request).await
    }

    /// Issue a raw request and return the body bytes.
    pub async fn request_bytes(&self, path: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, bytes.to_vec())
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Register an account and return its access token.
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]["access_token"]
            .as_str()
            .expect("No access token in login response")
            .to_string()
    }

    /// Upload a small text file and return its id.
    pub async fn upload_test_file(&self, bearer: &str) -> String {
        let response = self
            .upload("notes.txt", "text/plain", b"hello nimbus", bearer)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("No file id in upload response")
            .to_string()
    }

    /// Create a share and return (share id, share token).
    pub async fn create_share(
        &self,
        bearer: &str,
        file_id: &str,
        extra: Value,
    ) -> (String, String) {
        let mut body = serde_json::json!({ "file_id": file_id, "permission": "view" });
        if let (Some(base), Some(over)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in over {
                base.insert(k.clone(), v.clone());
            }
        }

        let response = self.request("POST", "/api/shares", Some(body), Some(bearer)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let id = response.body["data"]["id"].as_str().unwrap().to_string();
        let token = response.body["data"]["token"].as_str().unwrap().to_string();
        (id, token)
    }
}
