//! Application test harness with HTTP request helpers.
//!
//! Runs the real router over the in-memory stores, so no bucket or database
//! is needed.

use std::sync::Arc;

use axum_test::{TestResponse, TestServer};
use blobgate::{
    AdminConfig, AppConfig, AppSettings, AppState, Claims, DatabaseConfig, LogLevel,
    MemoryBlobStore, MemoryRecordStore, Role, Secrets, StorageConfig, TokenOptions, build_router,
    issue_token,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use serde_json::json;

pub const TEST_SECRET: &str = "OIodbFUiNK34xthjR0newczMC6HaAyksJS1GXfYZ";

pub fn test_settings() -> AppSettings {
    AppSettings {
        app: AppConfig {
            name: "blobgate".into(),
            host: "localhost".into(),
            port: 3000,
            log_level: LogLevel::Error,
            log_directory: "./logs".into(),
        },
        storage: StorageConfig {
            bucket: "blobgate-test".into(),
            region: "us-east-1".into(),
            access_key: "blobgate".into(),
            url: "http://localhost:9000".into(),
        },
        database: DatabaseConfig {
            name: "blobgate".into(),
            host: "localhost".into(),
            port: 5432,
            user_name: "blobgate".into(),
            password: "unused".into(),
        },
        secrets: Secrets {
            jwt: TEST_SECRET.into(),
            storage: TEST_SECRET.into(),
        },
        admin: AdminConfig {
            username: "root".into(),
            password: "super-secret".into(),
        },
        token_options: TokenOptions {
            jwt_ttl_minutes: 15,
            session_cookie_ttl_minutes: 60,
        },
    }
}

/// Main test harness. Keeps typed handles on the memory stores so tests can
/// seed and inspect them directly.
pub struct AppTest {
    pub state: AppState,
    pub blobs: MemoryBlobStore,
    pub records: MemoryRecordStore,
    server: TestServer,
}

impl AppTest {
    pub fn new() -> anyhow::Result<Self> {
        let blobs = MemoryBlobStore::new();
        let records = MemoryRecordStore::new();
        let state = AppState {
            settings: test_settings(),
            blobs: Arc::new(blobs.clone()),
            records: Arc::new(records.clone()),
        };
        let server = TestServer::new(build_router(state.clone()))?;

        Ok(Self {
            state,
            blobs,
            records,
            server,
        })
    }

    /// Mints a bearer token directly, bypassing sign-in.
    pub fn token_for(&self, username: &str, role: Role) -> String {
        let claims = Claims::new(username, role, 15);
        issue_token(&claims, &self.state.settings.secrets.jwt).expect("failed to sign test token")
    }

    // ==================== Blob endpoints ====================

    /// GET /api/files?name=
    pub async fn get_file(&self, name: &str) -> TestResponse {
        self.server
            .get("/api/files")
            .add_query_param("name", name)
            .await
    }

    /// PUT /api/files?name=
    pub async fn put_file(
        &self,
        name: &str,
        body: &[u8],
        content_type: &str,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = self
            .server
            .put("/api/files")
            .add_query_param("name", name)
            .content_type(content_type)
            .bytes(Bytes::copy_from_slice(body));
        if let Some(token) = token {
            req = req.authorization_bearer(token);
        }
        req.await
    }

    /// PUT /api/files?name= with no content-type header
    pub async fn put_file_untyped(&self, name: &str, body: &[u8], token: &str) -> TestResponse {
        self.server
            .put("/api/files")
            .add_query_param("name", name)
            .bytes(Bytes::copy_from_slice(body))
            .authorization_bearer(token)
            .await
    }

    /// POST /api/files?name= (update-only)
    pub async fn post_file(
        &self,
        name: &str,
        body: &[u8],
        content_type: &str,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = self
            .server
            .post("/api/files")
            .add_query_param("name", name)
            .content_type(content_type)
            .bytes(Bytes::copy_from_slice(body));
        if let Some(token) = token {
            req = req.authorization_bearer(token);
        }
        req.await
    }

    /// DELETE /api/files?name=
    pub async fn delete_file(&self, name: &str, token: Option<&str>) -> TestResponse {
        let mut req = self.server.delete("/api/files").add_query_param("name", name);
        if let Some(token) = token {
            req = req.authorization_bearer(token);
        }
        req.await
    }

    /// GET /api/listJson
    pub async fn list_json(&self, filter: Option<&str>) -> TestResponse {
        let mut req = self.server.get("/api/listJson");
        if let Some(filter) = filter {
            req = req.add_query_param("filter", filter);
        }
        req.await
    }

    /// GET /api/listAll
    pub async fn list_all(&self, token: Option<&str>) -> TestResponse {
        let mut req = self.server.get("/api/listAll");
        if let Some(token) = token {
            req = req.authorization_bearer(token);
        }
        req.await
    }

    // ==================== User endpoints ====================

    /// POST /api/signup
    pub async fn signup(&self, username: &str, password: &str) -> TestResponse {
        self.server
            .post("/api/signup")
            .json(&json!({ "username": username, "password": password }))
            .await
    }

    /// POST /api/signin
    pub async fn signin(&self, username: &str, password: &str) -> TestResponse {
        self.server
            .post("/api/signin")
            .json(&json!({ "username": username, "password": password }))
            .await
    }

    /// GET /api/listUser
    pub async fn list_users(&self) -> TestResponse {
        self.server.get("/api/listUser").await
    }

    // ==================== Admin session ====================

    /// GET /auth with basic credentials
    pub async fn basic_auth(&self, username: &str, password: &str) -> TestResponse {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        self.server
            .get("/auth")
            .add_header("authorization", format!("Basic {encoded}"))
            .await
    }

    /// Arbitrary path, for the catch-all route.
    pub async fn get_raw(&self, path: &str) -> TestResponse {
        self.server.get(path).await
    }
}
