use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Datelike;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use consular_server::config::{
    AdminConfig, AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
};
use consular_server::state::AppState;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Per-file upload limit used by test servers.
pub const MAX_UPLOAD_SIZE: u64 = 64 * 1024;

pub mod routes {
    pub const CERTIFICATES: &str = "/api/v1/certificates";
    pub const CERTIFICATE_STATS: &str = "/api/v1/certificates/stats";
    pub const VERIFY_PAYLOAD: &str = "/api/v1/verify";
    pub const ADMIN_RESET: &str = "/api/v1/admin/reset";
    pub const HEALTH: &str = "/health";

    pub fn certificate(id: &str) -> String {
        format!("/api/v1/certificates/{id}")
    }

    pub fn verify(id: &str) -> String {
        format!("/api/v1/verify/{id}")
    }

    pub fn verify_page(id: &str) -> String {
        format!("/verify/{id}")
    }
}

/// `{prefix}-{current year}-{seq:03}`.
pub fn expected_id(prefix: &str, seq: u32) -> String {
    format!("{prefix}-{}-{seq:03}", chrono::Utc::now().year())
}

pub fn jane_doe() -> Vec<(&'static str, &'static str)> {
    vec![
        ("family_name", "Doe"),
        ("given_name", "Jane"),
        ("date_of_birth", "01.02.1990"),
        ("place_of_birth", "Kabul"),
    ]
}

/// A running test server backed by a throwaway SQLite database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// A file part for a certificate creation form.
pub struct FilePart {
    pub field: &'static str,
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn a server after letting the caller adjust its configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}/test.db?mode=rwc", dir.path().display());

        let upload_dir = dir.path().join("uploads");
        let mut app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url.clone(),
            },
            admin: AdminConfig {
                token: Some(ADMIN_TOKEN.to_string()),
            },
            storage: StorageConfig {
                upload_dir: upload_dir.clone(),
                max_upload_size: MAX_UPLOAD_SIZE,
            },
            issuer: Default::default(),
        };
        app_config.issuer.verify_base_url = "https://consulate.test/verify".to_string();
        app_config.issuer.integrity_key = Some("test-integrity-key".to_string());
        configure(&mut app_config);

        let db = consular_server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let state = AppState::new(app_config, db.clone())
            .await
            .expect("Failed to build app state");

        let app = consular_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            upload_dir,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning the raw body, for binary downloads.
    pub async fn get_bytes(&self, path: &str) -> (u16, Option<String>, Vec<u8>) {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.unwrap_or_default().to_vec();
        (status, content_type, bytes)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Submit a creation form with only text fields.
    pub async fn create_certificate(
        &self,
        category: &str,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        self.create_certificate_with_files(category, fields, Vec::new())
            .await
    }

    pub async fn create_certificate_with_files(
        &self,
        category: &str,
        fields: &[(&str, &str)],
        files: Vec<FilePart>,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(routes::CERTIFICATES))
            .multipart(certificate_form(category, fields, files))
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Issue Jane Doe's birth certificate and return its ID.
    pub async fn issue_birth(&self) -> String {
        let res = self.create_certificate("birth", &jane_doe()).await;
        assert_eq!(res.status, 201, "create_certificate failed: {}", res.text);
        res.id()
    }
}

pub fn certificate_form(category: &str, fields: &[(&str, &str)], files: Vec<FilePart>) -> Form {
    let mut form = Form::new().text("category", category.to_string());
    for (name, value) in fields {
        form = form.text(name.to_string(), value.to_string());
    }
    for file in files {
        let part = Part::bytes(file.bytes).file_name(file.filename);
        form = form.part(file.field, part);
    }
    form
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            content_type,
            text,
            body,
        }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }

    pub fn error_code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}
