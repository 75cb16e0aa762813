//! Common test utilities and fixtures.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use tempfile::TempDir;

use catalog_server::{
    AppState, Config, CorsConfig, LoggingConfig, ServerConfig, StoreConfig, router,
};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "correct horse";

/// Test application wrapper that manages a temporary catalog file.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    /// Create a new test application with a fresh, empty catalog.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let server = Self::serve(&temp_dir)?;
        Ok(Self { server, temp_dir })
    }

    /// Start a second server over the same catalog file, as a restart
    /// would.
    pub fn restart(self) -> anyhow::Result<Self> {
        let server = Self::serve(&self.temp_dir)?;
        Ok(Self {
            server,
            temp_dir: self.temp_dir,
        })
    }

    fn serve(temp_dir: &TempDir) -> anyhow::Result<TestServer> {
        let config = Config {
            server: ServerConfig {
                bind: "127.0.0.1".into(),
                port: 0,
                static_path: None,
            },
            store: StoreConfig {
                path: temp_dir.path().join("data.json").to_string_lossy().into(),
            },
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
        };
        let state = AppState::from_config(&config)?;
        Ok(TestServer::new(router(state))?)
    }

    /// Path of the backing JSON document.
    pub fn data_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("data.json")
    }

    /// Register a user and return a bearer token for it.
    pub async fn login_as(&self, username: &str, password: &str) -> anyhow::Result<String> {
        self.server
            .post("/auth/signup")
            .json(&json!({ "username": username, "password": password }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| anyhow::anyhow!("login response has no token: {}", body))
    }

    /// Register the default admin user and return its token.
    pub async fn token(&self) -> anyhow::Result<String> {
        self.login_as(USERNAME, PASSWORD).await
    }

    /// Create a product through the API.
    pub async fn create_product(&self, token: &str, payload: Value) -> anyhow::Result<Value> {
        let response = self
            .server
            .post("/products")
            .authorization_bearer(token)
            .json(&payload)
            .await;
        response.assert_status(StatusCode::CREATED);
        Ok(response.json())
    }

    /// Create several products, returning their ids in order.
    pub async fn create_products(&self, token: &str, payloads: &[Value]) -> anyhow::Result<Vec<u64>> {
        let mut ids = Vec::new();
        for payload in payloads {
            let product = self.create_product(token, payload.clone()).await?;
            ids.push(product["id"].as_u64().unwrap());
        }
        Ok(ids)
    }

    /// All products, in list order.
    pub async fn list(&self) -> Vec<Value> {
        let response = self.server.get("/products").await;
        response.assert_status_ok();
        response.json()
    }
}

/// Extract the `price` of every product as `f64`.
pub fn prices(products: &[Value]) -> Vec<f64> {
    products.iter().map(|p| p["price"].as_f64().unwrap()).collect()
}

/// Assert the response is a JSON error with the given code.
pub fn assert_error_code(body: &Value, code: &str) {
    assert_eq!(
        body["error"]["code"].as_str(),
        Some(code),
        "unexpected error body: {}",
        body
    );
}
