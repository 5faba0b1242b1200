//! Test server harness for E2E testing
//!
//! Provides `TestFeedbackServer` for spawning the real router on a random
//! port against an isolated database.

use crate::test_ids::TEST_JWT_SECRET;
use common::secret::SecretString;
use fc_service::config::{Config, Environment, MIN_BCRYPT_COST};
use fc_service::routes::{self, AppState};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Running Feedback Collector instance for E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_me(pool: PgPool) -> Result<()> {
///     let server = TestFeedbackServer::spawn(pool).await?;
///     let (token, _) = server.register("a@x.com", "secret1").await?;
///
///     let response = server
///         .client()
///         .get(format!("{}/auth/me", server.url()))
///         .bearer_auth(&token)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestFeedbackServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestFeedbackServer {
    /// Spawn with the test configuration: fixed signing secret and the
    /// cheapest allowed bcrypt cost.
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        Self::spawn_with_config(pool, test_config()).await
    }

    pub async fn spawn_with_config(pool: PgPool, config: Config) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState::new(pool.clone(), config.clone()));

        // The global recorder can only be installed once per process
        let metrics_handle = match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            client: reqwest::Client::new(),
            handle,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Base URL, e.g. `http://127.0.0.1:54321`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Register an account and return its token and public view.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, Value), anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/auth/register", self.url()))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        anyhow::ensure!(
            response.status() == reqwest::StatusCode::CREATED,
            "registration failed with {}",
            response.status()
        );

        let body: Value = response.json().await?;
        let token = body["token"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("registration response has no token"))?
            .to_string();

        Ok((token, body["user"].clone()))
    }

    /// Create a room as the holder of `token` and return the public view.
    pub async fn create_room(
        &self,
        token: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<Value, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/rooms", self.url()))
            .bearer_auth(token)
            .json(&json!({ "name": name, "password": password }))
            .send()
            .await?;

        anyhow::ensure!(
            response.status() == reqwest::StatusCode::CREATED,
            "room creation failed with {}",
            response.status()
        );

        Ok(response.json().await?)
    }
}

impl Drop for TestFeedbackServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Configuration used by [`TestFeedbackServer::spawn`].
pub fn test_config() -> Config {
    Config {
        database_url: String::new(), // Not used; the pool is passed in
        bind_address: "127.0.0.1:0".to_string(),
        jwt_secret: SecretString::from(TEST_JWT_SECRET),
        bcrypt_cost: MIN_BCRYPT_COST,
        allowed_origins: vec!["http://localhost:3000".to_string()],
        environment: Environment::Development,
        db_max_connections: 5,
        db_min_connections: 1,
        db_max_lifetime: Duration::from_secs(1800),
        db_acquire_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(30),
    }
}
