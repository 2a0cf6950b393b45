//! Test helper module for home-energy-service integration tests.
//!
//! Spawns the real HTTP stack on a random port over an in-memory store, with
//! counters on the store and advice provider so tests can check call counts.

#![allow(dead_code)]

use async_trait::async_trait;
use home_energy_service::config::{
    CorsConfig, DatabaseConfig, Environment, HomeEnergyConfig, LlmConfig,
};
use home_energy_service::models::{CreateHome, Home};
use home_energy_service::services::advice::FallbackAdviceProvider;
use home_energy_service::services::providers::ProviderError;
use home_energy_service::services::{AdviceError, AdviceProvider, HomeStore, InMemoryHomeStore};
use home_energy_service::startup::Application;
use reqwest::{Client, Response};
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Configuration for tests; no database or backend is contacted.
pub fn test_config() -> HomeEnergyConfig {
    HomeEnergyConfig {
        common: CoreConfig { port: 0 }, // Random port
        environment: Environment::Dev,
        service_name: "home-energy-service-test".to_string(),
        service_version: "0.1.0".to_string(),
        log_level: "warn".to_string(),
        otlp_endpoint: None,
        debug: false,
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        llm: LlmConfig {
            api_key: Secret::new(String::new()),
            model: "gpt-4o-mini".to_string(),
            base_url: "http://127.0.0.1:9/v1".to_string(),
            timeout_seconds: 5,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

/// In-memory store that counts lookups.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryHomeStore,
    lookups: AtomicUsize,
}

impl CountingStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HomeStore for CountingStore {
    async fn create_home(&self, input: &CreateHome) -> Result<Home, AppError> {
        self.inner.create_home(input).await
    }

    async fn get_home(&self, id: i64) -> Result<Option<Home>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_home(id).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Wraps an advice provider and counts invocations.
pub struct CountingAdvice {
    inner: Arc<dyn AdviceProvider>,
    calls: AtomicUsize,
}

impl CountingAdvice {
    pub fn new(inner: Arc<dyn AdviceProvider>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdviceProvider for CountingAdvice {
    async fn generate_advice(&self, home: &Home) -> Result<Vec<String>, AdviceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate_advice(home).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Advice provider whose backend is always down.
pub struct FailingAdviceProvider;

#[async_trait]
impl AdviceProvider for FailingAdviceProvider {
    async fn generate_advice(&self, _home: &Home) -> Result<Vec<String>, AdviceError> {
        Err(AdviceError::BackendUnavailable(ProviderError::NetworkError(
            "connection refused by 10.0.0.7".to_string(),
        )))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<CountingStore>,
    pub advice: Arc<CountingAdvice>,
    pub client: Client,
}

impl TestApp {
    /// Spawn with the fixed fallback advice provider.
    pub async fn spawn() -> Self {
        Self::spawn_with_advice(Arc::new(FallbackAdviceProvider)).await
    }

    pub async fn spawn_with_advice(advice: Arc<dyn AdviceProvider>) -> Self {
        Self::spawn_with(test_config(), advice).await
    }

    pub async fn spawn_with(config: HomeEnergyConfig, advice: Arc<dyn AdviceProvider>) -> Self {
        let store = Arc::new(CountingStore::default());
        let advice = Arc::new(CountingAdvice::new(advice));

        let app = Application::build_with(config, store.clone(), advice.clone())
            .await
            .expect("Failed to build test application");

        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        Self {
            address,
            port,
            store,
            advice,
            client,
        }
    }

    pub async fn post_home(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/homes", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_home(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/homes/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_advice(&self, id: &str) -> Response {
        self.client
            .post(format!("{}/api/homes/{}/advice", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a home and return its id.
    pub async fn create_home(&self, body: &Value) -> i64 {
        let response = self.post_home(body).await;
        assert_eq!(response.status().as_u16(), 200);
        let created: Value = response.json().await.expect("Failed to parse JSON");
        created["id"].as_i64().expect("id is an integer")
    }
}

pub fn sample_home() -> Value {
    serde_json::json!({
        "size_sqm": 120,
        "year_built": 1995,
        "heating_type": "GAS",
        "insulation": "PARTIAL"
    })
}
