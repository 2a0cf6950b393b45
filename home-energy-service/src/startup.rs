//! Application startup and lifecycle management.

use crate::config::HomeEnergyConfig;
use crate::services::{
    init_metrics, select_advice_provider, AdviceProvider, Database, HomeStore,
};
use crate::{build_router, AppState};
use axum::Router;
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect to PostgreSQL, apply migrations, pick the advice provider and bind.
    pub async fn build(config: HomeEnergyConfig) -> Result<Self, AppError> {
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let advice = select_advice_provider(&config.llm)?;

        Self::build_with(config, Arc::new(db), advice).await
    }

    /// Bind with caller-supplied collaborators.
    pub async fn build_with(
        config: HomeEnergyConfig,
        store: Arc<dyn HomeStore>,
        advice: Arc<dyn AdviceProvider>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(
            http_port = http_port,
            advice_provider = advice.name(),
            "Home energy service listener bound"
        );

        let router = build_router(AppState {
            config,
            store,
            advice,
        });

        Ok(Self {
            http_port,
            http_listener,
            router,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            service = "home-energy-service",
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        axum::serve(self.http_listener, self.router)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "HTTP server error");
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
