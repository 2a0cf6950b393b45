//! PostgreSQL home record store.

use crate::models::{CreateHome, Home, HomeRow};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::HomeStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

const HOME_COLUMNS: &str =
    "id, size_sqm, year_built, heating_type, insulation, notes, created_at, updated_at";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "home-energy-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

fn row_to_home(row: HomeRow) -> Result<Home, AppError> {
    Home::try_from(row).map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
}

#[async_trait]
impl HomeStore for Database {
    #[instrument(skip(self, input), fields(heating_type = %input.heating_type))]
    async fn create_home(&self, input: &CreateHome) -> Result<Home, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_home"])
            .start_timer();

        let row = sqlx::query_as::<_, HomeRow>(&format!(
            r#"
            INSERT INTO homes (size_sqm, year_built, heating_type, insulation, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {HOME_COLUMNS}
            "#
        ))
        .bind(input.size_sqm)
        .bind(input.year_built)
        .bind(input.heating_type.as_str())
        .bind(input.insulation.map(|i| i.as_str()))
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create home: {}", e)))?;

        timer.observe_duration();

        let home = row_to_home(row)?;
        info!(home_id = home.id, "Home created");

        Ok(home)
    }

    #[instrument(skip(self))]
    async fn get_home(&self, id: i64) -> Result<Option<Home>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_home"])
            .start_timer();

        let row = sqlx::query_as::<_, HomeRow>(&format!(
            "SELECT {HOME_COLUMNS} FROM homes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get home: {}", e)))?;

        timer.observe_duration();

        row.map(row_to_home).transpose()
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
