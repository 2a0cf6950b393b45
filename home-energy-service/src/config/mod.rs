use secrecy::{ExposeSecret, Secret};
use service_core::config::{self as core_config, get_env, get_parsed};
use service_core::error::AppError;
use std::env;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct HomeEnergyConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    /// Exposes the OpenAPI docs under `/docs`.
    pub debug: bool,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Text-generation backend settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Empty means "no backend": the fixed fallback advice is served.
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl LlmConfig {
    /// The backend credential, if one is configured.
    pub fn credential(&self) -> Option<&str> {
        let key = self.api_key.expose_secret().trim();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl HomeEnergyConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment: Environment = get_env(&lookup, "ENVIRONMENT", Some("dev"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let config = HomeEnergyConfig {
            common,
            environment,
            service_name: get_env(&lookup, "SERVICE_NAME", Some("home-energy-service"), false)?,
            service_version: get_env(
                &lookup,
                "SERVICE_VERSION",
                Some(env!("CARGO_PKG_VERSION")),
                false,
            )?,
            log_level: get_env(&lookup, "LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.trim().is_empty()),
            debug: get_parsed(&lookup, "DEBUG", false)?,
            database: DatabaseConfig {
                url: get_env(&lookup, "DATABASE_URL", None, is_prod)?,
                max_connections: get_parsed(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: get_parsed(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?,
            },
            llm: LlmConfig {
                api_key: Secret::new(get_env(&lookup, "OPENAI_API_KEY", Some(""), is_prod)?),
                model: get_env(&lookup, "OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), false)?,
                base_url: get_env(
                    &lookup,
                    "OPENAI_BASE_URL",
                    Some(DEFAULT_OPENAI_BASE_URL),
                    false,
                )?,
                timeout_seconds: get_parsed(
                    &lookup,
                    "LLM_TIMEOUT_SECONDS",
                    DEFAULT_LLM_TIMEOUT_SECONDS,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    &lookup,
                    "BACKEND_CORS_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.database.max_connections == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MAX_CONNECTIONS must be positive"
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS"
            )));
        }

        if self.llm.timeout_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "LLM_TIMEOUT_SECONDS must be positive"
            )));
        }

        if self.environment == Environment::Prod {
            if self.cors.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if self.debug {
                tracing::warn!("DEBUG is enabled in production; API docs are publicly exposed");
            }
        }

        Ok(())
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "test" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
