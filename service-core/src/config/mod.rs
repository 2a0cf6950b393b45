use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings shared by every service, read from `configuration.*` and `APP__*`.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Read a setting through `lookup`.
///
/// In production every key must be set explicitly; elsewhere `default` is
/// used when the key is missing.
pub fn get_env<F>(
    lookup: &F,
    key: &str,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Read and parse a numeric/boolean setting, falling back to `default`.
pub fn get_parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_key_uses_default_outside_prod() {
        let lookup = lookup_from(&[]);
        let value = get_env(&lookup, "LOG_LEVEL", Some("info"), false).unwrap();
        assert_eq!(value, "info");
    }

    #[test]
    fn missing_key_fails_in_prod() {
        let lookup = lookup_from(&[]);
        assert!(get_env(&lookup, "LOG_LEVEL", Some("info"), true).is_err());
    }

    #[test]
    fn missing_required_key_fails() {
        let lookup = lookup_from(&[]);
        assert!(get_env(&lookup, "DATABASE_URL", None, false).is_err());
    }

    #[test]
    fn parsed_value_rejects_garbage() {
        let lookup = lookup_from(&[("TIMEOUT", "soon")]);
        assert!(get_parsed::<_, u64>(&lookup, "TIMEOUT", 30).is_err());
        assert_eq!(get_parsed::<_, u64>(&lookup, "OTHER", 30).unwrap(), 30);
    }
}
