//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which `EntryStore` implementation backs the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub store_backend: StoreBackend,
    pub log_level: Level,
    pub llm_api_key: Option<String>,
    pub llm_api_base: String,
    pub analysis_model: String,
    pub analysis_timeout: Duration,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5000".to_string());

        // --- Entry store ---
        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "postgres".to_string());
        let store_backend = match backend.to_lowercase().as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORE_BACKEND".to_string(),
                    format!("'{}' is not one of 'postgres', 'memory'", other),
                ))
            }
        };

        // --- Language model settings ---
        let llm_api_key = lookup("OPENROUTER_API_KEY")
            .or_else(|| lookup("OPENROUTER_KEY"))
            .filter(|key| !key.trim().is_empty());
        let llm_api_base =
            lookup("LLM_API_BASE").unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string());
        let analysis_model = lookup("ANALYSIS_MODEL")
            .unwrap_or_else(|| "deepseek/deepseek-chat:free".to_string());

        let timeout_str = lookup("ANALYSIS_TIMEOUT_SECS").unwrap_or_else(|| "30".to_string());
        let analysis_timeout = match timeout_str.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidValue(
                    "ANALYSIS_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                ))
            }
        };

        Ok(Self {
            bind_address,
            store_backend,
            log_level,
            llm_api_key,
            llm_api_base,
            analysis_model,
            analysis_timeout,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_a_database_url() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/journal")]).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(
            config.store_backend,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/journal".to_string()
            }
        );
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.llm_api_key, None);
        assert_eq!(config.llm_api_base, "https://openrouter.ai/api/v1");
        assert_eq!(config.analysis_model, "deepseek/deepseek-chat:free");
        assert_eq!(config.analysis_timeout, Duration::from_secs(30));
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingVar(var)) if var == "DATABASE_URL"));
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let config = load(&[("STORE_BACKEND", "memory")]).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
    }

    #[test]
    fn api_key_falls_back_to_short_name() {
        let config = load(&[("STORE_BACKEND", "memory"), ("OPENROUTER_KEY", "sk-or-test")]).unwrap();
        assert_eq!(config.llm_api_key.as_deref(), Some("sk-or-test"));

        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("OPENROUTER_API_KEY", "sk-or-primary"),
            ("OPENROUTER_KEY", "sk-or-test"),
        ])
        .unwrap();
        assert_eq!(config.llm_api_key.as_deref(), Some("sk-or-primary"));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[("STORE_BACKEND", "redis")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "STORE_BACKEND"
        ));
        assert!(matches!(
            load(&[("STORE_BACKEND", "memory"), ("ANALYSIS_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "ANALYSIS_TIMEOUT_SECS"
        ));
        assert!(matches!(
            load(&[("STORE_BACKEND", "memory"), ("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "BIND_ADDRESS"
        ));
    }
}
