//! Application configuration

use crate::rate_limit::RateLimitConfig;
use data_validator::ValidationConfig;
use inference_engine::ModelConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file (without extension)
pub const CONFIG_PATH_ENV: &str = "MFP_CONFIG";

/// Config file used when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub validation: ValidationConfig,
}

impl AppConfig {
    /// Load from `$MFP_CONFIG` (or `config/default`) overlaid with `MFP_*`
    /// environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a config file, which may be absent, plus the environment.
    /// Nested keys use a double underscore: `MFP_MODELS__BACKEND=rules`.
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        Self::load_layered(path, environment())
    }

    fn load_layered(
        path: &str,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

/// `MFP_` prefix, `__` between nested keys
fn environment() -> config::Environment {
    config::Environment::with_prefix("MFP")
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_engine::ModelBackend;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load_from("does/not/exist").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.models.backend, ModelBackend::Onnx);
        assert_eq!(config.logging.level, "info");
        assert!(!config.validation.allow_missing_as_zero);
    }

    #[test]
    fn test_environment_overrides() {
        let vars = config::Map::from([
            ("MFP_MODELS__BACKEND".to_string(), "rules".to_string()),
            ("MFP_SERVER__BIND_ADDR".to_string(), "127.0.0.1:9000".to_string()),
            ("MFP_RATE_LIMIT__BURST_SIZE".to_string(), "9".to_string()),
        ]);
        let config =
            AppConfig::load_layered("does/not/exist", environment().source(Some(vars))).unwrap();

        assert_eq!(config.models.backend, ModelBackend::Rules);
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.rate_limit.burst_size, 9);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = serde_json::from_str(
            r#"{"models": {"backend": "rules"}, "rate_limit": {"enabled": false}}"#,
        )
        .unwrap();
        assert_eq!(config.models.backend, ModelBackend::Rules);
        assert_eq!(config.models.failure_model_path, "models/machine_failure.onnx");
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.rate_limit.burst_size, 5);
    }
}
