//! Server Error Types

use inference_engine::InferenceError;
use thiserror::Error;

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metrics recorder: {0}")]
    Metrics(String),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Invalid rate limit: per_second and burst_size must be non-zero")]
    RateLimit,
}
